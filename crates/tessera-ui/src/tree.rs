//! Node tree with Taffy layout integration.

use std::fmt;

use indexmap::IndexMap;
use taffy::{Dimension, TaffyTree};
use tessera_core::profiling::profile_function;
use tessera_core::{Rect, Size};

use crate::behavior::{Behavior, BehaviorGuard, NodeSetup};
use crate::canvas::CanvasPainter;
use crate::dirty::DirtyFlags;
use crate::error::{UiError, UiResult};

/// Node identifier in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Intrinsic-size callback. Must be pure: the same node state always
/// yields the same size.
pub type MinSizeFn = Box<dyn Fn(&Node) -> UiResult<Size<u32>>>;

/// A node in the tree.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) taffy_node: taffy::NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) style_class: String,
    pub(crate) dirty_flags: DirtyFlags,
    pub(crate) painter: Option<Box<dyn CanvasPainter>>,
    pub(crate) min_size: Option<MinSizeFn>,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) layout_style: taffy::Style,
    pub(crate) visible: bool,
    pub(crate) clip_children: bool,
    /// Absolute screen-space bounds from the last layout pass.
    pub(crate) bounds: Rect<i32>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn style_class(&self) -> &str {
        &self.style_class
    }

    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty_flags
    }

    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(
            self.bounds.width.max(0) as u32,
            self.bounds.height.max(0) as u32,
        )
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn clips_children(&self) -> bool {
        self.clip_children
    }

    pub fn layout_style(&self) -> &taffy::Style {
        &self.layout_style
    }

    pub fn has_painter(&self) -> bool {
        self.painter.is_some()
    }

    pub fn has_min_size(&self) -> bool {
        self.min_size.is_some()
    }

    /// The attached behavior, if it is a `B`.
    pub fn behavior<B: Behavior>(&self) -> Option<&B> {
        self.behavior.as_deref()?.as_any().downcast_ref::<B>()
    }

    pub fn behavior_type_name(&self) -> Option<&'static str> {
        self.behavior.as_deref().map(|b| b.type_name())
    }

    /// Evaluate the min-size callback. Nodes without one report zero.
    pub fn min_size(&self) -> UiResult<Size<u32>> {
        match &self.min_size {
            Some(callback) => callback(self),
            None => Ok(Size::ZERO),
        }
    }

    /// A node with a fixed width and height. Layout changes inside it never
    /// change its own size, so dirty propagation stops here.
    pub fn is_layout_boundary(&self) -> bool {
        matches!(self.layout_style.size.width, Dimension::Length(_))
            && matches!(self.layout_style.size.height, Dimension::Length(_))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("style_class", &self.style_class)
            .field("dirty_flags", &self.dirty_flags)
            .field("behavior", &self.behavior_type_name())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

/// Arena owning every node, plus the Taffy tree mirroring its structure.
pub struct NodeTree {
    pub(crate) taffy: TaffyTree<NodeId>,
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) root: Option<NodeId>,
    next_id: usize,
    /// Viewport used by the last layout pass.
    pub(crate) last_viewport: Option<Size<u32>>,
}

fn layout_err(err: taffy::TaffyError) -> UiError {
    UiError::Layout(err.to_string())
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            nodes: IndexMap::new(),
            root: None,
            next_id: 0,
            last_viewport: None,
        }
    }

    /// Create a detached node and return its id.
    pub fn create_node(&mut self) -> UiResult<NodeId> {
        let id = NodeId(self.next_id);
        let layout_style = taffy::Style::default();
        let taffy_node = self
            .taffy
            .new_leaf_with_context(layout_style.clone(), id)
            .map_err(layout_err)?;
        self.next_id += 1;

        self.nodes.insert(
            id,
            Node {
                id,
                taffy_node,
                parent: None,
                children: Vec::new(),
                style_class: String::new(),
                dirty_flags: DirtyFlags::LAYOUT | DirtyFlags::REDRAW,
                painter: None,
                min_size: None,
                behavior: None,
                layout_style,
                visible: true,
                clip_children: false,
                bounds: Rect::default(),
            },
        );
        Ok(id)
    }

    /// Create a node and attach `behavior` to it.
    pub fn create_with(&mut self, behavior: impl Behavior) -> UiResult<NodeId> {
        let id = self.create_node()?;
        self.set_behavior(id, behavior)?;
        Ok(id)
    }

    /// Make a detached node the root of the tree.
    pub fn set_root(&mut self, id: NodeId) -> UiResult<()> {
        let node = self.get(id)?;
        if let Some(parent) = node.parent {
            return Err(UiError::InvalidHierarchy(format!(
                "node {} is a child of {} and cannot be the root",
                id, parent
            )));
        }
        self.root = Some(id);
        self.request_layout(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Append `child` to `parent`'s children. The child must be detached.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> UiResult<()> {
        let parent_taffy = self.get(parent)?.taffy_node;
        let child_node = self.get(child)?;
        if let Some(existing) = child_node.parent {
            return Err(UiError::InvalidHierarchy(format!(
                "node {} already has parent {}",
                child, existing
            )));
        }
        if self.root == Some(child) || self.is_ancestor_or_self(child, parent) {
            return Err(UiError::InvalidHierarchy(format!(
                "attaching {} under {} would create a cycle",
                child, parent
            )));
        }
        let child_taffy = child_node.taffy_node;
        self.taffy
            .add_child(parent_taffy, child_taffy)
            .map_err(layout_err)?;

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        self.request_layout(parent)
    }

    /// Remove a node together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> UiResult<()> {
        let node = self.get(id)?;
        let parent = node.parent;
        let taffy_node = node.taffy_node;

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.retain(|c| *c != id);
                self.taffy
                    .remove_child(parent_node.taffy_node, taffy_node)
                    .map_err(layout_err)?;
            }
            self.request_layout(parent_id)?;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.shift_remove(&current) {
                self.taffy.remove(node.taffy_node).map_err(layout_err)?;
                stack.extend(node.children);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
        tracing::trace!(node = %id, remaining = self.nodes.len(), "removed subtree");
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(&node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Like [`node`](Self::node) but reports a missing node as an error.
    pub fn get(&self, id: NodeId) -> UiResult<&Node> {
        self.nodes.get(&id).ok_or(UiError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: NodeId) -> UiResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(UiError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Tag used by external style sheets to match this node.
    pub fn set_style_class(&mut self, id: NodeId, name: impl Into<String>) -> UiResult<()> {
        self.get_mut(id)?.style_class = name.into();
        Ok(())
    }

    /// Attach a behavior, replacing any previous one, and let it install its
    /// capabilities on the node.
    pub fn set_behavior(&mut self, id: NodeId, behavior: impl Behavior) -> UiResult<()> {
        let node = self.get_mut(id)?;
        let mut behavior: Box<dyn Behavior> = Box::new(behavior);
        behavior.init(&mut NodeSetup::new(node));
        // Anything recorded before attachment is covered by the relayout below
        behavior.take_invalidation();
        tracing::debug!(node = %id, behavior = behavior.type_name(), "attached behavior");
        node.behavior = Some(behavior);
        self.request_layout(id)
    }

    pub fn set_painter(&mut self, id: NodeId, painter: impl CanvasPainter + 'static) -> UiResult<()> {
        self.get_mut(id)?.painter = Some(Box::new(painter));
        self.request_redraw(id)
    }

    /// Register the node's intrinsic-size function.
    pub fn enable_min_size(
        &mut self,
        id: NodeId,
        callback: impl Fn(&Node) -> UiResult<Size<u32>> + 'static,
    ) -> UiResult<()> {
        self.get_mut(id)?.min_size = Some(Box::new(callback));
        self.request_layout(id)
    }

    pub fn set_layout_style(&mut self, id: NodeId, style: taffy::Style) -> UiResult<()> {
        let node = self.get_mut(id)?;
        let taffy_node = node.taffy_node;
        node.layout_style = style.clone();
        self.taffy
            .set_style(taffy_node, style)
            .map_err(layout_err)?;
        self.request_layout(id)
    }

    /// Fix the node's width and height, making it a layout boundary.
    pub fn set_fixed_size(&mut self, id: NodeId, size: Size<u32>) -> UiResult<()> {
        let mut style = self.get(id)?.layout_style.clone();
        style.size = taffy::Size {
            width: Dimension::Length(size.width as f32),
            height: Dimension::Length(size.height as f32),
        };
        self.set_layout_style(id, style)
    }

    /// Hidden nodes and their subtrees are skipped by the paint pass but
    /// still take part in layout.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> UiResult<()> {
        let node = self.get_mut(id)?;
        if node.visible == visible {
            return Ok(());
        }
        node.visible = visible;
        let parent = node.parent;
        match parent {
            Some(parent) => self.request_redraw(parent),
            None => self.request_redraw(id),
        }
    }

    /// Restrict painting of descendants to this node's bounds.
    pub fn set_clip_children(&mut self, id: NodeId, clip: bool) -> UiResult<()> {
        self.get_mut(id)?.clip_children = clip;
        self.request_redraw(id)
    }

    /// Mark the node for relayout and repaint.
    ///
    /// Ancestors are marked as well, up to and including the nearest layout
    /// boundary.
    pub fn request_layout(&mut self, id: NodeId) -> UiResult<()> {
        self.get(id)?;
        self.mark_dirty_flags(id, DirtyFlags::LAYOUT | DirtyFlags::REDRAW);
        Ok(())
    }

    /// Mark the node for repaint only.
    pub fn request_redraw(&mut self, id: NodeId) -> UiResult<()> {
        self.get_mut(id)?.dirty_flags |= DirtyFlags::REDRAW;
        Ok(())
    }

    /// Apply `flags` through the matching request.
    pub(crate) fn invalidate(&mut self, id: NodeId, flags: DirtyFlags) {
        if flags.needs_layout() {
            self.mark_dirty_flags(id, DirtyFlags::LAYOUT | DirtyFlags::REDRAW);
        } else if flags.needs_redraw() {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.dirty_flags |= DirtyFlags::REDRAW;
            }
        }
    }

    fn mark_dirty_flags(&mut self, node_id: NodeId, flags: DirtyFlags) {
        profile_function!();

        let mut current = Some(node_id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get_mut(&id) else {
                break;
            };
            node.dirty_flags |= flags;
            self.taffy.mark_dirty(node.taffy_node).ok();

            if node.is_layout_boundary() {
                break;
            }
            current = node.parent;
        }
    }

    /// Mutable access to the node's behavior as a `B`.
    ///
    /// Invalidation recorded by the behavior's setters is applied when the
    /// returned guard is dropped.
    pub fn behavior_mut<B: Behavior>(&mut self, id: NodeId) -> UiResult<BehaviorGuard<'_, B>> {
        let node = self.get_mut(id)?;
        let matches = node
            .behavior
            .as_deref()
            .is_some_and(|b| b.as_any().is::<B>());
        if !matches {
            return Err(UiError::WrongBehavior {
                node: id,
                expected: std::any::type_name::<B>(),
            });
        }
        match node.behavior.take() {
            Some(behavior) => Ok(BehaviorGuard::new(self, id, behavior)),
            None => Err(UiError::WrongBehavior {
                node: id,
                expected: std::any::type_name::<B>(),
            }),
        }
    }

    /// Run `f` on the node's behavior, whatever its type, then apply the
    /// invalidation it recorded. Returns `None` if the node has no behavior.
    pub(crate) fn update_behavior<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn Behavior) -> R,
    ) -> UiResult<Option<R>> {
        let node = self.get_mut(id)?;
        let Some(behavior) = node.behavior.as_deref_mut() else {
            return Ok(None);
        };
        let result = f(behavior);
        let flags = behavior.take_invalidation();
        self.invalidate(id, flags);
        Ok(Some(result))
    }

    pub(crate) fn restore_behavior(&mut self, id: NodeId, behavior: Box<dyn Behavior>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.behavior = Some(behavior);
        }
    }

    /// Check if any node needs layout recomputation.
    pub fn has_layout_dirty(&self) -> bool {
        self.nodes.values().any(|n| n.dirty_flags.needs_layout())
    }

    /// Check if anything needs to be painted.
    pub fn is_dirty(&self) -> bool {
        self.nodes.values().any(|n| !n.dirty_flags.is_empty())
    }

    pub(crate) fn clear_flags(&mut self, ids: &[NodeId], flags: DirtyFlags) {
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id) {
                node.dirty_flags.remove(flags);
            }
        }
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

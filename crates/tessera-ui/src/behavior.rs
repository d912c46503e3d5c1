//! Behaviors attach presentation state and capabilities to a node.
//!
//! A behavior owns the state a widget presents (a label's text, color and
//! font). When it is attached it installs whatever capabilities it needs
//! through [`NodeSetup`]: a painter, a min-size callback, a style class.
//!
//! Setters on a behavior never touch the tree directly. They record an
//! [`Invalidation`], and [`BehaviorGuard`] forwards it to the tree when the
//! guard is dropped:
//!
//! ```ignore
//! let mut label = tree.behavior_mut::<Label>(id)?;
//! label.set_text("Hello");
//! drop(label); // node is now LAYOUT | REDRAW, ancestors are LAYOUT too
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::canvas::CanvasPainter;
use crate::dirty::DirtyFlags;
use crate::error::UiResult;
use crate::tree::{MinSizeFn, Node, NodeId, NodeTree};
use tessera_core::Size;

/// State and capabilities attached to one node.
pub trait Behavior: Any {
    /// Install painter, min-size callback and style class on the owning node.
    fn init(&mut self, node: &mut NodeSetup<'_>);

    /// Name used in diagnostics and style errors.
    fn type_name(&self) -> &'static str;

    /// Drain the dirty flags accumulated by setters since the last call.
    fn take_invalidation(&mut self) -> DirtyFlags {
        DirtyFlags::NONE
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Pending dirty flags recorded by a behavior's setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalidation(DirtyFlags);

impl Invalidation {
    pub fn layout(&mut self) {
        self.0 |= DirtyFlags::LAYOUT | DirtyFlags::REDRAW;
    }

    pub fn redraw(&mut self) {
        self.0 |= DirtyFlags::REDRAW;
    }

    pub fn pending(&self) -> DirtyFlags {
        self.0
    }

    pub fn take(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.0)
    }
}

/// Restricted view of a node handed to [`Behavior::init`].
pub struct NodeSetup<'a> {
    node: &'a mut Node,
}

impl<'a> NodeSetup<'a> {
    pub(crate) fn new(node: &'a mut Node) -> Self {
        Self { node }
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn set_painter(&mut self, painter: impl CanvasPainter + 'static) {
        self.node.painter = Some(Box::new(painter));
    }

    pub fn enable_min_size(
        &mut self,
        callback: impl Fn(&Node) -> UiResult<Size<u32>> + 'static,
    ) {
        self.node.min_size = Some(Box::new(callback) as MinSizeFn);
    }

    /// Set the style class unless the application already chose one.
    pub fn default_style_class(&mut self, name: &str) {
        if self.node.style_class.is_empty() {
            self.node.style_class = name.to_string();
        }
    }
}

/// Mutable access to a node's behavior that applies pending invalidation on drop.
///
/// The behavior is moved out of the node for the guard's lifetime and put
/// back when the guard is dropped.
pub struct BehaviorGuard<'a, B: Behavior> {
    tree: &'a mut NodeTree,
    id: NodeId,
    behavior: Option<Box<dyn Behavior>>,
    _marker: PhantomData<B>,
}

impl<'a, B: Behavior> BehaviorGuard<'a, B> {
    /// `behavior` must downcast to `B`; [`NodeTree::behavior_mut`] checks this.
    pub(crate) fn new(tree: &'a mut NodeTree, id: NodeId, behavior: Box<dyn Behavior>) -> Self {
        Self {
            tree,
            id,
            behavior: Some(behavior),
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<B: Behavior> Deref for BehaviorGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.behavior
            .as_deref()
            .and_then(|b| b.as_any().downcast_ref::<B>())
            .unwrap_or_else(|| unreachable!("behavior type checked when the guard was created"))
    }
}

impl<B: Behavior> DerefMut for BehaviorGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.behavior
            .as_deref_mut()
            .and_then(|b| b.as_any_mut().downcast_mut::<B>())
            .unwrap_or_else(|| unreachable!("behavior type checked when the guard was created"))
    }
}

impl<B: Behavior> Drop for BehaviorGuard<'_, B> {
    fn drop(&mut self) {
        if let Some(mut behavior) = self.behavior.take() {
            let flags = behavior.take_invalidation();
            self.tree.restore_behavior(self.id, behavior);
            self.tree.invalidate(self.id, flags);
        }
    }
}

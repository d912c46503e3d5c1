//! The layout pass: min-size negotiation through Taffy, then absolute bounds.
//!
//! Leaves report their intrinsic size through the node's min-size callback
//! and Taffy's measure function. Containers are sized by Taffy from their
//! children and their layout style. Positions come back relative to the
//! parent and are accumulated top-down into absolute screen bounds.

use taffy::{AvailableSpace, Dimension};
use tessera_core::profiling::{profile_function, profile_scope};
use tessera_core::{Pos, Rect, Size};

use crate::dirty::DirtyFlags;
use crate::error::{UiError, UiResult};
use crate::tree::{NodeId, NodeTree};

/// Outcome of one layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutPass {
    /// False when nothing was dirty and the viewport was unchanged.
    pub ran: bool,
    pub nodes_laid_out: usize,
}

impl NodeTree {
    /// Recompute sizes and positions for the tree below the root if anything
    /// requested layout or the viewport changed.
    ///
    /// On success `LAYOUT` is cleared on every node laid out. On failure the
    /// flags stay set so the next pass retries.
    pub fn compute_layout(&mut self, viewport: Size<u32>) -> UiResult<LayoutPass> {
        profile_function!();

        let Some(root) = self.root else {
            return Ok(LayoutPass::default());
        };
        if !self.has_layout_dirty() && self.last_viewport == Some(viewport) {
            return Ok(LayoutPass::default());
        }

        let root_taffy = self.get(root)?.taffy_node;
        let available = taffy::Size {
            width: AvailableSpace::Definite(viewport.width as f32),
            height: AvailableSpace::Definite(viewport.height as f32),
        };

        let mut first_error: Option<UiError> = None;
        let mut failed: Vec<taffy::NodeId> = Vec::new();
        {
            profile_scope!("taffy");
            let nodes = &self.nodes;
            let measure = |known: taffy::Size<Option<f32>>,
                           _available: taffy::Size<AvailableSpace>,
                           taffy_node: taffy::NodeId,
                           context: Option<&mut NodeId>,
                           _style: &taffy::Style|
             -> taffy::Size<f32> {
                let measured = context
                    .and_then(|id| nodes.get(&*id))
                    .map(|node| node.min_size())
                    .unwrap_or(Ok(Size::ZERO));
                let size = match measured {
                    Ok(size) => size,
                    Err(err) => {
                        failed.push(taffy_node);
                        first_error.get_or_insert(err);
                        Size::ZERO
                    }
                };
                taffy::Size {
                    width: known.width.unwrap_or(size.width as f32),
                    height: known.height.unwrap_or(size.height as f32),
                }
            };
            self.taffy
                .compute_layout_with_measure(root_taffy, available, measure)
                .map_err(|e| UiError::Layout(e.to_string()))?;
        }
        if let Some(err) = first_error {
            tracing::warn!(%err, failed = failed.len(), "min-size callback failed during layout");
            // Taffy cached the zero size it was given; force a fresh measure
            for taffy_node in failed {
                self.taffy
                    .mark_dirty(taffy_node)
                    .map_err(|e| UiError::Layout(e.to_string()))?;
            }
            return Err(err);
        }

        let laid_out = self.assign_bounds(root)?;
        self.clear_flags(&laid_out, DirtyFlags::LAYOUT);
        self.last_viewport = Some(viewport);

        tracing::debug!(
            nodes = laid_out.len(),
            width = viewport.width,
            height = viewport.height,
            "layout pass complete"
        );
        Ok(LayoutPass {
            ran: true,
            nodes_laid_out: laid_out.len(),
        })
    }

    /// Walk the subtree below `root` top-down, turning Taffy's parent-relative
    /// layouts into absolute bounds. Returns the ids visited.
    fn assign_bounds(&mut self, root: NodeId) -> UiResult<Vec<NodeId>> {
        let mut visited = Vec::new();
        let mut stack = vec![(root, Pos::new(0.0f32, 0.0f32))];

        while let Some((id, parent_origin)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let layout = self
                .taffy
                .layout(node.taffy_node)
                .map_err(|e| UiError::Layout(e.to_string()))?;

            let x = parent_origin.x + layout.location.x;
            let y = parent_origin.y + layout.location.y;
            node.bounds = Rect::new(
                x.round() as i32,
                y.round() as i32,
                layout.size.width.round() as i32,
                layout.size.height.round() as i32,
            );

            visited.push(id);
            let origin = Pos::new(x, y);
            stack.extend(node.children.iter().rev().map(|child| (*child, origin)));
        }
        Ok(visited)
    }
}

/// A `taffy::Style` whose size is fixed to `size` pixels.
pub fn fixed_style(size: Size<u32>) -> taffy::Style {
    taffy::Style {
        size: taffy::Size {
            width: Dimension::Length(size.width as f32),
            height: Dimension::Length(size.height as f32),
        },
        ..Default::default()
    }
}

//! Frame renderer: frame bracket, layout pass, paint pass.

use tessera_core::profiling::{new_frame, profile_function, profile_scope};
use tessera_core::{Rect, Size};
use tessera_render::RenderDevice;

use crate::canvas::Canvas;
use crate::dirty::DirtyFlags;
use crate::error::UiResult;
use crate::layout::LayoutPass;
use crate::tree::{NodeId, NodeTree};

#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Clear the surface to the device background before painting.
    pub clear_before_paint: bool,
    /// Start a new puffin frame for every rendered frame.
    pub profile: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_before_paint: true,
            profile: false,
        }
    }
}

/// What one call to [`Renderer::render`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub layout: LayoutPass,
    pub nodes_painted: usize,
}

/// Drives a [`NodeTree`] onto a [`RenderDevice`] once per frame.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
    frames: u64,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config, frames: 0 }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Frames rendered successfully so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render one frame.
    ///
    /// Order: `begin_frame`, optional `clear`, layout pass, paint pass,
    /// `end_frame`. The bracket is closed even when a pass fails; the error
    /// is returned and the dirty flags of the failed pass stay set.
    pub fn render(
        &mut self,
        tree: &mut NodeTree,
        device: &mut dyn RenderDevice,
    ) -> UiResult<FrameStats> {
        if self.config.profile {
            new_frame();
        }
        profile_function!();

        device.begin_frame()?;
        let result = self.render_frame(tree, device);
        let ended = device.end_frame();

        let stats = result?;
        ended?;
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            painted = stats.nodes_painted,
            "frame rendered"
        );
        Ok(stats)
    }

    fn render_frame(
        &mut self,
        tree: &mut NodeTree,
        device: &mut dyn RenderDevice,
    ) -> UiResult<FrameStats> {
        // A failed frame may have left its last node clip behind
        if device.clip().is_some() {
            device.disable_clip()?;
        }
        if self.config.clear_before_paint {
            device.clear()?;
        }
        let viewport = Size::new(device.width(), device.height());
        let layout = tree.compute_layout(viewport)?;
        let painted = paint(tree, device)?;
        tree.clear_flags(&painted, DirtyFlags::REDRAW);

        Ok(FrameStats {
            layout,
            nodes_painted: painted.len(),
        })
    }
}

/// Paint every visible node below the root in pre-order: parents before
/// children, siblings in insertion order so later siblings end up on top.
///
/// Returns the ids visited. The device clip is set to each node's effective
/// clip before its painter runs and disabled again at the end.
pub fn paint(tree: &NodeTree, device: &mut dyn RenderDevice) -> UiResult<Vec<NodeId>> {
    profile_scope!("paint");

    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    let surface = Rect::new(0, 0, device.width() as i32, device.height() as i32);

    let mut visited = Vec::new();
    let mut applied_clip: Option<Rect<i32>> = None;
    let mut stack = vec![(root, surface)];

    while let Some((id, clip)) = stack.pop() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        if !node.is_visible() {
            continue;
        }

        if let Some(painter) = node.painter.as_deref() {
            if applied_clip != Some(clip) {
                device.enable_clip(clip.x, clip.y, clip.right(), clip.bottom())?;
                applied_clip = Some(clip);
            }
            let mut canvas = Canvas::new(device, node.bounds(), clip);
            painter.paint(node, &mut canvas)?;
        }
        visited.push(id);

        let child_clip = if node.clips_children() {
            clip.intersect(&node.bounds())
        } else {
            clip
        };
        stack.extend(node.children().iter().rev().map(|child| (*child, child_clip)));
    }

    if applied_clip.is_some() {
        device.disable_clip()?;
    }
    Ok(visited)
}

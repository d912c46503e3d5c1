//! Tessera - a retained-mode 2D GUI toolkit
//!
//! Tessera keeps a tree of nodes, lays it out from the minimum sizes its
//! leaves report and paints it through a [`RenderDevice`] that any graphics
//! backend can implement.
//!
//! - **Render**: the device contract, colors, blend modes and resource handles
//! - **UI**: node tree, layout, canvas painting, style properties and [`Label`]
//! - **Audio**: the sound handle capability (feature `audio`)
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::prelude::*;
//!
//! tessera::init(&Config::default());
//!
//! let mut device = SoftwareRenderDevice::new(SoftwareDeviceConfig::with_size(320, 240));
//! let font = device.create_font("fonts/ui.fnt")?;
//!
//! let mut tree = NodeTree::new();
//! let root = tree.create_with(Label::new("Hello").with_font(font))?;
//! tree.set_fixed_size(root, Size::new(320, 240))?;
//! tree.set_root(root)?;
//!
//! let styles = StyleRegistry::with_builtin();
//! styles.apply(&mut tree, root, "text-color", "#ffcc00", &mut device)?;
//!
//! Renderer::new(RendererConfig::default()).render(&mut tree, &mut device)?;
//! ```

// Re-export core types
pub use tessera_core as core;
pub use tessera_core::{Config, HAlign, Pos, ProfilingMode, Rect, Size, VAlign};

pub use tessera_render as render;
pub use tessera_render::{BlendMode, Color, RenderDevice, RenderError, RenderResult};

#[cfg(feature = "ui")]
pub use tessera_ui as ui;
#[cfg(feature = "ui")]
pub use tessera_ui::{Label, NodeTree, Renderer, RendererConfig, StyleRegistry, UiError, UiResult};

#[cfg(feature = "audio")]
pub use tessera_audio as audio;

/// Install logging and profiling as described by `config`.
pub fn init(config: &Config) {
    config.apply();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "tessera initialised");
}

/// Commonly used types.
pub mod prelude {
    pub use tessera_core::{Config, HAlign, Pos, Rect, Size, VAlign};
    pub use tessera_render::{
        BlendMode, Color, FontHandle, ImageHandle, QuadColors, RenderDevice, RenderError,
        RenderFont, RenderImage,
    };

    #[cfg(feature = "software")]
    pub use tessera_render::software::{SoftwareDeviceConfig, SoftwareRenderDevice};

    #[cfg(feature = "ui")]
    pub use tessera_ui::{
        Behavior, Canvas, CanvasPainter, DirtyFlags, Label, Node, NodeId, NodeTree, Renderer,
        RendererConfig, StyleError, StyleRegistry, TextRenderer, UiError, UiResult,
    };

    #[cfg(feature = "audio")]
    pub use tessera_audio::{SoundHandle, Volume};
}

//! Tessera UI - retained-mode node tree with Taffy layout
//!
//! This crate turns a tree of nodes into [`RenderDevice`](tessera_render::RenderDevice)
//! calls once per frame:
//! - Nodes live in a [`NodeTree`] arena and carry dirty flags
//! - Behaviors such as [`Label`] attach state, a painter and a min-size callback
//! - Leaves report their minimum size and Taffy lays the tree out
//! - Painters draw through a [`Canvas`] in node-local coordinates
//! - Style properties are applied by name through a [`StyleRegistry`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera_core::Size;
//! use tessera_render::software::{SoftwareDeviceConfig, SoftwareRenderDevice};
//! use tessera_ui::{NodeTree, Renderer, RendererConfig};
//!
//! let mut device = SoftwareRenderDevice::new(SoftwareDeviceConfig::with_size(320, 240));
//! let mut tree = NodeTree::new();
//!
//! let root = tree.create_node().unwrap();
//! tree.set_fixed_size(root, Size::new(320, 240)).unwrap();
//! tree.set_root(root).unwrap();
//!
//! let mut renderer = Renderer::new(RendererConfig::default());
//! let stats = renderer.render(&mut tree, &mut device).unwrap();
//! assert!(stats.layout.ran);
//! ```

pub mod behavior;
pub mod canvas;
pub mod dirty;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod style;
pub mod text;
pub mod tree;
pub mod widgets;

pub use behavior::{Behavior, BehaviorGuard, Invalidation, NodeSetup};
pub use canvas::{Canvas, CanvasPainter};
pub use dirty::DirtyFlags;
pub use error::{UiError, UiResult};
pub use layout::{LayoutPass, fixed_style};
pub use renderer::{FrameStats, Renderer, RendererConfig, paint};
pub use style::{StyleError, StyleRegistry};
pub use text::TextRenderer;
pub use tree::{MinSizeFn, Node, NodeId, NodeTree};
pub use widgets::{Label, LabelPainter};

/// Re-export of the layout engine so callers can build `taffy::Style`s.
pub use taffy;

//! Tessera Render
//!
//! The [`RenderDevice`] contract every graphics backend implements, the
//! resource handles it hands out, and two backends of its own:
//!
//! - [`software::SoftwareRenderDevice`] rasterizes into an RGBA8 framebuffer
//!   and is the reference implementation of the contract.
//! - [`TracingRenderDevice`] wraps any other device and logs every call
//!   before forwarding it.
//!
//! ```
//! use tessera_render::{Color, RenderDevice};
//! use tessera_render::software::{SoftwareDeviceConfig, SoftwareRenderDevice};
//! use tessera_core::Rect;
//!
//! let mut device = SoftwareRenderDevice::new(SoftwareDeviceConfig::with_size(64, 64));
//! device.begin_frame().unwrap();
//! device.clear().unwrap();
//! device.render_quad(Rect::new(8, 8, 16, 16), Color::RED).unwrap();
//! device.end_frame().unwrap();
//! ```

pub mod blend;
pub mod color;
pub mod device;
pub mod error;
pub mod frame;
pub mod resource;
#[cfg(feature = "software")]
pub mod software;
pub mod tracing_device;

pub use blend::BlendMode;
pub use color::{Color, ParseColorError};
pub use device::{
    CursorHandle, FontHandle, ImageHandle, MouseCursor, QuadColors, RenderDevice, RenderFont,
    RenderImage,
};
pub use error::{RenderError, RenderResult};
pub use frame::FrameTracker;
pub use resource::{FileSystemLocation, ResourceLoader, ResourceLocation, ResourceLocator};
pub use tracing_device::TracingRenderDevice;

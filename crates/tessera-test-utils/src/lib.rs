//! Test utilities for Tessera.
//!
//! Provides a [`RenderDevice`](tessera_render::RenderDevice) that draws
//! nothing and records every call instead, plus fake resource handles with
//! predictable metrics.
//!
//! # Example
//!
//! ```rust
//! use tessera_core::Rect;
//! use tessera_render::{Color, RenderDevice, RenderFont};
//! use tessera_test_utils::{DeviceCall, FixedFont, RecordingRenderDevice};
//!
//! let mut device = RecordingRenderDevice::new(320, 240)
//!     .with_font("ui.fnt", FixedFont::new(10, 10));
//! let log = device.log();
//!
//! let font = device.create_font("ui.fnt").unwrap();
//! assert_eq!(font.width("Hi"), 20);
//!
//! device.begin_frame().unwrap();
//! device.render_quad(Rect::new(0, 0, 4, 4), Color::RED).unwrap();
//! device.end_frame().unwrap();
//!
//! assert_eq!(log.count(|c| matches!(c, DeviceCall::Quad { .. })), 1);
//! ```
//!
//! The call log is shared through [`CallLog`], so a test can keep observing
//! calls after handing the device itself to a renderer by `&mut`.

pub mod fakes;
pub mod recording;

pub use fakes::{FakeCursor, FakeImage, FixedFont};
pub use recording::{CallLog, DeviceCall, RecordingRenderDevice};

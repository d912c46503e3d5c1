//! Tessera Core
//!
//! Value types and ambient services shared by every Tessera crate:
//! geometry, text alignment, hashing collections, logging and profiling.

pub mod alloc;
pub mod align;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod profiling;

pub use align::{HAlign, ParseAlignError, VAlign};
pub use config::{Config, ProfilingMode};
pub use geometry::{Pos, Rect, Size};

//! Built-in behaviors.

mod label;

pub use label::{Label, LabelPainter};

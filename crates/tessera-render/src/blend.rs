//! Blend modes applied by a render device to subsequent draw calls.

use std::str::FromStr;

/// How source and destination colors are combined.
///
/// A device keeps its current mode until it is explicitly changed; the mode
/// is not a per-call parameter and survives across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// No blending - source completely replaces destination.
    Replace,

    /// Standard alpha blending for transparent content.
    ///
    /// Formula: `src.rgb * src.a + dst.rgb * (1 - src.a)`
    #[default]
    Alpha,

    /// Additive blending - colors are added together.
    ///
    /// Formula: `src.rgb * src.a + dst.rgb`
    Additive,

    /// Multiplicative blending.
    ///
    /// Formula: `src.rgb * dst.rgb`
    Multiply,
}

impl BlendMode {
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Replace => "replace",
            BlendMode::Alpha => "blend",
            BlendMode::Additive => "add",
            BlendMode::Multiply => "multiply",
        }
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "replace" => Ok(BlendMode::Replace),
            "blend" | "alpha" => Ok(BlendMode::Alpha),
            "add" | "additive" => Ok(BlendMode::Additive),
            "multiply" => Ok(BlendMode::Multiply),
            other => Err(format!("unknown blend mode '{}'", other)),
        }
    }
}

use std::fmt;

use crate::{AudioError, AudioResult};

/// A volume in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const MIN: Volume = Volume(0.0);
    pub const MAX: Volume = Volume(1.0);

    /// Fails with [`AudioError::InvalidVolume`] outside the range or for NaN.
    pub fn new(value: f32) -> AudioResult<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AudioError::InvalidVolume(value))
        }
    }

    /// Clamp into range. NaN becomes silence.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            Self::MIN
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

impl TryFrom<f32> for Volume {
    type Error = AudioError;

    fn try_from(value: f32) -> AudioResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

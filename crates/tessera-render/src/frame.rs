//! Frame bracket bookkeeping shared by device implementations.

use crate::error::{RenderError, RenderResult};

/// Tracks whether a device is between `begin_frame` and `end_frame`.
///
/// Brackets do not nest: beginning a frame while one is active, ending a
/// frame that was never begun, and issuing draw calls outside a bracket are
/// all reported as [`RenderError::IllegalState`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameTracker {
    active: bool,
    frames_completed: u64,
}

impl FrameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> RenderResult<()> {
        if self.active {
            return Err(RenderError::IllegalState(
                "begin_frame called while a frame is already active".into(),
            ));
        }
        self.active = true;
        Ok(())
    }

    pub fn end(&mut self) -> RenderResult<()> {
        if !self.active {
            return Err(RenderError::IllegalState(
                "end_frame called without a matching begin_frame".into(),
            ));
        }
        self.active = false;
        self.frames_completed += 1;
        Ok(())
    }

    /// Fail with `IllegalState` unless a frame is active.
    pub fn ensure_active(&self, operation: &str) -> RenderResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(RenderError::IllegalState(format!(
                "{} called outside of begin_frame/end_frame",
                operation
            )))
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_lifecycle() {
        let mut tracker = FrameTracker::new();
        assert!(tracker.ensure_active("render_quad").is_err());
        tracker.begin().unwrap();
        assert!(tracker.ensure_active("render_quad").is_ok());
        tracker.end().unwrap();
        assert_eq!(tracker.frames_completed(), 1);
        assert!(tracker.ensure_active("render_quad").unwrap_err().is_illegal_state());
    }

    #[test]
    fn brackets_do_not_nest() {
        let mut tracker = FrameTracker::new();
        tracker.begin().unwrap();
        assert!(tracker.begin().unwrap_err().is_illegal_state());
        tracker.end().unwrap();
        assert!(tracker.end().unwrap_err().is_illegal_state());
    }
}

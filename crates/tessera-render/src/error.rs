//! Errors reported by render devices.

/// Errors that can occur while talking to a [`RenderDevice`](crate::RenderDevice).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// An asset could not be resolved, read or decoded.
    #[error("failed to load resource '{path}': {reason}")]
    Resource { path: String, reason: String },

    /// Geometry, indices or handles outside their valid range.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The device protocol was violated, e.g. drawing outside a frame.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl RenderError {
    pub fn resource(path: impl Into<String>, reason: impl ToString) -> Self {
        RenderError::Resource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, RenderError::Resource { .. })
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, RenderError::IllegalState(_))
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, RenderError::Argument(_))
    }
}

/// Result type for render device operations.
pub type RenderResult<T> = Result<T, RenderError>;

//! Errors raised by the node tree, layout and paint passes.

use tessera_render::RenderError;

use crate::style::StyleError;
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// A label was laid out or painted before a font was assigned.
    #[error("label has no font")]
    MissingFont,

    /// Re-parenting an attached node, or an edge that would create a cycle.
    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// The layout engine rejected an operation on its node tree.
    #[error("layout engine error: {0}")]
    Layout(String),

    #[error("node {node} has no behavior of type {expected}")]
    WrongBehavior {
        node: NodeId,
        expected: &'static str,
    },
}

impl UiError {
    pub fn is_missing_font(&self) -> bool {
        matches!(self, UiError::MissingFont)
    }
}

pub type UiResult<T> = Result<T, UiError>;

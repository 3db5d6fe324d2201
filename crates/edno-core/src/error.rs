use crate::id::{ArrowId, NodeId};

/// Errors raised by diagram operations.
///
/// Geometry never fails; degenerate inputs are clamped instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiagramError {
    #[error("the label `{0}` is already used by another node")]
    DuplicateLabel(String),

    #[error("a connection from {predictor} to {dependent} is not allowed")]
    PolicyRejected { predictor: NodeId, dependent: NodeId },

    #[error("{0} does not exist")]
    UnknownNode(NodeId),

    #[error("{0} does not exist")]
    UnknownArrow(ArrowId),

    #[error("no node type is registered under `{0}`")]
    UnknownNodeType(String),

    #[error("invalid node type `{tag}`: {reason}")]
    InvalidNodeType { tag: String, reason: String },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, DiagramError>;

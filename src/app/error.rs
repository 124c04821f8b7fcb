use thiserror::Error;

/// Errors surfaced by the document engine.
///
/// Every variant is a programming-contract violation: the UI layer only
/// builds actions out of already-validated gestures, so hitting one of
/// these means an invariant broke upstream. They are returned synchronously
/// and never retried; a failing operation leaves the action log and the
/// document state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An id lookup (layer, component, token, prop) missed.
    #[error("not found: {0}")]
    NotFound(String),

    /// A structural edit targeted the wrong kind of layer.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// An insertion position named a non-container, or a node that is not
    /// in the tree.
    #[error("invalid parent: {0}")]
    InvalidParent(String),

    /// Deleting the node would have emptied the tree; moving the root is
    /// not a valid move.
    #[error("tree is empty after delete")]
    EmptyTreeAfterDelete,

    /// Drag resolution found no ancestor row one level above the requested
    /// depth.
    #[error("no parent row found at depth {0}")]
    ParentNotFound(i32),

    /// A malformed action payload.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results with EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

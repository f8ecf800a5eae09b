use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum GhtError {
    /// The bucket dispatcher is out of allocation quota. Propagated through
    /// insert and split; the tree is left in its last consistent state.
    #[error("bucket storage exhausted: {0}")]
    StorageExhausted(String),

    /// A reference-point-selection strategy violated one of its invariants.
    /// This is a programming error, not a user-recoverable condition.
    #[error("malformed strategy state: {0}")]
    MalformedStrategyState(String),

    /// The query arguments were rejected before traversal began.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, GhtError>;

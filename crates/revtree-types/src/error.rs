use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid node name: {0:?}")]
    InvalidName(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;

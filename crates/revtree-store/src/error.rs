use revtree_types::{Revision, TypeError};

/// Errors from node store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested revision does not exist.
    #[error("revision not found: {0}")]
    RevisionNotFound(Revision),

    /// No node exists at the path in the given revision.
    #[error("node not found: {path} at revision {revision}")]
    NodeNotFound { path: String, revision: Revision },

    /// The path or name is malformed.
    #[error(transparent)]
    InvalidPath(#[from] TypeError),

    /// A node could not be built from the supplied data.
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// A listing filter could not be parsed.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend cannot serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

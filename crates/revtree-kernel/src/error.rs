use revtree_jsop::JsopError;
use revtree_store::StoreError;
use revtree_types::TypeError;
use thiserror::Error;

/// Errors surfaced by node snapshots.
///
/// None of these are retried or defaulted here. A missing child is not an
/// error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The listing does not follow the protocol grammar.
    #[error("malformed node listing: {0}")]
    Parse(#[from] JsopError),

    /// A value position holds a token that is not a scalar, array or object.
    #[error("unexpected token: {token}")]
    Decode { token: String },

    /// An "all children" enumeration was requested on too large a node.
    #[error("too many child nodes to enumerate: {child_count} exceeds {limit}")]
    EnumerationTooLarge { child_count: u64, limit: u64 },

    /// The child name cannot be a path segment.
    #[error("invalid child name: {0}")]
    InvalidName(#[from] TypeError),

    /// The store failed to answer.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl KernelError {
    pub(crate) fn decode(token: impl Into<String>) -> Self {
        Self::Decode {
            token: token.into(),
        }
    }
}

/// Result alias for snapshot operations.
pub type KernelResult<T> = Result<T, KernelError>;

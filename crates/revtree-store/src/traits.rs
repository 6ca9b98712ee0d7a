use std::sync::Arc;

use revtree_types::Revision;

use crate::error::StoreResult;
use crate::request::ListNodes;

/// Revision-addressed node store.
///
/// All implementations must satisfy these invariants:
/// - A revision never changes once it is visible through [`head_revision`].
/// - Listing the same request against the same revision always returns the
///   same blob.
/// - Concurrent reads are always safe.
///
/// [`head_revision`]: NodeStore::head_revision
pub trait NodeStore: Send + Sync {
    /// The most recent revision.
    fn head_revision(&self) -> StoreResult<Revision>;

    /// List one node in the textual listing format.
    ///
    /// Returns `Err(StoreError::NodeNotFound)` if the path does not exist in
    /// the revision, and `Err(StoreError::RevisionNotFound)` for an unknown
    /// revision.
    fn list_node(&self, request: &ListNodes) -> StoreResult<String>;

    /// Check whether a node exists at `path` in `revision`.
    fn node_exists(&self, path: &str, revision: &Revision) -> StoreResult<bool>;
}

impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    fn head_revision(&self) -> StoreResult<Revision> {
        (**self).head_revision()
    }

    fn list_node(&self, request: &ListNodes) -> StoreResult<String> {
        (**self).list_node(request)
    }

    fn node_exists(&self, path: &str, revision: &Revision) -> StoreResult<bool> {
        (**self).node_exists(path, revision)
    }
}

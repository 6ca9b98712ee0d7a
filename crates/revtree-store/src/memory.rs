use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use revtree_types::{segments, validate_path, Revision};

use crate::error::{StoreError, StoreResult};
use crate::node::StoredNode;
use crate::request::ListNodes;
use crate::traits::NodeStore;

/// Domain tag mixed into every revision hash.
const REVISION_DOMAIN: &str = "revtree-revision-v1";

struct Revisions {
    roots: HashMap<Revision, Arc<StoredNode>>,
    /// Commit order; the last entry is the head.
    history: Vec<Revision>,
}

/// In-memory, revision-addressed node store.
///
/// Intended for tests and embedding. Every committed revision keeps its own
/// immutable root behind an `Arc`; unchanged subtrees are shared between
/// revisions. A fresh store starts with one revision holding an empty root.
pub struct InMemoryNodeStore {
    revisions: RwLock<Revisions>,
}

impl InMemoryNodeStore {
    /// Create a store whose head revision is an empty root.
    pub fn new() -> Self {
        let root = StoredNode::new();
        let initial = mint_revision(None, &root);
        let revisions = Revisions {
            roots: HashMap::from([(initial.clone(), Arc::new(root))]),
            history: vec![initial],
        };
        Self {
            revisions: RwLock::new(revisions),
        }
    }

    /// Create a store and commit `root` as its head revision.
    pub fn with_root(root: StoredNode) -> StoreResult<(Self, Revision)> {
        let store = Self::new();
        let revision = store.commit(root)?;
        Ok((store, revision))
    }

    /// Commit a new root and return the revision naming it.
    ///
    /// The revision id is derived from the parent revision and the content of
    /// the tree, so the same tree committed on top of different histories
    /// gets distinct ids.
    pub fn commit(&self, root: StoredNode) -> StoreResult<Revision> {
        let mut revisions = self.revisions.write().map_err(|e| {
            StoreError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        let parent = revisions.history.last().cloned();
        let revision = mint_revision(parent.as_ref(), &root);
        let node_count = root.node_count();
        if !revisions.roots.contains_key(&revision) {
            revisions.roots.insert(revision.clone(), Arc::new(root));
            revisions.history.push(revision.clone());
        }
        debug!(%revision, node_count, "committed revision");
        Ok(revision)
    }

    /// The root node of `revision`.
    pub fn root(&self, revision: &Revision) -> StoreResult<Arc<StoredNode>> {
        let revisions = self.revisions.read().map_err(|e| {
            StoreError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        revisions
            .roots
            .get(revision)
            .cloned()
            .ok_or_else(|| StoreError::RevisionNotFound(revision.clone()))
    }

    /// Resolve `path` in `revision`. `Ok(None)` if no node lives there.
    fn resolve(&self, path: &str, revision: &Revision) -> StoreResult<Option<Arc<StoredNode>>> {
        validate_path(path)?;
        let mut node = self.root(revision)?;
        for name in segments(path) {
            let Some(child) = node.child(name).cloned() else {
                return Ok(None);
            };
            node = child;
        }
        Ok(Some(node))
    }
}

impl Default for InMemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore for InMemoryNodeStore {
    fn head_revision(&self) -> StoreResult<Revision> {
        let revisions = self.revisions.read().map_err(|e| {
            StoreError::Unavailable(format!("lock poisoned: {e}"))
        })?;
        revisions
            .history
            .last()
            .cloned()
            .ok_or_else(|| StoreError::Unavailable("store has no revisions".into()))
    }

    fn list_node(&self, request: &ListNodes) -> StoreResult<String> {
        let node = self
            .resolve(&request.path, &request.revision)?
            .ok_or_else(|| StoreError::NodeNotFound {
                path: request.path.clone(),
                revision: request.revision.clone(),
            })?;
        let rendered = node.render(
            request.depth,
            request.offset,
            request.max_child_names,
            request.filter.as_ref(),
        );
        serde_json::to_string(&rendered).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn node_exists(&self, path: &str, revision: &Revision) -> StoreResult<bool> {
        Ok(self.resolve(path, revision)?.is_some())
    }
}

impl std::fmt::Debug for InMemoryNodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.revisions.read().map(|r| r.history.len()).unwrap_or(0);
        f.debug_struct("InMemoryNodeStore")
            .field("revision_count", &count)
            .finish()
    }
}

/// Derive a revision id from the parent revision and the tree content.
fn mint_revision(parent: Option<&Revision>, root: &StoredNode) -> Revision {
    let mut hasher = blake3::Hasher::new();
    hasher.update(REVISION_DOMAIN.as_bytes());
    hasher.update(b":");
    if let Some(parent) = parent {
        hasher.update(parent.as_str().as_bytes());
    }
    hasher.update(b":");
    hasher.update(root.to_json().to_string().as_bytes());
    let hash = hasher.finalize();
    Revision::new(format!("r{}", hex::encode(&hash.as_bytes()[..8])))
}

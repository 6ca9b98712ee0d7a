use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, TryLockError};

use tracing::debug;

use revtree_store::ListNodes;
use revtree_types::{child_path, validate_name, Revision, ROOT};

use crate::context::KernelContext;
use crate::error::KernelResult;
use crate::pager;
use crate::protocol::{decode_node, DecodedNode};
use crate::state::{ChildNodeEntry, NodeState, PropertyState};

/// Materialization state of a [`KernelNodeState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Identity only; nothing fetched yet.
    Unloaded,
    /// A caller is fetching and decoding the listing.
    Loading,
    /// Decoded state is published and fixed.
    Loaded,
}

/// Lazy, immutable view of one node at a pinned revision.
///
/// The first read of any property or child issues one listing query and
/// publishes the decoded result. Concurrent first readers serialize on a
/// per-node lock; the loser of the race re-checks and reuses the winner's
/// result, so each node queries the store at most once on success. A failed
/// load publishes nothing and leaves the node [`LoadState::Unloaded`].
///
/// Children are created unmaterialized and never point back at their parent.
pub struct KernelNodeState {
    context: Arc<KernelContext>,
    path: String,
    revision: Revision,
    decoded: OnceLock<DecodedNode>,
    load_lock: Mutex<()>,
}

impl KernelNodeState {
    /// Create an unmaterialized snapshot of the node at `path` in `revision`.
    ///
    /// Nothing is checked here; a node that does not exist fails on first read.
    pub fn new(context: Arc<KernelContext>, path: impl Into<String>, revision: Revision) -> Self {
        Self {
            context,
            path: path.into(),
            revision,
            decoded: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the root node at `revision`.
    pub fn root(context: Arc<KernelContext>, revision: Revision) -> Self {
        Self::new(context, ROOT, revision)
    }

    /// Snapshot of the root node at the store's current head revision.
    pub fn head(context: Arc<KernelContext>) -> KernelResult<Self> {
        let revision = context.store().head_revision()?;
        Ok(Self::root(context, revision))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }

    pub fn context(&self) -> &Arc<KernelContext> {
        &self.context
    }

    /// Current materialization state. Never triggers a load.
    pub fn load_state(&self) -> LoadState {
        if self.decoded.get().is_some() {
            return LoadState::Loaded;
        }
        match self.load_lock.try_lock() {
            Err(TryLockError::WouldBlock) => LoadState::Loading,
            _ => LoadState::Unloaded,
        }
    }

    /// The decoded state, materializing it on first use.
    pub fn decoded(&self) -> KernelResult<&DecodedNode> {
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(decoded) = self.decoded.get() {
            return Ok(decoded);
        }
        let decoded = self.materialize()?;
        Ok(self.decoded.get_or_init(|| decoded))
    }

    fn materialize(&self) -> KernelResult<DecodedNode> {
        let request = ListNodes::new(self.path.clone(), self.revision.clone())
            .with_max_child_names(self.context.config().child_cache_limit);
        let blob = self.context.store().list_node(&request)?;
        let decoded = decode_node(&blob, &self.context, &self.path, &self.revision)?;
        debug!(
            path = %self.path,
            revision = %self.revision,
            properties = decoded.properties().len(),
            child_count = decoded.child_count(),
            cached = decoded.children().len(),
            "materialized node"
        );
        Ok(decoded)
    }

    /// A new unmaterialized snapshot of the child `name`, sharing this
    /// node's context and revision.
    pub(crate) fn new_child(&self, name: &str) -> Self {
        Self::new(
            Arc::clone(&self.context),
            child_path(&self.path, name),
            self.revision.clone(),
        )
    }
}

impl NodeState for KernelNodeState {
    fn property_count(&self) -> KernelResult<usize> {
        Ok(self.decoded()?.properties().len())
    }

    fn property(&self, name: &str) -> KernelResult<Option<&PropertyState>> {
        Ok(self.decoded()?.property(name))
    }

    fn properties(&self) -> KernelResult<&[PropertyState]> {
        Ok(self.decoded()?.properties())
    }

    fn child_node_count(&self) -> KernelResult<u64> {
        Ok(self.decoded()?.child_count())
    }

    fn child_node(&self, name: &str) -> KernelResult<Option<Arc<Self>>> {
        validate_name(name)?;
        let decoded = self.decoded()?;
        if let Some(child) = decoded.child(name) {
            return Ok(Some(Arc::clone(child)));
        }
        if decoded.child_count() <= self.context.config().child_cache_limit {
            return Ok(None);
        }

        // Beyond the cached prefix: ask the store, and do not cache the answer.
        let child = self.new_child(name);
        let exists = self.context.store().node_exists(child.path(), &self.revision)?;
        debug!(path = %child.path(), revision = %self.revision, exists, "checked uncached child");
        Ok(exists.then(|| Arc::new(child)))
    }

    fn child_node_entries(
        &self,
        offset: u64,
        count: Option<usize>,
    ) -> KernelResult<Vec<ChildNodeEntry<Self>>> {
        pager::child_node_entries(self, offset, count)
    }
}

impl fmt::Debug for KernelNodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelNodeState")
            .field("path", &self.path)
            .field("revision", &self.revision)
            .field("state", &self.load_state())
            .finish()
    }
}

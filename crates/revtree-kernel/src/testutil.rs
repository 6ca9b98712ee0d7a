//! Store doubles shared by the kernel's unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use revtree_store::{InMemoryNodeStore, ListNodes, NodeStore, StoreError, StoreResult, StoredNode};
use revtree_types::{PlainValueFactory, Revision};

use crate::config::KernelConfig;
use crate::context::KernelContext;

/// Wraps a store and counts the queries made through it.
pub struct CountingStore<S> {
    inner: S,
    lists: AtomicUsize,
    exists_checks: AtomicUsize,
    requests: Mutex<Vec<ListNodes>>,
}

impl<S: NodeStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lists: AtomicUsize::new(0),
            exists_checks: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn exists_checks(&self) -> usize {
        self.exists_checks.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ListNodes> {
        self.requests.lock().unwrap().clone()
    }
}

impl<S: NodeStore> NodeStore for CountingStore<S> {
    fn head_revision(&self) -> StoreResult<Revision> {
        self.inner.head_revision()
    }

    fn list_node(&self, request: &ListNodes) -> StoreResult<String> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.inner.list_node(request)
    }

    fn node_exists(&self, path: &str, revision: &Revision) -> StoreResult<bool> {
        self.exists_checks.fetch_add(1, Ordering::SeqCst);
        self.inner.node_exists(path, revision)
    }
}

/// Answers every listing of a path with a fixed blob, whatever the window,
/// unless a page blob was scripted for that path and offset.
#[derive(Default)]
pub struct ScriptedStore {
    blobs: HashMap<String, String>,
    pages: HashMap<(String, u64), String>,
}

impl ScriptedStore {
    pub fn new(blobs: &[(&str, &str)]) -> Self {
        Self {
            blobs: blobs
                .iter()
                .map(|(p, b)| (p.to_string(), b.to_string()))
                .collect(),
            pages: HashMap::new(),
        }
    }

    /// Answer listings of `path` starting at `offset` with `blob`.
    pub fn with_page(mut self, path: &str, offset: u64, blob: &str) -> Self {
        self.pages.insert((path.to_string(), offset), blob.to_string());
        self
    }
}

impl NodeStore for ScriptedStore {
    fn head_revision(&self) -> StoreResult<Revision> {
        Ok(Revision::from("r1"))
    }

    fn list_node(&self, request: &ListNodes) -> StoreResult<String> {
        let page = (request.path.clone(), request.offset);
        self.pages
            .get(&page)
            .or_else(|| self.blobs.get(&request.path))
            .cloned()
            .ok_or_else(|| StoreError::NodeNotFound {
                path: request.path.clone(),
                revision: request.revision.clone(),
            })
    }

    fn node_exists(&self, path: &str, _revision: &Revision) -> StoreResult<bool> {
        Ok(self.blobs.contains_key(path))
    }
}

pub fn context_for(store: Arc<dyn NodeStore>, config: KernelConfig) -> Arc<KernelContext> {
    Arc::new(KernelContext::new(store, Arc::new(PlainValueFactory), config))
}

pub fn scripted_context(blobs: &[(&str, &str)]) -> Arc<KernelContext> {
    context_for(Arc::new(ScriptedStore::new(blobs)), KernelConfig::default())
}

/// A root with `n` empty children named `c0000`, `c0001`, ...
pub fn wide_root(n: usize) -> StoredNode {
    let mut root = StoredNode::new();
    for i in 0..n {
        root.set_child(format!("c{i:04}"), StoredNode::new()).unwrap();
    }
    root
}

/// An in-memory store holding `root`, wrapped in a query counter.
pub fn counted(root: StoredNode) -> (Arc<CountingStore<InMemoryNodeStore>>, Revision) {
    let (store, revision) = InMemoryNodeStore::with_root(root).unwrap();
    (Arc::new(CountingStore::new(store)), revision)
}

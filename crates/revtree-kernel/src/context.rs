use std::fmt;
use std::sync::Arc;

use revtree_store::NodeStore;
use revtree_types::{PlainValueFactory, ValueFactory};

use crate::config::KernelConfig;

/// Collaborators shared by every snapshot of one tree view.
///
/// The store and value factory are owned outside the view; snapshots hold the
/// context through an `Arc` and pass it on to the children they create.
pub struct KernelContext {
    store: Arc<dyn NodeStore>,
    values: Arc<dyn ValueFactory>,
    config: KernelConfig,
}

impl KernelContext {
    pub fn new(
        store: Arc<dyn NodeStore>,
        values: Arc<dyn ValueFactory>,
        config: KernelConfig,
    ) -> Self {
        Self {
            store,
            values,
            config,
        }
    }

    /// A context with [`PlainValueFactory`] and the default configuration.
    pub fn with_store(store: Arc<dyn NodeStore>) -> Self {
        Self::new(store, Arc::new(PlainValueFactory), KernelConfig::default())
    }

    pub fn store(&self) -> &dyn NodeStore {
        self.store.as_ref()
    }

    pub fn values(&self) -> &dyn ValueFactory {
        self.values.as_ref()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}

impl fmt::Debug for KernelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

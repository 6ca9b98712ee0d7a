use serde::{Deserialize, Serialize};

/// Maximum number of child names cached by one materialization.
pub const SNAPSHOT_CAP: u64 = 1000;

/// Largest child count an "all children" enumeration will attempt.
pub const MAX_ENUMERATE_ALL: u64 = i32::MAX as u64;

/// Tuning for node snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Child names fetched and cached when a node materializes.
    pub child_cache_limit: u64,
    /// Upper bound on the child count for "all children" enumeration.
    pub max_enumerate_all: u64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            child_cache_limit: SNAPSHOT_CAP,
            max_enumerate_all: MAX_ENUMERATE_ALL,
        }
    }
}

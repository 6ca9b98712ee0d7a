//! Lazy tree-node snapshots over a revision-addressed store.
//!
//! A [`KernelNodeState`] is an immutable view of one node at a pinned
//! revision. It is created with its identity only (path and revision) and
//! materializes on first read: one listing query fetches the node's
//! properties, its total child count, and a bounded prefix of child names.
//! Children are themselves unmaterialized snapshots, so reading a node never
//! loads its subtree.
//!
//! # Components
//!
//! - [`value`] -- Value decoder: protocol tokens to typed scalars
//! - [`protocol`] -- Protocol decoder: one listing blob to a [`DecodedNode`]
//! - [`node`] -- [`KernelNodeState`] and its one-time materialization
//! - [`pager`] -- Child enumeration beyond the cached prefix
//! - [`state`] -- The read contract: [`NodeState`], [`PropertyState`], [`ChildNodeEntry`]
//!
//! # Large Nodes
//!
//! At most [`KernelConfig::child_cache_limit`] child names are cached per
//! node. Lookups and enumeration past that prefix go back to the store at the
//! same revision, and the results are not cached. Enumerating "all" children
//! of a node larger than [`KernelConfig::max_enumerate_all`] fails with
//! [`KernelError::EnumerationTooLarge`]; callers page explicitly instead.

pub mod config;
pub mod context;
pub mod error;
pub mod node;
pub mod pager;
pub mod protocol;
pub mod state;
pub mod value;

#[cfg(test)]
mod testutil;

pub use config::{KernelConfig, MAX_ENUMERATE_ALL, SNAPSHOT_CAP};
pub use context::KernelContext;
pub use error::{KernelError, KernelResult};
pub use node::{KernelNodeState, LoadState};
pub use protocol::DecodedNode;
pub use state::{ChildNodeEntry, NodeState, PropertyState};

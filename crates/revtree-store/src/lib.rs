//! Revision-addressed node storage for revtree.
//!
//! A store holds a sequence of immutable tree revisions and answers two
//! queries against any of them: a textual listing of one node (its
//! properties, its total child count, and a window of child names) and an
//! existence check for a path.
//!
//! # Listing Format
//!
//! ```text
//! response := '{' (member (',' member)*)? '}'
//! member   := STRING ':' (object | array | scalar)
//! ```
//!
//! Child nodes appear as object members (inlined up to the requested depth,
//! `{}` below it). The reserved member `:childNodeCount` carries the total
//! number of children, independent of any window or filter.
//!
//! # Storage Backends
//!
//! All backends implement the [`NodeStore`] trait:
//!
//! - [`InMemoryNodeStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A revision is immutable once committed.
//! 2. Reads never block on each other.
//! 3. Child order is insertion order and stable for a given revision.
//! 4. All errors are propagated, never silently ignored.

pub mod error;
pub mod filter;
pub mod memory;
pub mod node;
pub mod request;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use filter::NameFilter;
pub use memory::InMemoryNodeStore;
pub use node::{StoredNode, CHILD_NODE_COUNT};
pub use request::ListNodes;
pub use traits::NodeStore;

//! The tree-node read contract.

use std::fmt;
use std::sync::Arc;

use revtree_types::{CoreValue, PropertyValue};

use crate::error::KernelResult;
use crate::node::KernelNodeState;

/// Read access to one node of an immutable tree view.
///
/// Every accessor may trigger the node's one-time materialization and
/// therefore returns a `Result`. Once a call succeeds, repeating it returns
/// the same answer for the lifetime of the node.
pub trait NodeState: Send + Sync + Sized {
    /// Number of properties.
    fn property_count(&self) -> KernelResult<usize>;

    /// The property called `name`, if any.
    fn property(&self, name: &str) -> KernelResult<Option<&PropertyState>>;

    /// All properties, in store order.
    fn properties(&self) -> KernelResult<&[PropertyState]>;

    /// Total number of children, including those not cached.
    fn child_node_count(&self) -> KernelResult<u64>;

    /// The child called `name`. `Ok(None)` if there is no such child.
    fn child_node(&self, name: &str) -> KernelResult<Option<Arc<Self>>>;

    /// Up to `count` children starting at `offset`, in store order.
    ///
    /// `count == None` asks for all remaining children.
    fn child_node_entries(
        &self,
        offset: u64,
        count: Option<usize>,
    ) -> KernelResult<Vec<ChildNodeEntry<Self>>>;
}

/// A named property and its value.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyState {
    name: String,
    value: PropertyValue,
}

impl PropertyState {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn is_multi(&self) -> bool {
        self.value.is_multi()
    }

    /// The scalars of this property, in order.
    pub fn values(&self) -> &[CoreValue] {
        self.value.values()
    }
}

impl fmt::Display for PropertyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// A child name paired with the child's (unmaterialized) node.
pub struct ChildNodeEntry<N = KernelNodeState> {
    name: String,
    node: Arc<N>,
}

impl<N> ChildNodeEntry<N> {
    pub fn new(name: impl Into<String>, node: Arc<N>) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> &Arc<N> {
        &self.node
    }

    pub fn into_node(self) -> Arc<N> {
        self.node
    }
}

impl<N> Clone for ChildNodeEntry<N> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            node: Arc::clone(&self.node),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for ChildNodeEntry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildNodeEntry")
            .field("name", &self.name)
            .field("node", &self.node)
            .finish()
    }
}

use std::sync::Arc;

use serde_json::{Map, Value};

use revtree_types::validate_name;

use crate::error::{StoreError, StoreResult};
use crate::filter::NameFilter;

/// Reserved listing member carrying the total number of children.
pub const CHILD_NODE_COUNT: &str = ":childNodeCount";

/// One node of a stored revision.
///
/// Properties hold JSON scalars or arrays of scalars. Children are kept in
/// insertion order and shared between revisions through `Arc`, so committing
/// a modified root only copies the nodes along the modified path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredNode {
    properties: Vec<(String, Value)>,
    children: Vec<(String, Arc<StoredNode>)>,
}

impl StoredNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from a JSON object.
    ///
    /// Object-valued members become children; every other member becomes a
    /// property and must be a scalar or an array of scalars.
    pub fn from_json(value: &Value) -> StoreResult<Self> {
        let Value::Object(members) = value else {
            return Err(StoreError::InvalidNode(format!(
                "expected an object, got {value}"
            )));
        };
        let mut node = Self::new();
        for (name, member) in members {
            match member {
                Value::Object(_) => {
                    let child = Self::from_json(member)?;
                    node.set_child(name.clone(), child)?;
                }
                _ => node.set_property(name.clone(), member.clone())?,
            }
        }
        Ok(node)
    }

    /// Render the full subtree as a JSON object (children inlined).
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.properties {
            map.insert(name.clone(), value.clone());
        }
        for (name, child) in &self.children {
            map.insert(name.clone(), child.to_json());
        }
        Value::Object(map)
    }

    /// Set a property, replacing any property or child of the same name.
    ///
    /// An existing property keeps its position.
    pub fn set_property(&mut self, name: String, value: Value) -> StoreResult<()> {
        check_member_name(&name)?;
        check_property_value(&name, &value)?;
        self.children.retain(|(n, _)| *n != name);
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name, value)),
        }
        Ok(())
    }

    /// Set a child, replacing any property or child of the same name.
    ///
    /// An existing child keeps its position.
    pub fn set_child(&mut self, name: String, child: StoredNode) -> StoreResult<()> {
        check_member_name(&name)?;
        validate_name(&name)?;
        self.properties.retain(|(n, _)| *n != name);
        let child = Arc::new(child);
        match self.children.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = child,
            None => self.children.push((name, child)),
        }
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn child(&self, name: &str) -> Option<&Arc<StoredNode>> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Child names in order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(n, _)| n.as_str())
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|(_, c)| c.node_count())
            .sum::<usize>()
    }

    /// Render this node in listing form.
    ///
    /// Properties are filtered by `filter`; children are filtered, then
    /// windowed by `offset`/`max_child_names`, and inlined down to `depth`
    /// levels (`{}` below). Nested levels always start at offset zero.
    /// `:childNodeCount` is the unfiltered total.
    pub fn render(
        &self,
        depth: u32,
        offset: u64,
        max_child_names: Option<u64>,
        filter: Option<&NameFilter>,
    ) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.properties {
            if filter.map_or(true, |f| f.matches_property(name)) {
                map.insert(name.clone(), value.clone());
            }
        }

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = max_child_names
            .map_or(usize::MAX, |max| usize::try_from(max).unwrap_or(usize::MAX));
        let window = self
            .children
            .iter()
            .filter(|(name, _)| filter.map_or(true, |f| f.matches_node(name)))
            .skip(skip)
            .take(take);
        for (name, child) in window {
            let rendered = if depth > 0 {
                child.render(depth - 1, 0, max_child_names, filter)
            } else {
                Value::Object(Map::new())
            };
            map.insert(name.clone(), rendered);
        }

        map.insert(CHILD_NODE_COUNT.to_string(), Value::from(self.children.len()));
        Value::Object(map)
    }
}

fn check_member_name(name: &str) -> StoreResult<()> {
    if name == CHILD_NODE_COUNT {
        return Err(StoreError::InvalidNode(format!("{CHILD_NODE_COUNT} is reserved")));
    }
    Ok(())
}

fn check_property_value(name: &str, value: &Value) -> StoreResult<()> {
    let is_scalar = |v: &Value| matches!(v, Value::Bool(_) | Value::Number(_) | Value::String(_));
    let valid = match value {
        Value::Array(items) => items.iter().all(is_scalar),
        other => is_scalar(other),
    };
    if !valid {
        return Err(StoreError::InvalidNode(format!(
            "property {name:?} must be a scalar or an array of scalars, got {value}"
        )));
    }
    Ok(())
}

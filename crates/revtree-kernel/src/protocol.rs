//! Protocol decoder: one node listing to a [`DecodedNode`].
//!
//! ```text
//! response := '{' (member (',' member)*)? '}'
//! member   := STRING ':' (object | array | scalar)
//! object   := '{' '}'
//! ```
//!
//! Object members are children, listed without content at depth zero.
//! `:childNodeCount` carries the node's total child count.

use std::collections::HashMap;
use std::sync::Arc;

use revtree_jsop::{JsopError, JsopReader, JsopTokenizer, TokenKind};
use revtree_store::CHILD_NODE_COUNT;
use revtree_types::{child_path, PropertyValue, Revision};

use crate::context::KernelContext;
use crate::error::{KernelError, KernelResult};
use crate::node::KernelNodeState;
use crate::state::{ChildNodeEntry, PropertyState};
use crate::value::{read_array, read_value};

/// The decoded content of one node listing.
///
/// Properties and cached children keep store order. A repeated member name
/// replaces the earlier value in its original position.
#[derive(Debug, Default)]
pub struct DecodedNode {
    properties: Vec<PropertyState>,
    property_index: HashMap<String, usize>,
    children: Vec<ChildNodeEntry>,
    child_index: HashMap<String, usize>,
    child_count: u64,
}

impl DecodedNode {
    pub fn properties(&self) -> &[PropertyState] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyState> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// The cached prefix of children.
    pub fn children(&self) -> &[ChildNodeEntry] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Arc<KernelNodeState>> {
        self.child_index.get(name).map(|&i| self.children[i].node())
    }

    /// Total number of children in the store.
    pub fn child_count(&self) -> u64 {
        self.child_count
    }

    fn insert_property(&mut self, property: PropertyState) {
        match self.property_index.get(property.name()) {
            Some(&i) => self.properties[i] = property,
            None => {
                self.property_index
                    .insert(property.name().to_string(), self.properties.len());
                self.properties.push(property);
            }
        }
    }

    fn insert_child(&mut self, entry: ChildNodeEntry) {
        match self.child_index.get(entry.name()) {
            Some(&i) => self.children[i] = entry,
            None => {
                self.child_index
                    .insert(entry.name().to_string(), self.children.len());
                self.children.push(entry);
            }
        }
    }
}

/// Decode a full listing of the node at `path`.
///
/// Child members become unmaterialized snapshots at the same revision. When
/// the listing has no `:childNodeCount`, the count is the number of children
/// listed. A listing with more children than its count, or than the
/// configured `child_cache_limit` it was requested with, is rejected.
pub fn decode_node(
    blob: &str,
    context: &Arc<KernelContext>,
    path: &str,
    revision: &Revision,
) -> KernelResult<DecodedNode> {
    let mut reader = JsopTokenizer::new(blob);
    let mut node = DecodedNode::default();
    let mut child_count = None;

    reader.read(TokenKind::LeftBrace)?;
    if !reader.matches(TokenKind::RightBrace)? {
        loop {
            let name = reader.read_string()?;
            reader.read(TokenKind::Colon)?;
            if name == CHILD_NODE_COUNT {
                let token = reader.read(TokenKind::Number)?;
                let count = token.parse::<u64>().map_err(|_| KernelError::decode(token))?;
                child_count = Some(count);
            } else if reader.matches(TokenKind::LeftBrace)? {
                reader.read(TokenKind::RightBrace)?;
                let child = new_child(context, path, &name, revision);
                node.insert_child(ChildNodeEntry::new(name, child));
            } else if reader.matches(TokenKind::LeftBracket)? {
                let values = read_array(&mut reader, context.values())?;
                node.insert_property(PropertyState::new(name, PropertyValue::Multi(values)));
            } else {
                let value = read_value(&mut reader, context.values())?;
                node.insert_property(PropertyState::new(name, value));
            }
            if !reader.matches(TokenKind::Comma)? {
                break;
            }
        }
        reader.read(TokenKind::RightBrace)?;
    }
    reader.read(TokenKind::End)?;

    let listed = node.children.len() as u64;
    let child_count = child_count.unwrap_or(listed);
    if listed > child_count {
        return Err(overlong(
            &reader,
            format!("{listed} children listed but {CHILD_NODE_COUNT} is {child_count}"),
        ));
    }
    let limit = context.config().child_cache_limit;
    if listed > limit {
        return Err(overlong(
            &reader,
            format!("{listed} children listed but at most {limit} were requested"),
        ));
    }
    node.child_count = child_count;
    Ok(node)
}

/// Decode only the child members of a listing slice.
///
/// Properties, arrays and `:childNodeCount` are skipped: paging needs the
/// structure, not the values.
pub fn decode_child_slice(
    blob: &str,
    context: &Arc<KernelContext>,
    path: &str,
    revision: &Revision,
) -> KernelResult<Vec<ChildNodeEntry>> {
    let mut reader = JsopTokenizer::new(blob);
    let mut entries = Vec::new();

    reader.read(TokenKind::LeftBrace)?;
    if !reader.matches(TokenKind::RightBrace)? {
        loop {
            let name = reader.read_string()?;
            reader.read(TokenKind::Colon)?;
            if reader.matches(TokenKind::LeftBrace)? {
                reader.read(TokenKind::RightBrace)?;
                let child = new_child(context, path, &name, revision);
                entries.push(ChildNodeEntry::new(name, child));
            } else {
                reader.skip_value()?;
            }
            if !reader.matches(TokenKind::Comma)? {
                break;
            }
        }
        reader.read(TokenKind::RightBrace)?;
    }
    reader.read(TokenKind::End)?;

    Ok(entries)
}

fn overlong(reader: &JsopTokenizer<'_>, message: String) -> KernelError {
    KernelError::Parse(JsopError::parse(reader.position(), message))
}

fn new_child(
    context: &Arc<KernelContext>,
    parent: &str,
    name: &str,
    revision: &Revision,
) -> Arc<KernelNodeState> {
    Arc::new(KernelNodeState::new(
        Arc::clone(context),
        child_path(parent, name),
        revision.clone(),
    ))
}

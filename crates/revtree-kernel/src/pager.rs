//! Child enumeration over the cached prefix and the store.
//!
//! A materialized node caches at most `child_cache_limit` children. A page
//! request is served from that prefix first; whatever is still wanted after
//! the prefix is fetched from the store with one more listing at the same
//! revision, starting where the prefix ends (or at the caller's offset when
//! it lies past the prefix). Fetched children are returned, not cached.

use tracing::debug;

use revtree_jsop::JsopError;
use revtree_store::ListNodes;

use crate::error::{KernelError, KernelResult};
use crate::node::KernelNodeState;
use crate::protocol::decode_child_slice;
use crate::state::ChildNodeEntry;

/// Up to `count` children of `node` starting at `offset`.
///
/// `count == None` means all remaining children; it fails with
/// [`KernelError::EnumerationTooLarge`] when the node has more children than
/// `max_enumerate_all`.
pub fn child_node_entries(
    node: &KernelNodeState,
    offset: u64,
    count: Option<usize>,
) -> KernelResult<Vec<ChildNodeEntry>> {
    let decoded = node.decoded()?;
    let config = node.context().config();
    let child_count = decoded.child_count();

    let mut remaining = match count {
        Some(n) => n as u64,
        None if child_count > config.max_enumerate_all => {
            return Err(KernelError::EnumerationTooLarge {
                child_count,
                limit: config.max_enumerate_all,
            });
        }
        None => config.max_enumerate_all,
    };

    let cached = decoded.children();
    let mut entries = Vec::new();

    let mut offset = offset;
    if let Some(rest) = usize::try_from(offset).ok().and_then(|start| cached.get(start..)) {
        if !rest.is_empty() {
            let take = usize::try_from(remaining).unwrap_or(usize::MAX).min(rest.len());
            entries.extend_from_slice(&rest[..take]);
            remaining -= take as u64;
            offset = cached.len() as u64;
        }
    }

    if remaining > 0 && child_count > config.child_cache_limit {
        let request = ListNodes::new(node.path(), node.revision().clone())
            .with_offset(offset)
            .with_max_child_names(remaining);
        let blob = node.context().store().list_node(&request)?;
        let fetched = decode_child_slice(&blob, node.context(), node.path(), node.revision())?;
        if fetched.len() as u64 > remaining {
            return Err(KernelError::Parse(JsopError::parse(
                blob.len(),
                format!("{} children listed but at most {remaining} were requested", fetched.len()),
            )));
        }
        debug!(
            path = %node.path(),
            revision = %node.revision(),
            offset,
            requested = remaining,
            returned = fetched.len(),
            "fetched children beyond cached prefix"
        );
        entries.extend(fetched);
    }

    Ok(entries)
}

use revtree_types::Revision;

use crate::filter::NameFilter;

/// A node listing query.
///
/// `offset` and `max_child_names` select a window over the node's child
/// names; `None` means no upper bound. `depth` is the number of levels of
/// child content to inline below the listed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListNodes {
    pub path: String,
    pub revision: Revision,
    pub depth: u32,
    pub offset: u64,
    pub max_child_names: Option<u64>,
    pub filter: Option<NameFilter>,
}

impl ListNodes {
    /// List the node at `path` without inlined children, all child names,
    /// no filter.
    pub fn new(path: impl Into<String>, revision: Revision) -> Self {
        Self {
            path: path.into(),
            revision,
            depth: 0,
            offset: 0,
            max_child_names: None,
            filter: None,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_max_child_names(mut self, max: u64) -> Self {
        self.max_child_names = Some(max);
        self
    }

    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

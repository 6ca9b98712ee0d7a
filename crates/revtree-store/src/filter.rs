use glob::Pattern;
use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

/// Name filter for node listings.
///
/// Each list holds shell-style glob patterns (`*`, `?`, `[...]`). A pattern
/// prefixed with `-` excludes matching names. A name passes when it matches
/// at least one including pattern (or there are none) and no excluding
/// pattern.
///
/// ```text
/// {"nodes":["page*","-page-draft*"],"properties":["-:*"]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameFilter {
    nodes: Rules,
    properties: Rules,
}

#[derive(Deserialize)]
struct FilterJson {
    #[serde(default)]
    nodes: Vec<String>,
    #[serde(default)]
    properties: Vec<String>,
}

impl NameFilter {
    /// Build a filter from node and property pattern lists.
    pub fn new<S: AsRef<str>>(nodes: &[S], properties: &[S]) -> StoreResult<Self> {
        Ok(Self {
            nodes: Rules::compile(nodes)?,
            properties: Rules::compile(properties)?,
        })
    }

    /// Parse a filter from its JSON form.
    pub fn parse(json: &str) -> StoreResult<Self> {
        let form: FilterJson =
            serde_json::from_str(json).map_err(|e| StoreError::InvalidFilter(e.to_string()))?;
        Self::new(form.nodes.as_slice(), form.properties.as_slice())
    }

    /// Whether a child node with `name` is listed.
    pub fn matches_node(&self, name: &str) -> bool {
        self.nodes.passes(name)
    }

    /// Whether a property with `name` is listed.
    pub fn matches_property(&self, name: &str) -> bool {
        self.properties.passes(name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Rules {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl Rules {
    fn compile<S: AsRef<str>>(patterns: &[S]) -> StoreResult<Self> {
        let mut rules = Self::default();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let (list, source) = match pattern.strip_prefix('-') {
                Some(excluded) => (&mut rules.exclude, excluded),
                None => (&mut rules.include, pattern),
            };
            let compiled = Pattern::new(source)
                .map_err(|e| StoreError::InvalidFilter(format!("{pattern:?}: {e}")))?;
            list.push(compiled);
        }
        Ok(rules)
    }

    fn passes(&self, name: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(name)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_literal_and_wildcards() {
        let filter = NameFilter::new(&["abc", "x*z", "p?g", "[mn]1"], &[]).unwrap();
        assert!(filter.matches_node("abc"));
        assert!(!filter.matches_node("abcd"));
        assert!(filter.matches_node("xz"));
        assert!(filter.matches_node("x-y-z"));
        assert!(!filter.matches_node("xzy"));
        assert!(filter.matches_node("pig"));
        assert!(!filter.matches_node("piig"));
        assert!(filter.matches_node("n1"));
        assert!(!filter.matches_node("o1"));
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = NameFilter::default();
        assert!(filter.matches_node("anything"));
        assert!(filter.matches_property(":hidden"));
    }

    #[test]
    fn exclusions_win_over_inclusions() {
        let filter = NameFilter::new(&["page*", "-page-draft*"], &[]).unwrap();
        assert!(filter.matches_node("page-1"));
        assert!(!filter.matches_node("page-draft-1"));
        assert!(!filter.matches_node("image"));
    }

    #[test]
    fn exclusion_only_keeps_the_rest() {
        let filter = NameFilter::new(&[], &["-:*"]).unwrap();
        assert!(filter.matches_property("title"));
        assert!(!filter.matches_property(":hash"));
    }

    #[test]
    fn parse_json_form() {
        let filter = NameFilter::parse(r#"{"nodes":["a*"]}"#).unwrap();
        assert!(filter.matches_node("apple"));
        assert!(!filter.matches_node("pear"));
        assert!(filter.matches_property("anything"));
        assert!(matches!(NameFilter::parse("[1]"), Err(StoreError::InvalidFilter(_))));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let err = NameFilter::parse(r#"{"nodes":["-[ab"]}"#).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFilter(ref m) if m.contains("-[ab")));
    }
}

use std::fmt::Write;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, ensure, Context};
use colored::Colorize;
use tracing::debug;

use revtree_kernel::{KernelConfig, KernelContext, KernelNodeState, NodeState};
use revtree_store::{InMemoryNodeStore, ListNodes, NameFilter, NodeStore, StoredNode};
use revtree_types::{segments, validate_path, PlainValueFactory, Revision};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let output = match cli.command {
        Command::Show(args) => cmd_show(args, config)?,
        Command::Tree(args) => cmd_tree(args, config)?,
        Command::List(args) => cmd_list(args)?,
    };
    print!("{output}");
    Ok(())
}

fn cmd_show(args: ShowArgs, config: KernelConfig) -> anyhow::Result<String> {
    let root = open_snapshot(&args.fixture, config)?;
    let node = resolve(root, &args.path)?;
    render_show(&node, args.offset, args.count)
}

fn cmd_tree(args: TreeArgs, config: KernelConfig) -> anyhow::Result<String> {
    ensure!(args.page > 0, "--page must be at least 1");
    let root = open_snapshot(&args.fixture, config)?;
    let node = resolve(root, &args.path)?;
    let mut out = String::new();
    render_tree(&mut out, &node, &args.path, 0, args.depth, args.page)?;
    Ok(out)
}

fn cmd_list(args: ListArgs) -> anyhow::Result<String> {
    let (store, revision) = open_store(&args.fixture)?;
    let mut request = ListNodes::new(args.path, revision)
        .with_depth(args.depth)
        .with_offset(args.offset);
    if let Some(max) = args.max {
        request = request.with_max_child_names(max);
    }
    if let Some(filter) = &args.filter {
        request = request.with_filter(NameFilter::parse(filter).context("parsing --filter")?);
    }
    let blob = store.list_node(&request)?;
    Ok(format!("{blob}\n"))
}

/// Read snapshot tuning from a TOML file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<KernelConfig> {
    let Some(path) = path else {
        return Ok(KernelConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: KernelConfig = toml::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Commit the JSON tree in `fixture` to a fresh in-memory store.
pub fn open_store(fixture: &Path) -> anyhow::Result<(InMemoryNodeStore, Revision)> {
    let text = fs::read_to_string(fixture)
        .with_context(|| format!("reading fixture {}", fixture.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing fixture {}", fixture.display()))?;
    let tree = StoredNode::from_json(&json)?;
    Ok(InMemoryNodeStore::with_root(tree)?)
}

/// Commit the JSON tree in `fixture` and return an unmaterialized snapshot
/// of its root.
pub fn open_snapshot(fixture: &Path, config: KernelConfig) -> anyhow::Result<KernelNodeState> {
    let (store, revision) = open_store(fixture)?;
    let context = KernelContext::new(Arc::new(store), Arc::new(PlainValueFactory), config);
    Ok(KernelNodeState::root(Arc::new(context), revision))
}

/// Walk from `root` to `path` one `child_node` step at a time.
pub fn resolve(root: KernelNodeState, path: &str) -> anyhow::Result<Arc<KernelNodeState>> {
    validate_path(path)?;
    let mut node = Arc::new(root);
    for name in segments(path) {
        node = node
            .child_node(name)?
            .ok_or_else(|| anyhow!("no node at {path} in {}", node.revision()))?;
    }
    Ok(node)
}

fn render_show(node: &KernelNodeState, offset: u64, count: Option<usize>) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "{} @ {}", node.path().bold(), node.revision().to_string().yellow())?;

    let properties = node.properties()?;
    writeln!(out, "properties ({}):", properties.len())?;
    for property in properties {
        writeln!(out, "  {property}")?;
    }

    let entries = node.child_node_entries(offset, count)?;
    writeln!(out, "children ({}):", node.child_node_count()?)?;
    for entry in &entries {
        writeln!(out, "  {}", entry.name().blue())?;
    }
    Ok(out)
}

fn render_tree(
    out: &mut String,
    node: &KernelNodeState,
    name: &str,
    indent: usize,
    depth: Option<u32>,
    page: usize,
) -> anyhow::Result<()> {
    let pad = "  ".repeat(indent);
    writeln!(out, "{pad}{}", name.blue().bold())?;
    for property in node.properties()? {
        writeln!(out, "{pad}  {}", property.to_string().dimmed())?;
    }
    if depth == Some(0) {
        return Ok(());
    }

    let mut offset = 0u64;
    loop {
        let entries = node.child_node_entries(offset, Some(page))?;
        for entry in &entries {
            render_tree(out, entry.node(), entry.name(), indent + 1, depth.map(|d| d - 1), page)?;
        }
        if entries.len() < page {
            break;
        }
        offset += entries.len() as u64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn fixture(dir: &TempDir) -> std::path::PathBuf {
        let tree = json!({
            "title": "home",
            "tags": ["a", "b"],
            "docs": { "readme": { "size": 12 }, "notes": {} },
            "src": { "main": { "lines": 40 } },
        });
        write(dir, "tree.json", &tree.to_string())
    }

    fn plain() {
        colored::control::set_override(false);
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    #[test]
    fn config_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), KernelConfig::default());
    }

    #[test]
    fn config_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "kernel.toml", "child_cache_limit = 2\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.child_cache_limit, 2);
        assert_eq!(config.max_enumerate_all, KernelConfig::default().max_enumerate_all);
    }

    #[test]
    fn bad_config_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "kernel.toml", "child_cache_limit = \"many\"\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("kernel.toml"));
    }

    #[test]
    fn missing_fixture_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(open_snapshot(&missing, KernelConfig::default()).is_err());
    }

    #[test]
    fn fixture_must_be_an_object() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "tree.json", "[1, 2]");
        assert!(open_snapshot(&path, KernelConfig::default()).is_err());
    }

    #[test]
    fn resolve_walks_children() {
        let dir = TempDir::new().unwrap();
        let root = open_snapshot(&fixture(&dir), KernelConfig::default()).unwrap();
        let node = resolve(root, "/docs/readme").unwrap();
        assert_eq!(node.path(), "/docs/readme");
        assert_eq!(node.property_count().unwrap(), 1);
    }

    #[test]
    fn resolve_reports_missing_node() {
        let dir = TempDir::new().unwrap();
        let root = open_snapshot(&fixture(&dir), KernelConfig::default()).unwrap();
        let err = resolve(root, "/docs/absent").unwrap_err();
        assert!(err.to_string().contains("/docs/absent"));
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    #[test]
    fn show_lists_properties_and_children() {
        plain();
        let dir = TempDir::new().unwrap();
        let args = ShowArgs {
            fixture: fixture(&dir),
            path: "/".into(),
            offset: 0,
            count: None,
        };
        let out = cmd_show(args, KernelConfig::default()).unwrap();
        assert!(out.contains("properties (2):"));
        assert!(out.contains("  title = \"home\""));
        assert!(out.contains("  tags = [\"a\", \"b\"]"));
        assert!(out.contains("children (2):\n  docs\n  src\n"));
    }

    #[test]
    fn show_pages_past_small_cache() {
        plain();
        let dir = TempDir::new().unwrap();
        let children: serde_json::Map<String, serde_json::Value> =
            (0..6).map(|i| (format!("n{i}"), json!({}))).collect();
        let path = write(&dir, "wide.json", &serde_json::Value::Object(children).to_string());
        let config = KernelConfig {
            child_cache_limit: 2,
            ..KernelConfig::default()
        };
        let args = ShowArgs {
            fixture: path,
            path: "/".into(),
            offset: 3,
            count: Some(2),
        };
        let out = cmd_show(args, config).unwrap();
        assert!(out.contains("children (6):\n  n3\n  n4\n"));
        assert!(!out.contains("n5"));
    }

    #[test]
    fn tree_pages_through_every_level() {
        plain();
        let dir = TempDir::new().unwrap();
        let args = TreeArgs {
            fixture: fixture(&dir),
            path: "/".into(),
            depth: None,
            page: 1,
        };
        let out = cmd_tree(args, KernelConfig::default()).unwrap();
        let expected = r#"/
  title = "home"
  tags = ["a", "b"]
  docs
    readme
      size = 12
    notes
  src
    main
      lines = 40
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn tree_stops_at_depth() {
        plain();
        let dir = TempDir::new().unwrap();
        let args = TreeArgs {
            fixture: fixture(&dir),
            path: "/docs".into(),
            depth: Some(0),
            page: 10,
        };
        let out = cmd_tree(args, KernelConfig::default()).unwrap();
        assert_eq!(out, "/docs\n");
    }

    fn list_args(dir: &TempDir) -> ListArgs {
        ListArgs {
            fixture: fixture(dir),
            path: "/".into(),
            depth: 0,
            offset: 0,
            max: None,
            filter: None,
        }
    }

    #[test]
    fn list_prints_raw_listing() {
        let dir = TempDir::new().unwrap();
        let out = cmd_list(list_args(&dir)).unwrap();
        assert_eq!(
            out,
            "{\"title\":\"home\",\"tags\":[\"a\",\"b\"],\"docs\":{},\"src\":{},\":childNodeCount\":2}\n"
        );
    }

    #[test]
    fn list_inlines_depth_and_applies_filter() {
        let dir = TempDir::new().unwrap();
        let args = ListArgs {
            depth: 1,
            filter: Some(r#"{"nodes":["d*","r*"],"properties":["-ti*"]}"#.into()),
            ..list_args(&dir)
        };
        let out = cmd_list(args).unwrap();
        let listing: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            listing,
            json!({
                "tags": ["a", "b"],
                "docs": { "readme": {}, ":childNodeCount": 2 },
                ":childNodeCount": 2,
            })
        );
    }

    #[test]
    fn list_windows_children() {
        let dir = TempDir::new().unwrap();
        let args = ListArgs {
            path: "/docs".into(),
            offset: 1,
            max: Some(1),
            ..list_args(&dir)
        };
        assert_eq!(cmd_list(args).unwrap(), "{\"notes\":{},\":childNodeCount\":2}\n");
    }

    #[test]
    fn list_rejects_bad_filter() {
        let dir = TempDir::new().unwrap();
        let args = ListArgs {
            filter: Some("not json".into()),
            ..list_args(&dir)
        };
        let err = cmd_list(args).unwrap_err();
        assert!(err.to_string().contains("--filter"));
    }

    #[test]
    fn tree_rejects_empty_pages() {
        let dir = TempDir::new().unwrap();
        let args = TreeArgs {
            fixture: fixture(&dir),
            path: "/".into(),
            depth: None,
            page: 0,
        };
        assert!(cmd_tree(args, KernelConfig::default()).is_err());
    }
}

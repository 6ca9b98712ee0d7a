use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "revtree",
    about = "Browse lazy snapshots of a revision tree",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log store queries and materializations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Snapshot tuning as TOML (`child_cache_limit`, `max_enumerate_all`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one node: properties, child count, and a page of child names
    Show(ShowArgs),
    /// List a subtree, paging through children
    Tree(TreeArgs),
    /// Print the raw listing the store returns for one node
    List(ListArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// JSON tree committed as the snapshot revision
    #[arg(long)]
    pub fixture: PathBuf,
    #[arg(long, default_value = "/")]
    pub path: String,
    #[arg(long, default_value = "0")]
    pub offset: u64,
    /// Page size; all remaining children when omitted
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args)]
pub struct TreeArgs {
    /// JSON tree committed as the snapshot revision
    #[arg(long)]
    pub fixture: PathBuf,
    #[arg(long, default_value = "/")]
    pub path: String,
    /// Levels below the starting node; unlimited when omitted
    #[arg(long)]
    pub depth: Option<u32>,
    /// Children fetched per page
    #[arg(long, default_value = "100")]
    pub page: usize,
}

#[derive(Args)]
pub struct ListArgs {
    /// JSON tree committed as the listed revision
    #[arg(long)]
    pub fixture: PathBuf,
    #[arg(long, default_value = "/")]
    pub path: String,
    /// Levels of child content inlined below the node
    #[arg(long, default_value = "0")]
    pub depth: u32,
    #[arg(long, default_value = "0")]
    pub offset: u64,
    /// Most child names listed per level; all when omitted
    #[arg(long)]
    pub max: Option<u64>,
    /// Name filter as JSON, e.g. `{"nodes":["a*"],"properties":["-:*"]}`
    #[arg(long)]
    pub filter: Option<String>,
}

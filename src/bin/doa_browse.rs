//! doa_browse - render a DOA register file as a tree on stdout
//!
//! Reads a JSON array of items (the shape the data-access layer hands
//! the core), builds the forest under the given filters, and prints an
//! indented tree with normalized approver chains. Useful for eyeballing
//! real register extracts without the UI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use doa_reference::browse::BrowseFilter;
use doa_reference::config::BrowseConfig;
use doa_reference::hierarchy::{build_forest, DoaNode};
use doa_reference::lookup::known_functions;
use doa_reference::models::DoaItem;
use doa_reference::normalize_approvers;

#[derive(Parser, Debug)]
#[command(name = "doa_browse", about = "Browse a DOA register extract")]
struct Args {
    /// Path to a JSON file containing an array of items
    file: PathBuf,

    /// Case-insensitive search over code/title/description/comments
    #[arg(long, default_value = "")]
    search: String,

    /// Function-name filter (normalized before comparison)
    #[arg(long, default_value = "")]
    function: String,

    /// List the known function names and exit
    #[arg(long)]
    list_functions: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = BrowseConfig::from_env();

    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let items: Vec<DoaItem> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", args.file.display()))?;

    if args.list_functions {
        for function in known_functions(&items) {
            println!("{}", function);
        }
        return Ok(());
    }

    let filter = BrowseFilter {
        search: args.search,
        function: args.function,
    };
    let forest = build_forest(&items, &filter);

    println!(
        "{} items, {} nodes, {} roots",
        items.len(),
        forest.node_ids.len(),
        forest.roots.len()
    );
    for root in &forest.roots {
        print_node(root, 0, &config);
    }
    Ok(())
}

fn print_node(node: &DoaNode, depth: usize, config: &BrowseConfig) {
    if depth >= config.max_render_depth {
        return;
    }

    let indent = "  ".repeat(depth);
    let title = node.title.as_deref().unwrap_or("");
    let marker = if node.node_id.is_synthetic() { "+" } else { "" };
    print!("{}{}{} {}", indent, node.code, marker, title);

    if config.show_approvers && !node.approvers.is_empty() {
        let chain: Vec<String> = normalize_approvers(&node.approvers)
            .into_iter()
            .map(|entry| format!("{} {}", entry.action, entry.role))
            .collect();
        print!("  [{}]", chain.join(", "));
    }
    println!();

    for child in &node.children {
        print_node(child, depth + 1, config);
    }
}

use clap::{Parser, Subcommand};
use flowtree::prelude::*;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Inspect, validate and convert workflow automation graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a flat node array may be persisted
    Validate {
        /// JSON file holding a node array or a whole automation
        path: String,
    },
    /// Build the tree form and print it
    Tree {
        /// JSON file holding a node array or a whole automation
        path: String,
        /// Print the renderer JSON instead of the text view
        #[arg(long)]
        json: bool,
        /// Walk from the first node when every node is referenced
        #[arg(long)]
        first_node_fallback: bool,
        /// Truncate branches deeper than this
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Flatten a tree (renderer JSON) back into persisted nodes
    Flatten {
        /// JSON file holding a single tree node
        path: String,
    },
    /// Build then flatten, and check that the reference graph survived
    Roundtrip {
        /// JSON file holding a node array or a whole automation
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flowtree=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => run_validate(&path),
        Command::Tree {
            path,
            json,
            first_node_fallback,
            max_depth,
        } => {
            let fallback = if first_node_fallback {
                RootFallback::FirstNode
            } else {
                RootFallback::None
            };
            run_tree(&path, json, fallback, max_depth)
        }
        Command::Flatten { path } => run_flatten(&path),
        Command::Roundtrip { path } => run_roundtrip(&path),
    }
}

/// Reads either a bare node array or an automation object.
fn load_nodes(path: &str) -> Vec<FlatNode> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    let value: serde_json::Value = serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)));

    if value.is_array() {
        serde_json::from_value(value)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid node array: {}", e)))
    } else {
        let automation: Automation = serde_json::from_value(value)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid automation: {}", e)));
        let trigger = &automation.trigger;
        tracing::info!(
            automation_id = %automation.id,
            trigger = %format!("{} -> {}", trigger.entity_type, trigger.to_status),
            "loaded automation '{}'",
            automation.name
        );
        automation.nodes
    }
}

fn run_validate(path: &str) {
    let nodes = load_nodes(path);
    let result = validate_flat_array(&nodes);
    let report = serde_json::to_string_pretty(&result)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode result: {}", e)));
    println!("{}", report);
    if !result.is_valid() {
        std::process::exit(1);
    }
}

fn run_tree(path: &str, json: bool, fallback: RootFallback, max_depth: Option<usize>) {
    let nodes = load_nodes(path);
    let mut builder = TreeBuilder::new().with_root_fallback(fallback);
    if let Some(max_depth) = max_depth {
        builder = builder.with_max_depth(max_depth);
    }
    let outcome = builder.build(&nodes);

    if json {
        let rendered = serde_json::to_string_pretty(&outcome.root)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode tree: {}", e)));
        println!("{}", rendered);
    } else {
        print!("{}", DisplayTree::new(outcome.root.as_ref()));
    }

    print_diagnostics(&outcome.diagnostics);
}

fn run_flatten(path: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
    let root: TreeNode = serde_json::from_str(&content)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid tree: {}", e)));

    let tree_check = validate_tree_structure(Some(&root));
    if let Some(err) = tree_check.error() {
        exit_with_error(&format!("Tree rejected: {}", err));
    }

    let outcome = TreeFlattener.flatten(Some(&root));
    print_diagnostics(&outcome.diagnostics);

    if let Err(err) = validate_flat_array(&outcome.nodes).into_result() {
        exit_with_error(&format!("Flattened nodes are not persistable: {}", err));
    }
    let rendered = serde_json::to_string_pretty(&outcome.nodes)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode nodes: {}", e)));
    println!("{}", rendered);
}

fn run_roundtrip(path: &str) {
    let nodes = load_nodes(path);
    let built = TreeBuilder::new().build(&nodes);
    print_diagnostics(&built.diagnostics);
    let flat = flatten_tree(built.root.as_ref());

    let before = reference_triples(&nodes);
    let after = reference_triples(&flat);
    if before == after {
        println!("Round trip preserved all {} node(s).", before.len());
    } else {
        println!("Round trip changed the reference graph:");
        for lost in before.difference(&after) {
            println!("  - lost    {:?}", lost);
        }
        for gained in after.difference(&before) {
            println!("  + gained  {:?}", gained);
        }
        std::process::exit(1);
    }
}

fn print_diagnostics(diagnostics: &[StructureError]) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("\n{} diagnostic(s):", diagnostics.len());
    for d in diagnostics {
        eprintln!("  -> [{}] {}", d.kind(), d);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

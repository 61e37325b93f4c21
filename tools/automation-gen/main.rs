use clap::Parser;
use flowtree::prelude::*;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate well-formed automations for testing flowtree
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_automations.json")]
    output: String,

    /// How many automations to generate
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// The minimum number of nodes per automation
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of nodes per automation
    #[arg(long, default_value_t = 25)]
    max: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const ENTITIES: [&str; 5] = ["quote", "invoice", "project", "task", "client"];
const STATUSES: [&str; 6] = ["draft", "sent", "accepted", "rejected", "paid", "done"];
const FIELDS: [&str; 4] = ["status", "total", "client.name", "assignee"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.min == 0 || cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) must be at least 1 and not greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating {} automation(s) with {} to {} nodes each...",
        cli.count, cli.min, cli.max
    );

    let mut automations = Vec::with_capacity(cli.count);
    for index in 0..cli.count {
        let size = rng.random_range(cli.min..=cli.max);
        let automation = generate_automation(&mut rng, index, size);
        validate_flat_array(&automation.nodes).into_result()?;
        println!(
            "-> '{}' with {} node(s).",
            automation.name,
            automation.nodes.len()
        );
        automations.push(automation);
    }

    let json_output = serde_json::to_string_pretty(&automations)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved automations to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_automation<R: Rng>(rng: &mut R, index: usize, size: usize) -> Automation {
    let mut next_id = 0;
    let mut budget = size;
    let root = generate_subtree(rng, &mut budget, &mut next_id);

    // Stored arrays are not guaranteed to be in traversal order.
    let mut nodes = flatten_tree(root.as_ref());
    nodes.shuffle(rng);

    let entity = pick(rng, &ENTITIES);
    Automation {
        id: format!("automation-{}", index),
        organization_id: format!("org-{}", rng.random_range(1..=3)),
        name: format!("Generated {} flow #{}", entity, index),
        enabled: rng.random_bool(0.8),
        trigger: Trigger {
            entity_type: entity.to_string(),
            to_status: pick(rng, &STATUSES).to_string(),
            from_status: None,
        },
        nodes,
    }
}

/// Spends up to `budget` nodes on a random subtree.
fn generate_subtree<R: Rng>(
    rng: &mut R,
    budget: &mut usize,
    next_id: &mut usize,
) -> Option<TreeNode> {
    if *budget == 0 {
        return None;
    }
    *budget -= 1;
    let id = format!("node-{}", next_id);
    *next_id += 1;

    if rng.random_bool(0.4) {
        let mut node = TreeNode::new(id, random_condition(rng));
        if let Some(t) = generate_subtree(rng, budget, next_id) {
            node = node.with_true_branch(t);
        }
        if rng.random_bool(0.7) {
            if let Some(f) = generate_subtree(rng, budget, next_id) {
                node = node.with_false_branch(f);
            }
        }
        Some(node)
    } else {
        let mut node = TreeNode::new(id, random_action(rng));
        if let Some(next) = generate_subtree(rng, budget, next_id) {
            node = node.with_next(next);
        }
        Some(node)
    }
}

fn random_condition<R: Rng>(rng: &mut R) -> ConditionConfig {
    let operator = *pick(
        rng,
        &[
            Operator::Equals,
            Operator::NotEquals,
            Operator::Contains,
            Operator::Exists,
        ],
    );
    let value = match operator {
        Operator::Exists => serde_json::Value::Null,
        _ => serde_json::json!(pick(rng, &STATUSES)),
    };
    ConditionConfig {
        field: pick(rng, &FIELDS).to_string(),
        operator,
        value,
    }
}

fn random_action<R: Rng>(rng: &mut R) -> ActionConfig {
    ActionConfig {
        target_type: pick(rng, &ENTITIES).to_string(),
        action_type: ActionType::UpdateStatus,
        new_status: pick(rng, &STATUSES).to_string(),
    }
}

fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> &'a T {
    items
        .choose(rng)
        .expect("pick is only called with non-empty constant tables")
}

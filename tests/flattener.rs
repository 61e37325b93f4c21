//! Tests for turning owned trees back into persisted node arrays.
mod common;
use common::*;
use flowtree::prelude::*;

#[test]
fn test_flatten_none_is_empty() {
    let outcome = TreeFlattener.flatten(None);
    assert!(outcome.nodes.is_empty());
    assert!(outcome.is_clean());
    assert!(flatten_tree(None).is_empty());
}

#[test]
fn test_flatten_emits_pre_order() {
    let tree = TreeNode::new("x", condition_config("status", "accepted"))
        .with_true_branch(
            TreeNode::new("y", action_config("invoice", "sent"))
                .with_next(TreeNode::new("y2", action_config("project", "active"))),
        )
        .with_false_branch(TreeNode::new("z", action_config("task", "todo")));

    let nodes = flatten_tree(Some(&tree));
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["x", "y", "y2", "z"]);

    assert_eq!(nodes[0].next_node_id.as_deref(), Some("y"));
    assert_eq!(nodes[0].else_node_id.as_deref(), Some("z"));
    assert_eq!(nodes[1].next_node_id.as_deref(), Some("y2"));
    assert!(nodes[1].else_node_id.is_none());
    assert!(nodes[2].next_node_id.is_none());
    assert!(nodes[3].next_node_id.is_none());
}

#[test]
fn test_flatten_then_build_restores_tree() {
    let tree = TreeNode::new("start", action_config("quote", "sent")).with_next(
        TreeNode::new("check", condition_config("total", "1000"))
            .with_true_branch(TreeNode::new("big", action_config("task", "review")))
            .with_false_branch(TreeNode::new("small", action_config("invoice", "draft"))),
    );

    let nodes = flatten_tree(Some(&tree));
    assert!(validate_flat_array(&nodes).is_valid());
    assert_eq!(build_tree(&nodes), Some(tree));
}

#[test]
fn test_build_then_flatten_preserves_references() {
    let nodes = quote_flow();
    let root = build_tree(&nodes);
    let flat = flatten_tree(root.as_ref());
    assert_eq!(reference_triples(&flat), reference_triples(&nodes));
}

#[test]
fn test_repeated_id_is_emitted_once() {
    let tree = TreeNode::new("a", condition_config("status", "sent"))
        .with_true_branch(TreeNode::new("b", action_config("task", "done")))
        .with_false_branch(TreeNode::new("b", action_config("task", "done")));

    let outcome = TreeFlattener.flatten(Some(&tree));
    assert_eq!(outcome.nodes.len(), 2);
    assert_eq!(
        outcome.diagnostics,
        vec![StructureError::CircularReference {
            node_id: "b".to_string()
        }]
    );
}

#[test]
fn test_ancestor_id_below_itself_stops_traversal() {
    let tree = TreeNode::new("a", action_config("task", "done")).with_next(
        TreeNode::new("b", action_config("task", "done"))
            .with_next(TreeNode::new("a", action_config("task", "done"))),
    );

    let outcome = TreeFlattener.flatten(Some(&tree));
    let ids: Vec<&str> = outcome.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(outcome.nodes[1].next_node_id.as_deref(), Some("a"));
    assert!(!outcome.is_clean());
    assert!(!validate_flat_array(&outcome.nodes).is_valid());
}

#[test]
fn test_false_branch_on_action_is_not_persisted() {
    let mut tree = TreeNode::new("a", action_config("task", "done"));
    tree.false_branch = Some(Box::new(TreeNode::new("b", action_config("task", "done"))));

    let outcome = TreeFlattener.flatten(Some(&tree));
    assert_eq!(outcome.nodes.len(), 1);
    assert!(outcome.nodes[0].else_node_id.is_none());
    assert_eq!(
        outcome.diagnostics,
        vec![StructureError::ElseOnAction {
            node_id: "a".to_string()
        }]
    );
}

#[test]
fn test_long_tree_flattens_in_order() {
    let mut tree = TreeNode::new("n19999", action_config("task", "done"));
    for i in (0..19_999).rev() {
        tree = TreeNode::new(format!("n{}", i), action_config("task", "done")).with_next(tree);
    }
    let outcome = TreeFlattener.flatten(Some(&tree));
    assert!(outcome.is_clean());
    assert_eq!(outcome.nodes, chain(20_000));
}

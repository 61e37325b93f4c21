//! Tests for the structural checks on trees and flat arrays.
mod common;
use common::*;
use flowtree::prelude::*;

#[test]
fn test_empty_inputs_are_valid() {
    assert!(validate_flat_array(&[]).is_valid());
    assert!(validate_tree_structure(None).is_valid());
}

#[test]
fn test_well_formed_flow_is_valid() {
    let result = validate_flat_array(&quote_flow());
    assert!(result.is_valid(), "{:?}", result.error());
    assert!(validate_flat_array(&chain(10)).is_valid());
}

#[test]
fn test_dangling_reference_names_node_and_target() {
    let nodes = vec![action("a", "task", "done").with_next("missing")];
    let result = validate_flat_array(&nodes);

    assert!(!result.is_valid());
    assert_eq!(
        result.error(),
        Some(&StructureError::DanglingReference {
            node_id: "a".to_string(),
            reference: "missing".to_string(),
        })
    );
    let message = result.error().unwrap().to_string();
    assert!(message.contains("`a`"));
    assert!(message.contains("`missing`"));
}

#[test]
fn test_dangling_else_reference() {
    let nodes = vec![
        condition("a", "status", "sent")
            .with_next("b")
            .with_else("nowhere"),
        action("b", "task", "done"),
    ];
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::DanglingReference {
            node_id: "a".to_string(),
            reference: "nowhere".to_string(),
        })
    );
}

#[test]
fn test_mutual_reference_has_no_root() {
    let nodes = vec![
        action("a", "task", "done").with_next("b"),
        action("b", "task", "done").with_next("a"),
    ];
    let result = validate_flat_array(&nodes);
    assert_eq!(result.error(), Some(&StructureError::NoRootFound));
    assert!(result.error().unwrap().to_string().contains("circular"));
}

#[test]
fn test_disconnected_node_reports_multiple_roots() {
    let mut nodes = chain(3);
    nodes.push(action("c", "task", "done"));

    let candidates: Vec<&str> = root_candidates(&nodes).iter().map(|n| n.id.as_str()).collect();
    assert_eq!(candidates, vec!["n0", "c"]);

    let result = validate_flat_array(&nodes);
    assert_eq!(
        result.error(),
        Some(&StructureError::MultipleRoots {
            ids: vec!["n0".to_string(), "c".to_string()]
        })
    );
    assert!(result.error().unwrap().to_string().contains("`c`"));
}

#[test]
fn test_unreachable_cycle_reports_orphans() {
    let mut nodes = chain(2);
    nodes.push(action("x", "task", "done").with_next("y"));
    nodes.push(action("y", "task", "done").with_next("x"));

    let result = validate_flat_array(&nodes);
    assert_eq!(
        result.error(),
        Some(&StructureError::OrphanedNodes {
            ids: vec!["x".to_string(), "y".to_string()]
        })
    );
    let message = result.error().unwrap().to_string();
    assert!(message.contains("`x`") && message.contains("`y`"));
}

#[test]
fn test_cycle_below_root_is_circular() {
    let nodes = vec![
        action("root", "quote", "sent").with_next("a"),
        action("a", "task", "done").with_next("b"),
        action("b", "task", "done").with_next("a"),
    ];
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::CircularReference {
            node_id: "a".to_string()
        })
    );
}

#[test]
fn test_shared_successor_is_rejected() {
    let nodes = vec![
        condition("a", "status", "sent")
            .with_next("b")
            .with_else("c"),
        action("b", "task", "done").with_next("d"),
        action("c", "task", "done").with_next("d"),
        action("d", "invoice", "paid"),
    ];
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::SharedSuccessor {
            node_id: "d".to_string()
        })
    );
}

#[test]
fn test_duplicate_id_is_rejected_first() {
    let nodes = vec![
        action("a", "task", "done").with_next("ghost"),
        action("a", "task", "done"),
    ];
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::DuplicateId {
            node_id: "a".to_string()
        })
    );
}

#[test]
fn test_else_on_action_is_rejected() {
    let nodes = vec![
        action("a", "task", "done").with_next("b").with_else("c"),
        action("b", "task", "done"),
        action("c", "task", "done"),
    ];
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::ElseOnAction {
            node_id: "a".to_string()
        })
    );
}

#[test]
fn test_tree_with_repeated_ancestor_id_is_circular() {
    let tree = TreeNode::new("a", action_config("task", "done")).with_next(
        TreeNode::new("b", action_config("task", "done"))
            .with_next(TreeNode::new("a", action_config("task", "done"))),
    );
    let result = validate_tree_structure(Some(&tree));
    assert_eq!(
        result.error(),
        Some(&StructureError::CircularReference {
            node_id: "a".to_string()
        })
    );
}

#[test]
fn test_tree_reconvergence_is_not_a_cycle() {
    // `shared` appears in both branches but never on its own path.
    let tree = TreeNode::new("a", condition_config("status", "sent"))
        .with_true_branch(TreeNode::new("shared", action_config("task", "done")))
        .with_false_branch(TreeNode::new("shared", action_config("task", "done")));
    assert!(validate_tree_structure(Some(&tree)).is_valid());
}

#[test]
fn test_validation_result_serializes_for_ui() {
    let ok = serde_json::to_value(validate_flat_array(&quote_flow())).unwrap();
    assert_eq!(ok, serde_json::json!({ "isValid": true }));

    let nodes = vec![action("a", "task", "done").with_next("missing")];
    let failed = serde_json::to_value(validate_flat_array(&nodes)).unwrap();
    assert_eq!(failed["isValid"], serde_json::json!(false));
    assert_eq!(
        failed["error"],
        serde_json::json!("Node `a` references non-existent id `missing`")
    );
}

#[test]
fn test_long_chain_validates_without_overflowing() {
    let mut nodes = chain(20_000);
    assert!(validate_flat_array(&nodes).is_valid());

    // Close the chain back onto its middle.
    nodes[19_999].next_node_id = Some("n10000".to_string());
    assert_eq!(
        validate_flat_array(&nodes).into_result(),
        Err(StructureError::CircularReference {
            node_id: "n10000".to_string()
        })
    );
}

#[test]
fn test_long_tree_validates_without_overflowing() {
    let mut tree = TreeNode::new("n0", action_config("task", "done"));
    for i in 1..20_000 {
        tree = TreeNode::new(format!("n{}", i), action_config("task", "done")).with_next(tree);
    }
    assert!(validate_tree_structure(Some(&tree)).is_valid());
}

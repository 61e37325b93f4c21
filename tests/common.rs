//! Common test utilities for building automation graphs.
use flowtree::prelude::*;

/// Condition node testing `field == value`.
#[allow(dead_code)]
pub fn condition(id: &str, field: &str, value: &str) -> FlatNode {
    FlatNode::condition(id, condition_config(field, value))
}

#[allow(dead_code)]
pub fn condition_config(field: &str, value: &str) -> ConditionConfig {
    ConditionConfig {
        field: field.to_string(),
        operator: Operator::Equals,
        value: serde_json::json!(value),
    }
}

/// Action node setting the status of a `target` record.
#[allow(dead_code)]
pub fn action(id: &str, target: &str, status: &str) -> FlatNode {
    FlatNode::action(id, action_config(target, status))
}

#[allow(dead_code)]
pub fn action_config(target: &str, status: &str) -> ActionConfig {
    ActionConfig {
        target_type: target.to_string(),
        action_type: ActionType::UpdateStatus,
        new_status: status.to_string(),
    }
}

/// A well-formed automation, stored out of traversal order.
///
/// ```text
/// is_accepted?
/// ├── true:  mark_project_active -> has_invoice?
/// │                                 ├── true:  send_invoice
/// │                                 └── false: create_task
/// └── false: archive_quote
/// ```
#[allow(dead_code)]
pub fn quote_flow() -> Vec<FlatNode> {
    vec![
        action("send_invoice", "invoice", "sent"),
        condition("is_accepted", "status", "accepted")
            .with_next("mark_project_active")
            .with_else("archive_quote"),
        action("archive_quote", "quote", "archived"),
        condition("has_invoice", "invoice.id", "present")
            .with_next("send_invoice")
            .with_else("create_task"),
        action("mark_project_active", "project", "active").with_next("has_invoice"),
        action("create_task", "task", "todo"),
    ]
}

/// A straight chain of action nodes `n0 -> n1 -> ... -> n{len-1}`.
#[allow(dead_code)]
pub fn chain(len: usize) -> Vec<FlatNode> {
    (0..len)
        .map(|i| {
            let node = action(&format!("n{}", i), "task", "done");
            if i + 1 < len {
                node.with_next(format!("n{}", i + 1))
            } else {
                node
            }
        })
        .collect()
}

#[allow(dead_code)]
pub fn quote_automation() -> Automation {
    Automation {
        id: "auto-1".to_string(),
        organization_id: "org-1".to_string(),
        name: "Accepted quotes".to_string(),
        enabled: true,
        trigger: Trigger {
            entity_type: "quote".to_string(),
            to_status: "accepted".to_string(),
            from_status: Some("sent".to_string()),
        },
        nodes: quote_flow(),
    }
}

//! # flowtree - Workflow Graph Engine
//!
//! **flowtree** is the graph kernel behind visual workflow automations: a trigger
//! ("when a quote moves to `accepted`") followed by a branching sequence of
//! condition and action nodes.
//!
//! Automations are persisted as a flat list of nodes that point at each other by
//! id. Editors and renderers want an owned tree instead. flowtree converts between
//! the two and checks the flat form before it is trusted.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Deserialize the persisted `FlatNode`s (or a whole `Automation`).
//! 2.  **Build**: `TreeBuilder` turns them into a `TreeNode`. Malformed input never
//!     fails the build; broken branches are dropped and reported as diagnostics.
//! 3.  **Edit**: The caller mutates the owned tree.
//! 4.  **Flatten**: `TreeFlattener` turns the tree back into flat nodes.
//! 5.  **Validate**: `validate_flat_array` decides whether the result may be stored.
//!
//! ## Quick Start
//!
//! ```rust
//! use flowtree::prelude::*;
//!
//! let nodes = vec![
//!     FlatNode::condition(
//!         "check",
//!         ConditionConfig {
//!             field: "status".to_string(),
//!             operator: Operator::Equals,
//!             value: serde_json::json!("accepted"),
//!         },
//!     )
//!     .with_next("invoice")
//!     .with_else("task"),
//!     FlatNode::action(
//!         "invoice",
//!         ActionConfig {
//!             target_type: "invoice".to_string(),
//!             action_type: ActionType::UpdateStatus,
//!             new_status: "sent".to_string(),
//!         },
//!     ),
//!     FlatNode::action(
//!         "task",
//!         ActionConfig {
//!             target_type: "task".to_string(),
//!             action_type: ActionType::UpdateStatus,
//!             new_status: "todo".to_string(),
//!         },
//!     ),
//! ];
//!
//! assert!(validate_flat_array(&nodes).is_valid());
//!
//! let outcome = TreeBuilder::new().build(&nodes);
//! assert!(outcome.is_clean());
//! let root = outcome.root.expect("non-empty input has a root");
//! assert_eq!(root.true_branch().map(|n| n.id.as_str()), Some("invoice"));
//!
//! let flat = flatten_tree(Some(&root));
//! assert_eq!(flat.len(), 3);
//! ```

pub mod automation;
pub mod error;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod store;

//! Prelude module for convenient imports
//!
//! Re-exports the node model, the three graph components and the error types.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowtree::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/nodes.json")?;
//! let nodes: Vec<FlatNode> = serde_json::from_str(&json)?;
//!
//! validate_flat_array(&nodes).into_result()?;
//! let tree = build_tree(&nodes);
//! println!("{}", DisplayTree::new(tree.as_ref()));
//! # Ok(())
//! # }
//! ```

// Graph components
pub use crate::graph::{
    BuildOptions, BuildOutcome, FlattenOutcome, RootFallback, TreeBuilder, TreeFlattener,
    ValidationResult, build_tree, flatten_tree, reference_triples, root_candidates,
    validate_flat_array, validate_tree_structure,
};

// Node model
pub use crate::node::{
    ActionConfig, ActionType, ConditionConfig, DisplayTree, FlatNode, NodeConfig, NodeType,
    Operator, TreeNode,
};

// Persisted records
pub use crate::automation::{Automation, Trigger};
pub use crate::store::{AutomationStore, MemoryStore};

// Error types
pub use crate::error::{NodeFormatError, StoreError, StructureError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

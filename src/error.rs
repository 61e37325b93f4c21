use itertools::Itertools;
use thiserror::Error;

fn format_ids(ids: &[String]) -> String {
    ids.iter().map(|id| format!("`{}`", id)).join(", ")
}

/// Structural problems found in an automation graph.
///
/// The validator returns one of these as its verdict. The builder and the
/// flattener collect them as non-fatal diagnostics while truncating the
/// offending branch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("No root found (circular reference)")]
    NoRootFound,

    #[error("Multiple root nodes found: {}", format_ids(.ids))]
    MultipleRoots { ids: Vec<String> },

    #[error("Node `{node_id}` references non-existent id `{reference}`")]
    DanglingReference { node_id: String, reference: String },

    #[error("Orphaned nodes: {}", format_ids(.ids))]
    OrphanedNodes { ids: Vec<String> },

    #[error("Circular reference at node `{node_id}`")]
    CircularReference { node_id: String },

    #[error("Duplicate node id `{node_id}`")]
    DuplicateId { node_id: String },

    #[error("Action node `{node_id}` has an else branch, which only condition nodes may have")]
    ElseOnAction { node_id: String },

    #[error("Node `{node_id}` is the successor of more than one node")]
    SharedSuccessor { node_id: String },

    #[error("Node `{node_id}` lies deeper than the configured limit of {limit} levels")]
    DepthLimitExceeded { node_id: String, limit: usize },
}

impl StructureError {
    /// A short, stable name for the kind of problem, used in logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            StructureError::NoRootFound => "no_root_found",
            StructureError::MultipleRoots { .. } => "multiple_roots",
            StructureError::DanglingReference { .. } => "dangling_reference",
            StructureError::OrphanedNodes { .. } => "orphaned_node",
            StructureError::CircularReference { .. } => "circular_reference",
            StructureError::DuplicateId { .. } => "duplicate_id",
            StructureError::ElseOnAction { .. } => "else_on_action",
            StructureError::SharedSuccessor { .. } => "shared_successor",
            StructureError::DepthLimitExceeded { .. } => "depth_limit_exceeded",
        }
    }
}

/// Errors raised when a wire record cannot be turned into a typed node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeFormatError {
    #[error("Node '{node_id}' is a condition node but has no condition config")]
    MissingCondition { node_id: String },

    #[error("Node '{node_id}' is an action node but has no action config")]
    MissingAction { node_id: String },

    #[error("Node '{node_id}' carries both a condition and an action config")]
    AmbiguousConfig { node_id: String },

    #[error("Node '{node_id}' is declared as {declared} but its config belongs to another node type")]
    ConfigTypeMismatch {
        node_id: String,
        declared: crate::node::NodeType,
    },

    #[error("Node '{node_id}' is an action node but declares a true or false branch")]
    BranchOnAction { node_id: String },
}

/// Errors raised by an `AutomationStore`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Automation '{0}' not found")]
    NotFound(String),

    #[error("Automation '{automation_id}' was rejected: {source}")]
    Rejected {
        automation_id: String,
        #[source]
        source: StructureError,
    },

    #[error("Failed to parse automation JSON: {0}")]
    Json(#[from] serde_json::Error),
}

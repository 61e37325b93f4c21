use crate::error::StructureError;
use crate::graph::{BuildOutcome, TreeBuilder, TreeFlattener, validate_flat_array};
use crate::node::{FlatNode, TreeNode};
use serde::{Deserialize, Serialize};

/// The record-status transition that starts an automation,
/// e.g. "when a quote moves to `accepted`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub entity_type: String,
    pub to_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_status: Option<String>,
}

/// A named, organization-scoped trigger plus its node graph, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Automation {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub trigger: Trigger,
    #[serde(default)]
    pub nodes: Vec<FlatNode>,
}

fn default_enabled() -> bool {
    true
}

impl Automation {
    /// Loads an automation from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), StructureError> {
        validate_flat_array(&self.nodes).into_result()
    }

    /// Builds the editable tree with default options.
    pub fn tree(&self) -> BuildOutcome {
        TreeBuilder::new().build(&self.nodes)
    }

    /// Replaces the node graph with the flattened form of an edited tree.
    ///
    /// The flattened nodes are validated first; on failure the automation is
    /// left untouched.
    pub fn replace_nodes_from_tree(
        &mut self,
        root: Option<&TreeNode>,
    ) -> Result<(), StructureError> {
        let outcome = TreeFlattener.flatten(root);
        if let Some(err) = outcome.diagnostics.into_iter().next() {
            return Err(err);
        }
        validate_flat_array(&outcome.nodes).into_result()?;
        self.nodes = outcome.nodes;
        Ok(())
    }
}

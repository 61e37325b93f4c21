use super::config::{ActionConfig, ConditionConfig, NodeConfig, NodeType};
use crate::error::NodeFormatError;
use serde::{Deserialize, Serialize};

/// The persisted form of a single automation node.
///
/// Nodes point at their successors by id. For condition nodes `next_node_id`
/// is the true branch and `else_node_id` the false branch; action nodes only
/// have a sequential `next_node_id`.
///
/// On the wire the config is split into `condition`/`action` fields next to a
/// `type` tag. Records where the tag and the populated field disagree are
/// rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFlatNode", into = "RawFlatNode")]
pub struct FlatNode {
    pub id: String,
    pub config: NodeConfig,
    pub next_node_id: Option<String>,
    pub else_node_id: Option<String>,
}

impl FlatNode {
    pub fn condition(id: impl Into<String>, config: ConditionConfig) -> Self {
        Self {
            id: id.into(),
            config: NodeConfig::Condition(config),
            next_node_id: None,
            else_node_id: None,
        }
    }

    pub fn action(id: impl Into<String>, config: ActionConfig) -> Self {
        Self {
            id: id.into(),
            config: NodeConfig::Action(config),
            next_node_id: None,
            else_node_id: None,
        }
    }

    pub fn with_next(mut self, id: impl Into<String>) -> Self {
        self.next_node_id = Some(id.into());
        self
    }

    pub fn with_else(mut self, id: impl Into<String>) -> Self {
        self.else_node_id = Some(id.into());
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.config.node_type()
    }

    pub fn is_condition(&self) -> bool {
        self.node_type() == NodeType::Condition
    }

    /// Every id this node points at, `next_node_id` first.
    pub fn references(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.next_node_id
            .as_deref()
            .into_iter()
            .chain(self.else_node_id.as_deref())
    }
}

/// Wire shape exchanged with the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlatNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<ConditionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<ActionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    else_node_id: Option<String>,
}

impl TryFrom<RawFlatNode> for FlatNode {
    type Error = NodeFormatError;

    fn try_from(raw: RawFlatNode) -> Result<Self, Self::Error> {
        let config = match (raw.node_type, raw.condition, raw.action) {
            (_, Some(_), Some(_)) => {
                return Err(NodeFormatError::AmbiguousConfig { node_id: raw.id });
            }
            (NodeType::Condition, Some(condition), None) => NodeConfig::Condition(condition),
            (NodeType::Action, None, Some(action)) => NodeConfig::Action(action),
            (NodeType::Condition, None, _) => {
                return Err(NodeFormatError::MissingCondition { node_id: raw.id });
            }
            (NodeType::Action, _, None) => {
                return Err(NodeFormatError::MissingAction { node_id: raw.id });
            }
        };

        Ok(Self {
            id: raw.id,
            config,
            next_node_id: raw.next_node_id,
            else_node_id: raw.else_node_id,
        })
    }
}

impl From<FlatNode> for RawFlatNode {
    fn from(node: FlatNode) -> Self {
        let node_type = node.node_type();
        let (condition, action) = match node.config {
            NodeConfig::Condition(c) => (Some(c), None),
            NodeConfig::Action(a) => (None, Some(a)),
        };
        Self {
            id: node.id,
            node_type,
            condition,
            action,
            next_node_id: node.next_node_id,
            else_node_id: node.else_node_id,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of node an automation is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Condition,
    Action,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Condition => write!(f, "condition"),
            NodeType::Action => write!(f, "action"),
        }
    }
}

/// Comparison applied by a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    Exists,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
            Operator::Contains => "contains",
            Operator::Exists => "exists",
        }
    }
}

/// A field test that routes the flow into its true or false branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl fmt::Display for ConditionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Exists => write!(f, "{} exists", self.field),
            op => write!(f, "{} {} {}", self.field, op.symbol(), self.value),
        }
    }
}

/// The mutation an action node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    UpdateStatus,
}

/// A status change applied to a record of `target_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    pub target_type: String,
    #[serde(default)]
    pub action_type: ActionType,
    pub new_status: String,
}

impl fmt::Display for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action_type {
            ActionType::UpdateStatus => {
                write!(f, "set {} status to \"{}\"", self.target_type, self.new_status)
            }
        }
    }
}

/// The payload of a node, polymorphic on its type.
///
/// Serialized untagged: the surrounding record carries `type` separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeConfig {
    Condition(ConditionConfig),
    Action(ActionConfig),
}

impl NodeConfig {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeConfig::Condition(_) => NodeType::Condition,
            NodeConfig::Action(_) => NodeType::Action,
        }
    }

    pub fn as_condition(&self) -> Option<&ConditionConfig> {
        match self {
            NodeConfig::Condition(c) => Some(c),
            NodeConfig::Action(_) => None,
        }
    }

    pub fn as_action(&self) -> Option<&ActionConfig> {
        match self {
            NodeConfig::Action(a) => Some(a),
            NodeConfig::Condition(_) => None,
        }
    }
}

impl From<ConditionConfig> for NodeConfig {
    fn from(config: ConditionConfig) -> Self {
        NodeConfig::Condition(config)
    }
}

impl From<ActionConfig> for NodeConfig {
    fn from(config: ActionConfig) -> Self {
        NodeConfig::Action(config)
    }
}

impl fmt::Display for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeConfig::Condition(c) => write!(f, "{}", c),
            NodeConfig::Action(a) => write!(f, "{}", a),
        }
    }
}

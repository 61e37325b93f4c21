use super::config::{NodeConfig, NodeType};
use crate::error::NodeFormatError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The in-memory, editable form of an automation.
///
/// Every node owns its children. For a condition node `next` is the true
/// branch and `false_branch` the false branch; for an action node `next` is the
/// sequential successor and `false_branch` stays empty.
///
/// Serialized for the renderer as `{id, type, config, next?, trueBranch?, falseBranch?}`.
/// Condition nodes write their true branch once, as `trueBranch`; action nodes
/// write `next`. When deserializing a condition, `trueBranch` takes precedence
/// over `next`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTreeNode")]
pub struct TreeNode {
    pub id: String,
    pub config: NodeConfig,
    pub next: Option<Box<TreeNode>>,
    pub false_branch: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, config: impl Into<NodeConfig>) -> Self {
        Self {
            id: id.into(),
            config: config.into(),
            next: None,
            false_branch: None,
        }
    }

    pub fn with_next(mut self, child: TreeNode) -> Self {
        self.next = Some(Box::new(child));
        self
    }

    /// Alias of `with_next` that reads better on condition nodes.
    pub fn with_true_branch(self, child: TreeNode) -> Self {
        self.with_next(child)
    }

    pub fn with_false_branch(mut self, child: TreeNode) -> Self {
        self.false_branch = Some(Box::new(child));
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.config.node_type()
    }

    pub fn is_condition(&self) -> bool {
        self.node_type() == NodeType::Condition
    }

    /// The true branch of a condition node. Always `None` for action nodes.
    pub fn true_branch(&self) -> Option<&TreeNode> {
        if self.is_condition() {
            self.next.as_deref()
        } else {
            None
        }
    }

    pub fn false_branch(&self) -> Option<&TreeNode> {
        self.false_branch.as_deref()
    }

    /// Direct children in traversal order: `next` first, then `false_branch`.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TreeNode> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.false_branch.as_deref())
    }

    /// Pre-order iterator over this subtree, starting with `self`.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|node| node.id == id)
    }
}

// Unlinks children one level at a time so long chains do not drop recursively.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<TreeNode>> = Vec::new();
        pending.extend(self.next.take());
        pending.extend(self.false_branch.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.next.take());
            pending.extend(node.false_branch.take());
        }
    }
}

/// Pre-order walk over a tree, `next` subtree before the false branch.
pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a TreeNode {
    type Item = &'a TreeNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeRef<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    node_type: NodeType,
    config: &'a NodeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<&'a TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    true_branch: Option<&'a TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    false_branch: Option<&'a TreeNode>,
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TreeNodeRef {
            id: &self.id,
            node_type: self.node_type(),
            config: &self.config,
            next: if self.is_condition() {
                None
            } else {
                self.next.as_deref()
            },
            true_branch: self.true_branch(),
            false_branch: self.false_branch(),
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTreeNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    config: NodeConfig,
    #[serde(default)]
    next: Option<Box<TreeNode>>,
    #[serde(default)]
    true_branch: Option<Box<TreeNode>>,
    #[serde(default)]
    false_branch: Option<Box<TreeNode>>,
}

impl TryFrom<RawTreeNode> for TreeNode {
    type Error = NodeFormatError;

    fn try_from(raw: RawTreeNode) -> Result<Self, Self::Error> {
        if raw.config.node_type() != raw.node_type {
            return Err(NodeFormatError::ConfigTypeMismatch {
                node_id: raw.id,
                declared: raw.node_type,
            });
        }

        let next = match raw.node_type {
            NodeType::Condition => {
                if let (Some(t), Some(n)) = (&raw.true_branch, &raw.next) {
                    if t.id != n.id {
                        tracing::debug!(
                            node_id = %raw.id,
                            true_branch = %t.id,
                            next = %n.id,
                            "trueBranch and next disagree, keeping trueBranch"
                        );
                    }
                }
                raw.true_branch.or(raw.next)
            }
            NodeType::Action => {
                if raw.true_branch.is_some() || raw.false_branch.is_some() {
                    return Err(NodeFormatError::BranchOnAction { node_id: raw.id });
                }
                raw.next
            }
        };

        Ok(Self {
            id: raw.id,
            config: raw.config,
            next,
            false_branch: raw.false_branch,
        })
    }
}

/// Renders a tree as indented text with box-drawing connectors.
pub struct DisplayTree<'a> {
    pub root: Option<&'a TreeNode>,
}

impl<'a> DisplayTree<'a> {
    pub fn new(root: Option<&'a TreeNode>) -> Self {
        Self { root }
    }

    fn fmt_as_tree(&self, root: &TreeNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Line {
            node: root,
            prefix: String::new(),
            is_last: true,
            label: None,
        }];

        while let Some(line) = pending.pop() {
            let Line {
                node,
                prefix,
                is_last,
                label,
            } = line;
            let node_marker = if is_last { "└── " } else { "├── " };
            write!(f, "{}{}", prefix, node_marker)?;
            if let Some(label) = label {
                write!(f, "{}: ", label)?;
            }
            writeln!(f, "[{}] {}: {}", node.node_type(), node.id, node.config)?;

            let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            let child = |node, is_last, label| Line {
                node,
                prefix: child_prefix.clone(),
                is_last,
                label,
            };

            // Pushed in reverse so the true branch prints first.
            if node.is_condition() {
                let true_branch = node.true_branch();
                let false_branch = node.false_branch();
                if let Some(e) = false_branch {
                    pending.push(child(e, true, Some("false")));
                }
                if let Some(t) = true_branch {
                    pending.push(child(t, false_branch.is_none(), Some("true")));
                }
            } else if let Some(next) = node.next.as_deref() {
                pending.push(child(next, true, None));
            }
        }
        Ok(())
    }
}

/// One pending line of `DisplayTree` output.
struct Line<'a> {
    node: &'a TreeNode,
    prefix: String,
    is_last: bool,
    label: Option<&'static str>,
}

impl fmt::Display for DisplayTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.fmt_as_tree(root, f),
            None => writeln!(f, "<empty automation>"),
        }
    }
}

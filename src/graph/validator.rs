use super::{NodeIndex, root_candidates};
use crate::error::StructureError;
use crate::node::{FlatNode, TreeNode};
use ahash::AHashSet;
use serde::{Serialize, Serializer};

/// Verdict of a structural check, shaped for the UI as `{isValid, error?}`.
///
/// `error` serializes as its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_message"
    )]
    error: Option<StructureError>,
}

fn serialize_message<S: Serializer>(
    error: &Option<StructureError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.collect_str(err),
        None => serializer.serialize_none(),
    }
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: StructureError) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error(&self) -> Option<&StructureError> {
        self.error.as_ref()
    }

    pub fn into_result(self) -> Result<(), StructureError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl From<Result<(), StructureError>> for ValidationResult {
    fn from(result: Result<(), StructureError>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(err) => Self::invalid(err),
        }
    }
}

/// Checks an owned tree for ids that repeat along a single root-to-leaf path.
///
/// An id that shows up again after its first subtree was fully explored is
/// re-convergence, not a cycle, and passes.
pub fn validate_tree_structure(root: Option<&TreeNode>) -> ValidationResult {
    let Some(root) = root else {
        return ValidationResult::valid();
    };
    let result = check_tree(root);
    if let Err(err) = &result {
        tracing::debug!(kind = err.kind(), "tree rejected: {}", err);
    }
    result.into()
}

/// Work-list frame for the path-tracking walks below. `Exit` pops a node off
/// the current path once its subtree is done.
enum Frame<T> {
    Enter(T),
    Exit(T),
}

fn check_tree(root: &TreeNode) -> Result<(), StructureError> {
    let mut visited = AHashSet::new();
    let mut path = AHashSet::new();
    let mut pending = vec![Frame::Enter(root)];

    while let Some(frame) = pending.pop() {
        match frame {
            Frame::Enter(node) => {
                let id = node.id.as_str();
                if path.contains(id) {
                    return Err(StructureError::CircularReference {
                        node_id: id.to_string(),
                    });
                }
                if visited.contains(id) {
                    continue;
                }
                path.insert(id);
                pending.push(Frame::Exit(node));
                pending.extend(node.children().rev().map(Frame::Enter));
            }
            Frame::Exit(node) => {
                path.remove(node.id.as_str());
                visited.insert(node.id.as_str());
            }
        }
    }
    Ok(())
}

/// The authoritative pre-persist check for a flat node array.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. ids are unique,
/// 2. every reference resolves, and only condition nodes carry an else reference,
/// 3. exactly one node is unreferenced (the root),
/// 4. a walk from the root meets every node exactly once.
pub fn validate_flat_array(nodes: &[FlatNode]) -> ValidationResult {
    let result = check_flat(nodes);
    if let Err(err) = &result {
        tracing::debug!(kind = err.kind(), "flat array rejected: {}", err);
    }
    result.into()
}

fn check_flat(nodes: &[FlatNode]) -> Result<(), StructureError> {
    if nodes.is_empty() {
        return Ok(());
    }

    let index = NodeIndex::new(nodes);
    if let Some(id) = index.duplicates().first() {
        return Err(StructureError::DuplicateId {
            node_id: id.to_string(),
        });
    }

    for node in nodes {
        if let Some(reference) = node.references().find(|r| !index.contains(r)) {
            return Err(StructureError::DanglingReference {
                node_id: node.id.clone(),
                reference: reference.to_string(),
            });
        }
    }

    if let Some(node) = nodes
        .iter()
        .find(|n| !n.is_condition() && n.else_node_id.is_some())
    {
        return Err(StructureError::ElseOnAction {
            node_id: node.id.clone(),
        });
    }

    let candidates = root_candidates(nodes);
    let root = match candidates.as_slice() {
        [] => return Err(StructureError::NoRootFound),
        [only] => *only,
        _ => {
            return Err(StructureError::MultipleRoots {
                ids: candidates.iter().map(|n| n.id.clone()).collect(),
            });
        }
    };

    let reached = check_reachable(&index, root)?;

    let orphans: Vec<String> = nodes
        .iter()
        .filter(|n| !reached.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();
    if !orphans.is_empty() {
        return Err(StructureError::OrphanedNodes { ids: orphans });
    }

    Ok(())
}

/// Walks every reference from `root`, returning the ids it reached.
fn check_reachable<'a>(
    index: &NodeIndex<'a>,
    root: &'a FlatNode,
) -> Result<AHashSet<&'a str>, StructureError> {
    let mut reached = AHashSet::with_capacity(index.len());
    let mut path = AHashSet::new();
    let mut pending = vec![Frame::Enter(root)];

    while let Some(frame) = pending.pop() {
        match frame {
            Frame::Enter(node) => {
                let id = node.id.as_str();
                if path.contains(id) {
                    return Err(StructureError::CircularReference {
                        node_id: id.to_string(),
                    });
                }
                if !reached.insert(id) {
                    return Err(StructureError::SharedSuccessor {
                        node_id: id.to_string(),
                    });
                }
                path.insert(id);
                pending.push(Frame::Exit(node));
                pending.extend(
                    node.references()
                        .rev()
                        .filter_map(|reference| index.get(reference))
                        .map(Frame::Enter),
                );
            }
            Frame::Exit(node) => {
                path.remove(node.id.as_str());
            }
        }
    }
    Ok(reached)
}

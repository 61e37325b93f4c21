use crate::error::StructureError;
use crate::node::{FlatNode, TreeNode};
use ahash::AHashSet;

/// The result of flattening: the persisted nodes plus any problems met.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlattenOutcome {
    pub nodes: Vec<FlatNode>,
    pub diagnostics: Vec<StructureError>,
}

impl FlattenOutcome {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Turns an edited tree back into the flat form the store persists.
///
/// Nodes are emitted in pre-order (a node, then its `next` subtree, then its
/// false branch). Array order carries no meaning downstream; relationships are
/// encoded purely by id.
///
/// An id seen twice during the walk is emitted once. The second subtree is
/// skipped and reported as a circular reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFlattener;

impl TreeFlattener {
    pub fn flatten(&self, root: Option<&TreeNode>) -> FlattenOutcome {
        let Some(root) = root else {
            return FlattenOutcome::default();
        };

        let _span = tracing::debug_span!("flatten_tree", root = %root.id).entered();
        let mut walk = Walk::default();
        walk.run(root);
        tracing::debug!(
            emitted = walk.nodes.len(),
            diagnostics = walk.diagnostics.len(),
            "tree flattened"
        );

        FlattenOutcome {
            nodes: walk.nodes,
            diagnostics: walk.diagnostics,
        }
    }
}

/// Flattens a tree, discarding diagnostics.
pub fn flatten_tree(root: Option<&TreeNode>) -> Vec<FlatNode> {
    TreeFlattener.flatten(root).nodes
}

/// `next` and false branch of an emitted node.
type Children<'t> = (Option<&'t TreeNode>, Option<&'t TreeNode>);

#[derive(Default)]
struct Walk<'t> {
    visited: AHashSet<&'t str>,
    nodes: Vec<FlatNode>,
    diagnostics: Vec<StructureError>,
}

impl<'t> Walk<'t> {
    fn report(&mut self, diagnostic: StructureError) {
        tracing::warn!(kind = diagnostic.kind(), "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn run(&mut self, root: &'t TreeNode) {
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if let Some((next, false_branch)) = self.visit(node) {
                pending.extend(false_branch);
                pending.extend(next);
            }
        }
    }

    /// Emits `node` and returns the children to descend into, or `None` when
    /// the id was already emitted.
    fn visit(&mut self, node: &'t TreeNode) -> Option<Children<'t>> {
        if !self.visited.insert(node.id.as_str()) {
            self.report(StructureError::CircularReference {
                node_id: node.id.clone(),
            });
            return None;
        }

        // Action nodes never persist an else reference.
        let false_branch = if node.is_condition() {
            node.false_branch()
        } else {
            if node.false_branch.is_some() {
                self.report(StructureError::ElseOnAction {
                    node_id: node.id.clone(),
                });
            }
            None
        };

        self.nodes.push(FlatNode {
            id: node.id.clone(),
            config: node.config.clone(),
            next_node_id: node.next.as_ref().map(|n| n.id.clone()),
            else_node_id: false_branch.map(|n| n.id.clone()),
        });

        Some((node.next.as_deref(), false_branch))
    }
}

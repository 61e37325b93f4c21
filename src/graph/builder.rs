use super::{NodeIndex, root_candidates};
use crate::error::StructureError;
use crate::node::{FlatNode, NodeConfig, TreeNode};
use ahash::AHashSet;

/// What the builder does when every node is referenced by another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootFallback {
    /// Report `NoRootFound` and return no tree.
    #[default]
    None,
    /// Report `NoRootFound`, then walk from the first node in input order.
    /// The walk stops where the cycle closes, so the result is finite.
    FirstNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Truncate branches deeper than this. Unbounded when `None`.
    pub max_depth: Option<usize>,
    pub root_fallback: RootFallback,
}

/// The result of a build: the tree (if any) and every problem met on the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildOutcome {
    pub root: Option<TreeNode>,
    pub diagnostics: Vec<StructureError>,
}

impl BuildOutcome {
    /// `true` when the build neither truncated a branch nor guessed a root.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Turns a flat node list into a single owned tree.
///
/// Malformed input never makes the builder fail. Dangling references, revisited
/// ids and misplaced else branches drop the affected branch and are reported
/// in `BuildOutcome::diagnostics`, so a caller can still render what is left.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    pub fn with_root_fallback(mut self, fallback: RootFallback) -> Self {
        self.options.root_fallback = fallback;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, nodes: &[FlatNode]) -> BuildOutcome {
        if nodes.is_empty() {
            return BuildOutcome::default();
        }

        let _span = tracing::debug_span!("build_tree", nodes = nodes.len()).entered();
        let index = NodeIndex::new(nodes);
        let mut walk = Walk::new(&index, self.options.max_depth);

        for id in index.duplicates() {
            walk.report(StructureError::DuplicateId {
                node_id: id.to_string(),
            });
        }

        let candidates = root_candidates(nodes);
        let root = match candidates.as_slice() {
            [] => {
                walk.report(StructureError::NoRootFound);
                match self.options.root_fallback {
                    RootFallback::None => None,
                    RootFallback::FirstNode => nodes.first(),
                }
            }
            [only] => Some(*only),
            [first, ..] => {
                walk.report(StructureError::MultipleRoots {
                    ids: candidates.iter().map(|n| n.id.clone()).collect(),
                });
                Some(*first)
            }
        };

        let tree = root.and_then(|node| walk.run(node));
        tracing::debug!(
            built = tree.as_ref().map_or(0, TreeNode::node_count),
            diagnostics = walk.diagnostics.len(),
            "tree built"
        );

        BuildOutcome {
            root: tree,
            diagnostics: walk.diagnostics,
        }
    }

    /// Strict variant of `build`: the first diagnostic becomes the error.
    pub fn try_build(&self, nodes: &[FlatNode]) -> Result<Option<TreeNode>, StructureError> {
        let outcome = self.build(nodes);
        match outcome.diagnostics.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(outcome.root),
        }
    }
}

/// Builds a tree with default options, discarding diagnostics.
pub fn build_tree(nodes: &[FlatNode]) -> Option<TreeNode> {
    TreeBuilder::new().build(nodes).root
}

/// Which child slot of an arena entry a pending reference fills.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Next,
    FalseBranch,
}

enum Task<'a> {
    Follow {
        parent: usize,
        slot: Slot,
        reference: &'a str,
        depth: usize,
    },
    ElseOnAction(&'a FlatNode),
}

/// A node accepted into the tree, with arena indices of its children.
struct Entry<'a> {
    node: &'a FlatNode,
    next: Option<usize>,
    false_branch: Option<usize>,
}

/// Depth-first state for a single build.
///
/// The walk runs on an explicit work list and records accepted nodes in
/// pre-order; the owned tree is assembled from that arena afterwards.
struct Walk<'i, 'a> {
    index: &'i NodeIndex<'a>,
    visited: AHashSet<&'a str>,
    entries: Vec<Entry<'a>>,
    diagnostics: Vec<StructureError>,
    max_depth: Option<usize>,
}

impl<'i, 'a> Walk<'i, 'a> {
    fn new(index: &'i NodeIndex<'a>, max_depth: Option<usize>) -> Self {
        Self {
            index,
            visited: AHashSet::new(),
            entries: Vec::new(),
            diagnostics: Vec::new(),
            max_depth,
        }
    }

    fn report(&mut self, diagnostic: StructureError) {
        tracing::warn!(kind = diagnostic.kind(), "{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn run(&mut self, root: &'a FlatNode) -> Option<TreeNode> {
        let mut pending = Vec::new();
        self.enter(root, 0, &mut pending)?;

        while let Some(task) = pending.pop() {
            match task {
                Task::Follow {
                    parent,
                    slot,
                    reference,
                    depth,
                } => {
                    let Some(node) = self.index.get(reference) else {
                        self.report(StructureError::DanglingReference {
                            node_id: self.entries[parent].node.id.clone(),
                            reference: reference.to_string(),
                        });
                        continue;
                    };
                    if let Some(child) = self.enter(node, depth, &mut pending) {
                        let entry = &mut self.entries[parent];
                        match slot {
                            Slot::Next => entry.next = Some(child),
                            Slot::FalseBranch => entry.false_branch = Some(child),
                        }
                    }
                }
                Task::ElseOnAction(node) => self.report(StructureError::ElseOnAction {
                    node_id: node.id.clone(),
                }),
            }
        }

        self.assemble()
    }

    /// Accepts `node` into the arena and queues its references.
    ///
    /// The else reference is pushed first so the whole `next` subtree is
    /// walked before it.
    fn enter(
        &mut self,
        node: &'a FlatNode,
        depth: usize,
        pending: &mut Vec<Task<'a>>,
    ) -> Option<usize> {
        if !self.visited.insert(node.id.as_str()) {
            self.report(StructureError::CircularReference {
                node_id: node.id.clone(),
            });
            return None;
        }
        if let Some(limit) = self.max_depth.filter(|&limit| depth >= limit) {
            self.report(StructureError::DepthLimitExceeded {
                node_id: node.id.clone(),
                limit,
            });
            return None;
        }

        let at = self.entries.len();
        self.entries.push(Entry {
            node,
            next: None,
            false_branch: None,
        });

        match (&node.config, node.else_node_id.as_deref()) {
            (NodeConfig::Condition(_), Some(reference)) => pending.push(Task::Follow {
                parent: at,
                slot: Slot::FalseBranch,
                reference,
                depth: depth + 1,
            }),
            (NodeConfig::Action(_), Some(_)) => pending.push(Task::ElseOnAction(node)),
            (_, None) => {}
        }
        if let Some(reference) = node.next_node_id.as_deref() {
            pending.push(Task::Follow {
                parent: at,
                slot: Slot::Next,
                reference,
                depth: depth + 1,
            });
        }

        Some(at)
    }

    /// Children always sit after their parent in the arena, so a reverse
    /// pass finds every child already built.
    fn assemble(&self) -> Option<TreeNode> {
        let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(self.entries.len());
        built.resize_with(self.entries.len(), || None);

        for (at, entry) in self.entries.iter().enumerate().rev() {
            let mut take = |child: Option<usize>| {
                child
                    .and_then(|child| built[child].take())
                    .map(Box::new)
            };
            let next = take(entry.next);
            let false_branch = take(entry.false_branch);
            built[at] = Some(TreeNode {
                id: entry.node.id.clone(),
                config: entry.node.config.clone(),
                next,
                false_branch,
            });
        }

        built.into_iter().next().flatten()
    }
}

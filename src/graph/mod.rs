//! Conversion between the flat, id-referenced form of an automation and its
//! owned tree form, plus the structural checks that guard the flat form.
//!
//! Both directions share the same lookup helpers: an id index over the flat
//! nodes and the set of ids that some other node points at. The root of an
//! automation is whichever node is missing from that set.

use crate::node::FlatNode;
use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;

pub mod builder;
pub mod flattener;
pub mod validator;

pub use builder::*;
pub use flattener::*;
pub use validator::*;

/// An id → node lookup table over a flat node slice.
///
/// When an id occurs more than once the first occurrence is indexed and the
/// later ones are recorded as duplicates.
pub(crate) struct NodeIndex<'a> {
    by_id: AHashMap<&'a str, &'a FlatNode>,
    duplicates: Vec<&'a str>,
}

impl<'a> NodeIndex<'a> {
    pub(crate) fn new(nodes: &'a [FlatNode]) -> Self {
        let mut by_id = AHashMap::with_capacity(nodes.len());
        let mut duplicates = Vec::new();
        for node in nodes {
            if by_id.contains_key(node.id.as_str()) {
                duplicates.push(node.id.as_str());
            } else {
                by_id.insert(node.id.as_str(), node);
            }
        }
        Self { by_id, duplicates }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&'a FlatNode> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub(crate) fn duplicates(&self) -> &[&'a str] {
        &self.duplicates
    }
}

/// Every id named by some node's `next_node_id` or `else_node_id`.
pub fn referenced_ids(nodes: &[FlatNode]) -> AHashSet<&str> {
    nodes.iter().flat_map(FlatNode::references).collect()
}

/// Nodes that no other node points at, in input order.
///
/// A well-formed automation has exactly one.
pub fn root_candidates(nodes: &[FlatNode]) -> Vec<&FlatNode> {
    let referenced = referenced_ids(nodes);
    let mut seen = AHashSet::new();
    nodes
        .iter()
        .filter(|n| !referenced.contains(n.id.as_str()))
        .filter(|n| seen.insert(n.id.as_str()))
        .collect()
}

/// One node's `(id, next_node_id, else_node_id)`.
pub type ReferenceTriple = (String, Option<String>, Option<String>);

/// The reference graph of a node array, independent of array order.
///
/// Two arrays describe the same automation graph when their triples are equal.
pub fn reference_triples(nodes: &[FlatNode]) -> BTreeSet<ReferenceTriple> {
    nodes
        .iter()
        .map(|n| (n.id.clone(), n.next_node_id.clone(), n.else_node_id.clone()))
        .collect()
}

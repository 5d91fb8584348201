use std::collections::HashMap;

use crate::ids::{Meta, NodeId};
use crate::ops::Edge;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Materialized tree: every non-root node mapped to its current edge.
///
/// A node with no entry is a root. Nodes only appear as keys once they have been the child
/// of an effective move; a node that is only ever used as a parent stays implicit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tree {
    edges: HashMap<NodeId, Edge>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, child: NodeId) -> Option<&Edge> {
        self.edges.get(&child)
    }

    /// Current parent of a node, `None` for roots.
    pub fn parent(&self, child: NodeId) -> Option<NodeId> {
        self.edges.get(&child).map(|e| e.parent)
    }

    pub fn meta(&self, child: NodeId) -> Option<&Meta> {
        self.edges.get(&child).map(|e| &e.meta)
    }

    pub fn contains(&self, child: NodeId) -> bool {
        self.edges.contains_key(&child)
    }

    /// Number of non-root nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterate `(child, edge)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        self.edges.iter().map(|(c, e)| (*c, e))
    }

    /// Direct children of `parent`, sorted by node id.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .edges
            .iter()
            .filter(|(_, e)| e.parent == parent)
            .map(|(c, _)| *c)
            .collect();
        out.sort_unstable();
        out
    }

    /// Number of edges between `node` and the root of its tree.
    pub fn depth(&self, node: NodeId) -> usize {
        let mut depth = 0;
        let mut current = node;
        while let Some(edge) = self.edges.get(&current) {
            depth += 1;
            current = edge.parent;
        }
        depth
    }

    /// True if `ancestor` is reachable from `node` by following parent pointers.
    /// For convenience, also true if `ancestor == node`.
    ///
    /// Bounded by the depth of `node`; the walk terminates because the tree is kept acyclic.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current != ancestor {
            match self.edges.get(&current) {
                Some(edge) => current = edge.parent,
                None => return false,
            }
        }
        true
    }

    /// Walk parent pointers from `start` and report whether a node repeats.
    pub(crate) fn has_cycle_from(&self, start: NodeId) -> bool {
        let mut steps = 0;
        let mut current = start;
        while let Some(edge) = self.edges.get(&current) {
            steps += 1;
            // A cycle-free walk visits each keyed node at most once.
            if steps > self.edges.len() {
                return true;
            }
            current = edge.parent;
        }
        false
    }

    pub(crate) fn insert(&mut self, child: NodeId, edge: Edge) {
        self.edges.insert(child, edge);
    }

    pub(crate) fn remove(&mut self, child: NodeId) -> Option<Edge> {
        self.edges.remove(&child)
    }
}

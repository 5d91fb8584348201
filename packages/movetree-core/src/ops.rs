use std::cmp::Ordering;

use crate::ids::{Lamport, Meta, NodeId, ReplicaId, Stamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A child's position in the tree: its parent and the metadata carried by the edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    pub parent: NodeId,
    pub meta: Meta,
}

impl Edge {
    pub fn new(parent: NodeId, meta: Meta) -> Self {
        Self { parent, meta }
    }
}

/// "As of `timestamp`, `child` hangs under `parent` with `meta` on the edge."
///
/// The previous location of `child` does not matter. A child that has never been moved is
/// created by its first move; a parent that has never been moved is implicitly a root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move<T> {
    pub timestamp: T,
    pub parent: NodeId,
    pub child: NodeId,
    pub meta: Meta,
}

impl<T> Move<T> {
    pub fn new(timestamp: T, parent: NodeId, child: NodeId, meta: Meta) -> Self {
        Self {
            timestamp,
            parent,
            child,
            meta,
        }
    }

    /// The edge this move installs for its child when it takes effect.
    pub fn edge(&self) -> Edge {
        Edge {
            parent: self.parent,
            meta: self.meta.clone(),
        }
    }
}

impl Move<Stamp> {
    /// Build a move stamped with `(lamport, replica)`.
    pub fn stamped(
        replica: &ReplicaId,
        lamport: Lamport,
        parent: NodeId,
        child: NodeId,
        meta: Meta,
    ) -> Self {
        Self::new(Stamp::new(lamport, replica), parent, child, meta)
    }
}

/// A move as recorded in the log, together with what it replaced.
///
/// `previous` is the child's edge immediately before the move was folded into the tree
/// (`None` when the child was a root). It is all `undo` needs, and it is recomputed every
/// time the entry is replayed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogMove<T> {
    pub op: Move<T>,
    pub previous: Option<Edge>,
}

impl<T> LogMove<T> {
    pub fn timestamp(&self) -> &T {
        &self.op.timestamp
    }

    pub fn child(&self) -> NodeId {
        self.op.child
    }

    pub fn had_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn into_move(self) -> Move<T> {
        self.op
    }
}

/// Canonical ordering for moves: by timestamp only. Equal timestamps compare equal, and
/// the log keeps such entries in arrival order.
pub fn cmp_moves<T: Ord>(a: &Move<T>, b: &Move<T>) -> Ordering {
    a.timestamp.cmp(&b.timestamp)
}

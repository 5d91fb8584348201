use tracing::debug;

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::ids::{Lamport, Meta, NodeId, ReplicaId, Stamp};
use crate::ops::Move;
use crate::state::State;
use crate::tree::Tree;

/// A replica's view of the tree: wires a clock to a [`State`] keyed by [`Stamp`].
///
/// Local moves are stamped with `(tick, replica_id)`, so as long as replica ids are distinct
/// every move has a unique timestamp and all replicas agree on the log order.
#[derive(Clone, Debug)]
pub struct Replica<C: Clock> {
    replica_id: ReplicaId,
    clock: C,
    state: State<Stamp>,
}

impl<C: Clock> Replica<C> {
    pub fn new(replica_id: ReplicaId, clock: C) -> Self {
        Self {
            replica_id,
            clock,
            state: State::new(),
        }
    }

    /// Create a move, apply it locally and return it for broadcast.
    ///
    /// Refuses moves that the current tree would suppress as cycles; they could only ever
    /// land in the log as no-ops.
    pub fn local_move(&mut self, parent: NodeId, child: NodeId, meta: Meta) -> Result<Move<Stamp>> {
        if self.state.tree().is_ancestor(child, parent) {
            return Err(Error::InvalidOperation(format!(
                "moving {child} under {parent} would create a cycle"
            )));
        }
        let lamport = self.clock.tick();
        let op = Move::stamped(&self.replica_id, lamport, parent, child, meta);
        debug!(lamport, child = %child, parent = %parent, "local move");
        self.state.apply(op.clone());
        Ok(op)
    }

    /// Apply a move received from a peer. Remote moves are never rejected.
    pub fn apply_remote(&mut self, op: Move<Stamp>) {
        self.clock.observe(op.timestamp.lamport);
        self.state.apply(op);
    }

    /// Moves with a Lamport time strictly greater than `lamport`, oldest first.
    pub fn operations_since(&self, lamport: Lamport) -> Vec<Move<Stamp>> {
        let log = self.state.operations();
        let start = log.partition_point(|e| e.op.timestamp.lamport <= lamport);
        log[start..].iter().map(|e| e.op.clone()).collect()
    }

    pub fn replica_id(&self) -> &ReplicaId {
        &self.replica_id
    }

    pub fn state(&self) -> &State<Stamp> {
        &self.state
    }

    pub fn tree(&self) -> &Tree {
        self.state.tree()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.tree().parent(node)
    }

    /// Current Lamport time as observed by this replica.
    pub fn lamport(&self) -> Lamport {
        self.clock.now()
    }
}

impl<C: Clock + Clone> Replica<C> {
    /// Branch off an independent replica with the same history under a new id.
    pub fn fork(&self, replica_id: ReplicaId) -> Self {
        Self {
            replica_id,
            clock: self.clock.clone(),
            state: self.state.clone(),
        }
    }
}

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ids::NodeId;
use crate::ops::{cmp_moves, Edge, LogMove, Move};
use crate::tree::Tree;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Replicated state: the timestamp-ordered log of applied moves and the tree it folds to.
///
/// `apply` is the only write path. After every call the log is sorted by timestamp (ties in
/// arrival order) and the tree equals the result of folding the log from an empty tree, so
/// two states that have applied the same moves, in any order, compare equal.
///
/// `Clone` is a deep copy: clones share no storage and can be mutated independently.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State<T> {
    operations: Vec<LogMove<T>>, // ascending by timestamp
    tree: Tree,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
            tree: Tree::new(),
        }
    }
}

impl<T> State<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current materialized tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The full log, oldest first.
    pub fn operations(&self) -> &[LogMove<T>] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn latest_timestamp(&self) -> Option<&T> {
        self.operations.last().map(LogMove::timestamp)
    }

    /// Whether the logged move at `index` left the tree untouched because it would have
    /// created a cycle. `None` if `index` is out of range.
    pub fn is_noop(&self, index: usize) -> Option<bool> {
        let entry = self.operations.get(index)?;
        let child = entry.child();
        // The child's edge right after this entry is what the next entry for the same child
        // saw as its previous edge, or the live tree entry when there is none.
        let after = self.operations[index + 1..]
            .iter()
            .find(|later| later.child() == child)
            .map(|later| later.previous.as_ref())
            .unwrap_or_else(|| self.tree.get(child));
        Some(after != Some(&entry.op.edge()))
    }

    /// Indices of every logged move that had no effect on the tree, in one backward pass.
    pub fn noops(&self) -> Vec<usize> {
        let mut after: HashMap<NodeId, Option<&Edge>> = HashMap::new();
        let mut out = Vec::new();
        for (idx, entry) in self.operations.iter().enumerate().rev() {
            let child = entry.child();
            let current = after
                .get(&child)
                .copied()
                .unwrap_or_else(|| self.tree.get(child));
            if current != Some(&entry.op.edge()) {
                out.push(idx);
            }
            after.insert(child, entry.previous.as_ref());
        }
        out.reverse();
        out
    }

    /// Run a single move against the current tree and return its log record.
    ///
    /// If the child is the intended parent or one of its ancestors, the tree is left
    /// unchanged; the record is produced either way.
    fn do_move(&mut self, op: Move<T>) -> LogMove<T> {
        let previous = self.tree.get(op.child).cloned();
        if self.tree.is_ancestor(op.child, op.parent) {
            trace!(
                child = %op.child,
                parent = %op.parent,
                "move would create a cycle, logged as no-op"
            );
        } else {
            self.tree.insert(op.child, op.edge());
        }
        LogMove { op, previous }
    }

    /// Revert the tree effect of `entry`. Must be called in reverse log order.
    fn undo(&mut self, entry: &LogMove<T>) {
        self.tree.remove(entry.child());
        if let Some(previous) = &entry.previous {
            self.tree.insert(entry.child(), previous.clone());
        }
    }

    /// Run the entry's move again and append the recomputed record, which may differ from
    /// the old one because the tree before it has changed.
    fn redo(&mut self, entry: LogMove<T>) {
        let entry = self.do_move(entry.into_move());
        self.operations.push(entry);
    }
}

impl<T: Ord> State<T> {
    /// Insert `op` into the log at its timestamp position and bring the tree up to date.
    ///
    /// Moves newer than everything in the log take the fast path. Otherwise every entry
    /// after the insertion point is undone newest-first, the new move is applied, and the
    /// undone moves are redone oldest-first. Never fails; duplicates are not filtered.
    pub fn apply(&mut self, op: Move<T>) {
        // Entries with an equal timestamp stay ahead of the new move.
        let idx = self
            .operations
            .partition_point(|existing| existing.op.timestamp <= op.timestamp);

        if idx == self.operations.len() {
            trace!(child = %op.child, parent = %op.parent, "appending move");
            let entry = self.do_move(op);
            self.operations.push(entry);
            return;
        }

        let undone = self.operations.split_off(idx);
        debug!(
            index = idx,
            replayed = undone.len(),
            child = %op.child,
            "inserting out-of-order move"
        );
        for entry in undone.iter().rev() {
            self.undo(entry);
        }

        let entry = self.do_move(op);
        self.operations.push(entry);

        for entry in undone {
            self.redo(entry);
        }
    }
}

impl<T: Ord + Clone> State<T> {
    /// Check the log is sorted, the tree is acyclic, and both log and tree match a
    /// from-scratch fold of the log. Intended for tests and debugging.
    pub fn validate_invariants(&self) -> Result<()> {
        if let Some(pos) = self
            .operations
            .windows(2)
            .position(|pair| cmp_moves(&pair[0].op, &pair[1].op).is_gt())
        {
            return Err(Error::InconsistentState(format!(
                "log out of timestamp order at index {}",
                pos + 1
            )));
        }

        if let Some((child, _)) = self.tree.iter().find(|(c, _)| self.tree.has_cycle_from(*c)) {
            return Err(Error::InconsistentState(format!(
                "cycle reachable from node {child}"
            )));
        }

        let folded = fold(self.operations.iter().map(|e| &e.op));
        if folded.tree != self.tree {
            return Err(Error::InconsistentState(
                "tree differs from fold of the log".into(),
            ));
        }
        if let Some(pos) = folded
            .operations
            .iter()
            .zip(&self.operations)
            .position(|(expected, actual)| expected != actual)
        {
            return Err(Error::InconsistentState(format!(
                "stale undo record at index {pos}"
            )));
        }
        Ok(())
    }
}

impl<T: Ord> Extend<Move<T>> for State<T> {
    fn extend<I: IntoIterator<Item = Move<T>>>(&mut self, iter: I) {
        for op in iter {
            self.apply(op);
        }
    }
}

impl<T: Ord> FromIterator<Move<T>> for State<T> {
    fn from_iter<I: IntoIterator<Item = Move<T>>>(iter: I) -> Self {
        let mut state = Self::new();
        state.extend(iter);
        state
    }
}

/// Fold moves, in the order given, over an empty tree. The reference result `apply` must
/// reproduce for a sorted sequence of moves.
pub fn materialize<'a, T>(ops: impl IntoIterator<Item = &'a Move<T>>) -> Tree
where
    T: Clone + 'a,
{
    fold(ops).tree
}

fn fold<'a, T>(ops: impl IntoIterator<Item = &'a Move<T>>) -> State<T>
where
    T: Clone + 'a,
{
    let mut scratch = State::new();
    for op in ops {
        let entry = scratch.do_move(op.clone());
        scratch.operations.push(entry);
    }
    scratch
}

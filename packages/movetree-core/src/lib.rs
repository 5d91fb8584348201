#![forbid(unsafe_code)]
//! Core of a replicated move tree: an operation log of timestamped moves and the tree it
//! materializes to. Applying the same set of moves in any delivery order yields the same
//! log and the same tree on every replica.
//!
//! Transport, deduplication and persistence are left to the host; this crate is a pure,
//! synchronous, in-memory state machine.

pub mod clock;
pub mod error;
pub mod ids;
pub mod ops;
pub mod replica;
pub mod state;
pub mod tree;

pub use clock::{Clock, LamportClock};
pub use error::{Error, Result};
pub use ids::{Lamport, Meta, NodeId, ReplicaId, Stamp};
pub use ops::{cmp_moves, Edge, LogMove, Move};
pub use replica::Replica;
pub use state::{materialize, State};
pub use tree::Tree;

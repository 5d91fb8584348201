use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lamport timestamp used for ordering moves.
pub type Lamport = u64;

/// Opaque edge payload (for example a display name). Never interpreted by the core.
pub type Meta = Vec<u8>;

/// Unique identifier for a replica. Backed by raw bytes to support arbitrary identity formats.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReplicaId(pub Vec<u8>);

impl ReplicaId {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Unique identifier for a node in the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Globally unique timestamp: a Lamport counter with the issuing replica as tie-breaker.
///
/// Ordered by `(lamport, replica)`. As long as every replica has a distinct id and never
/// reuses a counter value, no two stamps compare equal, so the log order no longer depends
/// on arrival order.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stamp {
    pub lamport: Lamport,
    pub replica: ReplicaId,
}

impl Stamp {
    pub fn new(lamport: Lamport, replica: &ReplicaId) -> Self {
        Self {
            lamport,
            replica: replica.clone(),
        }
    }
}

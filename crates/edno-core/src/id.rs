use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in a [`Diagram`](crate::Diagram).
/// Stable for the node's lifetime and never reissued by the same diagram.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

/// Identifier of an arrow in a [`Diagram`](crate::Diagram).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArrowId(u64);

impl NodeId {
    /// Rebuild an id received from a host, e.g. across the WASM boundary.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl ArrowId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Debug for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arrow#{}", self.0)
    }
}

impl fmt::Display for ArrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arrow#{}", self.0)
    }
}

/// Monotonic id source shared by nodes and arrows of one diagram.
///
/// Ids are never handed out twice, not even after a diagram reset, so a
/// stale id held by a caller can never alias a newer entity.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn node(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    pub fn arrow(&mut self) -> ArrowId {
        ArrowId(self.bump())
    }

    fn bump(&mut self) -> u64 {
        let n = self.next.max(1);
        self.next = n + 1;
        n
    }
}

//! Connection rules evaluated before an arrow is drawn.
//!
//! A policy only reads the diagram. The canvas asks it again on every hover
//! and on every commit, so rules may depend on anything in the current
//! diagram state.

use crate::diagram::Diagram;
use crate::id::NodeId;
use crate::model::ArrowKind;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;

/// A proposed arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub predictor: NodeId,
    pub dependent: NodeId,
    pub kind: ArrowKind,
}

impl ConnectionRequest {
    pub fn new(predictor: NodeId, dependent: NodeId, kind: ArrowKind) -> Self {
        Self {
            predictor,
            dependent,
            kind,
        }
    }
}

pub trait ConnectionPolicy {
    fn allowed(&self, diagram: &Diagram, request: &ConnectionRequest) -> bool;

    /// Both this rule and `other` must allow the connection.
    fn and<P>(self, other: P) -> AllOf
    where
        Self: Sized + 'static,
        P: ConnectionPolicy + 'static,
    {
        AllOf::new().with(self).with(other)
    }
}

impl<F> ConnectionPolicy for F
where
    F: Fn(&Diagram, &ConnectionRequest) -> bool,
{
    fn allowed(&self, diagram: &Diagram, request: &ConnectionRequest) -> bool {
        self(diagram, request)
    }
}

/// Self-loops are rejected unless the arrow is bidirected (a variance).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSelfLoop;

impl ConnectionPolicy for NoSelfLoop {
    fn allowed(&self, _: &Diagram, request: &ConnectionRequest) -> bool {
        request.predictor != request.dependent || request.kind == ArrowKind::Bidirected
    }
}

/// At most one arrow between two nodes, whatever its kind. Two directed
/// arrows in opposite directions are distinct pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicateEdge;

impl ConnectionPolicy for NoDuplicateEdge {
    fn allowed(&self, diagram: &Diagram, request: &ConnectionRequest) -> bool {
        let Some(node) = diagram.node(request.predictor) else {
            return true;
        };
        !node
            .attached_arrows()
            .into_iter()
            .filter_map(|id| diagram.arrow(id))
            .any(|a| a.joins(request.predictor, request.dependent, request.kind))
    }
}

/// Directed arrows may not close a directed cycle.
///
/// Undirected and bidirected arrows are not part of the causal structure and
/// are always accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Acyclic;

impl ConnectionPolicy for Acyclic {
    fn allowed(&self, diagram: &Diagram, request: &ConnectionRequest) -> bool {
        if request.kind != ArrowKind::Directed {
            return true;
        }
        if request.predictor == request.dependent {
            return false;
        }
        let mut graph = DiGraphMap::<NodeId, ()>::new();
        for node in diagram.nodes() {
            graph.add_node(node.id());
        }
        for arrow in diagram.arrows().filter(|a| a.kind() == ArrowKind::Directed) {
            graph.add_edge(arrow.predictor(), arrow.dependent(), ());
        }
        !has_path_connecting(&graph, request.dependent, request.predictor, None)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ConnectionPolicy for AllowAll {
    fn allowed(&self, _: &Diagram, _: &ConnectionRequest) -> bool {
        true
    }
}

/// Conjunction of rules, checked in insertion order.
#[derive(Default)]
pub struct AllOf {
    policies: Vec<Box<dyn ConnectionPolicy>>,
}

impl AllOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, policy: impl ConnectionPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl ConnectionPolicy for AllOf {
    fn allowed(&self, diagram: &Diagram, request: &ConnectionRequest) -> bool {
        self.policies.iter().all(|p| p.allowed(diagram, request))
    }

    fn and<P>(self, other: P) -> AllOf
    where
        P: ConnectionPolicy + 'static,
    {
        self.with(other)
    }
}

/// Rules used when a canvas is built without one: no self-loops and no
/// duplicate arrows.
pub fn default_policy() -> AllOf {
    NoSelfLoop.and(NoDuplicateEdge)
}

//! Hit testing: logical point → node or arrow.
//!
//! Later entities are painted on top, so both arenas are walked newest
//! first. Nodes win over arrows because arrows end on node outlines.

use crate::diagram::Diagram;
use crate::id::{ArrowId, NodeId};
use kurbo::Point;

/// How far from an arrow's path a click still selects it.
pub const ARROW_HIT_TOLERANCE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(NodeId),
    Arrow(ArrowId),
}

impl Diagram {
    /// Topmost node or arrow at `point`, or `None` for empty canvas.
    pub fn hit_test(&self, point: Point) -> Option<Hit> {
        self.node_at(point)
            .map(Hit::Node)
            .or_else(|| self.arrow_at(point).map(Hit::Arrow))
    }

    /// Topmost node whose outline or annotation contains `point`.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.nodes()
            .rev()
            .find(|n| {
                n.shape().contains(point)
                    || (n.annotation().visible && n.annotation().shape.contains(point))
            })
            .map(|n| n.id())
    }

    /// Topmost arrow whose path passes within [`ARROW_HIT_TOLERANCE`] of
    /// `point` or whose visible estimate box contains it.
    pub fn arrow_at(&self, point: Point) -> Option<ArrowId> {
        self.arrows()
            .rev()
            .find(|a| {
                a.path().distance_to(point) <= ARROW_HIT_TOLERANCE
                    || (a.estimate_label().visible && a.estimate_label().shape.contains(point))
            })
            .map(|a| a.id())
    }
}

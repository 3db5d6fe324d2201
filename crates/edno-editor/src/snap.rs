//! Alignment snapping while dragging a node.
//!
//! Each axis snaps on its own: when another node's center is within the
//! snap distance on that axis and the pointer moved less than the snap
//! distance, the drag delta is replaced by the delta that lines the two
//! centers up exactly. Fast moves never snap, which is how a node is pulled
//! out of alignment again.

use edno_core::{Diagram, NodeId, Vec2};

/// Signed per-axis offsets from `node` to the nearest other center.
/// `None` on an axis when the diagram has no other node.
pub fn closest_offsets(diagram: &Diagram, node: NodeId) -> (Option<f64>, Option<f64>) {
    let Some(me) = diagram.node(node).map(|n| n.position()) else {
        return (None, None);
    };
    let nearest = |axis: fn(Vec2) -> f64| {
        diagram
            .nodes()
            .filter(|n| n.id() != node)
            .map(|n| axis(n.position() - me))
            .min_by(|a, b| a.abs().total_cmp(&b.abs()))
    };
    (nearest(|v| v.x), nearest(|v| v.y))
}

/// Drag delta after snapping `raw` for `node`.
pub fn snap_delta(diagram: &Diagram, node: NodeId, raw: Vec2, snap_distance: f64) -> Vec2 {
    let (closest_x, closest_y) = closest_offsets(diagram, node);
    let snap = |raw: f64, closest: Option<f64>| match closest {
        Some(c) if c.abs() < snap_distance && raw.abs() < snap_distance => c,
        _ => raw,
    };
    Vec2::new(snap(raw.x, closest_x), snap(raw.y, closest_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edno_core::{DiagramConfig, Point};
    use pretty_assertions::assert_eq;

    fn diagram() -> (Diagram, NodeId, NodeId) {
        let mut d = Diagram::new(DiagramConfig::default()).unwrap();
        let a = d.place_node("ellipse", Point::new(0.0, 0.0)).unwrap();
        let b = d.place_node("ellipse", Point::new(50.0, 2.0)).unwrap();
        (d, a, b)
    }

    #[test]
    fn closest_offsets_per_axis() {
        let (d, a, _) = diagram();
        assert_eq!(closest_offsets(&d, a), (Some(50.0), Some(2.0)));
    }

    #[test]
    fn small_moves_snap_into_alignment() {
        let (d, a, _) = diagram();
        let delta = snap_delta(&d, a, Vec2::new(1.0, 1.0), 3.0);
        // x is far from b, only y aligns
        assert_eq!(delta, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn fast_moves_do_not_snap() {
        let (d, a, _) = diagram();
        assert_eq!(snap_delta(&d, a, Vec2::new(0.0, 5.0), 3.0), Vec2::new(0.0, 5.0));
    }

    #[test]
    fn lone_node_never_snaps() {
        let mut d = Diagram::new(DiagramConfig::default()).unwrap();
        let a = d.place_node("ellipse", Point::ZERO).unwrap();
        assert_eq!(snap_delta(&d, a, Vec2::new(1.0, -1.0), 3.0), Vec2::new(1.0, -1.0));
    }
}

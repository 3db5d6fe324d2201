//! Integration tests: adjacency bookkeeping and geometry invariants that
//! must hold after any sequence of diagram operations.

use edno_core::*;
use pretty_assertions::assert_eq;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn diagram() -> Diagram {
    Diagram::new(DiagramConfig::default()).expect("default config is valid")
}

fn ellipse(d: &mut Diagram, x: f64, y: f64) -> NodeId {
    d.place_node("ellipse", Point::new(x, y)).unwrap()
}

/// Every arrow is listed by both endpoints and every listed id is live.
fn assert_adjacency_symmetric(d: &Diagram) {
    for arrow in d.arrows() {
        let p = d.node(arrow.predictor()).expect("predictor is live");
        let q = d.node(arrow.dependent()).expect("dependent is live");
        assert!(p.outgoing().contains(&arrow.id()), "{} missing from outgoing", arrow.id());
        assert!(q.incoming().contains(&arrow.id()), "{} missing from incoming", arrow.id());
    }
    for node in d.nodes() {
        for id in node.outgoing() {
            assert_eq!(d.arrow(*id).map(|a| a.predictor()), Some(node.id()));
        }
        for id in node.incoming() {
            assert_eq!(d.arrow(*id).map(|a| a.dependent()), Some(node.id()));
        }
    }
}

fn assert_on_ellipse(d: &Diagram, node: NodeId, p: Point) {
    let shape = d.node(node).unwrap().shape();
    let c = shape.center();
    let hw = shape.bounds.width() / 2.0;
    let hh = shape.bounds.height() / 2.0;
    let on = ((p.x - c.x) / hw).powi(2) + ((p.y - c.y) / hh).powi(2);
    assert!((on - 1.0).abs() < 1e-6, "{p:?} is not on the outline of {node}");
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-9
}

// ─── Adjacency ───────────────────────────────────────────────────────────

#[test]
fn adjacency_stays_symmetric_through_edits() {
    let mut d = diagram();
    let a = ellipse(&mut d, 0.0, 0.0);
    let b = ellipse(&mut d, 100.0, 0.0);
    let c = ellipse(&mut d, 50.0, 80.0);

    let ab = d.connect(a, b, ArrowKind::Directed).unwrap();
    d.connect(b, c, ArrowKind::Undirected).unwrap();
    d.connect(c, a, ArrowKind::Bidirected).unwrap();
    d.connect(c, c, ArrowKind::Bidirected).unwrap();
    assert_adjacency_symmetric(&d);

    d.delete_arrow(ab).unwrap();
    assert_adjacency_symmetric(&d);
    assert!(d.node(a).unwrap().outgoing().is_empty());

    d.move_node(c, Vec2::new(10.0, 10.0)).unwrap();
    d.rename_node(c, "centre").unwrap();
    assert_adjacency_symmetric(&d);

    d.delete_node(b).unwrap();
    assert_adjacency_symmetric(&d);
}

#[test]
fn cascade_delete_removes_every_attached_arrow() {
    let mut d = diagram();
    let hub = ellipse(&mut d, 0.0, 0.0);
    let others: Vec<NodeId> = (1..=5)
        .map(|i| ellipse(&mut d, 100.0 * i as f64, 0.0))
        .collect();

    // three outgoing, two incoming
    for &o in &others[..3] {
        d.connect(hub, o, ArrowKind::Directed).unwrap();
    }
    for &o in &others[3..] {
        d.connect(o, hub, ArrowKind::Directed).unwrap();
    }
    d.connect(others[0], others[1], ArrowKind::Directed).unwrap();
    assert_eq!(d.arrow_count(), 6);

    let removed = d.delete_node(hub).unwrap();
    assert_eq!(removed.len(), 5);
    assert_eq!(d.arrow_count(), 1);
    assert!(d.node(hub).is_none());
    for o in &others {
        let node = d.node(*o).unwrap();
        assert!(node.attached_arrows().iter().all(|id| d.arrow(*id).is_some()));
    }
    assert_adjacency_symmetric(&d);
}

#[test]
fn labels_stay_unique() {
    let mut d = diagram();
    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(ellipse(&mut d, i as f64 * 40.0, 0.0));
    }
    d.delete_node(ids[3]).unwrap();
    d.delete_node(ids[7]).unwrap();
    ellipse(&mut d, 0.0, 100.0);
    ellipse(&mut d, 0.0, 200.0);
    ellipse(&mut d, 0.0, 300.0);

    let mut labels: Vec<&str> = d.nodes().map(|n| n.label()).collect();
    let total = labels.len();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), total);
    assert!(labels.contains(&"var_4") && labels.contains(&"var_8") && labels.contains(&"var_11"));
}

#[test]
fn ids_are_never_reused() {
    let mut d = diagram();
    let a = ellipse(&mut d, 0.0, 0.0);
    let b = ellipse(&mut d, 50.0, 0.0);
    let ab = d.connect(a, b, ArrowKind::Directed).unwrap();
    d.delete_node(a).unwrap();
    d.reset();
    let c = ellipse(&mut d, 0.0, 0.0);
    assert!(c.get() > ab.get());
    assert!(d.node(a).is_none());
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[test]
fn move_and_unmove_restores_geometry() {
    let mut d = diagram();
    let a = ellipse(&mut d, 1.0, 3.0);
    let b = ellipse(&mut d, 11.0, 2.0);
    let arrow = d.connect(b, a, ArrowKind::Directed).unwrap();
    let before = *d.arrow(arrow).unwrap().path();

    d.move_node(b, Vec2::new(3.0, 1.0)).unwrap();
    d.move_node(b, Vec2::new(-3.0, -1.0)).unwrap();
    let after = *d.arrow(arrow).unwrap().path();

    assert!(close(before.start(), after.start()));
    assert!(close(before.end(), after.end()));
}

#[test]
fn arrow_ends_sit_on_outlines() {
    let mut d = diagram();
    let a = ellipse(&mut d, 0.0, 0.0);
    let b = ellipse(&mut d, 120.0, 70.0);
    let arrow = d.connect(a, b, ArrowKind::Bidirected).unwrap();
    let path = *d.arrow(arrow).unwrap().path();
    assert_on_ellipse(&d, a, path.start());
    assert_on_ellipse(&d, b, path.end());
    assert_eq!(d.arrow(arrow).unwrap().heads().len(), 2);
}

#[test]
fn zoom_keeps_arrows_clipped() {
    let mut d = diagram();
    let a = ellipse(&mut d, 0.0, 0.0);
    let b = ellipse(&mut d, 150.0, 40.0);
    let arrow = d.connect(a, b, ArrowKind::Directed).unwrap();

    for factor in [1.1, 1.1, 0.9, 0.9, 0.9] {
        d.zoom(Point::new(30.0, 30.0), factor);
        let path = *d.arrow(arrow).unwrap().path();
        assert_on_ellipse(&d, a, path.start());
        assert_on_ellipse(&d, b, path.end());
    }
}

#[test]
fn degenerate_geometry_does_not_panic() {
    let mut d = diagram();
    // two nodes on the same spot
    let a = ellipse(&mut d, 5.0, 5.0);
    let b = ellipse(&mut d, 5.0, 5.0);
    let arrow = d.connect(a, b, ArrowKind::Directed).unwrap();
    let path = *d.arrow(arrow).unwrap().path();
    assert!(path.coords().iter().all(|v| v.is_finite()));
    assert!(d.arrow(arrow).unwrap().heads()[0].iter().all(|p| p.x.is_finite()));
}

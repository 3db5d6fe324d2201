//! Integration tests: end-to-end diagram scenarios through the public API.

use edno_core::*;
use pretty_assertions::assert_eq;

fn diagram() -> Diagram {
    Diagram::new(DiagramConfig::default()).unwrap()
}

/// Connect only when the policy allows it, the way the canvas does.
fn try_connect(
    d: &mut Diagram,
    policy: &dyn ConnectionPolicy,
    predictor: NodeId,
    dependent: NodeId,
    kind: ArrowKind,
) -> Option<ArrowId> {
    let request = ConnectionRequest::new(predictor, dependent, kind);
    if policy.allowed(d, &request) {
        Some(d.connect(predictor, dependent, kind).unwrap())
    } else {
        None
    }
}

#[test]
fn basic_connect() {
    let mut d = diagram();
    let a = d.place_node("ellipse", Point::new(1.0, 3.0)).unwrap();
    let b = d.place_node("ellipse", Point::new(11.0, 2.0)).unwrap();
    let b_label = d.node(b).unwrap().label().to_string();

    let arrow = d.connect(b, a, ArrowKind::Directed).unwrap();

    assert_eq!(d.node_record(a).unwrap().predictors, vec![b_label]);
    assert_eq!(d.node(a).unwrap().incoming(), &[arrow]);
    assert_eq!(d.node(b).unwrap().outgoing(), &[arrow]);
    let rec = d.arrow_record(arrow).unwrap();
    assert_eq!(rec.predictor_label, "var_2");
    assert_eq!(rec.dependent_label, "var_1");
}

#[test]
fn duplicate_arrow_is_rejected_by_default_policy() {
    let mut d = diagram();
    let policy = default_policy();
    let a = d.place_node("ellipse", Point::new(0.0, 0.0)).unwrap();
    let b = d.place_node("ellipse", Point::new(80.0, 0.0)).unwrap();

    assert!(try_connect(&mut d, &policy, a, b, ArrowKind::Directed).is_some());
    assert!(try_connect(&mut d, &policy, a, b, ArrowKind::Directed).is_none());
    assert!(try_connect(&mut d, &policy, b, a, ArrowKind::Bidirected).is_none());
    assert!(try_connect(&mut d, &policy, a, b, ArrowKind::Undirected).is_none());
    assert_eq!(d.arrow_count(), 1);
    assert_eq!(d.node(a).unwrap().outgoing().len(), 1);
}

#[test]
fn self_loops_need_a_bidirected_arrow() {
    let mut d = diagram();
    let policy = default_policy();
    let a = d.place_node("rectangle", Point::new(0.0, 0.0)).unwrap();

    assert!(try_connect(&mut d, &policy, a, a, ArrowKind::Directed).is_none());
    let variance = try_connect(&mut d, &policy, a, a, ArrowKind::Bidirected).unwrap();
    let rec = d.arrow_record(variance).unwrap();
    assert_eq!(rec.position.len(), 6);
    assert_eq!(rec.predictor_label, rec.dependent_label);
}

#[test]
fn estimate_formatting() {
    let mut d = diagram();
    let a = d.place_node("ellipse", Point::new(0.0, 0.0)).unwrap();
    let b = d.place_node("ellipse", Point::new(80.0, 0.0)).unwrap();
    let arrow = d.connect(a, b, ArrowKind::Directed).unwrap();

    d.set_estimate(arrow, Some(0.5), "**").unwrap();
    assert_eq!(d.arrow_record(arrow).unwrap().text, "0.50**");

    d.set_parameter_label(arrow, "param_1").unwrap();
    assert_eq!(d.arrow_record(arrow).unwrap().text, "param_1=0.50**");
}

#[test]
fn snapshot_round_trip() {
    let mut d = diagram();
    let x = d.place_node("rectangle", Point::new(0.0, 0.0)).unwrap();
    let y = d.place_node("ellipse", Point::new(120.0, 30.0)).unwrap();
    let z = d.place_node("ellipse", Point::new(60.0, 140.0)).unwrap();
    let xy = d.connect(x, y, ArrowKind::Directed).unwrap();
    d.connect(y, z, ArrowKind::Undirected).unwrap();
    d.connect(z, z, ArrowKind::Bidirected).unwrap();
    d.set_estimate(xy, Some(0.731), "***").unwrap();
    d.set_parameter_label(xy, "b1").unwrap();
    d.set_payload(xy, Some(serde_json::json!({"se": 0.05}))).unwrap();
    d.set_annotation(y, Some(0.25)).unwrap();
    d.zoom(Point::ZERO, 1.1);

    let json = d.snapshot().unwrap().to_json().unwrap();

    let mut restored = diagram();
    restored.place_node("ellipse", Point::ZERO).unwrap();
    restored
        .load_snapshot(&DiagramSnapshot::from_json(&json).unwrap())
        .unwrap();

    let strip = |mut s: DiagramSnapshot| {
        s.nodes.iter_mut().for_each(|n| n.id = NodeId::from_raw(0));
        s.arrows.iter_mut().for_each(|a| a.id = ArrowId::from_raw(0));
        s
    };
    assert_eq!(
        strip(restored.snapshot().unwrap()),
        strip(d.snapshot().unwrap())
    );
    assert_eq!(restored.node_count(), 3);
    assert_eq!(restored.view().scale, d.view().scale);
}

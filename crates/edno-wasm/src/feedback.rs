//! JSON form of editor feedback.
//!
//! Each entry is an object tagged by `"type"`; ids are plain numbers so the
//! page can pass them straight back into [`EdnoCanvas`](crate::EdnoCanvas).

use edno_core::{Diagram, Highlight, NodeId};
use edno_editor::{Feedback, MenuTarget};
use serde_json::{Value, json};

fn highlight_name(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::Default => "default",
        Highlight::Allowed => "allowed",
        Highlight::NotAllowed => "notAllowed",
    }
}

fn feedback_value(feedback: &Feedback) -> Value {
    match feedback {
        Feedback::NodeAdded(id) => json!({ "type": "nodeAdded", "node": id.get() }),
        Feedback::NodeMoved(id) => json!({ "type": "nodeMoved", "node": id.get() }),
        Feedback::NodeRenamed(id) => json!({ "type": "nodeRenamed", "node": id.get() }),
        Feedback::NodeDeleted { node, arrows } => json!({
            "type": "nodeDeleted",
            "node": node.get(),
            "arrows": arrows.iter().map(|a| a.get()).collect::<Vec<_>>(),
        }),
        Feedback::ArrowCreated(id) => json!({ "type": "arrowCreated", "arrow": id.get() }),
        Feedback::ArrowDeleted(id) => json!({ "type": "arrowDeleted", "arrow": id.get() }),
        Feedback::ParameterRenamed(id) => {
            json!({ "type": "parameterRenamed", "arrow": id.get() })
        }
        Feedback::ConnectionRejected(request) => json!({
            "type": "connectionRejected",
            "predictor": request.predictor.get(),
            "dependent": request.dependent.get(),
            "kind": request.kind.as_str(),
        }),
        Feedback::DuplicateLabel(label) => json!({ "type": "duplicateLabel", "label": label }),
        Feedback::DrawingStarted { source, kind } => json!({
            "type": "drawingStarted",
            "source": source.get(),
            "kind": kind.as_str(),
        }),
        Feedback::RubberBandMoved(line) => json!({
            "type": "rubberBandMoved",
            "from": [line.p0.x, line.p0.y],
            "to": [line.p1.x, line.p1.y],
        }),
        Feedback::HighlightChanged { node, highlight } => json!({
            "type": "highlightChanged",
            "node": node.get(),
            "highlight": highlight_name(*highlight),
        }),
        Feedback::MenuOpened(menu) => {
            let (target, id) = match menu.target {
                MenuTarget::Canvas => ("canvas", None),
                MenuTarget::Node(id) => ("node", Some(id.get())),
                MenuTarget::Arrow(id) => ("arrow", Some(id.get())),
            };
            json!({
                "type": "menuOpened",
                "target": target,
                "id": id,
                "position": [menu.position.x, menu.position.y],
            })
        }
        Feedback::MenuClosed => json!({ "type": "menuClosed" }),
        Feedback::Panned => json!({ "type": "panned" }),
        Feedback::Zoomed { scale } => json!({ "type": "zoomed", "scale": scale }),
        Feedback::Cancelled => json!({ "type": "cancelled" }),
    }
}

/// Serialize a batch of feedback as a JSON array.
pub fn feedback_json(feedback: &[Feedback]) -> String {
    Value::Array(feedback.iter().map(feedback_value).collect()).to_string()
}

fn label_of(diagram: &Diagram, id: NodeId) -> String {
    diagram
        .node(id)
        .map(|n| n.label().to_string())
        .unwrap_or_else(|| id.to_string())
}

/// User-facing message for feedback that reports a refusal.
pub(crate) fn notice(diagram: &Diagram, feedback: &Feedback) -> Option<String> {
    match feedback {
        Feedback::ConnectionRejected(request) => Some(format!(
            "Cannot connect {} to {}.",
            label_of(diagram, request.predictor),
            label_of(diagram, request.dependent),
        )),
        Feedback::DuplicateLabel(label) => {
            Some(format!("The name `{label}` is already used by another variable."))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edno_core::{ArrowId, ArrowKind, ConnectionRequest, DiagramConfig, Point, ShapeKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn feedback_serializes_as_tagged_objects() {
        let json = feedback_json(&[
            Feedback::NodeDeleted {
                node: NodeId::from_raw(3),
                arrows: vec![ArrowId::from_raw(4), ArrowId::from_raw(7)],
            },
            Feedback::Zoomed { scale: 1.5 },
            Feedback::MenuClosed,
        ]);
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed,
            json!([
                { "type": "nodeDeleted", "node": 3, "arrows": [4, 7] },
                { "type": "zoomed", "scale": 1.5 },
                { "type": "menuClosed" },
            ])
        );
    }

    #[test]
    fn empty_batch_is_empty_array() {
        assert_eq!(feedback_json(&[]), "[]");
    }

    #[test]
    fn highlight_and_rejection_payloads() {
        let request =
            ConnectionRequest::new(NodeId::from_raw(1), NodeId::from_raw(2), ArrowKind::Bidirected);
        let parsed: Value = serde_json::from_str(&feedback_json(&[
            Feedback::HighlightChanged {
                node: NodeId::from_raw(2),
                highlight: Highlight::NotAllowed,
            },
            Feedback::ConnectionRejected(request),
        ]))
        .unwrap();
        assert_eq!(parsed[0]["highlight"], "notAllowed");
        assert_eq!(parsed[1]["kind"], "bidirected");
        assert_eq!(parsed[1]["dependent"], 2);
    }

    #[test]
    fn notices_name_nodes_by_label() {
        let mut diagram = Diagram::new(DiagramConfig::default()).unwrap();
        let a = diagram
            .add_node(Point::new(0.0, 0.0), "income", "ellipse", ShapeKind::Ellipse)
            .unwrap();
        let b = diagram
            .add_node(Point::new(50.0, 0.0), "age", "ellipse", ShapeKind::Ellipse)
            .unwrap();

        let rejected = Feedback::ConnectionRejected(ConnectionRequest::new(a, b, ArrowKind::Directed));
        assert_eq!(
            notice(&diagram, &rejected).as_deref(),
            Some("Cannot connect income to age.")
        );
        assert_eq!(
            notice(&diagram, &Feedback::DuplicateLabel("age".into())).as_deref(),
            Some("The name `age` is already used by another variable.")
        );
        assert_eq!(notice(&diagram, &Feedback::Cancelled), None);
    }
}

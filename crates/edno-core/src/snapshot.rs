//! Read-only export records and snapshot import.
//!
//! Records refer to other nodes by label, which is unique, so a snapshot can
//! be loaded into any diagram; ids in records are informational only and a
//! loaded diagram hands out fresh ones.

use crate::arrow::Arrow;
use crate::diagram::Diagram;
use crate::error::{DiagramError, Result};
use crate::id::{ArrowId, NodeId};
use crate::model::ArrowKind;
use crate::shape::ShapeKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    pub position: [f64; 2],
    /// Labels of the nodes with an arrow into this one.
    #[serde(default)]
    pub predictors: Vec<String>,
    /// Labels of the nodes this one has an arrow into.
    #[serde(default)]
    pub dependents: Vec<String>,
    #[serde(default)]
    pub annotation_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowRecord {
    pub id: ArrowId,
    pub arrow_kind: ArrowKind,
    /// Estimate text as displayed.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub parameter_label: String,
    #[serde(default)]
    pub estimate_value: Option<f64>,
    #[serde(default)]
    pub significance: String,
    /// `[x1, y1, x2, y2]`, or `[x1, y1, cx, cy, x2, y2]` for self-loops.
    #[serde(default)]
    pub position: Vec<f64>,
    pub predictor_label: String,
    pub dependent_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramSnapshot {
    /// Zoom level the positions were recorded at.
    #[serde(default = "unit_scale")]
    pub scale: f64,
    pub nodes: Vec<NodeRecord>,
    pub arrows: Vec<ArrowRecord>,
}

fn unit_scale() -> f64 {
    1.0
}

impl DiagramSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DiagramError::InvalidSnapshot(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DiagramError::InvalidSnapshot(e.to_string()))
    }

    /// Check that labels are unique, node shapes are drawable and every
    /// arrow names existing nodes.
    pub fn validate(&self) -> Result<()> {
        let mut labels = BTreeSet::new();
        for node in &self.nodes {
            if node.label.is_empty() {
                return Err(DiagramError::InvalidSnapshot(format!(
                    "{} has an empty label",
                    node.id
                )));
            }
            if !labels.insert(node.label.as_str()) {
                return Err(DiagramError::DuplicateLabel(node.label.clone()));
            }
            if let Some(problem) = node.shape.and_then(ShapeKind::problem) {
                return Err(DiagramError::InvalidSnapshot(format!(
                    "{}: {problem}",
                    node.id
                )));
            }
        }
        for arrow in &self.arrows {
            for end in [&arrow.predictor_label, &arrow.dependent_label] {
                if !labels.contains(end.as_str()) {
                    return Err(DiagramError::InvalidSnapshot(format!(
                        "{} refers to unknown node `{end}`",
                        arrow.id
                    )));
                }
            }
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(DiagramError::InvalidSnapshot(format!(
                "scale {} is not positive",
                self.scale
            )));
        }
        Ok(())
    }
}

impl Diagram {
    pub fn node_record(&self, id: NodeId) -> Result<NodeRecord> {
        let node = self.node(id).ok_or(DiagramError::UnknownNode(id))?;
        let label_of = |arrow: &ArrowId, pick: fn(&Arrow) -> NodeId| {
            self.arrow(*arrow)
                .and_then(|a| self.node(pick(a)))
                .map(|n| n.label().to_string())
        };
        let p = node.position();
        Ok(NodeRecord {
            id,
            label: node.label().to_string(),
            type_tag: node.type_tag().to_string(),
            shape: Some(node.shape().kind),
            position: [p.x, p.y],
            predictors: node
                .incoming()
                .iter()
                .filter_map(|a| label_of(a, Arrow::predictor))
                .collect(),
            dependents: node
                .outgoing()
                .iter()
                .filter_map(|a| label_of(a, Arrow::dependent))
                .collect(),
            annotation_value: node.annotation_value(),
            additional_information: node.additional_information().cloned(),
        })
    }

    pub fn arrow_record(&self, id: ArrowId) -> Result<ArrowRecord> {
        let arrow = self.arrow(id).ok_or(DiagramError::UnknownArrow(id))?;
        let label = |n: NodeId| {
            self.node(n)
                .map(|n| n.label().to_string())
                .ok_or(DiagramError::UnknownNode(n))
        };
        let estimate = arrow.estimate();
        Ok(ArrowRecord {
            id,
            arrow_kind: arrow.kind(),
            text: estimate.text(),
            parameter_label: estimate.parameter_label.clone(),
            estimate_value: estimate.value,
            significance: estimate.significance.clone(),
            position: arrow.path().coords(),
            predictor_label: label(arrow.predictor())?,
            dependent_label: label(arrow.dependent())?,
            payload: arrow.payload().cloned(),
        })
    }

    /// Records for every node and arrow, in id order.
    pub fn snapshot(&self) -> Result<DiagramSnapshot> {
        Ok(DiagramSnapshot {
            scale: self.view().scale,
            nodes: self
                .nodes()
                .map(|n| self.node_record(n.id()))
                .collect::<Result<_>>()?,
            arrows: self
                .arrows()
                .map(|a| self.arrow_record(a.id()))
                .collect::<Result<_>>()?,
        })
    }

    /// Replace the diagram's contents with a snapshot.
    ///
    /// The snapshot is validated first; on error the diagram is untouched.
    /// Arrow geometry is recomputed from the restored nodes rather than
    /// taken from the recorded positions.
    pub fn load_snapshot(&mut self, snapshot: &DiagramSnapshot) -> Result<()> {
        snapshot.validate()?;
        let kinds = snapshot
            .nodes
            .iter()
            .map(|n| match n.shape {
                Some(kind) => Ok(kind),
                None => self.registry().shape_for(&n.type_tag),
            })
            .collect::<Result<Vec<_>>>()?;

        self.reset();
        if snapshot.scale != 1.0 {
            self.zoom(Point::ZERO, snapshot.scale);
        }
        for (record, kind) in snapshot.nodes.iter().zip(kinds) {
            let [x, y] = record.position;
            let id = self.add_node(Point::new(x, y), &record.label, &record.type_tag, kind)?;
            self.set_annotation(id, record.annotation_value)?;
            self.set_additional_information(id, record.additional_information.clone())?;
        }
        for record in &snapshot.arrows {
            let find = |label: &str| {
                self.node_by_label(label)
                    .ok_or_else(|| DiagramError::InvalidSnapshot(format!("no node `{label}`")))
            };
            let predictor = find(&record.predictor_label)?;
            let dependent = find(&record.dependent_label)?;
            let id = self.connect(predictor, dependent, record.arrow_kind)?;
            self.set_parameter_label(id, &record.parameter_label)?;
            self.set_estimate(id, record.estimate_value, &record.significance)?;
            self.set_payload(id, record.payload.clone())?;
        }
        log::debug!(
            "loaded snapshot: {} node(s), {} arrow(s)",
            snapshot.nodes.len(),
            snapshot.arrows.len()
        );
        Ok(())
    }
}

use crate::id::{ArrowId, NodeId};
use crate::label::LabelBox;
use crate::model::Highlight;
use crate::shape::Shape;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Arrow ids attached to one side of a node. Most nodes have only a few.
pub type ArrowList = SmallVec<[ArrowId; 4]>;

/// A vertex of the diagram.
///
/// Nodes only know the ids of the arrows they take part in; the arrows
/// themselves live in the [`Diagram`](crate::Diagram) arena. Both lists are
/// maintained by the diagram and never edited from outside the crate.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) type_tag: String,
    pub(crate) label: LabelBox,
    pub(crate) annotation: LabelBox,
    pub(crate) annotation_value: Option<f64>,
    pub(crate) highlight: Highlight,
    pub(crate) additional_information: Option<serde_json::Value>,
    pub(crate) outgoing: ArrowList,
    pub(crate) incoming: ArrowList,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label.text
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Center of the label text, in logical coordinates.
    pub fn position(&self) -> Point {
        self.label.anchor
    }

    pub fn shape(&self) -> &Shape {
        &self.label.shape
    }

    pub fn label_box(&self) -> &LabelBox {
        &self.label
    }

    /// Fit-statistic box below the node; hidden until a value is set.
    pub fn annotation(&self) -> &LabelBox {
        &self.annotation
    }

    pub fn annotation_value(&self) -> Option<f64> {
        self.annotation_value
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn additional_information(&self) -> Option<&serde_json::Value> {
        self.additional_information.as_ref()
    }

    /// Arrows leaving this node, in creation order.
    pub fn outgoing(&self) -> &[ArrowId] {
        &self.outgoing
    }

    /// Arrows entering this node, in creation order.
    pub fn incoming(&self) -> &[ArrowId] {
        &self.incoming
    }

    /// Every attached arrow once; self-loops sit in both lists.
    pub fn attached_arrows(&self) -> Vec<ArrowId> {
        let mut ids: Vec<ArrowId> = self.outgoing.iter().copied().collect();
        for id in &self.incoming {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.label.translate(delta);
        self.annotation.translate(delta);
    }

    /// Where the annotation text sits: centered, `offset` below the label text.
    pub(crate) fn annotation_anchor(&self, offset: f64) -> Point {
        let text = self.label.text_bounds();
        Point::new(text.center().x, text.y1 + offset)
    }
}

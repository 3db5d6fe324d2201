//! The diagram aggregate: every live node and arrow, keyed by id.
//!
//! All mutations go through [`Diagram`] so that the adjacency lists on
//! nodes and the endpoints stored on arrows never disagree, and so that
//! every arrow's geometry is recomputed as soon as one of its nodes moves.

use crate::arrow::{Arrow, ArrowHeads, ArrowPath, Estimate, arrow_geometry};
use crate::config::DiagramConfig;
use crate::error::{DiagramError, Result};
use crate::id::{ArrowId, IdAllocator, NodeId};
use crate::label::LabelBox;
use crate::model::{ArrowKind, FontSpec, Highlight};
use crate::node::{ArrowList, Node};
use crate::registry::NodeTypeRegistry;
use crate::shape::ShapeKind;
use crate::text::{ApproxTextMeasure, TextMeasure};
use crate::view::ViewTransform;
use kurbo::{Line, Point, Vec2};
use std::collections::BTreeMap;
use std::fmt;

pub struct Diagram {
    config: DiagramConfig,
    registry: NodeTypeRegistry,
    measure: Box<dyn TextMeasure>,
    ids: IdAllocator,
    nodes: BTreeMap<NodeId, Node>,
    arrows: BTreeMap<ArrowId, Arrow>,
    view: ViewTransform,
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("nodes", &self.nodes.len())
            .field("arrows", &self.arrows.len())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Diagram {
    /// Empty diagram measuring text with [`ApproxTextMeasure`] and knowing
    /// the two menu forms of `config.form_names`.
    pub fn new(config: DiagramConfig) -> Result<Self> {
        let registry = NodeTypeRegistry::from_forms(&config.form_names)?;
        Ok(Self {
            config,
            registry,
            measure: Box::new(ApproxTextMeasure),
            ids: IdAllocator::new(),
            nodes: BTreeMap::new(),
            arrows: BTreeMap::new(),
            view: ViewTransform::default(),
        })
    }

    /// Use the host's text metrics. Existing labels are re-fit.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self.refit_all();
        self
    }

    /// Swap in another registry. It must resolve both menu forms of the
    /// configuration.
    pub fn with_registry(mut self, registry: NodeTypeRegistry) -> Result<Self> {
        registry.shape_for(&self.config.form_names.rectangle)?;
        registry.shape_for(&self.config.form_names.ellipse)?;
        self.registry = registry;
        Ok(self)
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn arrow(&self, id: ArrowId) -> Option<&Arrow> {
        self.arrows.get(&id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Arrows in creation order.
    pub fn arrows(&self) -> impl DoubleEndedIterator<Item = &Arrow> {
        self.arrows.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arrow_count(&self) -> usize {
        self.arrows.len()
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes.values().find(|n| n.label() == label).map(Node::id)
    }

    /// Font at the current zoom level, never smaller than the configured
    /// minimum.
    pub fn font(&self) -> FontSpec {
        let size = (self.config.font.size * self.view.scale)
            .floor()
            .max(self.config.min_font_size);
        self.config.font.with_size(size)
    }

    /// Lowest unused `prefix<n>` label, counting from 1.
    pub fn generate_label(&self) -> String {
        (1..)
            .map(|n| format!("{}{n}", self.config.label_prefix))
            .find(|l| self.node_by_label(l).is_none())
            .unwrap_or_default()
    }

    fn node_ref(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(DiagramError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(DiagramError::UnknownNode(id))
    }

    fn arrow_mut(&mut self, id: ArrowId) -> Result<&mut Arrow> {
        self.arrows.get_mut(&id).ok_or(DiagramError::UnknownArrow(id))
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Add a node centered on `position`. An empty `label` is replaced by a
    /// generated one; an explicit label already in use is rejected.
    pub fn add_node(
        &mut self,
        position: Point,
        label: &str,
        type_tag: &str,
        kind: ShapeKind,
    ) -> Result<NodeId> {
        let label = if label.is_empty() {
            self.generate_label()
        } else if self.node_by_label(label).is_some() {
            return Err(DiagramError::DuplicateLabel(label.to_string()));
        } else {
            label.to_string()
        };

        let font = self.font();
        let measure = self.measure.as_ref();
        let label_box = LabelBox::new(
            label,
            position,
            font.clone(),
            kind,
            self.config.node_padding,
            measure,
        );
        let mut annotation = LabelBox::new(
            "",
            position,
            font,
            ShapeKind::Rectangle,
            self.config.node_padding,
            measure,
        );
        annotation.hide();

        let id = self.ids.node();
        let mut node = Node {
            id,
            type_tag: type_tag.to_string(),
            label: label_box,
            annotation,
            annotation_value: None,
            highlight: Highlight::Default,
            additional_information: None,
            outgoing: ArrowList::new(),
            incoming: ArrowList::new(),
        };
        let anchor = node.annotation_anchor(self.config.annotation_offset);
        node.annotation.move_to(anchor);
        log::debug!("added {id} `{}` ({type_tag})", node.label());
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Add a node of a registered type with a generated label.
    pub fn place_node(&mut self, type_tag: &str, position: Point) -> Result<NodeId> {
        let kind = self.registry.shape_for(type_tag)?;
        self.add_node(position, "", type_tag, kind)
    }

    /// Rename a node. A label held by another node is rejected and nothing
    /// changes; an empty label or the node's own label is a no-op.
    pub fn rename_node(&mut self, id: NodeId, label: &str) -> Result<()> {
        let current = self.node_ref(id)?.label();
        if label.is_empty() || current == label {
            return Ok(());
        }
        if self.node_by_label(label).is_some() {
            return Err(DiagramError::DuplicateLabel(label.to_string()));
        }

        let offset = self.config.annotation_offset;
        let measure = self.measure.as_ref();
        let node = self.nodes.get_mut(&id).ok_or(DiagramError::UnknownNode(id))?;
        log::debug!("renamed {id} `{}` -> `{label}`", node.label());
        node.label.set_text(label, measure);
        let anchor = node.annotation_anchor(offset);
        node.annotation.move_to(anchor);
        self.recompute_attached(id);
        Ok(())
    }

    /// Translate a node with its label and annotation, then re-clip every
    /// attached arrow.
    pub fn move_node(&mut self, id: NodeId, delta: Vec2) -> Result<()> {
        self.node_mut(id)?.translate(delta);
        self.recompute_attached(id);
        Ok(())
    }

    /// Delete a node and every arrow attached to it. Returns the removed
    /// arrow ids, each once.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<ArrowId>> {
        let attached = self.node_ref(id)?.attached_arrows();
        for arrow in &attached {
            self.delete_arrow(*arrow)?;
        }
        self.nodes.remove(&id);
        log::debug!("deleted {id} with {} arrow(s)", attached.len());
        Ok(attached)
    }

    /// Where the segment from `ray_origin` to the node's center crosses its
    /// outline.
    pub fn boundary_intersection(&self, id: NodeId, ray_origin: Point) -> Result<Point> {
        Ok(self.node_ref(id)?.shape().boundary_intersection(ray_origin))
    }

    /// Show `"R² = 0.42"` below the node, or hide the annotation.
    pub fn set_annotation(&mut self, id: NodeId, value: Option<f64>) -> Result<()> {
        let offset = self.config.annotation_offset;
        let text = value.map(|v| format!("{} = {v:.2}", self.config.annotation_prefix));
        let measure = self.measure.as_ref();
        let node = self.nodes.get_mut(&id).ok_or(DiagramError::UnknownNode(id))?;
        node.annotation_value = value;
        match text {
            Some(text) => node.annotation.set_text(text, measure),
            None => {
                node.annotation.set_text("", measure);
                node.annotation.hide();
            }
        }
        let anchor = node.annotation_anchor(offset);
        node.annotation.move_to(anchor);
        Ok(())
    }

    pub fn set_additional_information(
        &mut self,
        id: NodeId,
        info: Option<serde_json::Value>,
    ) -> Result<()> {
        self.node_mut(id)?.additional_information = info;
        Ok(())
    }

    pub fn set_highlight(&mut self, id: NodeId, highlight: Highlight) -> Result<()> {
        self.node_mut(id)?.highlight = highlight;
        Ok(())
    }

    pub fn clear_highlights(&mut self) {
        for node in self.nodes.values_mut() {
            node.highlight = Highlight::Default;
        }
    }

    // ─── Arrows ──────────────────────────────────────────────────────────

    /// Create an arrow without consulting any connection policy.
    pub fn connect(
        &mut self,
        predictor: NodeId,
        dependent: NodeId,
        kind: ArrowKind,
    ) -> Result<ArrowId> {
        self.node_ref(predictor)?;
        self.node_ref(dependent)?;

        let id = self.ids.arrow();
        let (path, heads) = self.geometry_between(predictor, dependent, kind)?;
        let mut estimate_label = LabelBox::new(
            "",
            path.label_anchor(),
            self.font(),
            ShapeKind::Rectangle,
            self.config.estimate_padding,
            self.measure.as_ref(),
        );
        estimate_label.hide();

        self.arrows.insert(
            id,
            Arrow {
                id,
                predictor,
                dependent,
                kind,
                color: self.config.arrow_color,
                width: self.config.arrow_width,
                estimate: Estimate::default(),
                estimate_label,
                payload: None,
                path,
                heads,
            },
        );
        self.node_mut(predictor)?.outgoing.push(id);
        self.node_mut(dependent)?.incoming.push(id);
        log::debug!("connected {predictor} -> {dependent} as {id} ({})", kind.as_str());
        Ok(id)
    }

    /// Re-clip an arrow to its nodes' current outlines and re-center its
    /// estimate.
    pub fn recompute_arrow(&mut self, id: ArrowId) -> Result<()> {
        let arrow = self.arrows.get(&id).ok_or(DiagramError::UnknownArrow(id))?;
        let (path, heads) = self.geometry_between(arrow.predictor, arrow.dependent, arrow.kind)?;
        let font = self.font();
        let measure = self.measure.as_ref();
        let arrow = self.arrows.get_mut(&id).ok_or(DiagramError::UnknownArrow(id))?;
        arrow.path = path;
        arrow.heads = heads;
        arrow.estimate_label.move_to(path.label_anchor());
        if arrow.estimate_label.font != font {
            arrow.estimate_label.set_font(font, measure);
        }
        log::trace!("recomputed {id}: {:?}", path.coords());
        Ok(())
    }

    fn geometry_between(
        &self,
        predictor: NodeId,
        dependent: NodeId,
        kind: ArrowKind,
    ) -> Result<(ArrowPath, ArrowHeads)> {
        let p = self.node_ref(predictor)?.shape();
        let d = self.node_ref(dependent)?.shape();
        Ok(arrow_geometry(
            p,
            d,
            predictor == dependent,
            kind,
            self.config.self_loop_shift,
        ))
    }

    fn recompute_attached(&mut self, id: NodeId) {
        let attached = match self.nodes.get(&id) {
            Some(node) => node.attached_arrows(),
            None => return,
        };
        for arrow in attached {
            if let Err(e) = self.recompute_arrow(arrow) {
                log::warn!("{id} lists a stale arrow: {e}");
            }
        }
    }

    /// Set or clear the numeric estimate. Clearing also drops the
    /// significance marker.
    pub fn set_estimate(&mut self, id: ArrowId, value: Option<f64>, significance: &str) -> Result<()> {
        let arrow = self.arrow_mut(id)?;
        arrow.estimate.value = value;
        arrow.estimate.significance = match value {
            Some(_) => significance.to_string(),
            None => String::new(),
        };
        self.refresh_estimate(id)
    }

    pub fn set_parameter_label(&mut self, id: ArrowId, label: &str) -> Result<()> {
        self.arrow_mut(id)?.estimate.parameter_label = label.to_string();
        self.refresh_estimate(id)
    }

    pub fn set_payload(&mut self, id: ArrowId, payload: Option<serde_json::Value>) -> Result<()> {
        self.arrow_mut(id)?.payload = payload;
        Ok(())
    }

    fn refresh_estimate(&mut self, id: ArrowId) -> Result<()> {
        let measure = self.measure.as_ref();
        let arrow = self.arrows.get_mut(&id).ok_or(DiagramError::UnknownArrow(id))?;
        let text = arrow.estimate.text();
        let visible = !text.is_empty();
        arrow.estimate_label.set_text(text, measure);
        if !visible {
            arrow.estimate_label.hide();
        }
        Ok(())
    }

    /// Remove an arrow from the arena and from both endpoints' lists.
    pub fn delete_arrow(&mut self, id: ArrowId) -> Result<()> {
        let arrow = self.arrows.remove(&id).ok_or(DiagramError::UnknownArrow(id))?;
        if let Some(p) = self.nodes.get_mut(&arrow.predictor) {
            p.outgoing.retain(|a| *a != id);
        }
        if let Some(d) = self.nodes.get_mut(&arrow.dependent) {
            d.incoming.retain(|a| *a != id);
        }
        log::debug!("deleted {id}");
        Ok(())
    }

    // ─── Whole diagram ───────────────────────────────────────────────────

    /// Drop every node and arrow and return to zoom level 1. Ids keep
    /// counting.
    pub fn reset(&mut self) {
        log::debug!(
            "reset: dropping {} node(s), {} arrow(s)",
            self.nodes.len(),
            self.arrows.len()
        );
        self.nodes.clear();
        self.arrows.clear();
        self.view = ViewTransform::default();
    }

    /// Move the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.view.pan(delta);
    }

    /// Zoom by `factor` about a logical point.
    ///
    /// Every node position is scaled about `pivot`, labels take the font of
    /// the new zoom level and re-fit their shapes, and every arrow is
    /// re-clipped to the new outlines.
    pub fn zoom(&mut self, pivot: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring zoom factor {factor}");
            return;
        }
        self.view.scale *= factor;
        let font = self.font();
        let offset = self.config.annotation_offset;
        let measure = self.measure.as_ref();
        for node in self.nodes.values_mut() {
            let target = pivot + (node.position() - pivot) * factor;
            node.label.move_to(target);
            node.label.set_font(font.clone(), measure);
            node.annotation.set_font(font.clone(), measure);
            let anchor = node.annotation_anchor(offset);
            node.annotation.move_to(anchor);
        }
        log::debug!("zoom x{factor} about {pivot:?}, scale {:.3}", self.view.scale);
        self.recompute_all();
    }

    fn refit_all(&mut self) {
        let offset = self.config.annotation_offset;
        let measure = self.measure.as_ref();
        for node in self.nodes.values_mut() {
            node.label.refit(measure);
            node.annotation.refit(measure);
            let anchor = node.annotation_anchor(offset);
            node.annotation.move_to(anchor);
        }
        for arrow in self.arrows.values_mut() {
            arrow.estimate_label.refit(measure);
        }
        self.recompute_all();
    }

    fn recompute_all(&mut self) {
        let ids: Vec<ArrowId> = self.arrows.keys().copied().collect();
        for id in ids {
            if let Err(e) = self.recompute_arrow(id) {
                log::warn!("failed to recompute {id}: {e}");
            }
        }
    }

    /// Straight segment between two node centers, used for rubber bands and
    /// previews.
    pub fn center_line(&self, from: NodeId, to: Point) -> Result<Line> {
        Ok(Line::new(self.node_ref(from)?.position(), to))
    }
}

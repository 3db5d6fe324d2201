//! Pointer-driven interaction state machine.
//!
//! ## States
//!
//! | State | Entered by | Left by |
//! |-------|------------|---------|
//! | `Idle` | start, any cancel | primary down on a node or on empty canvas |
//! | `DraggingNode` | primary down on a node | pointer up |
//! | `DrawingArrow` | [`Canvas::start_connection`] | pointer up on a node, cancel |
//! | `Panning` | primary down on empty canvas | pointer up |
//!
//! Escape, a secondary click and a primary click on empty canvas while
//! drawing all cancel back to `Idle`. The connection policy is asked on every
//! hover and again on commit.

use crate::input::{InputEvent, PointerButton};
use crate::menu::{ContextMenu, MenuAction, MenuTarget};
use crate::prompt::{Prompt, answer};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::snap::snap_delta;
use edno_core::{
    ArrowId, ArrowKind, ConnectionPolicy, ConnectionRequest, Diagram, DiagramError, Highlight,
    Hit, NodeId, Point, Result, default_policy,
};
use kurbo::Line;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasState {
    Idle,
    DraggingNode {
        node: NodeId,
        /// Logical pointer position at the previous event.
        last_pointer: Point,
    },
    DrawingArrow {
        source: NodeId,
        kind: ArrowKind,
        /// From the source center to the pointer, in logical space.
        rubber_band: Line,
        /// Node currently highlighted as a possible target.
        hovered: Option<NodeId>,
    },
    Panning {
        last_screen: Point,
    },
}

/// What an event changed, for the host to redraw or report.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    NodeAdded(NodeId),
    NodeMoved(NodeId),
    NodeRenamed(NodeId),
    NodeDeleted { node: NodeId, arrows: Vec<ArrowId> },
    ArrowCreated(ArrowId),
    ArrowDeleted(ArrowId),
    ParameterRenamed(ArrowId),
    /// The policy refused the connection; the rubber band was discarded.
    ConnectionRejected(ConnectionRequest),
    /// A rename picked a label another node already has; nothing changed.
    DuplicateLabel(String),
    DrawingStarted { source: NodeId, kind: ArrowKind },
    RubberBandMoved(Line),
    HighlightChanged { node: NodeId, highlight: Highlight },
    MenuOpened(ContextMenu),
    MenuClosed,
    Panned,
    Zoomed { scale: f64 },
    Cancelled,
}

/// An editable diagram with its interaction state.
pub struct Canvas {
    diagram: Diagram,
    policy: Box<dyn ConnectionPolicy>,
    state: CanvasState,
    active_menu: Option<ContextMenu>,
    /// Node under the pointer at the last move, target of the Delete key.
    pointer_node: Option<NodeId>,
}

impl Canvas {
    /// Canvas using [`default_policy`].
    pub fn new(diagram: Diagram) -> Self {
        Self::with_policy(diagram, default_policy())
    }

    pub fn with_policy(diagram: Diagram, policy: impl ConnectionPolicy + 'static) -> Self {
        Self {
            diagram,
            policy: Box::new(policy),
            state: CanvasState::Idle,
            active_menu: None,
            pointer_node: None,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn active_menu(&self) -> Option<&ContextMenu> {
        self.active_menu.as_ref()
    }

    pub fn rubber_band(&self) -> Option<Line> {
        match self.state {
            CanvasState::DrawingArrow { rubber_band, .. } => Some(rubber_band),
            _ => None,
        }
    }

    /// Whether the policy would accept this connection right now.
    pub fn evaluate(&self, request: &ConnectionRequest) -> bool {
        self.policy.allowed(&self.diagram, request)
    }

    /// Create an arrow if the policy allows it.
    pub fn try_connect(
        &mut self,
        predictor: NodeId,
        dependent: NodeId,
        kind: ArrowKind,
    ) -> Result<ArrowId> {
        let request = ConnectionRequest::new(predictor, dependent, kind);
        if !self.evaluate(&request) {
            log::debug!("policy rejected {predictor} -> {dependent}");
            return Err(DiagramError::PolicyRejected {
                predictor,
                dependent,
            });
        }
        self.diagram.connect(predictor, dependent, kind)
    }

    /// Enter arrow drawing mode from `source`. Closes any open menu.
    pub fn start_connection(&mut self, source: NodeId, kind: ArrowKind) -> Result<Vec<Feedback>> {
        let center = self
            .diagram
            .node(source)
            .ok_or(DiagramError::UnknownNode(source))?
            .position();
        let mut feedback = self.close_menu();
        self.reset_state();
        self.state = CanvasState::DrawingArrow {
            source,
            kind,
            rubber_band: Line::new(center, center),
            hovered: None,
        };
        log::debug!("drawing {} arrow from {source}", kind.as_str());
        feedback.push(Feedback::DrawingStarted { source, kind });
        Ok(feedback)
    }

    /// Abort any drag, drawing or pan and close the open menu.
    pub fn cancel(&mut self) -> Vec<Feedback> {
        let mut feedback = self.close_menu();
        if self.state != CanvasState::Idle {
            self.reset_state();
            feedback.push(Feedback::Cancelled);
        }
        feedback
    }

    fn reset_state(&mut self) {
        if let CanvasState::DrawingArrow { .. } = self.state {
            self.diagram.clear_highlights();
        }
        self.state = CanvasState::Idle;
    }

    fn close_menu(&mut self) -> Vec<Feedback> {
        match self.active_menu.take() {
            Some(_) => vec![Feedback::MenuClosed],
            None => Vec::new(),
        }
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn handle(&mut self, event: &InputEvent) -> Vec<Feedback> {
        match event {
            InputEvent::PointerDown {
                position, button, ..
            } => match button {
                PointerButton::Primary => self.primary_down(*position),
                PointerButton::Secondary => self.secondary_down(*position),
                PointerButton::Middle => Vec::new(),
            },
            InputEvent::PointerMove { position, .. } => self.pointer_move(*position),
            InputEvent::PointerUp { position, button } => self.pointer_up(*position, *button),
            InputEvent::Wheel { position, delta_y } => self.wheel(*position, *delta_y),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.shortcut(action),
                None => Vec::new(),
            },
        }
    }

    fn primary_down(&mut self, screen: Point) -> Vec<Feedback> {
        let logical = self.diagram.view().to_logical(screen);
        let mut feedback = self.close_menu();
        let hit = self.diagram.hit_test(logical);

        match self.state {
            CanvasState::DrawingArrow { .. } => {
                // the target is chosen on release
                if !matches!(hit, Some(Hit::Node(_))) {
                    self.reset_state();
                    log::debug!("drawing cancelled by click on empty canvas");
                    feedback.push(Feedback::Cancelled);
                }
            }
            _ => {
                self.state = match hit {
                    Some(Hit::Node(node)) => CanvasState::DraggingNode {
                        node,
                        last_pointer: logical,
                    },
                    Some(Hit::Arrow(_)) => CanvasState::Idle,
                    None => CanvasState::Panning {
                        last_screen: screen,
                    },
                };
                log::trace!("pointer down -> {:?}", self.state);
            }
        }
        feedback
    }

    fn secondary_down(&mut self, screen: Point) -> Vec<Feedback> {
        if self.state != CanvasState::Idle {
            return self.cancel();
        }
        if self.active_menu.is_some() {
            return self.close_menu();
        }
        let logical = self.diagram.view().to_logical(screen);
        let target = match self.diagram.hit_test(logical) {
            Some(Hit::Node(id)) => MenuTarget::Node(id),
            Some(Hit::Arrow(id)) => MenuTarget::Arrow(id),
            None => MenuTarget::Canvas,
        };
        let menu = ContextMenu {
            target,
            position: logical,
        };
        self.active_menu = Some(menu);
        log::debug!("opened menu on {target:?}");
        vec![Feedback::MenuOpened(menu)]
    }

    fn pointer_move(&mut self, screen: Point) -> Vec<Feedback> {
        let logical = self.diagram.view().to_logical(screen);
        self.pointer_node = self.diagram.node_at(logical);

        match self.state {
            CanvasState::DraggingNode { node, last_pointer } => {
                let snap = self.diagram.config().snap_distance;
                let delta = snap_delta(&self.diagram, node, logical - last_pointer, snap);
                self.state = CanvasState::DraggingNode {
                    node,
                    last_pointer: logical,
                };
                match self.diagram.move_node(node, delta) {
                    Ok(()) => vec![Feedback::NodeMoved(node)],
                    Err(e) => {
                        log::warn!("drag aborted: {e}");
                        self.state = CanvasState::Idle;
                        Vec::new()
                    }
                }
            }
            CanvasState::DrawingArrow {
                source,
                kind,
                rubber_band,
                hovered,
            } => {
                let rubber_band = Line::new(rubber_band.p0, logical);
                let target = self.pointer_node;
                let mut feedback = vec![Feedback::RubberBandMoved(rubber_band)];
                if target != hovered {
                    if let Some(prev) = hovered
                        && self.diagram.set_highlight(prev, Highlight::Default).is_ok()
                    {
                        feedback.push(Feedback::HighlightChanged {
                            node: prev,
                            highlight: Highlight::Default,
                        });
                    }
                    if let Some(next) = target {
                        let request = ConnectionRequest::new(source, next, kind);
                        let highlight = if self.evaluate(&request) {
                            Highlight::Allowed
                        } else {
                            Highlight::NotAllowed
                        };
                        if self.diagram.set_highlight(next, highlight).is_ok() {
                            feedback.push(Feedback::HighlightChanged {
                                node: next,
                                highlight,
                            });
                        }
                    }
                }
                self.state = CanvasState::DrawingArrow {
                    source,
                    kind,
                    rubber_band,
                    hovered: target,
                };
                feedback
            }
            CanvasState::Panning { last_screen } => {
                self.diagram.pan(screen - last_screen);
                self.state = CanvasState::Panning {
                    last_screen: screen,
                };
                vec![Feedback::Panned]
            }
            CanvasState::Idle => Vec::new(),
        }
    }

    fn pointer_up(&mut self, screen: Point, button: PointerButton) -> Vec<Feedback> {
        match self.state {
            CanvasState::DraggingNode { .. } | CanvasState::Panning { .. } => {
                self.state = CanvasState::Idle;
                Vec::new()
            }
            CanvasState::DrawingArrow { source, kind, .. } if button == PointerButton::Primary => {
                let logical = self.diagram.view().to_logical(screen);
                let Some(target) = self.diagram.node_at(logical) else {
                    return Vec::new();
                };
                self.reset_state();
                match self.try_connect(source, target, kind) {
                    Ok(id) => vec![Feedback::ArrowCreated(id)],
                    Err(DiagramError::PolicyRejected { .. }) => {
                        vec![Feedback::ConnectionRejected(ConnectionRequest::new(
                            source, target, kind,
                        ))]
                    }
                    Err(e) => {
                        log::warn!("connection failed: {e}");
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn wheel(&mut self, screen: Point, delta_y: f64) -> Vec<Feedback> {
        let mut feedback = self.close_menu();
        if delta_y == 0.0 {
            return feedback;
        }
        let factor = if delta_y < 0.0 {
            self.diagram.config().zoom_in_factor
        } else {
            self.diagram.config().zoom_out_factor
        };
        let pivot = self.diagram.view().to_logical(screen);
        feedback.push(self.zoom(pivot, factor));
        feedback
    }

    fn zoom(&mut self, pivot: Point, factor: f64) -> Feedback {
        self.diagram.zoom(pivot, factor);
        // keep the rubber band anchored on the moved source
        if let CanvasState::DrawingArrow {
            source,
            ref mut rubber_band,
            ..
        } = self.state
            && let Some(node) = self.diagram.node(source)
        {
            rubber_band.p0 = node.position();
        }
        Feedback::Zoomed {
            scale: self.diagram.view().scale,
        }
    }

    fn shortcut(&mut self, action: ShortcutAction) -> Vec<Feedback> {
        match action {
            ShortcutAction::Cancel => self.cancel(),
            ShortcutAction::DeleteHovered => match (self.state, self.pointer_node) {
                (CanvasState::Idle, Some(node)) => self.delete_node(node),
                _ => Vec::new(),
            },
            ShortcutAction::ZoomIn | ShortcutAction::ZoomOut => {
                let config = self.diagram.config();
                let factor = if action == ShortcutAction::ZoomIn {
                    config.zoom_in_factor
                } else {
                    config.zoom_out_factor
                };
                let pivot = self.diagram.view().to_logical(Point::ZERO);
                vec![self.zoom(pivot, factor)]
            }
        }
    }

    fn delete_node(&mut self, node: NodeId) -> Vec<Feedback> {
        match self.diagram.delete_node(node) {
            Ok(arrows) => {
                if self.pointer_node == Some(node) {
                    self.pointer_node = None;
                }
                vec![Feedback::NodeDeleted { node, arrows }]
            }
            Err(e) => {
                log::warn!("delete failed: {e}");
                Vec::new()
            }
        }
    }

    // ─── Menu actions ────────────────────────────────────────────────────

    /// Run an entry of the open menu and close it.
    ///
    /// Rename actions ask `prompt` for the new text; a cancelled prompt
    /// changes nothing. Actions that do not fit the menu's target are
    /// ignored.
    pub fn apply_menu_action(
        &mut self,
        action: &MenuAction,
        prompt: &mut dyn Prompt,
    ) -> Result<Vec<Feedback>> {
        let Some(menu) = self.active_menu.take() else {
            return Ok(Vec::new());
        };
        let mut feedback = vec![Feedback::MenuClosed];

        match (action, menu.target) {
            (MenuAction::AddNode { type_tag }, MenuTarget::Canvas) => {
                let id = self.diagram.place_node(type_tag, menu.position)?;
                feedback.push(Feedback::NodeAdded(id));
            }
            (MenuAction::StartPath(kind), MenuTarget::Node(node)) => {
                feedback.extend(self.start_connection(node, *kind)?);
            }
            (MenuAction::RenameNode, MenuTarget::Node(node)) => {
                let Some(label) = answer(prompt, "Rename Variable", "New variable name:") else {
                    return Ok(feedback);
                };
                match self.diagram.rename_node(node, &label) {
                    Ok(()) => feedback.push(Feedback::NodeRenamed(node)),
                    Err(DiagramError::DuplicateLabel(label)) => {
                        log::debug!("rename of {node} refused: `{label}` is taken");
                        feedback.push(Feedback::DuplicateLabel(label));
                    }
                    Err(e) => return Err(e),
                }
            }
            (MenuAction::DeleteNode, MenuTarget::Node(node)) => {
                feedback.extend(self.delete_node(node));
            }
            (MenuAction::RenameParameter, MenuTarget::Arrow(arrow)) => {
                let Some(label) = answer(prompt, "Rename Parameter", "New parameter label:")
                else {
                    return Ok(feedback);
                };
                self.diagram.set_parameter_label(arrow, &label)?;
                feedback.push(Feedback::ParameterRenamed(arrow));
            }
            (MenuAction::DeleteArrow, MenuTarget::Arrow(arrow)) => {
                self.diagram.delete_arrow(arrow)?;
                feedback.push(Feedback::ArrowDeleted(arrow));
            }
            (action, target) => {
                log::warn!("{action:?} does not apply to a menu on {target:?}");
            }
        }
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edno_core::DiagramConfig;
    use pretty_assertions::assert_eq;

    fn canvas() -> (Canvas, NodeId, NodeId) {
        let mut d = Diagram::new(DiagramConfig::default()).unwrap();
        let a = d.place_node("ellipse", Point::new(0.0, 0.0)).unwrap();
        let b = d.place_node("ellipse", Point::new(100.0, 0.0)).unwrap();
        (Canvas::new(d), a, b)
    }

    #[test]
    fn drag_moves_node() {
        let (mut c, a, _) = canvas();
        c.handle(&InputEvent::down(0.0, 0.0));
        assert!(matches!(c.state(), CanvasState::DraggingNode { node, .. } if *node == a));
        let fb = c.handle(&InputEvent::moved(0.0, 40.0));
        assert_eq!(fb, vec![Feedback::NodeMoved(a)]);
        assert_eq!(c.diagram().node(a).unwrap().position(), Point::new(0.0, 40.0));
        c.handle(&InputEvent::up(0.0, 40.0));
        assert_eq!(c.state(), &CanvasState::Idle);
    }

    #[test]
    fn draw_and_commit_arrow() {
        let (mut c, a, b) = canvas();
        c.start_connection(a, ArrowKind::Directed).unwrap();
        let fb = c.handle(&InputEvent::moved(100.0, 0.0));
        assert!(fb.contains(&Feedback::HighlightChanged {
            node: b,
            highlight: Highlight::Allowed
        }));
        assert_eq!(c.rubber_band().unwrap().p1, Point::new(100.0, 0.0));

        let fb = c.handle(&InputEvent::up(100.0, 0.0));
        let [Feedback::ArrowCreated(id)] = fb.as_slice() else {
            panic!("expected an arrow, got {fb:?}");
        };
        assert_eq!(c.diagram().node(b).unwrap().incoming(), &[*id]);
        assert_eq!(c.state(), &CanvasState::Idle);
        assert_eq!(c.diagram().node(b).unwrap().highlight(), Highlight::Default);
    }

    #[test]
    fn secondary_click_cancels_drawing() {
        let (mut c, a, _) = canvas();
        c.start_connection(a, ArrowKind::Directed).unwrap();
        let fb = c.handle(&InputEvent::secondary_down(50.0, 50.0));
        assert_eq!(fb, vec![Feedback::Cancelled]);
        assert!(c.active_menu().is_none());
    }

    #[test]
    fn try_connect_reports_policy() {
        let (mut c, a, _) = canvas();
        assert_eq!(
            c.try_connect(a, a, ArrowKind::Directed),
            Err(DiagramError::PolicyRejected {
                predictor: a,
                dependent: a
            })
        );
        assert!(c.try_connect(a, a, ArrowKind::Bidirected).is_ok());
    }

    #[test]
    fn start_connection_needs_live_node() {
        let (mut c, a, _) = canvas();
        c.diagram_mut().delete_node(a).unwrap();
        assert_eq!(
            c.start_connection(a, ArrowKind::Directed),
            Err(DiagramError::UnknownNode(a))
        );
        assert_eq!(c.state(), &CanvasState::Idle);
    }
}

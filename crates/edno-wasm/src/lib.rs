//! WASM bridge for edno: exposes the diagram engine to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards its
//! pointer, wheel and keyboard events here, calls [`EdnoCanvas::render`]
//! once per frame and receives a JSON array of feedback after every call.

mod feedback;
mod render2d;

use edno_core::{
    ArrowId, ArrowKind, Diagram, DiagramConfig, DiagramError, DiagramSnapshot, FontSpec, NodeId,
    Point, Size, TextMeasure,
};
use edno_editor::{
    Canvas, Feedback, InputEvent, Modifiers, PointerButton, Prompt, menu_items,
};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

pub use feedback::feedback_json;

/// Text metrics from a Canvas2D context. Line height is `1.2 × size`, the
/// same as the headless estimate.
struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl TextMeasure for CanvasTextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        self.ctx.set_font(&render2d::css_font(font));
        let width = text
            .lines()
            .filter_map(|line| self.ctx.measure_text(line).ok())
            .map(|m| m.width())
            .fold(0.0, f64::max);
        let lines = text.lines().count().max(1);
        Size::new(width, lines as f64 * font.size * 1.2)
    }
}

/// `window.prompt`. The dialog has no title bar, so the title is shown as
/// the first line of the message.
struct WindowPrompt;

impl Prompt for WindowPrompt {
    fn prompt_for_string(&mut self, title: &str, message: &str) -> Option<String> {
        let window = web_sys::window()?;
        window
            .prompt_with_message_and_default(&format!("{title}\n{message}"), "")
            .ok()
            .flatten()
    }
}

fn js_error(e: DiagramError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_kind(kind: &str) -> Result<ArrowKind, JsValue> {
    match kind {
        "directed" => Ok(ArrowKind::Directed),
        "undirected" => Ok(ArrowKind::Undirected),
        "bidirected" => Ok(ArrowKind::Bidirected),
        other => Err(JsValue::from_str(&format!("unknown arrow kind `{other}`"))),
    }
}

fn pointer_button(button: i16) -> PointerButton {
    // `MouseEvent.button` numbering. Back, forward and anything else press
    // as middle, which the canvas ignores.
    match button {
        0 => PointerButton::Primary,
        2 => PointerButton::Secondary,
        _ => PointerButton::Middle,
    }
}

/// The main WASM-facing canvas controller.
///
/// Owns the interaction canvas (and through it the diagram). Every event
/// method returns the resulting feedback as a JSON array; rejected
/// connections and refused renames are also passed to the notice handler
/// when one is set.
#[wasm_bindgen]
pub struct EdnoCanvas {
    canvas: Canvas,
    width: f64,
    height: f64,
    notice_handler: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl EdnoCanvas {
    /// Create a controller from a JSON configuration (empty for defaults).
    /// When `ctx` is given, labels are measured with its text metrics.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        ctx: Option<CanvasRenderingContext2d>,
        width: f64,
        height: f64,
    ) -> Result<EdnoCanvas, JsValue> {
        console_error_panic_hook_setup();

        let config = if config_json.trim().is_empty() {
            DiagramConfig::default()
        } else {
            DiagramConfig::from_json(config_json).map_err(js_error)?
        };
        let mut diagram = Diagram::new(config).map_err(js_error)?;
        if let Some(ctx) = ctx {
            diagram = diagram.with_measure(CanvasTextMeasure { ctx });
        }
        log::info!("edno canvas ready ({width}×{height})");

        Ok(Self {
            canvas: Canvas::new(diagram),
            width,
            height,
            notice_handler: None,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Render the diagram to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        render2d::render_diagram(
            ctx,
            self.canvas.diagram(),
            self.canvas.rubber_band(),
            self.width,
            self.height,
            &render2d::CanvasTheme::light(),
        );
    }

    /// Called with a human-readable message whenever a connection or
    /// rename is refused.
    pub fn set_notice_handler(&mut self, handler: js_sys::Function) {
        self.notice_handler = Some(handler);
    }

    // ─── Input ───────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        self.dispatch(InputEvent::PointerDown {
            position: Point::new(x, y),
            button: pointer_button(button),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> String {
        self.dispatch(InputEvent::moved(x, y))
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64, button: i16) -> String {
        self.dispatch(InputEvent::PointerUp {
            position: Point::new(x, y),
            button: pointer_button(button),
        })
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64) -> String {
        self.dispatch(InputEvent::Wheel {
            position: Point::new(x, y),
            delta_y,
        })
    }

    /// `key` is the `KeyboardEvent.key` value.
    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        self.dispatch(InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    // ─── Menus ───────────────────────────────────────────────────────────

    /// Labels of the open menu's entries as a JSON array, `[]` when no menu
    /// is open.
    pub fn menu_labels(&self) -> String {
        let labels: Vec<String> = match self.canvas.active_menu() {
            Some(menu) => menu_items(menu.target, &self.canvas.diagram().config().form_names)
                .into_iter()
                .map(|item| item.label)
                .collect(),
            None => Vec::new(),
        };
        serde_json::to_string(&labels).unwrap_or_else(|_| "[]".to_string())
    }

    /// Run the open menu's entry at `index`. Renames ask through
    /// `window.prompt`.
    pub fn choose_menu_item(&mut self, index: usize) -> Result<String, JsValue> {
        let Some(menu) = self.canvas.active_menu() else {
            return Ok("[]".to_string());
        };
        let items = menu_items(menu.target, &self.canvas.diagram().config().form_names);
        let Some(item) = items.into_iter().nth(index) else {
            return Err(JsValue::from_str(&format!("no menu entry #{index}")));
        };
        let feedback = self
            .canvas
            .apply_menu_action(&item.action, &mut WindowPrompt)
            .map_err(js_error)?;
        Ok(self.report(&feedback))
    }

    // ─── Diagram API ─────────────────────────────────────────────────────

    /// Place a node of a registered type at a screen position. Returns the
    /// new node's id.
    pub fn add_node(&mut self, type_tag: &str, x: f64, y: f64) -> Result<u64, JsValue> {
        let logical = self.canvas.diagram().view().to_logical(Point::new(x, y));
        let id = self
            .canvas
            .diagram_mut()
            .place_node(type_tag, logical)
            .map_err(js_error)?;
        Ok(id.get())
    }

    /// Start drawing an arrow of `kind` (`directed`, `undirected`,
    /// `bidirected`) from a node.
    pub fn start_connection(&mut self, node: u64, kind: &str) -> Result<String, JsValue> {
        let kind = parse_kind(kind)?;
        let feedback = self
            .canvas
            .start_connection(NodeId::from_raw(node), kind)
            .map_err(js_error)?;
        Ok(self.report(&feedback))
    }

    /// Connect two nodes directly, subject to the connection policy.
    pub fn connect(&mut self, predictor: u64, dependent: u64, kind: &str) -> Result<u64, JsValue> {
        let id = self
            .canvas
            .try_connect(
                NodeId::from_raw(predictor),
                NodeId::from_raw(dependent),
                parse_kind(kind)?,
            )
            .map_err(js_error)?;
        Ok(id.get())
    }

    pub fn set_estimate(
        &mut self,
        arrow: u64,
        value: Option<f64>,
        significance: &str,
    ) -> Result<(), JsValue> {
        self.canvas
            .diagram_mut()
            .set_estimate(ArrowId::from_raw(arrow), value, significance)
            .map_err(js_error)
    }

    pub fn set_annotation(&mut self, node: u64, value: Option<f64>) -> Result<(), JsValue> {
        self.canvas
            .diagram_mut()
            .set_annotation(NodeId::from_raw(node), value)
            .map_err(js_error)
    }

    /// Remove every node and arrow. Ids keep counting up.
    pub fn reset(&mut self) {
        self.canvas.cancel();
        self.canvas.diagram_mut().reset();
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.canvas
            .diagram()
            .snapshot()
            .and_then(|s| s.to_json())
            .map_err(js_error)
    }

    /// Replace the diagram with a saved one. On error nothing changes.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = DiagramSnapshot::from_json(json).map_err(js_error)?;
        self.canvas.cancel();
        self.canvas
            .diagram_mut()
            .load_snapshot(&snapshot)
            .map_err(js_error)
    }
}

impl EdnoCanvas {
    fn dispatch(&mut self, event: InputEvent) -> String {
        let feedback = self.canvas.handle(&event);
        self.report(&feedback)
    }

    /// Forward notices, then serialize the feedback for the caller.
    fn report(&self, feedback: &[Feedback]) -> String {
        if let Some(handler) = &self.notice_handler {
            for message in feedback.iter().filter_map(|f| feedback::notice(self.canvas.diagram(), f)) {
                if let Err(e) = handler.call1(&JsValue::NULL, &JsValue::from_str(&message)) {
                    log::warn!("notice handler failed: {e:?}");
                }
            }
        }
        feedback_json(feedback)
    }
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("edno WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mouse_buttons_map_to_pointer_buttons() {
        assert_eq!(pointer_button(0), PointerButton::Primary);
        assert_eq!(pointer_button(1), PointerButton::Middle);
        assert_eq!(pointer_button(2), PointerButton::Secondary);
    }

    #[test]
    fn extra_mouse_buttons_are_not_primary() {
        for button in [3, 4, 5, -1] {
            assert_eq!(pointer_button(button), PointerButton::Middle, "button {button}");
        }
    }
}

//! Canvas2D renderer.
//!
//! Paints the diagram onto an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. Geometry is already resolved by the core, so
//! this module only traces paths and places text.

use edno_core::{Diagram, FontSpec, LabelBox};
use kurbo::{Affine, BezPath, Line, PathEl};
use web_sys::CanvasRenderingContext2d;

/// Canvas colors that do not come from the diagram configuration.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub outline: &'static str,
    pub text: &'static str,
    pub label_bg: &'static str,
    pub rubber_band: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#FFFFFF",
            outline: "#000000",
            text: "#000000",
            label_bg: "#FFFFFF",
            rubber_band: "rgba(0, 0, 0, 0.5)",
        }
    }
}

pub fn css_font(font: &FontSpec) -> String {
    format!("{} {}px {}", font.weight, font.size, font.family)
}

/// Paint every node, arrow and label, then the rubber band if one is shown.
pub fn render_diagram(
    ctx: &CanvasRenderingContext2d,
    diagram: &Diagram,
    rubber_band: Option<Line>,
    canvas_width: f64,
    canvas_height: f64,
    theme: &CanvasTheme,
) {
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, canvas_width, canvas_height);

    let to_screen = diagram.view().affine();
    let config = diagram.config();

    for arrow in diagram.arrows() {
        let color = arrow.color().to_hex();
        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(arrow.width());
        ctx.begin_path();
        trace(ctx, &arrow.path().to_bez_path(), to_screen);
        ctx.stroke();

        ctx.set_fill_style_str(&color);
        for head in arrow.heads() {
            let [a, b, c] = head.map(|p| to_screen * p);
            ctx.begin_path();
            ctx.move_to(a.x, a.y);
            ctx.line_to(b.x, b.y);
            ctx.line_to(c.x, c.y);
            ctx.close_path();
            ctx.fill();
        }

        draw_label(ctx, arrow.estimate_label(), to_screen, theme.label_bg, theme);
    }

    // Nodes paint over arrow ends.
    for node in diagram.nodes() {
        let fill = config.palette.fill(node.highlight()).to_hex();
        draw_label(ctx, node.label_box(), to_screen, &fill, theme);
        draw_label(ctx, node.annotation(), to_screen, theme.label_bg, theme);
    }

    if let Some(line) = rubber_band {
        let (p0, p1) = (to_screen * line.p0, to_screen * line.p1);
        ctx.set_stroke_style_str(theme.rubber_band);
        ctx.set_line_width(config.arrow_width);
        ctx.begin_path();
        ctx.move_to(p0.x, p0.y);
        ctx.line_to(p1.x, p1.y);
        ctx.stroke();
    }
}

fn draw_label(
    ctx: &CanvasRenderingContext2d,
    label: &LabelBox,
    to_screen: Affine,
    fill: &str,
    theme: &CanvasTheme,
) {
    if !label.visible {
        return;
    }
    ctx.begin_path();
    trace(ctx, &label.shape.to_path(), to_screen);
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.set_stroke_style_str(theme.outline);
    ctx.set_line_width(1.0);
    ctx.stroke();

    let anchor = to_screen * label.anchor;
    ctx.set_fill_style_str(theme.text);
    ctx.set_font(&css_font(&label.font));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(&label.text, anchor.x, anchor.y);
}

/// Replay a kurbo path onto the context's current path.
fn trace(ctx: &CanvasRenderingContext2d, path: &BezPath, to_screen: Affine) {
    for el in (to_screen * path.clone()).elements() {
        match *el {
            PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
            PathEl::QuadTo(c, p) => ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathEl::ClosePath => ctx.close_path(),
        }
    }
}

use crate::model::FontSpec;
use crate::shape::{Shape, ShapeKind};
use crate::text::TextMeasure;
use kurbo::{Point, Rect, Size, Vec2};

/// A positioned text with the shape drawn around it.
///
/// Nodes use one for their label and one for the optional annotation;
/// arrows use one for the estimate. `anchor` is the text center.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub text: String,
    pub anchor: Point,
    pub font: FontSpec,
    pub shape: Shape,
    pub padding: f64,
    pub visible: bool,
    text_size: Size,
}

impl LabelBox {
    pub fn new(
        text: impl Into<String>,
        anchor: Point,
        font: FontSpec,
        kind: ShapeKind,
        padding: f64,
        measure: &dyn TextMeasure,
    ) -> Self {
        let mut label = Self {
            text: text.into(),
            anchor,
            font,
            shape: Shape::new(kind, Rect::from_center_size(anchor, Size::ZERO)),
            padding,
            visible: true,
            text_size: Size::ZERO,
        };
        label.refit(measure);
        label
    }

    /// Box of the text alone, centered on the anchor.
    pub fn text_bounds(&self) -> Rect {
        Rect::from_center_size(self.anchor, self.text_size)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
        self.shape.translate(delta);
    }

    pub fn move_to(&mut self, anchor: Point) {
        self.translate(anchor - self.anchor);
    }

    /// Replace the text, re-fit the shape and make the box visible.
    pub fn set_text(&mut self, text: impl Into<String>, measure: &dyn TextMeasure) {
        self.text = text.into();
        self.refit(measure);
        self.show();
    }

    pub fn set_font(&mut self, font: FontSpec, measure: &dyn TextMeasure) {
        self.font = font;
        self.refit(measure);
    }

    /// Re-measure the text and fit the shape around it.
    pub fn refit(&mut self, measure: &dyn TextMeasure) {
        self.text_size = measure.measure(&self.text, &self.font);
        let bounds = self.shape.kind.fit_around(self.text_bounds(), self.padding);
        self.shape.resize(bounds);
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

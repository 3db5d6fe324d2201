use crate::model::FontSpec;
use kurbo::Size;

/// Bounding-box query for a text rendered at a font.
///
/// The diagram never renders text itself; hosts plug in their toolkit's
/// metrics (the WASM bridge asks a Canvas2D context).
pub trait TextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> Size;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &FontSpec) -> Size,
{
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        self(text, font)
    }
}

/// Headless estimate: every character is `0.6 × size` wide and a line is
/// `1.2 × size` tall. Empty text measures zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font: &FontSpec) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size::new(
            widest as f64 * font.size * 0.6,
            lines as f64 * font.size * 1.2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn approx_scales_with_font() {
        let font = FontSpec::default().with_size(10.0);
        assert_eq!(ApproxTextMeasure.measure("abcd", &font), Size::new(24.0, 12.0));
        assert_eq!(ApproxTextMeasure.measure("", &font), Size::ZERO);
    }

    #[test]
    fn closures_measure_too() {
        let fixed = |_: &str, _: &FontSpec| Size::new(7.0, 3.0);
        assert_eq!(fixed.measure("x", &FontSpec::default()), Size::new(7.0, 3.0));
    }
}

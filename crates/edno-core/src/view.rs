use kurbo::{Affine, Point, Vec2};

/// Mapping between screen (pointer) coordinates and logical diagram
/// coordinates.
///
/// Zooming rewrites logical positions in place (see
/// [`Diagram::zoom`](crate::Diagram::zoom)), so the mapping itself is a pure
/// translation; `scale` only records the accumulated zoom level that fonts
/// are derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn to_logical(&self, screen: Point) -> Point {
        screen - self.offset
    }

    pub fn to_screen(&self, logical: Point) -> Point {
        logical + self.offset
    }

    /// Move the view; logical positions are untouched.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Logical → screen as an affine map, for painting.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset)
    }
}

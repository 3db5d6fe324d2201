//! Closed set of node outlines behind one interface.
//!
//! A shape is a [`ShapeKind`] plus the bounds it was fit into. For ellipses
//! and rectangles the outline touches the bounds. Triangles and other
//! regular polygons circumscribe the ellipse inscribed in the bounds, so
//! their vertices reach slightly past it.

use crate::geometry::{ellipse_ray_intersection, polygon_ray_intersection, regular_polygon_vertices};
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when flattening curved outlines into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Most corners a registered or loaded polygon may have.
pub const MAX_POLYGON_SIDES: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Ellipse,
    Rectangle,
    Triangle,
    Polygon { sides: u32 },
}

impl ShapeKind {
    /// Number of corners, `None` for ellipses.
    pub fn sides(self) -> Option<u32> {
        match self {
            ShapeKind::Ellipse => None,
            ShapeKind::Rectangle => Some(4),
            ShapeKind::Triangle => Some(3),
            ShapeKind::Polygon { sides } => Some(sides.max(3)),
        }
    }

    /// Why this kind cannot be used for a node, if it cannot.
    pub(crate) fn problem(self) -> Option<String> {
        match self {
            ShapeKind::Polygon { sides } if !(3..=MAX_POLYGON_SIDES).contains(&sides) => Some(
                format!("polygons need 3 to {MAX_POLYGON_SIDES} sides, got {sides}"),
            ),
            _ => None,
        }
    }

    /// Bounds of this kind of shape around a label's text bounds.
    ///
    /// Ellipses grow by 30% of the text width and 50% of the text height on
    /// each side. Rectangles grow by `padding`. Other polygons take 1.5× the
    /// text width and 2× the text height; their vertices are then pushed out
    /// to circumscribe that box's ellipse.
    pub fn fit_around(self, text: Rect, padding: f64) -> Rect {
        let (w, h) = (text.width(), text.height());
        match self {
            ShapeKind::Ellipse => text.inflate(0.3 * w, 0.5 * h),
            ShapeKind::Rectangle => text.inflate(padding, padding),
            ShapeKind::Triangle | ShapeKind::Polygon { .. } => {
                Rect::from_center_size(text.center(), Size::new(1.5 * w, 2.0 * h))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Rect,
}

impl Shape {
    pub fn new(kind: ShapeKind, bounds: Rect) -> Self {
        Self { kind, bounds }
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Outline corners in drawing order; empty for ellipses.
    pub fn vertices(&self) -> Vec<Point> {
        match self.kind.sides() {
            None => Vec::new(),
            Some(sides) => regular_polygon_vertices(
                self.bounds.center(),
                sides,
                self.bounds.width(),
                self.bounds.height(),
            ),
        }
    }

    /// Where the segment from `ray_origin` to this shape's center crosses
    /// the outline.
    pub fn boundary_intersection(&self, ray_origin: Point) -> Point {
        let center = self.center();
        match self.kind {
            ShapeKind::Ellipse => ellipse_ray_intersection(
                center,
                self.bounds.width() / 2.0,
                self.bounds.height() / 2.0,
                ray_origin,
            ),
            _ => polygon_ray_intersection(&self.vertices(), Line::new(ray_origin, center)),
        }
    }

    pub fn resize(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds + delta;
    }

    /// Scale the bounds about `pivot`, moving the shape along with them.
    pub fn scale_about(&mut self, pivot: Point, factor: f64) {
        let p0 = pivot + (self.bounds.origin() - pivot) * factor;
        let p1 = pivot + (Point::new(self.bounds.x1, self.bounds.y1) - pivot) * factor;
        self.bounds = Rect::from_points(p0, p1);
    }

    pub fn contains(&self, point: Point) -> bool {
        match self.kind {
            ShapeKind::Ellipse => Ellipse::from_rect(self.bounds).contains(point),
            ShapeKind::Rectangle => self.bounds.contains(point),
            _ => self.to_path().contains(point),
        }
    }

    /// Closed outline for painting and polygon hit tests.
    pub fn to_path(&self) -> BezPath {
        if self.kind == ShapeKind::Ellipse {
            return Ellipse::from_rect(self.bounds).to_path(PATH_TOLERANCE);
        }
        let mut path = BezPath::new();
        let mut corners = self.vertices().into_iter();
        if let Some(first) = corners.next() {
            path.move_to(first);
            for p in corners {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }
}

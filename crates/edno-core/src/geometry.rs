//! Geometry kernel: boundary intersections, polygon construction and
//! arrow-head construction.
//!
//! Every function here is pure. Degenerate input (zero-length vectors,
//! zero-size shapes, parallel segments) never panics: magnitudes are clamped
//! to [`MIN_MAGNITUDE`] or [`MIN_LINE_LENGTH`] so callers always receive a
//! usable point.

use kurbo::{Line, Point, Vec2};
use std::f64::consts::PI;

/// Smallest divisor used for ellipse and chord computations.
pub const MIN_MAGNITUDE: f64 = 1e-5;

/// Smallest line length used when normalizing an arrow direction.
pub const MIN_LINE_LENGTH: f64 = 0.01;

/// Distance from the tip of an arrow head back to its base.
pub const ARROW_HEAD_BACK: f64 = 15.0;

/// Half of the arrow head base width.
pub const ARROW_HEAD_HALF_WIDTH: f64 = 5.0;

/// Upper bound for the perpendicular offset of a curved arrow's control point.
pub const MAX_CURVE_OFFSET: f64 = 50.0;

/// Slack on the `[0, 1]` segment parameters so rays through a vertex still hit.
const PARAM_TOLERANCE: f64 = 1e-9;

// ─── Intersections ───────────────────────────────────────────────────────

/// Point where the segment from `ray_origin` to `center` crosses the
/// boundary of the axis-aligned ellipse with the given half extents.
///
/// Uses the closed form `t = hw·hh / sqrt(hw²(k−y)² + hh²(h−x)²)` where
/// `(h, k)` is the center and `(x, y)` the ray origin. When the origin sits
/// on the center the denominator is clamped, which yields the center itself.
pub fn ellipse_ray_intersection(
    center: Point,
    half_width: f64,
    half_height: f64,
    ray_origin: Point,
) -> Point {
    let d = ray_origin - center;
    let mut div = (half_width.powi(2) * d.y.powi(2) + half_height.powi(2) * d.x.powi(2)).sqrt();
    if div.abs() < MIN_MAGNITUDE {
        div = MIN_MAGNITUDE;
    }
    let t = (half_width * half_height) / div;
    center + d * t
}

/// Intersection of two segments, or `None` when they are parallel or the
/// crossing lies outside either segment.
pub fn segment_intersection(a: Line, b: Line) -> Option<Point> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let qp = b.p0 - a.p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    let inside = |v: f64| (-PARAM_TOLERANCE..=1.0 + PARAM_TOLERANCE).contains(&v);
    if inside(t) && inside(u) {
        Some(a.p0 + r * t)
    } else {
        None
    }
}

/// Closest crossing between `ray` and the closed polygon `vertices`,
/// measured from `ray.p0`.
///
/// When no edge is crossed (the origin lies inside a zero-size shape or the
/// ray is shorter than the distance to the boundary) `ray.p1` is returned.
pub fn polygon_ray_intersection(vertices: &[Point], ray: Line) -> Point {
    let n = vertices.len();
    let mut best: Option<(f64, Point)> = None;
    for i in 0..n {
        let edge = Line::new(vertices[i], vertices[(i + 1) % n]);
        let Some(hit) = segment_intersection(ray, edge) else {
            continue;
        };
        let dist = ray.p0.distance(hit);
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, hit));
        }
    }
    best.map(|(_, p)| p).unwrap_or(ray.p1)
}

// ─── Construction ────────────────────────────────────────────────────────

/// Vertices of a polygon centered on `center`.
///
/// Four sides produce the plain rectangle `width × height`. Any other count
/// produces a regular polygon stretched so that every edge is tangent to the
/// ellipse of `width × height`; the ellipse (and therefore a label sized to
/// it) never pokes out of the polygon. Triangles point up. Counts below three
/// are treated as triangles.
pub fn regular_polygon_vertices(center: Point, sides: u32, width: f64, height: f64) -> Vec<Point> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    if sides == 4 {
        return vec![
            Point::new(center.x - hw, center.y - hh),
            Point::new(center.x + hw, center.y - hh),
            Point::new(center.x + hw, center.y + hh),
            Point::new(center.x - hw, center.y + hh),
        ];
    }

    let n = sides.max(3);
    let rotate = if n == 3 { PI } else { 0.0 };
    let radius = 1.0 / (PI / n as f64).cos();
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64 + rotate;
            Point::new(
                center.x + hw * radius * angle.sin(),
                center.y + hh * radius * angle.cos(),
            )
        })
        .collect()
}

/// Control point for a curved arrow from `p1` to `p2`.
///
/// The chord midpoint is pushed along the chord normal by
/// `min(50, shift / chord_length)`; for a left-to-right chord the point
/// moves up (towards negative y).
pub fn curved_midpoint(p1: Point, p2: Point, shift: f64) -> Point {
    let mid = p1.midpoint(p2);
    let dir = p2 - p1;
    let chord = dir.hypot().max(MIN_MAGNITUDE);
    let normal = Vec2::new(-dir.y, dir.x);
    let normal = normal / normal.hypot().max(MIN_MAGNITUDE);
    let offset = MAX_CURVE_OFFSET.min(shift / chord);
    mid - normal * offset
}

/// Triangle of an arrow head whose tip sits on `tip` and which points along
/// `direction`. Returns `[tip, left, right]`.
pub fn arrow_head_triangle(tip: Point, direction: Vec2, back: f64, half_width: f64) -> [Point; 3] {
    let mut len = direction.hypot();
    if len == 0.0 {
        len = MIN_LINE_LENGTH;
    }
    let base = tip - direction * (back / len);
    let side = Vec2::new(-direction.y, direction.x) * (half_width / len);
    [tip, base + side, base - side]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-6
    }

    #[test]
    fn ellipse_hits_axis_points() {
        let c = Point::new(10.0, 10.0);
        let p = ellipse_ray_intersection(c, 20.0, 5.0, Point::new(100.0, 10.0));
        assert!(close(p, Point::new(30.0, 10.0)), "{p:?}");
        let p = ellipse_ray_intersection(c, 20.0, 5.0, Point::new(10.0, -50.0));
        assert!(close(p, Point::new(10.0, 5.0)), "{p:?}");
    }

    #[test]
    fn ellipse_point_lies_on_boundary() {
        let c = Point::new(0.0, 0.0);
        let p = ellipse_ray_intersection(c, 30.0, 12.0, Point::new(-40.0, 25.0));
        let on = (p.x / 30.0).powi(2) + (p.y / 12.0).powi(2);
        assert!((on - 1.0).abs() < 1e-9);
        // same side as the origin
        assert!(p.x < 0.0 && p.y > 0.0);
    }

    #[test]
    fn ellipse_origin_at_center_is_finite() {
        let c = Point::new(3.0, 4.0);
        let p = ellipse_ray_intersection(c, 10.0, 10.0, c);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!(close(p, c));
    }

    #[test]
    fn crossing_segments_intersect() {
        let a = Line::new((0.0, 0.0), (10.0, 10.0));
        let b = Line::new((0.0, 10.0), (10.0, 0.0));
        assert!(close(segment_intersection(a, b).unwrap(), Point::new(5.0, 5.0)));
    }

    #[test]
    fn vertical_segment_intersects() {
        let a = Line::new((5.0, -10.0), (5.0, 10.0));
        let b = Line::new((0.0, 0.0), (10.0, 0.0));
        assert!(close(segment_intersection(a, b).unwrap(), Point::new(5.0, 0.0)));
    }

    #[test]
    fn parallel_and_disjoint_segments_miss() {
        let a = Line::new((0.0, 0.0), (10.0, 0.0));
        let b = Line::new((0.0, 1.0), (10.0, 1.0));
        assert_eq!(segment_intersection(a, b), None);

        let c = Line::new((0.0, 0.0), (1.0, 1.0));
        let d = Line::new((5.0, 0.0), (5.0, 10.0));
        assert_eq!(segment_intersection(c, d), None);
    }

    #[test]
    fn polygon_returns_nearest_crossing() {
        let square = regular_polygon_vertices(Point::new(0.0, 0.0), 4, 20.0, 10.0);
        let ray = Line::new((-100.0, 0.0), (0.0, 0.0));
        assert!(close(
            polygon_ray_intersection(&square, ray),
            Point::new(-10.0, 0.0)
        ));
    }

    #[test]
    fn polygon_falls_back_to_far_end() {
        let degenerate = vec![Point::new(1.0, 1.0); 4];
        let ray = Line::new((-100.0, 0.0), (1.0, 1.0));
        assert_eq!(polygon_ray_intersection(&degenerate, ray), Point::new(1.0, 1.0));
    }

    #[test]
    fn polygon_vertices_enclose_the_ellipse() {
        for sides in [3, 5, 6, 8] {
            let verts = regular_polygon_vertices(Point::ZERO, sides, 40.0, 20.0);
            assert_eq!(verts.len(), sides as usize);
            for v in &verts {
                let on = (v.x / 20.0).powi(2) + (v.y / 10.0).powi(2);
                assert!(on > 1.0, "vertex {v:?} of {sides}-gon inside ellipse");
            }
        }
    }

    #[test]
    fn triangle_points_up() {
        let verts = regular_polygon_vertices(Point::ZERO, 3, 10.0, 10.0);
        let top = verts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((verts[0].y - top).abs() < 1e-9);
        assert!(verts[0].x.abs() < 1e-9);
    }

    #[test]
    fn too_few_sides_become_a_triangle() {
        assert_eq!(regular_polygon_vertices(Point::ZERO, 1, 10.0, 10.0).len(), 3);
    }

    #[test]
    fn curved_midpoint_bends_upwards() {
        let p = curved_midpoint(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 3000.0);
        assert!(close(p, Point::new(50.0, -30.0)), "{p:?}");
        // short chords cap at the maximum offset
        let p = curved_midpoint(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 3000.0);
        assert!(close(p, Point::new(5.0, -50.0)), "{p:?}");
    }

    #[test]
    fn curved_midpoint_handles_zero_chord() {
        let p = curved_midpoint(Point::new(2.0, 2.0), Point::new(2.0, 2.0), 3000.0);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn arrow_head_points_backwards_from_tip() {
        let [tip, left, right] = arrow_head_triangle(
            Point::new(100.0, 0.0),
            Vec2::new(50.0, 0.0),
            ARROW_HEAD_BACK,
            ARROW_HEAD_HALF_WIDTH,
        );
        assert_eq!(tip, Point::new(100.0, 0.0));
        assert!(close(left, Point::new(85.0, 5.0)), "{left:?}");
        assert!(close(right, Point::new(85.0, -5.0)), "{right:?}");
    }

    #[test]
    fn arrow_head_survives_zero_direction() {
        let head = arrow_head_triangle(Point::new(1.0, 1.0), Vec2::ZERO, 15.0, 5.0);
        assert!(head.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

use crate::geometry::{
    ARROW_HEAD_BACK, ARROW_HEAD_HALF_WIDTH, arrow_head_triangle, curved_midpoint,
};
use crate::id::{ArrowId, NodeId};
use crate::label::LabelBox;
use crate::model::{ArrowKind, Color};
use crate::shape::Shape;
use kurbo::{BezPath, Line, ParamCurveNearest, Point, QuadBez};
use smallvec::SmallVec;

/// Accuracy passed to kurbo's nearest-point search.
const NEAREST_ACCURACY: f64 = 1e-6;

// ─── Estimate ────────────────────────────────────────────────────────────

/// Numeric estimate shown on an arrow, e.g. `b1=0.50**`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimate {
    pub value: Option<f64>,
    pub significance: String,
    pub parameter_label: String,
}

impl Estimate {
    /// Display text: `label=value sig`, `label`, `value sig` or nothing.
    pub fn text(&self) -> String {
        match (self.parameter_label.is_empty(), self.value) {
            (false, Some(v)) => format!("{}={v:.2}{}", self.parameter_label, self.significance),
            (false, None) => self.parameter_label.clone(),
            (true, Some(v)) => format!("{v:.2}{}", self.significance),
            (true, None) => String::new(),
        }
    }
}

// ─── Path ────────────────────────────────────────────────────────────────

/// Drawn geometry of an arrow, already clipped to both node outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowPath {
    Straight(Line),
    /// Self-loops: start, control point, end.
    Curved(QuadBez),
}

impl ArrowPath {
    pub fn start(&self) -> Point {
        match self {
            ArrowPath::Straight(l) => l.p0,
            ArrowPath::Curved(q) => q.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            ArrowPath::Straight(l) => l.p1,
            ArrowPath::Curved(q) => q.p2,
        }
    }

    /// Anchor of the estimate label: the midpoint of a straight arrow or the
    /// control point of a curved one.
    pub fn label_anchor(&self) -> Point {
        match self {
            ArrowPath::Straight(l) => l.p0.midpoint(l.p1),
            ArrowPath::Curved(q) => q.p1,
        }
    }

    /// Flat coordinate list: `[x1, y1, x2, y2]` or `[x1, y1, cx, cy, x2, y2]`.
    pub fn coords(&self) -> Vec<f64> {
        match self {
            ArrowPath::Straight(l) => vec![l.p0.x, l.p0.y, l.p1.x, l.p1.y],
            ArrowPath::Curved(q) => vec![q.p0.x, q.p0.y, q.p1.x, q.p1.y, q.p2.x, q.p2.y],
        }
    }

    pub fn distance_to(&self, p: Point) -> f64 {
        let nearest = match self {
            ArrowPath::Straight(l) => l.nearest(p, NEAREST_ACCURACY),
            ArrowPath::Curved(q) => q.nearest(p, NEAREST_ACCURACY),
        };
        nearest.distance_sq.sqrt()
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        match self {
            ArrowPath::Straight(l) => path.line_to(l.p1),
            ArrowPath::Curved(q) => path.quad_to(q.p1, q.p2),
        }
        path
    }
}

/// Arrow head triangles, `[tip, left, right]` each.
pub type ArrowHeads = SmallVec<[[Point; 3]; 2]>;

// ─── Arrow ───────────────────────────────────────────────────────────────

/// An edge from a predictor node to a dependent node.
#[derive(Debug, Clone)]
pub struct Arrow {
    pub(crate) id: ArrowId,
    pub(crate) predictor: NodeId,
    pub(crate) dependent: NodeId,
    pub(crate) kind: ArrowKind,
    pub(crate) color: Color,
    pub(crate) width: f64,
    pub(crate) estimate: Estimate,
    pub(crate) estimate_label: LabelBox,
    pub(crate) payload: Option<serde_json::Value>,
    pub(crate) path: ArrowPath,
    pub(crate) heads: ArrowHeads,
}

impl Arrow {
    pub fn id(&self) -> ArrowId {
        self.id
    }

    pub fn predictor(&self) -> NodeId {
        self.predictor
    }

    pub fn dependent(&self) -> NodeId {
        self.dependent
    }

    pub fn kind(&self) -> ArrowKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_self_loop(&self) -> bool {
        self.predictor == self.dependent
    }

    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn estimate_label(&self) -> &LabelBox {
        &self.estimate_label
    }

    /// Opaque host data carried along with the arrow.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    pub fn path(&self) -> &ArrowPath {
        &self.path
    }

    pub fn heads(&self) -> &[[Point; 3]] {
        &self.heads
    }

    /// Whether this arrow already connects `a` and `b` for a new arrow of
    /// `kind`. The pair is ordered only when both arrows are directed, so
    /// any other combination of kinds matches in either direction.
    pub fn joins(&self, a: NodeId, b: NodeId, kind: ArrowKind) -> bool {
        let forward = self.predictor == a && self.dependent == b;
        let backward = self.predictor == b && self.dependent == a;
        let ordered = kind.is_ordered() && self.kind.is_ordered();
        forward || (!ordered && backward)
    }
}

/// Path and heads of an arrow between two node outlines.
///
/// The predictor end is where the ray from the dependent's center hits the
/// predictor outline, and the other way round for the dependent end. When
/// both outlines are the same node the arrow becomes a loop over the top
/// of the shape.
pub(crate) fn arrow_geometry(
    predictor: &Shape,
    dependent: &Shape,
    self_loop: bool,
    kind: ArrowKind,
    loop_shift: f64,
) -> (ArrowPath, ArrowHeads) {
    let path = if self_loop {
        let b = predictor.bounds;
        let above = b.y0 - b.height();
        let start = predictor.boundary_intersection(Point::new(b.x0 + b.width() / 4.0, above));
        let end = predictor.boundary_intersection(Point::new(b.x1 - b.width() / 4.0, above));
        ArrowPath::Curved(QuadBez::new(start, curved_midpoint(start, end, loop_shift), end))
    } else {
        let start = predictor.boundary_intersection(dependent.center());
        let end = dependent.boundary_intersection(predictor.center());
        ArrowPath::Straight(Line::new(start, end))
    };

    // heads point along the last leg of the path
    let (into_start, into_end) = match path {
        ArrowPath::Straight(l) => (l.p1, l.p0),
        ArrowPath::Curved(q) => (q.p1, q.p1),
    };
    let head = |tip: Point, from: Point| {
        arrow_head_triangle(tip, tip - from, ARROW_HEAD_BACK, ARROW_HEAD_HALF_WIDTH)
    };

    let mut heads = ArrowHeads::new();
    match kind {
        ArrowKind::Directed => heads.push(head(path.end(), into_end)),
        ArrowKind::Bidirected => {
            heads.push(head(path.end(), into_end));
            heads.push(head(path.start(), into_start));
        }
        ArrowKind::Undirected => {}
    }
    (path, heads)
}

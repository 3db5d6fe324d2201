pub mod arrow;
pub mod config;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod label;
pub mod model;
pub mod node;
pub mod policy;
pub mod registry;
pub mod shape;
pub mod snapshot;
pub mod text;
pub mod view;

pub use arrow::{Arrow, ArrowPath, Estimate};
pub use config::{DiagramConfig, FormNames};
pub use diagram::Diagram;
pub use error::{DiagramError, Result};
pub use hit::Hit;
pub use id::{ArrowId, NodeId};
pub use label::LabelBox;
pub use model::*;
pub use node::Node;
pub use policy::{
    Acyclic, AllOf, AllowAll, ConnectionPolicy, ConnectionRequest, NoDuplicateEdge, NoSelfLoop,
    default_policy,
};
pub use registry::NodeTypeRegistry;
pub use shape::{MAX_POLYGON_SIDES, Shape, ShapeKind};
pub use snapshot::{ArrowRecord, DiagramSnapshot, NodeRecord};
pub use text::{ApproxTextMeasure, TextMeasure};
pub use view::ViewTransform;

// Re-export the geometry types used throughout the public API
pub use kurbo::{Point, Rect, Size, Vec2};

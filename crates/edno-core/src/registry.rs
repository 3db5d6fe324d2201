use crate::config::FormNames;
use crate::error::{DiagramError, Result};
use crate::shape::ShapeKind;
use std::collections::BTreeMap;

/// Maps node type tags to the shape their nodes are drawn with.
///
/// Every entry is checked on registration, so a tag that resolves is
/// always usable by [`Diagram::place_node`](crate::Diagram::place_node).
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    kinds: BTreeMap<String, ShapeKind>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the two menu forms: rectangles and ellipses.
    pub fn from_forms(forms: &FormNames) -> Result<Self> {
        Self::from_entries([
            (forms.rectangle.as_str(), ShapeKind::Rectangle),
            (forms.ellipse.as_str(), ShapeKind::Ellipse),
        ])
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, ShapeKind)>) -> Result<Self> {
        let mut registry = Self::new();
        for (tag, kind) in entries {
            registry.register(tag, kind)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, tag: &str, kind: ShapeKind) -> Result<()> {
        let invalid = |reason: &str| DiagramError::InvalidNodeType {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };
        if tag.trim().is_empty() {
            return Err(invalid("type tags must not be blank"));
        }
        if let Some(problem) = kind.problem() {
            return Err(invalid(&problem));
        }
        if self.kinds.get(tag).is_some_and(|k| *k != kind) {
            return Err(invalid("already registered with another shape"));
        }
        self.kinds.insert(tag.to_string(), kind);
        Ok(())
    }

    pub fn shape_for(&self, tag: &str) -> Result<ShapeKind> {
        self.kinds
            .get(tag)
            .copied()
            .ok_or_else(|| DiagramError::UnknownNodeType(tag.to_string()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}

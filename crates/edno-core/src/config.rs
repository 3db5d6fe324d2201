//! Diagram configuration.
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it changes.

use crate::error::{DiagramError, Result};
use crate::model::{Color, FontSpec, NodePalette};
use serde::{Deserialize, Serialize};

/// Tunable constants of a diagram and its editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Prefix of generated labels (`var_1`, `var_2`, ...). Default: **`"var_"`**.
    pub label_prefix: String,

    /// Per-axis distance under which a drag snaps to another node's center.
    /// Default: **3.0**.
    pub snap_distance: f64,

    /// Font at zoom level 1. Default: **Arial 9**.
    pub font: FontSpec,

    /// Zooming out never shrinks the font below this size. Default: **2**.
    pub min_font_size: f64,

    /// Scale multiplier for one zoom-in step. Default: **1.1**.
    pub zoom_in_factor: f64,

    /// Scale multiplier for one zoom-out step. Default: **0.9**.
    pub zoom_out_factor: f64,

    /// Space between a rectangle node's text and its outline. Default: **4**.
    pub node_padding: f64,

    /// Space around an estimate's text. Default: **4**.
    pub estimate_padding: f64,

    /// Distance from the bottom of a node's text to its annotation. Default: **25**.
    pub annotation_offset: f64,

    /// Statistic name shown in annotations. Default: **`"R²"`**.
    pub annotation_prefix: String,

    /// Bend strength of self-loops, see [`curved_midpoint`](crate::geometry::curved_midpoint).
    /// Default: **3000**.
    pub self_loop_shift: f64,

    /// Stroke width of arrows. Default: **2**.
    pub arrow_width: f64,

    /// Stroke color of arrows. Default: **black**.
    pub arrow_color: Color,

    /// Node fills for hover feedback.
    pub palette: NodePalette,

    /// Type tags given to nodes added from the canvas menu.
    pub form_names: FormNames,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            label_prefix: "var_".into(),
            snap_distance: 3.0,
            font: FontSpec::default(),
            min_font_size: 2.0,
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            node_padding: 4.0,
            estimate_padding: 4.0,
            annotation_offset: 25.0,
            annotation_prefix: "R²".into(),
            self_loop_shift: 3000.0,
            arrow_width: 2.0,
            arrow_color: Color::BLACK,
            palette: NodePalette::default(),
            form_names: FormNames::default(),
        }
    }
}

impl DiagramConfig {
    /// Parse a JSON configuration; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DiagramError::InvalidConfig(e.to_string()))
    }
}

/// Type tags used for the two node forms offered by the canvas menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormNames {
    pub rectangle: String,
    pub ellipse: String,
}

impl Default for FormNames {
    fn default() -> Self {
        Self {
            rectangle: "rectangle".into(),
            ellipse: "ellipse".into(),
        }
    }
}

//! Shared visual vocabulary: colors, fonts, hover highlights and arrow kinds.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color, written as a hex string in configuration and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| Some(nibble(bytes[i])? << 4 | nibble(bytes[i + 1])?);

        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self {
                a: pair(6)?,
                ..Self::rgb(pair(0)?, pair(2)?, pair(4)?)
            }),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

/// Node fill colors used while an arrow is being drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePalette {
    /// Resting fill (default `#add8e6`, light blue).
    pub default: Color,
    /// Fill of a hovered node the policy accepts (default `#90e4c1`).
    pub allowed: Color,
    /// Fill of a hovered node the policy rejects (default `#ffcccb`).
    pub not_allowed: Color,
}

impl Default for NodePalette {
    fn default() -> Self {
        Self {
            default: Color::rgb(0xad, 0xd8, 0xe6),
            allowed: Color::rgb(0x90, 0xe4, 0xc1),
            not_allowed: Color::rgb(0xff, 0xcc, 0xcb),
        }
    }
}

impl NodePalette {
    pub fn fill(&self, highlight: Highlight) -> Color {
        match highlight {
            Highlight::Default => self.default,
            Highlight::Allowed => self.allowed,
            Highlight::NotAllowed => self.not_allowed,
        }
    }
}

/// Hover feedback shown on a node while an arrow is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Highlight {
    #[default]
    Default,
    Allowed,
    NotAllowed,
}

// ─── Font ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".into(),
            weight: 400,
            size: 9.0,
        }
    }
}

impl FontSpec {
    /// Same family and weight at another size.
    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

// ─── Arrows ──────────────────────────────────────────────────────────────

/// How an arrow relates its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
    /// Predictor → dependent, one head at the dependent end.
    #[default]
    Directed,
    /// Plain line without heads.
    Undirected,
    /// Covariance-style arrow with a head at both ends.
    Bidirected,
}

impl ArrowKind {
    pub fn is_ordered(self) -> bool {
        matches!(self, ArrowKind::Directed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArrowKind::Directed => "directed",
            ArrowKind::Undirected => "undirected",
            ArrowKind::Bidirected => "bidirected",
        }
    }
}

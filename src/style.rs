use serde::{Deserialize, Serialize};

use crate::color::{parse_color, Rgb};
use crate::error::{Error, Result};

pub const DEFAULT_LINE_WIDTH: f64 = 1.5;
pub const DEFAULT_MARKER_SIZE: f64 = 6.0;

// ---------------------------------------------------------------------------
// LineStyle / Marker
// ---------------------------------------------------------------------------

/// How the line connecting the points of a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    #[serde(alias = "-")]
    Solid,
    #[serde(alias = "--")]
    Dashed,
    #[serde(alias = ":")]
    Dotted,
    /// Drawn as a long-dash pattern; neither backend has a true dash-dot.
    #[serde(alias = "-.")]
    DashDot,
    /// No connecting line, markers only.
    #[serde(rename = "none", alias = "None", alias = "")]
    NoLine,
}

/// Marker drawn at every point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Marker {
    #[serde(rename = "x")]
    Cross,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "o")]
    Circle,
    #[serde(rename = "^")]
    Triangle,
    #[serde(rename = "s")]
    Square,
    #[serde(rename = ".")]
    Point,
    #[default]
    #[serde(rename = "none", alias = "None", alias = "")]
    NoMarker,
}

// ---------------------------------------------------------------------------
// Style – rendering attributes of one series
// ---------------------------------------------------------------------------

/// Rendering attributes of one plotted series.
///
/// Every attribute is optional; unset attributes fall back to a solid
/// line without markers and a palette colour picked by series position.
/// Attribute names follow the usual plotting vocabulary, including the
/// short aliases `c`, `ls`, `lw` and `ms`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Style {
    #[serde(default, alias = "c", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, alias = "ls", skip_serializing_if = "Option::is_none")]
    pub linestyle: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, alias = "lw", skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
    #[serde(default, alias = "ms", skip_serializing_if = "Option::is_none")]
    pub markersize: Option<f64>,
}

impl Style {
    /// Black `x` markers joined by a solid line; what every parsed table
    /// carries unless told otherwise.
    pub fn table_default() -> Self {
        Style {
            color: Some("k".to_string()),
            marker: Some(Marker::Cross),
            ..Default::default()
        }
    }

    pub fn line_style(&self) -> LineStyle {
        self.linestyle.unwrap_or_default()
    }

    pub fn marker(&self) -> Marker {
        self.marker.unwrap_or_default()
    }

    pub fn line_width(&self) -> f64 {
        self.linewidth.unwrap_or(DEFAULT_LINE_WIDTH)
    }

    pub fn marker_size(&self) -> f64 {
        self.markersize.unwrap_or(DEFAULT_MARKER_SIZE)
    }

    /// The explicit colour of this style, if it names one.
    pub fn rgb(&self) -> Result<Option<Rgb>> {
        self.color.as_deref().map(parse_color).transpose()
    }
}

// ---------------------------------------------------------------------------
// StyleSpec – styles requested for one render call
// ---------------------------------------------------------------------------

/// Styles supplied to a render call.
///
/// Either one mapping broadcast to every series, or one entry per series
/// matched by position; a `null` entry keeps that table's own style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleSpec {
    Single(Style),
    PerSeries(Vec<Option<Style>>),
}

impl StyleSpec {
    /// Parse a style specification from JSON text, e.g.
    /// `{"linestyle": "dashed"}` or `[{"c": "r"}, null]`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::Configuration(format!("invalid style '{text}': {e}")))
    }

    /// Resolve the style of every series, given the styles the tables
    /// carry themselves (in plotting order).
    ///
    /// A per-series list must have exactly one entry per table; a length
    /// mismatch fails instead of silently pairing a prefix.
    pub fn resolve(&self, own: &[&Style]) -> Result<Vec<Style>> {
        match self {
            StyleSpec::Single(style) => Ok(vec![style.clone(); own.len()]),
            StyleSpec::PerSeries(styles) => {
                if styles.len() != own.len() {
                    return Err(Error::Configuration(format!(
                        "{} styles given for {} series",
                        styles.len(),
                        own.len()
                    )));
                }
                Ok(styles
                    .iter()
                    .zip(own)
                    .map(|(given, own)| given.clone().unwrap_or_else(|| (*own).clone()))
                    .collect())
            }
        }
    }
}

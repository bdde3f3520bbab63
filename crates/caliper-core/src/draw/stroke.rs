//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: Color, width and dash style of a stroke
//! - [`StrokeStyle`]: Line patterns (solid, dashed, dotted, custom dasharray)
//! - [`apply_stroke!`](crate::apply_stroke!): Macro for applying stroke attributes to node [`Attributes`](crate::draw::Attributes)
//!
//! Provides both mutable (`set_*`) and immutable (`with_*`) APIs.
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke` | `"rgb(0, 255, 0)"` |
//! | `width` | `stroke-width` | `2` |
//! | `style` | `stroke-dasharray` | `"2,3"`, `"1,4"` |

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Defines the dash pattern of a stroke.
///
/// # SVG Mapping
///
/// - `Solid`: No dasharray attribute (removed on patch)
/// - `Dashed`: "5,5"
/// - `Dotted`: "2,3", the default leader-line pattern
/// - `Custom(pattern)`: Uses the provided pattern string
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    /// Custom SVG dasharray pattern, e.g. "1,4"
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" | "" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ if s
                .split([',', ' '])
                .filter(|part| !part.is_empty())
                .all(|part| part.parse::<f64>().is_ok()) =>
            {
                Ok(Self::Custom(s.to_string()))
            }
            _ => Err(format!(
                "invalid stroke style `{s}`, expected solid, dashed, dotted or a dasharray"
            )),
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Dotted => Some("2,3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// A stroke definition for lines, outlines and handle borders.
///
/// # Examples
///
/// ```
/// use caliper_core::draw::{StrokeDefinition, StrokeStyle};
/// use caliper_core::color::Color;
///
/// let stroke = StrokeDefinition::new(Color::new("yellow").unwrap(), 1.0)
///     .with_style(StrokeStyle::Custom("1,4".to_string()));
/// assert_eq!(stroke.style().to_svg_value().as_deref(), Some("1,4"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f64,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    /// Creates a dotted stroke (convenience constructor).
    pub fn dotted(color: Color, width: f64) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dotted)
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Sets the stroke color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the stroke width.
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to a node attribute set.
///
/// Sets `stroke` and `stroke-width`, and sets or removes `stroke-dasharray`
/// depending on whether the style is solid.
///
/// # Examples
///
/// ```
/// use caliper_core::draw::{Attributes, StrokeDefinition};
/// use caliper_core::color::Color;
///
/// let stroke = StrokeDefinition::dotted(Color::new("yellow").unwrap(), 1.0);
/// let attrs = caliper_core::apply_stroke!(Attributes::new().set("x1", 0), &stroke);
/// assert!(attrs.iter().any(|(name, value)| name == "stroke-dasharray" && value == Some("2,3")));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($attributes:expr, $stroke:expr) => {{
        $attributes
            .set("stroke", $stroke.color())
            .set("stroke-width", $stroke.width())
            .set_opt("stroke-dasharray", $stroke.style().to_svg_value())
    }};
}

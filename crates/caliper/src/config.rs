//! Configuration types for the annotation overlay.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from TOML
//! files by front ends. Every section and field falls back to its default
//! when missing.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`StyleConfig`] - Annotation colors, line style, handles and text boxes.
//! - [`MeasurementConfig`] - Recompute throttling.
//! - [`InteractionConfig`] - Pointer proximity, touch cooldown and contour splines.
//!
//! # Example
//!
//! ```
//! # use caliper::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.measurement().throttle_interval().as_millis(), 100);
//! assert!(config.style().color().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use caliper_core::{
    color::Color,
    draw::{HandleShape, StrokeStyle},
    spline::{DEFAULT_RESOLUTION, Spline, SplineKind},
};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Measurement configuration section.
    #[serde(default)]
    measurement: MeasurementConfig,

    /// Interaction configuration section.
    #[serde(default)]
    interaction: InteractionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        style: StyleConfig,
        measurement: MeasurementConfig,
        interaction: InteractionConfig,
    ) -> Self {
        Self {
            style,
            measurement,
            interaction,
        }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the measurement configuration.
    pub fn measurement(&self) -> &MeasurementConfig {
        &self.measurement
    }

    /// Returns the interaction configuration.
    pub fn interaction(&self) -> &InteractionConfig {
        &self.interaction
    }
}

/// Visual styling of annotations.
///
/// Colors are stored as CSS strings and parsed on access, so an invalid color
/// is reported when the style is resolved rather than when the file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stroke color of idle annotations.
    color: String,
    /// Stroke color of selected annotations.
    selected_color: String,
    /// Stroke color of highlighted (hovered) annotations.
    highlighted_color: String,
    /// Stroke color of locked annotations.
    locked_color: String,
    line_width: f64,
    /// Optional dash pattern, `solid`, `dashed`, `dotted` or a dasharray.
    line_dash: Option<String>,
    handle_radius: f64,
    handle_shape: HandleShape,
    text_box: TextBoxConfig,
    /// Draw Cobb arc lines and arc-angle labels.
    show_arc_lines: bool,
    /// Radius of the ellipse center marker; `0` disables it.
    center_point_radius: f64,
}

impl StyleConfig {
    /// Returns the parsed idle stroke [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid CSS color.
    pub fn color(&self) -> Result<Color, String> {
        parse_color("color", &self.color)
    }

    /// Returns the parsed selected stroke [`Color`].
    pub fn selected_color(&self) -> Result<Color, String> {
        parse_color("selected_color", &self.selected_color)
    }

    /// Returns the parsed highlighted stroke [`Color`].
    pub fn highlighted_color(&self) -> Result<Color, String> {
        parse_color("highlighted_color", &self.highlighted_color)
    }

    /// Returns the parsed locked stroke [`Color`].
    pub fn locked_color(&self) -> Result<Color, String> {
        parse_color("locked_color", &self.locked_color)
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Returns the parsed dash pattern, [`StrokeStyle::Solid`] when unset.
    pub fn line_dash(&self) -> Result<StrokeStyle, String> {
        match &self.line_dash {
            Some(dash) => dash
                .parse()
                .map_err(|err| format!("Invalid line_dash in config: {err}")),
            None => Ok(StrokeStyle::Solid),
        }
    }

    pub fn handle_radius(&self) -> f64 {
        self.handle_radius
    }

    pub fn handle_shape(&self) -> HandleShape {
        self.handle_shape
    }

    pub fn text_box(&self) -> &TextBoxConfig {
        &self.text_box
    }

    pub fn show_arc_lines(&self) -> bool {
        self.show_arc_lines
    }

    pub fn center_point_radius(&self) -> f64 {
        self.center_point_radius
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color: "rgb(255, 255, 0)".to_string(),
            selected_color: "rgb(0, 220, 0)".to_string(),
            highlighted_color: "rgb(0, 255, 0)".to_string(),
            locked_color: "rgb(209, 193, 90)".to_string(),
            line_width: 1.0,
            line_dash: None,
            handle_radius: 16.0,
            handle_shape: HandleShape::Circle,
            text_box: TextBoxConfig::default(),
            show_arc_lines: false,
            center_point_radius: 0.0,
        }
    }
}

/// Linked text box settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextBoxConfig {
    /// When false, text boxes are not drawn and stored text box geometry is reset.
    visibility: bool,
    font_family: String,
    font_size: f64,
    color: String,
    /// Background fill; no background rectangle is drawn when unset.
    background: Option<String>,
    pill: bool,
    delete_button: bool,
    /// Draw the dotted leader line to the closest annotation point.
    link: bool,
}

impl TextBoxConfig {
    pub fn visibility(&self) -> bool {
        self.visibility
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Returns the parsed text [`Color`].
    pub fn color(&self) -> Result<Color, String> {
        parse_color("text_box.color", &self.color)
    }

    /// Returns the parsed background [`Color`], or `None` if no background is configured.
    pub fn background(&self) -> Result<Option<Color>, String> {
        self.background
            .as_ref()
            .map(|color| parse_color("text_box.background", color))
            .transpose()
    }

    pub fn pill(&self) -> bool {
        self.pill
    }

    pub fn delete_button(&self) -> bool {
        self.delete_button
    }

    pub fn link(&self) -> bool {
        self.link
    }
}

impl Default for TextBoxConfig {
    fn default() -> Self {
        Self {
            visibility: true,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            color: "rgb(255, 255, 0)".to_string(),
            background: None,
            pill: true,
            delete_button: true,
            link: true,
        }
    }
}

/// Measurement recompute settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Minimum interval between two throttled recomputations of one annotation.
    throttle_interval_ms: u64,
}

impl MeasurementConfig {
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_interval_ms)
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            throttle_interval_ms: 100,
        }
    }
}

/// Pointer interaction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Cooldown gating new placements from touch input.
    touch_cooldown_ms: u64,
    /// Canvas distance within which a pointer grabs a handle or a line.
    handle_proximity: f64,
    /// Canvas distance to the first point that closes a contour.
    close_contour_proximity: f64,
    spline: SplineConfig,
}

impl InteractionConfig {
    pub fn touch_cooldown(&self) -> Duration {
        Duration::from_millis(self.touch_cooldown_ms)
    }

    pub fn handle_proximity(&self) -> f64 {
        self.handle_proximity
    }

    pub fn close_contour_proximity(&self) -> f64 {
        self.close_contour_proximity
    }

    pub fn spline(&self) -> &SplineConfig {
        &self.spline
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            touch_cooldown_ms: 200,
            handle_proximity: 6.0,
            close_contour_proximity: 10.0,
            spline: SplineConfig::default(),
        }
    }
}

/// Contour spline settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplineConfig {
    kind: SplineKind,
    resolution: u32,
    /// Draw the straight connectors between control points.
    show_control_point_connectors: bool,
    /// Draw the preview segment to the pointer while placing.
    draw_preview: bool,
}

impl SplineConfig {
    /// Builds the configured [`Spline`] interpolator.
    pub fn spline(&self) -> Spline {
        Spline::new(self.kind).with_resolution(self.resolution)
    }

    pub fn show_control_point_connectors(&self) -> bool {
        self.show_control_point_connectors
    }

    pub fn draw_preview(&self) -> bool {
        self.draw_preview
    }
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            kind: SplineKind::CatmullRom,
            resolution: DEFAULT_RESOLUTION,
            show_control_point_connectors: false,
            draw_preview: true,
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = AppConfig::default();
        let style = config.style();
        assert!(style.color().is_ok());
        assert!(style.selected_color().is_ok());
        assert!(style.highlighted_color().is_ok());
        assert!(style.locked_color().is_ok());
        assert_eq!(style.line_dash(), Ok(StrokeStyle::Solid));
        assert_eq!(style.text_box().background(), Ok(None));
        assert_eq!(config.interaction().touch_cooldown(), Duration::from_millis(200));
        assert_eq!(config.interaction().spline().spline().kind(), SplineKind::CatmullRom);
    }

    #[test]
    fn test_invalid_color_is_reported_on_access() {
        let style = StyleConfig {
            color: "nope".to_string(),
            ..StyleConfig::default()
        };
        let err = style.color().unwrap_err();
        assert!(err.contains("color"));
    }

    #[test]
    fn test_invalid_dash_is_reported() {
        let style = StyleConfig {
            line_dash: Some("a,b".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.line_dash().is_err());
    }
}

//! Handle markers.
//!
//! Handles mark control points. Each handle is keyed by its group and index,
//! so a handle that is hidden this pass (radius 0) keeps its node instead of
//! being pruned and recreated.

use serde::Deserialize;

use crate::{
    color::Color,
    draw::{
        Attributes, NodeKey, PrimitiveKind, SceneCache, ShapeOptions, StrokeDefinition,
        UpsertOutcome, draw_polyline,
    },
    geometry::Point2,
};

/// Half-length of each arm of the "plus" crosshair
pub const PLUS_RADIUS: f64 = 9.0;

/// Shape of a handle marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleShape {
    #[default]
    Circle,
    /// Rounded square with a side of `1.5 * radius`
    Square,
}

/// Style of a handle marker.
///
/// Defaults: yellow `rgb(255, 255, 0)` outline of width 2, translucent yellow
/// fill, radius 16, circle shape, fully opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleOptions {
    stroke: StrokeDefinition,
    fill: Color,
    radius: f64,
    shape: HandleShape,
    opacity: f64,
}

impl HandleOptions {
    pub fn new(stroke: StrokeDefinition, radius: f64) -> Self {
        Self {
            stroke,
            radius,
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn shape(&self) -> HandleShape {
        self.shape
    }
}

impl Default for HandleOptions {
    fn default() -> Self {
        let yellow = Color::new("rgb(255, 255, 0)").expect("valid CSS color");
        Self {
            stroke: StrokeDefinition::new(yellow, 2.0),
            fill: yellow.with_alpha(0.1),
            radius: 16.0,
            shape: HandleShape::Circle,
            opacity: 1.0,
        }
    }
}

/// Draws a single handle marker centered on `point`
pub fn draw_handle(
    cache: &mut SceneCache,
    annotation_id: &str,
    handle_group: &str,
    point: Point2,
    index: usize,
    options: &HandleOptions,
) -> UpsertOutcome {
    let key = NodeKey::new(
        annotation_id,
        PrimitiveKind::Handle,
        format!("hg-{handle_group}-index-{index}"),
    );
    let (tag, attrs) = match options.shape {
        HandleShape::Circle => (
            "circle",
            Attributes::new()
                .set("cx", point.x())
                .set("cy", point.y())
                .set("r", options.radius),
        ),
        HandleShape::Square => {
            let side = options.radius * 1.5;
            (
                "rect",
                Attributes::new()
                    .set("x", point.x() - side * 0.5)
                    .set("y", point.y() - side * 0.5)
                    .set("width", side)
                    .set("height", side)
                    .set("rx", side * 0.1),
            )
        }
    };
    let attrs = attrs
        .set("stroke", options.stroke.color())
        .set("fill", options.fill)
        .set("stroke-width", options.stroke.width())
        .set("opacity", options.opacity);
    cache.upsert_node(&key, tag, attrs)
}

/// Draws one handle marker per point, indexed by position
pub fn draw_handles(
    cache: &mut SceneCache,
    annotation_id: &str,
    handle_group: &str,
    points: &[Point2],
    options: &HandleOptions,
) {
    for (i, point) in points.iter().enumerate() {
        draw_handle(cache, annotation_id, handle_group, *point, i, options);
    }
}

/// Draws the always-visible "plus" crosshair on every point.
///
/// Each crosshair is two 2-point polylines of half-length [`PLUS_RADIUS`].
pub fn draw_handles_plus(
    cache: &mut SceneCache,
    annotation_id: &str,
    handle_group: &str,
    points: &[Point2],
) {
    let yellow = Color::new("rgb(255, 255, 0)").expect("valid CSS color");
    let options = ShapeOptions::new(StrokeDefinition::new(yellow, 2.0));
    for (i, point) in points.iter().enumerate() {
        let horizontal = [
            Point2::new(point.x() + PLUS_RADIUS, point.y()),
            Point2::new(point.x() - PLUS_RADIUS, point.y()),
        ];
        let vertical = [
            Point2::new(point.x(), point.y() - PLUS_RADIUS),
            Point2::new(point.x(), point.y() + PLUS_RADIUS),
        ];
        draw_polyline(
            cache,
            annotation_id,
            &format!("{handle_group}-plus-h-{i}"),
            &horizontal,
            &options,
            false,
        );
        draw_polyline(
            cache,
            annotation_id,
            &format!("{handle_group}-plus-v-{i}"),
            &vertical,
            &options,
            false,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_handle_defaults() {
        let mut cache = SceneCache::new();
        draw_handle(
            &mut cache,
            "a",
            "0",
            Point2::new(5.0, 6.0),
            0,
            &HandleOptions::default(),
        );
        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Handle, "hg-0-index-0"))
            .unwrap();
        assert_eq!(node.tag(), "circle");
        assert_eq!(node.attribute("cx"), Some("5"));
        assert_eq!(node.attribute("r"), Some("16"));
        assert_eq!(node.attribute("stroke-width"), Some("2"));
        assert_eq!(node.attribute("opacity"), Some("1"));
    }

    #[test]
    fn test_square_handle_geometry() {
        let mut cache = SceneCache::new();
        let options = HandleOptions::default()
            .with_shape(HandleShape::Square)
            .with_radius(4.0);
        draw_handle(&mut cache, "a", "0", Point2::new(10.0, 10.0), 1, &options);
        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Handle, "hg-0-index-1"))
            .unwrap();
        assert_eq!(node.tag(), "rect");
        assert_eq!(node.attribute("width"), Some("6"));
        assert_eq!(node.attribute("x"), Some("7"));
        assert_eq!(node.attribute("rx"), Some(format!("{}", 6.0 * 0.1).as_str()));
    }

    #[test]
    fn test_handles_plus_draws_two_polylines_per_point() {
        let mut cache = SceneCache::new();
        draw_handles_plus(
            &mut cache,
            "a",
            "0",
            &[Point2::new(0.0, 0.0), Point2::new(20.0, 20.0)],
        );
        assert_eq!(cache.len(), 4);
        let v = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Polyline, "0-plus-v-1"))
            .unwrap();
        assert_eq!(v.attribute("points"), Some("20.0, 11.0 20.0, 29.0 "));
    }

    #[test]
    fn test_zero_radius_handle_keeps_node() {
        let mut cache = SceneCache::new();
        let points = [Point2::new(1.0, 1.0)];
        draw_handles(&mut cache, "a", "0", &points, &HandleOptions::default());
        cache.prune_untouched();
        draw_handles(
            &mut cache,
            "a",
            "0",
            &points,
            &HandleOptions::default().with_radius(0.0),
        );
        assert!(cache.prune_untouched().is_empty());
        assert_eq!(cache.len(), 1);
    }
}

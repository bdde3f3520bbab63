//! Lines, polylines and paths.

use crate::{
    apply_stroke,
    color::Color,
    draw::{Attributes, NodeKey, PrimitiveKind, SceneCache, StrokeDefinition, UpsertOutcome},
    geometry::Point2,
};

/// Style options shared by outline primitives (lines, polylines, paths,
/// ellipses and circles).
///
/// `highlight` is the already-resolved emphasis state of the owning
/// annotation. When set, the stroke color is replaced by
/// [`Color::highlight`] regardless of the configured color.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOptions {
    stroke: StrokeDefinition,
    fill: Option<Color>,
    fill_opacity: f64,
    highlight: bool,
}

impl ShapeOptions {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self {
            stroke,
            fill: None,
            fill_opacity: 0.0,
            highlight: false,
        }
    }

    pub fn with_fill(mut self, fill: Color, opacity: f64) -> Self {
        self.fill = Some(fill);
        self.fill_opacity = opacity;
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    /// Stroke after applying the highlight override
    pub fn effective_stroke(&self) -> StrokeDefinition {
        if self.highlight {
            self.stroke.clone().with_color(Color::highlight())
        } else {
            self.stroke.clone()
        }
    }

    pub(crate) fn fill_attributes(&self, attrs: Attributes) -> Attributes {
        match self.fill {
            Some(fill) => attrs.set("fill", fill).set("fill-opacity", self.fill_opacity),
            None => attrs.set("fill", "none").set("fill-opacity", 0),
        }
    }
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self::new(StrokeDefinition::default())
    }
}

/// Draws a straight line between two canvas points.
///
/// The call is skipped (returns `None`) when any coordinate is NaN, which
/// happens when a control point projects outside the viewport camera.
pub fn draw_line(
    cache: &mut SceneCache,
    annotation_id: &str,
    line_uid: &str,
    start: Point2,
    end: Point2,
    options: &ShapeOptions,
) -> Option<UpsertOutcome> {
    if start.is_nan() || end.is_nan() {
        return None;
    }
    let attrs = Attributes::new()
        .set("x1", start.x())
        .set("y1", start.y())
        .set("x2", end.x())
        .set("y2", end.y());
    let attrs = apply_stroke!(attrs, options.effective_stroke());

    let key = NodeKey::new(annotation_id, PrimitiveKind::Line, line_uid);
    Some(cache.upsert_node(&key, "line", attrs))
}

/// Draws an open (or explicitly closed) polyline.
///
/// Polylines never take the highlight override; they are used for
/// decorations such as handle crosshairs and placement previews. Fewer than
/// two points draw nothing.
pub fn draw_polyline(
    cache: &mut SceneCache,
    annotation_id: &str,
    polyline_uid: &str,
    points: &[Point2],
    options: &ShapeOptions,
    close_path: bool,
) -> Option<UpsertOutcome> {
    if points.len() < 2 {
        return None;
    }
    let mut data: String = points
        .iter()
        .map(|p| format!("{:.1}, {:.1} ", p.x(), p.y()))
        .collect();
    if close_path {
        data.push_str(&format!("{:.1}, {:.1}", points[0].x(), points[0].y()));
    }

    let attrs = apply_stroke!(Attributes::new().set("points", data), options.stroke());
    let attrs = options.fill_attributes(attrs);

    let key = NodeKey::new(annotation_id, PrimitiveKind::Polyline, polyline_uid);
    Some(cache.upsert_node(&key, "polyline", attrs))
}

/// Builds SVG path data for one or more contours.
///
/// Each contour with at least two points becomes its own `M ... L ...`
/// subpath, terminated by `Z` when `close_path` is set. Interior holes are
/// therefore additional subpaths of the same path primitive.
///
/// # Examples
///
/// ```
/// # use caliper_core::draw::path_data;
/// # use caliper_core::geometry::Point2;
/// let outer = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(4.0, 4.0)];
/// assert_eq!(
///     path_data(&[outer], true),
///     "M 0.0, 0.0 L 4.0, 0.0 L 4.0, 4.0 Z "
/// );
/// ```
pub fn path_data(contours: &[Vec<Point2>], close_path: bool) -> String {
    let mut data = String::new();
    for contour in contours.iter().filter(|c| c.len() >= 2) {
        for (j, point) in contour.iter().enumerate() {
            let cmd = if j == 0 { "M" } else { "L" };
            data.push_str(&format!("{cmd} {:.1}, {:.1} ", point.x(), point.y()));
        }
        if close_path {
            data.push_str("Z ");
        }
    }
    data
}

/// Draws a path made of an outer contour followed by any hole contours.
///
/// Returns `None` when no contour has enough points to draw.
pub fn draw_path(
    cache: &mut SceneCache,
    annotation_id: &str,
    path_uid: &str,
    contours: &[Vec<Point2>],
    options: &ShapeOptions,
    close_path: bool,
) -> Option<UpsertOutcome> {
    let data = path_data(contours, close_path);
    if data.is_empty() {
        return None;
    }
    let attrs = apply_stroke!(Attributes::new().set("d", data), options.effective_stroke());
    let attrs = options.fill_attributes(attrs);

    let key = NodeKey::new(annotation_id, PrimitiveKind::Path, path_uid);
    Some(cache.upsert_node(&key, "path", attrs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green_line() -> ShapeOptions {
        ShapeOptions::new(StrokeDefinition::new(Color::new("rgb(0, 255, 0)").unwrap(), 2.0))
    }

    #[test]
    fn test_draw_line_creates_node() {
        let mut cache = SceneCache::new();
        let outcome = draw_line(
            &mut cache,
            "a",
            "1",
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            &green_line(),
        );
        assert_eq!(outcome, Some(UpsertOutcome::Created));

        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Line, "1"))
            .unwrap();
        assert_eq!(node.tag(), "line");
        assert_eq!(node.attribute("x2"), Some("3"));
        assert_eq!(node.attribute("y2"), Some("4"));
        assert_eq!(node.attribute("stroke-width"), Some("2"));
        assert_eq!(node.attribute("stroke-dasharray"), None);
    }

    #[test]
    fn test_draw_line_skips_nan() {
        let mut cache = SceneCache::new();
        let outcome = draw_line(
            &mut cache,
            "a",
            "1",
            Point2::new(f64::NAN, 0.0),
            Point2::new(3.0, 4.0),
            &green_line(),
        );
        assert_eq!(outcome, None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_highlight_overrides_color() {
        let mut cache = SceneCache::new();
        let options = green_line().with_highlight(true);
        draw_line(
            &mut cache,
            "a",
            "1",
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            &options,
        );
        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Line, "1"))
            .unwrap();
        assert_eq!(node.attribute("stroke"), Some(Color::highlight().to_string().as_str()));
    }

    #[test]
    fn test_polyline_points_format() {
        let mut cache = SceneCache::new();
        let points = [Point2::new(1.04, 2.0), Point2::new(3.0, 4.26)];
        draw_polyline(&mut cache, "a", "p", &points, &ShapeOptions::default(), false);

        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Polyline, "p"))
            .unwrap();
        assert_eq!(node.attribute("points"), Some("1.0, 2.0 3.0, 4.3 "));
        assert_eq!(node.attribute("fill"), Some("none"));
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let mut cache = SceneCache::new();
        let outcome = draw_polyline(
            &mut cache,
            "a",
            "p",
            &[Point2::new(0.0, 0.0)],
            &ShapeOptions::default(),
            false,
        );
        assert!(outcome.is_none());
    }

    #[test]
    fn test_path_with_hole_has_two_subpaths() {
        let outer = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        let hole = vec![Point2::new(2.0, 2.0), Point2::new(4.0, 2.0), Point2::new(4.0, 4.0)];
        let data = path_data(&[outer, hole], true);
        assert_eq!(data.matches('M').count(), 2);
        assert_eq!(data.matches('Z').count(), 2);
    }

    #[test]
    fn test_path_skips_degenerate_contours() {
        let mut cache = SceneCache::new();
        let outcome = draw_path(
            &mut cache,
            "a",
            "contour",
            &[vec![Point2::new(0.0, 0.0)]],
            &ShapeOptions::default(),
            true,
        );
        assert!(outcome.is_none());
    }
}

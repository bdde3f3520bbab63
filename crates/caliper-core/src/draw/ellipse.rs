//! Ellipses and circles.

use crate::{
    apply_stroke,
    draw::{Attributes, NodeKey, PrimitiveKind, SceneCache, ShapeOptions, UpsertOutcome},
    geometry::Point2,
};

/// Center, radii and rotation of an ellipse defined by two diameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseGeometry {
    center: Point2,
    radius_x: f64,
    radius_y: f64,
    angle_degrees: f64,
}

impl EllipseGeometry {
    /// Derives the ellipse from four canvas points ordered
    /// `[bottom, top, left, right]`.
    ///
    /// The width is the left-right distance, the height the top-bottom
    /// distance, and the rotation is the direction of the right-to-left
    /// vector. The center takes its x from the horizontal diameter and its y
    /// from the vertical one.
    ///
    /// # Examples
    ///
    /// ```
    /// # use caliper_core::draw::EllipseGeometry;
    /// # use caliper_core::geometry::Point2;
    /// let e = EllipseGeometry::from_diameters([
    ///     Point2::new(50.0, 60.0), // bottom
    ///     Point2::new(50.0, 40.0), // top
    ///     Point2::new(20.0, 50.0), // left
    ///     Point2::new(80.0, 50.0), // right
    /// ]);
    /// assert_eq!(e.center(), Point2::new(50.0, 50.0));
    /// assert_eq!(e.radius_x(), 30.0);
    /// assert_eq!(e.radius_y(), 10.0);
    /// ```
    pub fn from_diameters(points: [Point2; 4]) -> Self {
        let [bottom, top, left, right] = points;
        let width = left.distance(right);
        let height = top.distance(bottom);
        let angle_degrees = (left.y() - right.y())
            .atan2(left.x() - right.x())
            .to_degrees();
        let center = Point2::new((left.x() + right.x()) / 2.0, (top.y() + bottom.y()) / 2.0);
        Self {
            center,
            radius_x: width / 2.0,
            radius_y: height / 2.0,
            angle_degrees,
        }
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    /// Area of the ellipse in canvas pixels
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius_x * self.radius_y
    }
}

/// Draws a rotated ellipse through two perpendicular diameters.
///
/// `points` are canvas points ordered `[bottom, top, left, right]`.
pub fn draw_ellipse(
    cache: &mut SceneCache,
    annotation_id: &str,
    ellipse_uid: &str,
    points: [Point2; 4],
    options: &ShapeOptions,
) -> UpsertOutcome {
    let geometry = EllipseGeometry::from_diameters(points);
    let center = geometry.center();
    let attrs = Attributes::new()
        .set("cx", center.x())
        .set("cy", center.y())
        .set("rx", geometry.radius_x())
        .set("ry", geometry.radius_y())
        .set("fill", "transparent")
        .set(
            "transform",
            format!(
                "rotate({} {} {})",
                geometry.angle_degrees(),
                center.x(),
                center.y()
            ),
        );
    let attrs = apply_stroke!(attrs, options.effective_stroke());

    let key = NodeKey::new(annotation_id, PrimitiveKind::Ellipse, ellipse_uid);
    cache.upsert_node(&key, "ellipse", attrs)
}

/// Draws a circle. Circles are decorations and never take the highlight
/// override.
pub fn draw_circle(
    cache: &mut SceneCache,
    annotation_id: &str,
    circle_uid: &str,
    center: Point2,
    radius: f64,
    options: &ShapeOptions,
) -> UpsertOutcome {
    let attrs = Attributes::new()
        .set("cx", center.x())
        .set("cy", center.y())
        .set("r", radius);
    let attrs = apply_stroke!(attrs, options.stroke());
    let attrs = options.fill_attributes(attrs);

    let key = NodeKey::new(annotation_id, PrimitiveKind::Circle, circle_uid);
    cache.upsert_node(&key, "circle", attrs)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_axis_aligned_ellipse_has_half_turn_rotation() {
        // right-to-left vector points along -x
        let e = EllipseGeometry::from_diameters([
            Point2::new(0.0, 5.0),
            Point2::new(0.0, -5.0),
            Point2::new(-10.0, 0.0),
            Point2::new(10.0, 0.0),
        ]);
        assert_approx_eq!(f64, e.angle_degrees(), 180.0);
        assert_approx_eq!(f64, e.area(), std::f64::consts::PI * 50.0);
    }

    #[test]
    fn test_rotated_ellipse_angle() {
        let e = EllipseGeometry::from_diameters([
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, -1.0),
            Point2::new(-2.0, 2.0),
            Point2::new(2.0, -2.0),
        ]);
        assert_approx_eq!(f64, e.angle_degrees(), 135.0);
        assert_approx_eq!(f64, e.radius_x(), 8f64.sqrt());
        assert_approx_eq!(f64, e.radius_y(), 2f64.sqrt());
    }

    #[test]
    fn test_draw_ellipse_transform() {
        let mut cache = SceneCache::new();
        let points = [
            Point2::new(50.0, 60.0),
            Point2::new(50.0, 40.0),
            Point2::new(20.0, 50.0),
            Point2::new(80.0, 50.0),
        ];
        draw_ellipse(&mut cache, "a", "ellipse", points, &ShapeOptions::default());
        let angle = EllipseGeometry::from_diameters(points).angle_degrees();
        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Ellipse, "ellipse"))
            .unwrap();
        assert_eq!(
            node.attribute("transform"),
            Some(format!("rotate({angle} 50 50)").as_str())
        );
        assert_eq!(node.attribute("rx"), Some("30"));
        assert_eq!(node.attribute("fill"), Some("transparent"));
    }

    #[test]
    fn test_draw_circle() {
        let mut cache = SceneCache::new();
        draw_circle(
            &mut cache,
            "a",
            "center",
            Point2::new(1.0, 2.0),
            3.0,
            &ShapeOptions::default(),
        );
        let node = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Circle, "center"))
            .unwrap();
        assert_eq!(node.attribute("r"), Some("3"));
    }
}

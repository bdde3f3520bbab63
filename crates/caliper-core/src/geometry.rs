//! Geometric primitives and pure math helpers for annotation overlays.
//!
//! This module provides the coordinate types and the side-effect-free
//! functions every other layer of Caliper is built on: distances, midpoints,
//! bounding boxes, polygon area and closest-point searches.
//!
//! # Overview
//!
//! - [`Point2`] - A 2D coordinate in canvas space
//! - [`Point3`] - A 3D coordinate in world space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle in canvas space
//! - [`Bounds3`] - An axis-aligned box in world space
//!
//! Free functions:
//! - [`polygon_area`] - Shoelace area of a simple polygon
//! - [`distance_2d`] / [`distance_3d`] - Euclidean distance
//! - [`midpoint_2d`] / [`midpoint_3d`] - Arithmetic mean of a point set
//! - [`bounding_box_2d`] / [`bounding_box_3d`] - Single-scan bounding boxes
//! - [`closest_point`] - Nearest candidate to a target
//! - [`chord_peak_vector`] - Peak characterization of an open U-shaped contour
//!
//! # Coordinate System
//!
//! Canvas coordinates follow the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! World coordinates are owned by the host viewport and are opaque to this
//! module; they only need to form a Euclidean space.

/// A 2D point in canvas (pixel) space.
///
/// # Examples
///
/// ```
/// # use caliper_core::geometry::Point2;
/// let p1 = Point2::new(10.0, 20.0);
/// let p2 = Point2::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2 {
    x: f64,
    y: f64,
}

impl Point2 {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns true if either coordinate is NaN
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point2) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point2) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point2) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Euclidean length of the point treated as a vector
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns the unit vector in the same direction.
    ///
    /// A zero-length vector is returned unchanged.
    pub fn normalize(self) -> Self {
        let len = self.hypot();
        if len == 0.0 { self } else { self.scale(1.0 / len) }
    }

    /// Dot product with another vector
    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point2) -> f64 {
        self.sub_point(other).hypot()
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A 3D point in world space.
///
/// Control points of every annotation are stored as `Point3`; the host
/// viewport projects them to [`Point2`] for drawing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point3 {
    x: f64,
    y: f64,
    z: f64,
}

impl Point3 {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin, also used as the "reset" value for text box geometry
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn z(self) -> f64 {
        self.z
    }

    /// Adds another point (or delta) to this point
    ///
    /// # Examples
    ///
    /// ```
    /// # use caliper_core::geometry::Point3;
    /// let p = Point3::new(1.0, 2.0, 3.0).add_point(Point3::new(5.0, 0.0, -1.0));
    /// assert_eq!(p, Point3::new(6.0, 2.0, 2.0));
    /// ```
    pub fn add_point(self, other: Point3) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Subtracts another point from this point
    pub fn sub_point(self, other: Point3) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Midpoint between this point and another point
    pub fn midpoint(self, other: Point3) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }

    /// Multiplies all coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Euclidean length of the point treated as a vector
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Dot product with another vector
    pub fn dot(self, other: Point3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product with another vector
    pub fn cross(self, other: Point3) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Returns the unit vector in the same direction; zero stays zero
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 { self } else { self.scale(1.0 / len) }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point3) -> f64 {
        self.sub_point(other).length()
    }

    /// Returns true if the two vectors point the same way within `tolerance`
    /// (compared on the normalized vectors).
    pub fn is_parallel_to(self, other: Point3, tolerance: f64) -> bool {
        self.normalize().distance(other.normalize()) <= tolerance
    }

    /// Returns the coordinates as an array
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned rectangle in canvas space.
///
/// Text boxes report their realized placement as a `Bounds` so callers can
/// project the corners back to world space.
///
/// # Examples
///
/// ```
/// # use caliper_core::geometry::{Bounds, Point2, Size};
/// let b = Bounds::new_from_top_left(Point2::new(10.0, 20.0), Size::new(30.0, 40.0));
/// assert_eq!(b.max_x(), 40.0);
/// assert_eq!(b.center(), Point2::new(25.0, 40.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from explicit extremes
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point2, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a point
    pub fn min_point(self) -> Point2 {
        Point2::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a [`Size`]
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Corners in the order top-left, top-right, bottom-left, bottom-right
    pub fn corners(self) -> [Point2; 4] {
        [
            Point2::new(self.min_x, self.min_y),
            Point2::new(self.max_x, self.min_y),
            Point2::new(self.min_x, self.max_y),
            Point2::new(self.max_x, self.max_y),
        ]
    }

    /// Midpoints of the four edges: top, left, bottom, right
    pub fn edge_midpoints(self) -> [Point2; 4] {
        let center = self.center();
        [
            Point2::new(center.x, self.min_y),
            Point2::new(self.min_x, center.y),
            Point2::new(center.x, self.max_y),
            Point2::new(self.max_x, center.y),
        ]
    }

    /// Returns true if `point` lies inside or on the border
    pub fn contains(self, point: Point2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Merges two bounds into the smallest bounds containing both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds3 {
    min: Point3,
    max: Point3,
}

impl Bounds3 {
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    pub fn min(self) -> Point3 {
        self.min
    }

    pub fn max(self) -> Point3 {
        self.max
    }

    /// Extent along each axis
    pub fn extent(self) -> Point3 {
        self.max.sub_point(self.min)
    }
}

/// Area of a simple polygon using the shoelace formula.
///
/// The result is always non-negative, independent of vertex orientation.
/// Fewer than three vertices yield zero.
///
/// # Examples
///
/// ```
/// # use caliper_core::geometry::{polygon_area, Point2};
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// assert_eq!(polygon_area(&square), 4.0);
/// ```
pub fn polygon_area(polygon: &[Point2]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = polygon.len() - 1;
    for (i, pi) in polygon.iter().enumerate() {
        let pj = polygon[j];
        sum += (pj.x + pi.x) * (pj.y - pi.y);
        j = i;
    }
    sum.abs() / 2.0
}

/// Euclidean distance between two canvas points
pub fn distance_2d(a: Point2, b: Point2) -> f64 {
    a.distance(b)
}

/// Euclidean distance between two world points
pub fn distance_3d(a: Point3, b: Point3) -> f64 {
    a.distance(b)
}

/// Arithmetic mean of a set of canvas points; `None` when empty
pub fn midpoint_2d(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Point2::default(), |acc, p| acc.add_point(*p));
    Some(sum.scale(1.0 / points.len() as f64))
}

/// Arithmetic mean of a set of world points; `None` when empty
pub fn midpoint_3d(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Point3::default(), |acc, p| acc.add_point(*p));
    Some(sum.scale(1.0 / points.len() as f64))
}

/// Bounding rectangle of a set of canvas points in a single scan
pub fn bounding_box_2d(points: &[Point2]) -> Option<Bounds> {
    let (first, rest) = points.split_first()?;
    let init = Bounds::new(first.x, first.y, first.x, first.y);
    Some(rest.iter().fold(init, |b, p| Bounds {
        min_x: b.min_x.min(p.x),
        min_y: b.min_y.min(p.y),
        max_x: b.max_x.max(p.x),
        max_y: b.max_y.max(p.y),
    }))
}

/// Bounding box of a set of world points in a single scan
pub fn bounding_box_3d(points: &[Point3]) -> Option<Bounds3> {
    let (first, rest) = points.split_first()?;
    Some(rest.iter().fold(Bounds3::new(*first, *first), |b, p| {
        Bounds3::new(
            Point3::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
            Point3::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
        )
    }))
}

/// Returns the candidate closest to `target`.
///
/// Ties are resolved in favor of the first occurrence. `None` for an empty
/// candidate list.
///
/// # Examples
///
/// ```
/// # use caliper_core::geometry::{closest_point, Point2};
/// let candidates = [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
/// let closest = closest_point(&candidates, Point2::new(8.0, 1.0));
/// assert_eq!(closest, Some(Point2::new(10.0, 0.0)));
/// ```
pub fn closest_point(candidates: &[Point2], target: Point2) -> Option<Point2> {
    let mut best: Option<(Point2, f64)> = None;
    for candidate in candidates {
        let dist = candidate.distance(target);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((*candidate, dist)),
        }
    }
    best.map(|(point, _)| point)
}

/// Characterizes an open U-shaped contour by its peak.
///
/// Computes the midpoint of the chord between the first and last points and
/// returns `[farthest_point, chord_midpoint]`, where `farthest_point` is the
/// point of the contour farthest from that midpoint. Ties keep the earliest
/// point. `None` for an empty contour.
pub fn chord_peak_vector(ordered_points: &[Point2]) -> Option<[Point2; 2]> {
    let first = *ordered_points.first()?;
    let last = *ordered_points.last()?;
    let chord_mid = first.midpoint(last);

    let mut farthest = (0.0, first);
    for point in ordered_points {
        let dist = point.distance(chord_mid);
        if dist > farthest.0 {
            farthest = (dist, *point);
        }
    }
    Some([farthest.1, chord_mid])
}

/// Shortest distance from `point` to the segment `a`-`b`
pub fn distance_to_segment(point: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b.sub_point(a);
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = (point.sub_point(a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a.add_point(ab.scale(t)))
}

/// Default text anchor for a set of canvas points: the right-most x, and the
/// vertical center of the points.
pub fn text_box_anchor(points: &[Point2]) -> Option<Point2> {
    let bounds = bounding_box_2d(points)?;
    Some(Point2::new(
        bounds.max_x(),
        (bounds.min_y() + bounds.max_y()) / 2.0,
    ))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_polygon_area_square() {
        assert_approx_eq!(f64, polygon_area(&square()), 4.0);
    }

    #[test]
    fn test_polygon_area_triangle() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 3.0),
        ];
        assert_approx_eq!(f64, polygon_area(&tri), 6.0);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(
            polygon_area(&[Point2::new(1.0, 1.0), Point2::new(2.0, 2.0)]),
            0.0
        );
    }

    #[test]
    fn test_distance() {
        assert_approx_eq!(
            f64,
            distance_2d(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)),
            5.0
        );
        assert_approx_eq!(
            f64,
            distance_3d(Point3::new(1.0, 2.0, 3.0), Point3::new(3.0, 4.0, 4.0)),
            3.0
        );
    }

    #[test]
    fn test_midpoint_preserves_dimension() {
        let mid = midpoint_2d(&square()).unwrap();
        assert_eq!(mid, Point2::new(1.0, 1.0));

        let mid3 = midpoint_3d(&[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)]).unwrap();
        assert_eq!(mid3, Point3::new(1.0, 2.0, 3.0));

        assert!(midpoint_2d(&[]).is_none());
    }

    #[test]
    fn test_bounding_boxes() {
        let b = bounding_box_2d(&[
            Point2::new(3.0, -1.0),
            Point2::new(-2.0, 5.0),
            Point2::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(-2.0, -1.0, 3.0, 5.0));

        let b3 = bounding_box_3d(&[Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 5.0, 0.0)]).unwrap();
        assert_eq!(b3.min(), Point3::new(-1.0, 2.0, 0.0));
        assert_eq!(b3.max(), Point3::new(1.0, 5.0, 3.0));
        assert_eq!(b3.extent(), Point3::new(2.0, 3.0, 3.0));

        assert!(bounding_box_2d(&[]).is_none());
    }

    #[test]
    fn test_closest_point_ties_keep_first() {
        let candidates = [Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(
            closest_point(&candidates, Point2::new(0.0, 0.0)),
            Some(Point2::new(-1.0, 0.0))
        );
        assert_eq!(closest_point(&[], Point2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_chord_peak_vector_u_shape() {
        let u = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 3.0),
            Point2::new(2.0, 4.0),
            Point2::new(3.0, 3.0),
            Point2::new(4.0, 0.0),
        ];
        let [peak, mid] = chord_peak_vector(&u).unwrap();
        assert_eq!(peak, Point2::new(2.0, 4.0));
        assert_eq!(mid, Point2::new(2.0, 0.0));
    }

    #[test]
    fn test_chord_peak_vector_single_point() {
        let [peak, mid] = chord_peak_vector(&[Point2::new(1.0, 1.0)]).unwrap();
        assert_eq!(peak, Point2::new(1.0, 1.0));
        assert_eq!(mid, Point2::new(1.0, 1.0));
        assert!(chord_peak_vector(&[]).is_none());
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_approx_eq!(f64, distance_to_segment(Point2::new(5.0, 3.0), a, b), 3.0);
        assert_approx_eq!(f64, distance_to_segment(Point2::new(-4.0, 3.0), a, b), 5.0);
        assert_approx_eq!(f64, distance_to_segment(Point2::new(1.0, 1.0), a, a), 2f64.sqrt());
    }

    #[test]
    fn test_text_box_anchor() {
        let anchor = text_box_anchor(&[Point2::new(0.0, 0.0), Point2::new(10.0, 4.0)]).unwrap();
        assert_eq!(anchor, Point2::new(10.0, 2.0));
    }

    #[test]
    fn test_bounds_corners_and_edges() {
        let b = Bounds::new_from_top_left(Point2::new(0.0, 0.0), Size::new(4.0, 2.0));
        assert_eq!(b.corners()[3], Point2::new(4.0, 2.0));
        assert_eq!(b.edge_midpoints()[0], Point2::new(2.0, 0.0));
        assert_eq!(b.edge_midpoints()[3], Point2::new(4.0, 1.0));
        assert!(b.contains(Point2::new(4.0, 1.0)));
        assert!(!b.contains(Point2::new(4.1, 1.0)));
    }

    #[test]
    fn test_point3_vector_ops() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Point3::new(0.0, 0.0, 1.0));
        assert_approx_eq!(f64, Point3::new(0.0, 3.0, 4.0).length(), 5.0);
        assert!(Point3::new(0.0, 0.0, 2.0).is_parallel_to(Point3::new(0.0, 0.0, 5.0), 1e-6));
        assert!(!x.is_parallel_to(y, 1e-6));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point2> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point2::new(x, y))
    }

    fn polygon_strategy() -> impl Strategy<Value = Vec<Point2>> {
        prop::collection::vec(point_strategy(), 3..24)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Reversing vertex order must not change the area.
    fn check_area_is_orientation_independent(points: Vec<Point2>) -> Result<(), TestCaseError> {
        let forward = polygon_area(&points);
        let mut reversed = points.clone();
        reversed.reverse();
        let backward = polygon_area(&reversed);

        prop_assert!(approx_eq!(f64, forward, backward, epsilon = 1e-6));
        prop_assert!(forward >= 0.0);
        Ok(())
    }

    /// No candidate is strictly closer than the one returned.
    fn check_closest_point_is_minimal(
        candidates: Vec<Point2>,
        target: Point2,
    ) -> Result<(), TestCaseError> {
        let best = closest_point(&candidates, target).expect("non-empty candidates");
        let best_dist = best.distance(target);
        for candidate in &candidates {
            prop_assert!(candidate.distance(target) >= best_dist);
        }
        Ok(())
    }

    /// The mean of a point set lies inside its bounding box.
    fn check_midpoint_within_bounds(points: Vec<Point2>) -> Result<(), TestCaseError> {
        let mid = midpoint_2d(&points).expect("non-empty points");
        let bounds = bounding_box_2d(&points).expect("non-empty points");

        prop_assert!(mid.x() >= bounds.min_x() - 1e-9 && mid.x() <= bounds.max_x() + 1e-9);
        prop_assert!(mid.y() >= bounds.min_y() - 1e-9 && mid.y() <= bounds.max_y() + 1e-9);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn area_is_orientation_independent(points in polygon_strategy()) {
            check_area_is_orientation_independent(points)?;
        }

        #[test]
        fn closest_point_is_minimal(candidates in polygon_strategy(), target in point_strategy()) {
            check_closest_point_is_minimal(candidates, target)?;
        }

        #[test]
        fn midpoint_within_bounds(points in polygon_strategy()) {
            check_midpoint_within_bounds(points)?;
        }
    }
}

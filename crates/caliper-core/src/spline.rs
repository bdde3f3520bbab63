//! Spline interpolation for contour annotations.
//!
//! Contours are edited through a small set of control points; the drawn and
//! measured outline is the interpolated polyline produced here.
//!
//! # Overview
//!
//! - [`SplineKind`] - Interpolation family (linear, Catmull-Rom, cardinal)
//! - [`Spline`] - Interpolator configured with a kind and a resolution
//!
//! Cardinal splines use Hermite segments with tangents
//! `scale * (p[i+1] - p[i-1])`; Catmull-Rom is the cardinal spline with a
//! scale of `0.5`. Open splines clamp the missing neighbors at both ends.

use serde::Deserialize;

use crate::geometry::Point2;

/// Number of interpolated points per segment unless configured otherwise
pub const DEFAULT_RESOLUTION: u32 = 20;

/// Tension used by Catmull-Rom splines
pub const CATMULL_ROM_SCALE: f64 = 0.5;

/// Interpolation family used to turn control points into a polyline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SplineKind {
    /// Straight segments between control points
    #[default]
    Linear,
    /// Catmull-Rom spline passing through every control point
    CatmullRom,
    /// Cardinal spline with a configurable tangent scale
    Cardinal { scale: f64 },
}

/// Interpolator for contour control points.
///
/// # Examples
///
/// ```
/// # use caliper_core::spline::{Spline, SplineKind};
/// # use caliper_core::geometry::Point2;
/// let spline = Spline::new(SplineKind::CatmullRom).with_resolution(4);
/// let points = [
///     Point2::new(0.0, 0.0),
///     Point2::new(10.0, 0.0),
///     Point2::new(10.0, 10.0),
/// ];
/// let polyline = spline.interpolate(&points, false);
/// // every control point is part of the output
/// assert_eq!(polyline.first(), Some(&points[0]));
/// assert_eq!(polyline.last(), Some(&points[2]));
/// assert_eq!(polyline.len(), 2 * 5 + 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spline {
    kind: SplineKind,
    resolution: u32,
}

impl Spline {
    pub fn new(kind: SplineKind) -> Self {
        Self {
            kind,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    /// Sets the number of intermediate points generated per segment
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Interpolates `control_points` into a polyline.
    ///
    /// For closed splines the segment from the last control point back to
    /// the first is included, without repeating the first point at the end.
    pub fn interpolate(&self, control_points: &[Point2], closed: bool) -> Vec<Point2> {
        let scale = match self.kind {
            SplineKind::Linear => return control_points.to_vec(),
            SplineKind::CatmullRom => CATMULL_ROM_SCALE,
            SplineKind::Cardinal { scale } => scale,
        };
        let n = control_points.len();
        if n < 3 {
            return control_points.to_vec();
        }

        let at = |i: isize| -> Point2 {
            if closed {
                control_points[i.rem_euclid(n as isize) as usize]
            } else {
                control_points[i.clamp(0, n as isize - 1) as usize]
            }
        };

        let segments = if closed { n } else { n - 1 };
        let steps = self.resolution + 1;
        let mut out = Vec::with_capacity(segments * steps as usize + 1);
        for seg in 0..segments as isize {
            let (p0, p1, p2, p3) = (at(seg - 1), at(seg), at(seg + 1), at(seg + 2));
            let m1 = p2.sub_point(p0).scale(scale);
            let m2 = p3.sub_point(p1).scale(scale);
            for step in 0..steps {
                let t = f64::from(step) / f64::from(steps);
                out.push(hermite(p1, p2, m1, m2, t));
            }
        }
        if !closed {
            out.push(control_points[n - 1]);
        }
        out
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new(SplineKind::default())
    }
}

fn hermite(p1: Point2, p2: Point2, m1: Point2, m2: Point2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    p1.scale(h00)
        .add_point(m1.scale(h10))
        .add_point(p2.scale(h01))
        .add_point(m2.scale(h11))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_linear_returns_control_points() {
        let spline = Spline::default();
        assert_eq!(spline.kind(), SplineKind::Linear);
        assert_eq!(spline.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(spline.interpolate(&square(), true), square());
    }

    #[test]
    fn test_closed_catmull_rom_passes_through_control_points() {
        let spline = Spline::new(SplineKind::CatmullRom).with_resolution(3);
        let out = spline.interpolate(&square(), true);
        assert_eq!(out.len(), 4 * 4);
        for (i, cp) in square().iter().enumerate() {
            let p = out[i * 4];
            assert_approx_eq!(f64, p.x(), cp.x());
            assert_approx_eq!(f64, p.y(), cp.y());
        }
    }

    #[test]
    fn test_cardinal_zero_scale_stays_on_chords() {
        let spline = Spline::new(SplineKind::Cardinal { scale: 0.0 }).with_resolution(1);
        let out = spline.interpolate(&square(), false);
        // a zero tangent Hermite segment at t=0.5 is the chord midpoint
        assert_approx_eq!(f64, out[1].x(), 5.0);
        assert_approx_eq!(f64, out[1].y(), 0.0);
        assert_eq!(*out.last().unwrap(), Point2::new(0.0, 10.0));
    }

    #[test]
    fn test_short_input_is_returned_unchanged() {
        let spline = Spline::new(SplineKind::CatmullRom);
        let two = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)];
        assert_eq!(spline.interpolate(&two, true), two.to_vec());
    }
}

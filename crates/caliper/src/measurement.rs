//! Measurement calculator.
//!
//! Derives calibrated statistics from an annotation's world-space control
//! points and caches them on the annotation per display target.
//!
//! # Overview
//!
//! - [`compute_stats`] - Pure computation of the [`Measurement`] of one annotation
//! - [`ThrottlePolicy`] - Minimum interval between recomputations of one annotation
//! - [`MeasurementCalculator`] - Lazy refresh policy applied on every render pass
//!
//! # Refresh policy
//!
//! A target without a trusted cache entry is computed immediately. A trusted
//! entry on an invalidated annotation is recomputed through the throttle, so a
//! burst of drag events turns into a bounded number of recomputations. A
//! throttled-out annotation stays invalidated and is picked up by a later
//! pass, or flushed explicitly with [`MeasurementCalculator::refresh_now`].

use std::{collections::HashMap, time::Duration};

use log::debug;

use caliper_core::{
    draw::EllipseGeometry,
    geometry::{Point2, Point3, distance_3d, polygon_area},
};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    calibration::Calibration,
    events::{AnnotationEvent, ChangeNotifier, ChangeType},
    viewport::Viewport,
};

/// Rate limit of throttled recomputations, tracked per annotation.
#[derive(Debug, Clone)]
pub struct ThrottlePolicy {
    min_interval: Duration,
    last_run: HashMap<String, Duration>,
}

impl ThrottlePolicy {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_run: HashMap::new(),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns true and records a run when `key` may run at `now`.
    pub fn try_acquire(&mut self, key: &str, now: Duration) -> bool {
        let allowed = match self.last_run.get(key) {
            Some(last) => now.saturating_sub(*last) >= self.min_interval,
            None => true,
        };
        if allowed {
            self.record(key, now);
        }
        allowed
    }

    /// Records a run of `key` that bypassed the throttle.
    pub fn record(&mut self, key: &str, now: Duration) {
        self.last_run.insert(key.to_string(), now);
    }

    pub fn forget(&mut self, key: &str) {
        self.last_run.remove(key);
    }
}

/// What [`MeasurementCalculator::ensure_fresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRefresh {
    /// No trusted cache existed; stats were computed synchronously
    Immediate,
    /// Invalidated stats were recomputed through the throttle
    Throttled,
    /// Invalidated, but rate limited; the stale cache is kept
    Deferred,
    /// Cache was trusted and current
    Fresh,
    /// The annotation does not have its required points yet
    Incomplete,
}

/// Keeps annotation stats fresh for the viewport being rendered.
#[derive(Debug, Clone)]
pub struct MeasurementCalculator {
    throttle: ThrottlePolicy,
}

impl MeasurementCalculator {
    pub fn new(throttle: ThrottlePolicy) -> Self {
        Self { throttle }
    }

    pub fn throttle(&self) -> &ThrottlePolicy {
        &self.throttle
    }

    /// Applies the lazy refresh policy to `annotation` for `viewport`.
    pub fn ensure_fresh(
        &mut self,
        annotation: &mut Annotation,
        viewport: &dyn Viewport,
        calibration: &dyn Calibration,
        notifier: &dyn ChangeNotifier,
        now: Duration,
    ) -> StatsRefresh {
        if !annotation.has_required_points() {
            return StatsRefresh::Incomplete;
        }
        let target_id = viewport.target_id();
        let refresh = if !annotation.has_trusted_stats(&target_id) {
            self.throttle.record(annotation.id(), now);
            StatsRefresh::Immediate
        } else if !annotation.is_invalidated() {
            return StatsRefresh::Fresh;
        } else if self.throttle.try_acquire(annotation.id(), now) {
            StatsRefresh::Throttled
        } else {
            debug!(annotation_id = annotation.id(); "Stats recompute deferred");
            return StatsRefresh::Deferred;
        };

        debug!(
            annotation_id = annotation.id(),
            target_id = target_id.as_str(),
            refresh:? = refresh;
            "Computing stats"
        );
        store_stats(annotation, viewport, calibration, notifier, target_id);
        refresh
    }

    /// Recomputes stats unconditionally, bypassing the throttle.
    ///
    /// Used when a gesture ends so the final geometry is never left with
    /// stale stats.
    pub fn refresh_now(
        &mut self,
        annotation: &mut Annotation,
        viewport: &dyn Viewport,
        calibration: &dyn Calibration,
        notifier: &dyn ChangeNotifier,
        now: Duration,
    ) -> bool {
        if !annotation.has_required_points() {
            return false;
        }
        self.throttle.record(annotation.id(), now);
        let target_id = viewport.target_id();
        store_stats(annotation, viewport, calibration, notifier, target_id);
        true
    }
}

fn store_stats(
    annotation: &mut Annotation,
    viewport: &dyn Viewport,
    calibration: &dyn Calibration,
    notifier: &dyn ChangeNotifier,
    target_id: String,
) {
    let stats = compute_stats(annotation, viewport, calibration);
    annotation
        .metadata_mut()
        .set_measurement_values(stats.values());
    annotation.set_cached_stats(target_id, stats);
    annotation.clear_invalidated();
    notifier.notify(
        AnnotationEvent::new(annotation.id(), ChangeType::StatsUpdated).with_viewport(viewport.id()),
    );
}

/// Computes the statistics of `annotation` as displayed in `viewport`.
pub fn compute_stats(
    annotation: &Annotation,
    viewport: &dyn Viewport,
    calibration: &dyn Calibration,
) -> Measurement {
    let calibrated = calibration.resolve(viewport.image());
    let scale = calibrated.scale();
    let points = annotation.points();

    match annotation.kind() {
        ShapeKind::Length => Measurement::Length {
            length: pair_distance(points, 0, 1).map(|d| d / scale),
            unit: Some(calibrated.unit().to_string()),
        },
        ShapeKind::Angle => Measurement::Angle {
            angle: match points {
                [a, vertex, b, ..] => angle_between(a.sub_point(*vertex), b.sub_point(*vertex)),
                _ => None,
            },
        },
        ShapeKind::CobbAngle => cobb_angles(points),
        ShapeKind::Bidirectional => {
            let first = pair_distance(points, 0, 1);
            let second = pair_distance(points, 2, 3);
            let (length, width) = match (first, second) {
                (Some(a), Some(b)) => (Some(a.max(b) / scale), Some(a.min(b) / scale)),
                _ => (None, None),
            };
            Measurement::Bidirectional {
                length,
                width,
                unit: Some(calibrated.unit().to_string()),
            }
        }
        ShapeKind::EllipticalRoi => {
            let canvas: Vec<Point2> = points.iter().map(|p| viewport.world_to_canvas(*p)).collect();
            let area = match canvas.as_slice() {
                [bottom, top, left, right] => {
                    let canvas_area = EllipseGeometry::from_diameters([*bottom, *top, *left, *right]).area();
                    Some(canvas_area * pixel_area_factor(viewport, *bottom, scale))
                }
                _ => None,
            };
            area_measurement(viewport, area, calibrated.area_unit())
        }
        ShapeKind::Contour => {
            let area = annotation.is_closed().then(|| {
                let outline = match annotation.contour() {
                    Some(contour) if !contour.polyline().is_empty() => contour.polyline(),
                    _ => points,
                };
                let canvas: Vec<Point2> =
                    outline.iter().map(|p| viewport.world_to_canvas(*p)).collect();
                canvas
                    .first()
                    .map(|reference| {
                        polygon_area(&canvas) * pixel_area_factor(viewport, *reference, scale)
                    })
                    .unwrap_or(0.0)
            });
            area_measurement(viewport, area, calibrated.area_unit())
        }
    }
}

fn area_measurement(viewport: &dyn Viewport, area: Option<f64>, area_unit: &str) -> Measurement {
    Measurement::Area {
        modality: viewport
            .image()
            .and_then(|image| image.modality())
            .map(str::to_string),
        area,
        area_unit: Some(area_unit.to_string()),
    }
}

/// World area covered by one canvas pixel at `reference`, in calibrated units.
///
/// Measured from two orthogonal one-pixel canvas steps, so anisotropic and
/// zoom-dependent pixel spacing is accounted for.
fn pixel_area_factor(viewport: &dyn Viewport, reference: Point2, scale: f64) -> f64 {
    let origin = viewport.canvas_to_world(reference);
    let delta_x = viewport
        .canvas_to_world(Point2::new(reference.x() + 1.0, reference.y()))
        .distance(origin);
    let delta_y = viewport
        .canvas_to_world(Point2::new(reference.x(), reference.y() + 1.0))
        .distance(origin);
    delta_x * delta_y / (scale * scale)
}

fn pair_distance(points: &[Point3], a: usize, b: usize) -> Option<f64> {
    Some(distance_3d(*points.get(a)?, *points.get(b)?))
}

/// Angle between two vectors in degrees; `None` when either is degenerate.
fn angle_between(a: Point3, b: Point3) -> Option<f64> {
    let denominator = a.length() * b.length();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let cosine = (a.dot(b) / denominator).clamp(-1.0, 1.0);
    Some(cosine.acos().to_degrees())
}

fn acute(angle: f64) -> f64 {
    angle.min(180.0 - angle)
}

fn cobb_angles(points: &[Point3]) -> Measurement {
    let [p0, p1, p2, p3] = match points {
        [p0, p1, p2, p3, ..] => [*p0, *p1, *p2, *p3],
        _ => return Measurement::placeholder(ShapeKind::CobbAngle),
    };
    let first = p1.sub_point(p0);
    let second = p3.sub_point(p2);
    let link = p2.midpoint(p3).sub_point(p0.midpoint(p1));
    Measurement::Cobb {
        angle: angle_between(first, second),
        arc1_angle: angle_between(first, link).map(acute),
        arc2_angle: angle_between(second, link).map(acute),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use caliper_core::geometry::Size;

    use super::*;
    use crate::{
        annotation::AnnotationMetadata,
        calibration::{CalibratedScale, IdentityCalibration, ImageMetadata},
        events::RecordingNotifier,
        viewport::PlanarViewport,
    };

    fn viewport() -> PlanarViewport {
        PlanarViewport::new("vp", "for", Size::new(100.0, 100.0))
    }

    fn annotation(kind: ShapeKind, points: &[[f64; 3]]) -> Annotation {
        Annotation::new(
            "a",
            kind,
            points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect(),
            AnnotationMetadata::new(kind.tool_name(), "for"),
        )
        .unwrap()
    }

    struct HalfScale;

    impl Calibration for HalfScale {
        fn resolve(&self, _image: Option<&ImageMetadata>) -> CalibratedScale {
            CalibratedScale::new(2.0, "cm")
        }
    }

    #[test]
    fn test_length_is_world_distance() {
        let line = annotation(ShapeKind::Length, &[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        match compute_stats(&line, &viewport(), &IdentityCalibration) {
            Measurement::Length { length, unit } => {
                assert_eq!(length, Some(5.0));
                assert_eq!(unit.as_deref(), Some("mm"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match compute_stats(&line, &viewport(), &HalfScale) {
            Measurement::Length { length, .. } => assert_approx_eq!(f64, length.unwrap(), 2.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_angle_at_vertex() {
        let angle = annotation(
            ShapeKind::Angle,
            &[[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        match compute_stats(&angle, &viewport(), &IdentityCalibration) {
            Measurement::Angle { angle } => assert_approx_eq!(f64, angle.unwrap(), 90.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_angle_is_missing() {
        let angle = annotation(
            ShapeKind::Angle,
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        assert_eq!(
            compute_stats(&angle, &viewport(), &IdentityCalibration),
            Measurement::Angle { angle: None }
        );
    }

    #[test]
    fn test_cobb_angle_and_arcs() {
        let cobb = annotation(
            ShapeKind::CobbAngle,
            &[
                [0.0, 0.0, 0.0],
                [10.0, 0.0, 0.0],
                [0.0, 10.0, 0.0],
                [10.0, 20.0, 0.0],
            ],
        );
        match compute_stats(&cobb, &viewport(), &IdentityCalibration) {
            Measurement::Cobb {
                angle,
                arc1_angle,
                arc2_angle,
            } => {
                assert_approx_eq!(f64, angle.unwrap(), 45.0, epsilon = 1e-9);
                assert!(arc1_angle.unwrap() <= 90.0);
                assert!(arc2_angle.unwrap() <= 90.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bidirectional_long_and_short_axis() {
        let calipers = annotation(
            ShapeKind::Bidirectional,
            &[
                [0.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
                [-5.0, 1.0, 0.0],
                [5.0, 1.0, 0.0],
            ],
        );
        match compute_stats(&calipers, &viewport(), &IdentityCalibration) {
            Measurement::Bidirectional { length, width, .. } => {
                assert_eq!(length, Some(10.0));
                assert_eq!(width, Some(2.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_closed_contour_area_accounts_for_zoom() {
        let mut square = annotation(
            ShapeKind::Contour,
            &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 2.0, 0.0], [0.0, 2.0, 0.0]],
        );
        square.close_contour();
        let zoomed = viewport().with_zoom(3.0);
        match compute_stats(&square, &zoomed, &IdentityCalibration) {
            Measurement::Area {
                area, area_unit, ..
            } => {
                assert_approx_eq!(f64, area.unwrap(), 4.0, epsilon = 1e-9);
                assert_eq!(area_unit.as_deref(), Some("mm²"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_open_contour_is_trusted_without_area() {
        let open = annotation(ShapeKind::Contour, &[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let stats = compute_stats(&open, &viewport(), &IdentityCalibration);
        assert!(stats.is_trusted());
        assert!(matches!(stats, Measurement::Area { area: None, .. }));
    }

    #[test]
    fn test_ellipse_area() {
        let ellipse = annotation(
            ShapeKind::EllipticalRoi,
            &[
                [0.0, -1.0, 0.0],
                [0.0, 1.0, 0.0],
                [-2.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
            ],
        );
        let image = ImageMetadata::new("img").with_modality("CT");
        let viewport = viewport().with_image(image);
        match compute_stats(&ellipse, &viewport, &IdentityCalibration) {
            Measurement::Area { modality, area, .. } => {
                assert_eq!(modality.as_deref(), Some("CT"));
                assert_approx_eq!(f64, area.unwrap(), std::f64::consts::PI * 2.0, epsilon = 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_refresh_policy_immediate_then_throttled() {
        let viewport = viewport();
        let notifier = RecordingNotifier::new();
        let mut calculator =
            MeasurementCalculator::new(ThrottlePolicy::new(Duration::from_millis(100)));
        let mut line = annotation(ShapeKind::Length, &[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);

        let at = Duration::from_millis;
        let refresh = calculator.ensure_fresh(&mut line, &viewport, &IdentityCalibration, &notifier, at(0));
        assert_eq!(refresh, StatsRefresh::Immediate);
        assert!(!line.is_invalidated());

        let refresh = calculator.ensure_fresh(&mut line, &viewport, &IdentityCalibration, &notifier, at(10));
        assert_eq!(refresh, StatsRefresh::Fresh);

        line.set_point(1, Point3::new(6.0, 8.0, 0.0));
        let refresh = calculator.ensure_fresh(&mut line, &viewport, &IdentityCalibration, &notifier, at(50));
        assert_eq!(refresh, StatsRefresh::Deferred);
        assert!(line.is_invalidated());

        let refresh = calculator.ensure_fresh(&mut line, &viewport, &IdentityCalibration, &notifier, at(120));
        assert_eq!(refresh, StatsRefresh::Throttled);
        match line.cached_stats(&viewport.target_id()) {
            Some(Measurement::Length { length, .. }) => assert_eq!(*length, Some(10.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(notifier.count(ChangeType::StatsUpdated), 2);
        assert_eq!(line.metadata().measurement_values()[0].value(), Some(10.0));
    }

    #[test]
    fn test_other_targets_are_kept() {
        let notifier = RecordingNotifier::new();
        let mut calculator = MeasurementCalculator::new(ThrottlePolicy::new(Duration::ZERO));
        let mut line = annotation(ShapeKind::Length, &[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0]]);
        line.set_cached_stats("other", Measurement::placeholder(ShapeKind::Length));

        calculator.refresh_now(&mut line, &viewport(), &IdentityCalibration, &notifier, Duration::ZERO);
        let targets: Vec<&str> = line.cached_targets().collect();
        assert_eq!(targets, vec!["other", "viewport:vp"]);
    }

    #[test]
    fn test_throttle_policy_interval() {
        let mut throttle = ThrottlePolicy::new(Duration::from_millis(100));
        assert!(throttle.try_acquire("a", Duration::from_millis(0)));
        assert!(!throttle.try_acquire("a", Duration::from_millis(99)));
        assert!(throttle.try_acquire("b", Duration::from_millis(99)));
        assert!(throttle.try_acquire("a", Duration::from_millis(100)));
    }

    proptest! {
        #[test]
        fn prop_identity_length_is_exact_distance(
            a in prop::array::uniform3(-1000.0f64..1000.0),
            b in prop::array::uniform3(-1000.0f64..1000.0),
        ) {
            let line = annotation(ShapeKind::Length, &[a, b]);
            let expected = distance_3d(Point3::new(a[0], a[1], a[2]), Point3::new(b[0], b[1], b[2]));
            match compute_stats(&line, &viewport(), &IdentityCalibration) {
                Measurement::Length { length, .. } => prop_assert_eq!(length, Some(expected)),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}

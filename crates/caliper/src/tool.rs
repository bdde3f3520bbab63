//! Tool controller: placement and edit sessions.
//!
//! One [`ToolController`] serves an overlay. Pointer-down on an existing
//! annotation starts an [`EditSession`] regardless of the active tool;
//! pointer-down on empty canvas with a tool active starts a placement.
//!
//! # States
//!
//! - `Idle`: no gesture in progress
//! - `Placing`: control points are still being added
//! - `Editing`: an existing annotation is being dragged
//!
//! Drag-out tools (length, ellipse, bidirectional) derive all their points
//! from the anchor and the current pointer and complete on pointer-up. Click
//! tools (angle, Cobb angle) add one point per pointer-down until their point
//! count is reached. Contours add one point per pointer-down and complete
//! when clicked near their first point, or explicitly as open contours.
//!
//! # Lifecycle hooks
//!
//! Behavior around drags is composed from [`LifecycleHook`]s, run in
//! registration order at every [`LifecyclePhase`].

use std::time::Duration;

use log::{debug, info};

use caliper_core::{
    draw::EllipseGeometry,
    geometry::{Bounds, Point2, Point3, distance_to_segment},
};

use crate::{
    annotation::{Annotation, AnnotationMetadata, ShapeKind},
    calibration::Calibration,
    config::InteractionConfig,
    drag::{DragTarget, apply_drag},
    events::{AnnotationEvent, ChangeNotifier, ChangeType},
    measurement::MeasurementCalculator,
    store::AnnotationStore,
    viewport::Viewport,
};

/// Input device of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Point in a gesture where hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// An edit session grabbed an annotation
    DragStart,
    /// A drag or placement ended
    Release,
}

/// Composable behavior run at gesture boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    /// Highlights the annotation while it is dragged.
    HighlightWhileDragging,
    /// Recomputes stats on release, bypassing the throttle.
    FlushStatsOnRelease,
    /// Clears the active handle on release.
    ClearActiveHandleOnRelease,
    /// Emits `Completed` after a placement and `HandlesUpdated` after an edit.
    NotifyOnRelease,
}

impl LifecycleHook {
    /// Hooks registered by [`ToolController::new`], in order.
    pub fn defaults() -> Vec<LifecycleHook> {
        vec![
            LifecycleHook::HighlightWhileDragging,
            LifecycleHook::FlushStatsOnRelease,
            LifecycleHook::ClearActiveHandleOnRelease,
            LifecycleHook::NotifyOnRelease,
        ]
    }

    fn run(
        self,
        phase: LifecyclePhase,
        annotation: &mut Annotation,
        env: &mut HookEnv<'_>,
        new_annotation: bool,
    ) {
        match (self, phase) {
            (LifecycleHook::HighlightWhileDragging, LifecyclePhase::DragStart) => {
                annotation.set_highlighted(true);
            }
            (LifecycleHook::HighlightWhileDragging, LifecyclePhase::Release) => {
                annotation.set_highlighted(false);
            }
            (LifecycleHook::FlushStatsOnRelease, LifecyclePhase::Release) => {
                env.calculator.refresh_now(
                    annotation,
                    env.viewport,
                    env.calibration,
                    env.notifier,
                    env.now,
                );
            }
            (LifecycleHook::ClearActiveHandleOnRelease, LifecyclePhase::Release) => {
                annotation.set_active_handle(None);
            }
            (LifecycleHook::NotifyOnRelease, LifecyclePhase::Release) => {
                let change_type = if new_annotation {
                    ChangeType::Completed
                } else {
                    ChangeType::HandlesUpdated
                };
                env.notifier.notify(
                    AnnotationEvent::new(annotation.id(), change_type)
                        .with_viewport(env.viewport.id()),
                );
            }
            _ => {}
        }
    }
}

/// Collaborators of one pointer event.
pub struct ToolEnv<'a> {
    pub store: &'a mut dyn AnnotationStore,
    pub viewport: &'a dyn Viewport,
    /// Viewports displaying the same frame of reference as `viewport`.
    pub viewport_ids: Vec<String>,
    pub calculator: &'a mut MeasurementCalculator,
    pub calibration: &'a dyn Calibration,
    pub notifier: &'a dyn ChangeNotifier,
    pub now: Duration,
}

/// The parts of a [`ToolEnv`] available to hooks.
struct HookEnv<'e> {
    viewport: &'e dyn Viewport,
    calculator: &'e mut MeasurementCalculator,
    calibration: &'e dyn Calibration,
    notifier: &'e dyn ChangeNotifier,
    now: Duration,
}

/// Runs `hooks` in order on the annotation `annotation_id`.
fn run_hooks(
    hooks: &[LifecycleHook],
    phase: LifecyclePhase,
    env: &mut ToolEnv<'_>,
    annotation_id: &str,
    new_annotation: bool,
) {
    let ToolEnv {
        store,
        viewport,
        calculator,
        calibration,
        notifier,
        now,
        ..
    } = env;
    let Some(annotation) = store.get_mut(annotation_id) else {
        return;
    };
    let mut hook_env = HookEnv {
        viewport: *viewport,
        calculator: &mut **calculator,
        calibration: *calibration,
        notifier: *notifier,
        now: *now,
    };
    for hook in hooks {
        hook.run(phase, annotation, &mut hook_env, new_annotation);
    }
}

/// Transient state of one drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    annotation_id: String,
    viewport_ids: Vec<String>,
    target: DragTarget,
    new_annotation: bool,
    has_moved: bool,
    last_world: Point3,
}

impl EditSession {
    pub fn annotation_id(&self) -> &str {
        &self.annotation_id
    }

    pub fn viewport_ids(&self) -> &[String] {
        &self.viewport_ids
    }

    pub fn target(&self) -> DragTarget {
        self.target
    }

    pub fn is_new_annotation(&self) -> bool {
        self.new_annotation
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Placement {
    annotation_id: String,
    kind: ShapeKind,
    viewport_ids: Vec<String>,
    anchor: Point2,
    pointer: PointerKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum ToolState {
    #[default]
    Idle,
    Placing(Placement),
    Editing(EditSession),
}

/// Pointer state machine shared by every shape kind.
#[derive(Debug, Clone)]
pub struct ToolController {
    active_tool: Option<ShapeKind>,
    state: ToolState,
    hooks: Vec<LifecycleHook>,
    handle_proximity: f64,
    close_contour_proximity: f64,
    touch_cooldown: Duration,
    last_touch_placement: Option<Duration>,
}

impl ToolController {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            active_tool: None,
            state: ToolState::Idle,
            hooks: LifecycleHook::defaults(),
            handle_proximity: config.handle_proximity(),
            close_contour_proximity: config.close_contour_proximity(),
            touch_cooldown: config.touch_cooldown(),
            last_touch_placement: None,
        }
    }

    /// Replaces the registered hooks.
    pub fn with_hooks(mut self, hooks: Vec<LifecycleHook>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Appends a hook, run after the already registered ones.
    pub fn register_hook(&mut self, hook: LifecycleHook) {
        self.hooks.push(hook);
    }

    pub fn hooks(&self) -> &[LifecycleHook] {
        &self.hooks
    }

    pub fn active_tool(&self) -> Option<ShapeKind> {
        self.active_tool
    }

    pub fn activate(&mut self, kind: ShapeKind) {
        info!(tool:% = kind; "Tool activated");
        self.active_tool = Some(kind);
    }

    /// Deactivates the tool. An in-progress placement is abandoned; the points
    /// it already committed remain.
    pub fn deactivate(&mut self, env: &mut ToolEnv<'_>) -> Vec<String> {
        self.active_tool = None;
        match std::mem::take(&mut self.state) {
            ToolState::Placing(placement) => {
                debug!(annotation_id = placement.annotation_id.as_str(); "Placement abandoned");
                self.finish_placement(env, placement)
            }
            ToolState::Editing(session) => {
                self.release(env, &session.annotation_id, session.new_annotation);
                session.viewport_ids
            }
            ToolState::Idle => Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == ToolState::Idle
    }

    /// Id of the annotation currently being placed.
    pub fn placing_id(&self) -> Option<&str> {
        match &self.state {
            ToolState::Placing(placement) => Some(&placement.annotation_id),
            ToolState::Editing(session) if session.new_annotation => Some(&session.annotation_id),
            _ => None,
        }
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        match &self.state {
            ToolState::Editing(session) => Some(session),
            _ => None,
        }
    }

    /// Handles pointer-down. Returns the viewports that need a render.
    pub fn pointer_down(
        &mut self,
        env: &mut ToolEnv<'_>,
        canvas: Point2,
        pointer: PointerKind,
    ) -> Vec<String> {
        if let ToolState::Placing(placement) = &self.state {
            let placement = placement.clone();
            return self.continue_placement(env, placement, canvas);
        }

        if let Some((annotation_id, target)) = self.hit_test(env, canvas) {
            return self.start_edit(env, annotation_id, target, canvas);
        }

        let Some(kind) = self.active_tool else {
            return Vec::new();
        };
        if pointer == PointerKind::Touch {
            let cooling_down = self
                .last_touch_placement
                .is_some_and(|last| env.now.saturating_sub(last) < self.touch_cooldown);
            if cooling_down {
                debug!("Touch placement ignored during cooldown");
                return Vec::new();
            }
            self.last_touch_placement = Some(env.now);
        }
        self.start_placement(env, kind, canvas, pointer)
    }

    /// Handles pointer-move. Returns the viewports that need a render.
    pub fn pointer_move(&mut self, env: &mut ToolEnv<'_>, canvas: Point2) -> Vec<String> {
        match &mut self.state {
            ToolState::Idle => Vec::new(),
            ToolState::Placing(placement) => {
                let placement = placement.clone();
                let Some(annotation) = env.store.get_mut(&placement.annotation_id) else {
                    return Vec::new();
                };
                match placement.kind {
                    kind if kind.is_drag_out() => {
                        let points = drag_out_points(kind, env.viewport, placement.anchor, canvas);
                        annotation.set_points(points);
                    }
                    ShapeKind::Angle | ShapeKind::CobbAngle => {
                        let last = annotation.points().len().saturating_sub(1);
                        annotation.set_point(last, env.viewport.canvas_to_world(canvas));
                    }
                    _ => {}
                }
                placement.viewport_ids
            }
            ToolState::Editing(session) => {
                let Some(annotation) = env.store.get_mut(&session.annotation_id) else {
                    return Vec::new();
                };
                let current = env.viewport.canvas_to_world(canvas);
                let delta = current.sub_point(session.last_world);
                let invalidated = apply_drag(annotation, session.target, delta, current);
                session.last_world = current;
                session.has_moved = true;
                let change_type = if invalidated {
                    ChangeType::HandlesUpdated
                } else {
                    ChangeType::Interaction
                };
                env.notifier.notify(
                    AnnotationEvent::new(annotation.id(), change_type)
                        .with_viewport(env.viewport.id()),
                );
                session.viewport_ids.clone()
            }
        }
    }

    /// Handles pointer-up. Returns the viewports that need a render.
    pub fn pointer_up(&mut self, env: &mut ToolEnv<'_>) -> Vec<String> {
        match std::mem::take(&mut self.state) {
            ToolState::Idle => Vec::new(),
            ToolState::Placing(placement) if placement.kind.is_drag_out() => {
                self.finish_placement(env, placement)
            }
            state @ ToolState::Placing(_) => {
                self.state = state;
                Vec::new()
            }
            ToolState::Editing(session) => {
                self.release(env, &session.annotation_id, session.new_annotation);
                session.viewport_ids
            }
        }
    }

    /// Completes the contour being placed as an open contour.
    ///
    /// A contour with fewer than two points is discarded.
    pub fn finish_open_contour(&mut self, env: &mut ToolEnv<'_>) -> Vec<String> {
        let placement = match std::mem::take(&mut self.state) {
            ToolState::Placing(placement) if placement.kind == ShapeKind::Contour => placement,
            state => {
                self.state = state;
                return Vec::new();
            }
        };
        let too_short = env
            .store
            .get(&placement.annotation_id)
            .is_none_or(|annotation| annotation.points().len() < 2);
        if too_short {
            env.store.remove(&placement.annotation_id);
            return placement.viewport_ids;
        }
        self.finish_placement(env, placement)
    }

    fn start_placement(
        &mut self,
        env: &mut ToolEnv<'_>,
        kind: ShapeKind,
        canvas: Point2,
        pointer: PointerKind,
    ) -> Vec<String> {
        let viewport = env.viewport;
        let world = viewport.canvas_to_world(canvas);
        let camera = viewport.camera();
        let mut metadata = AnnotationMetadata::new(kind.tool_name(), viewport.frame_of_reference())
            .with_camera(camera.view_plane_normal(), camera.view_up());
        if let Some(image) = viewport.image() {
            metadata = metadata.with_referenced_image_id(image.image_id());
        }

        let points = match kind {
            kind if kind.is_drag_out() => drag_out_points(kind, viewport, canvas, canvas),
            ShapeKind::Contour => vec![world],
            _ => vec![world, world],
        };
        let mut annotation = Annotation::begin_placement("", kind, points, metadata);
        annotation.set_active_handle(Some(annotation.points().len() - 1));
        let annotation_id = env.store.add(annotation);
        info!(annotation_id = annotation_id.as_str(), tool:% = kind; "Placement started");

        self.state = ToolState::Placing(Placement {
            annotation_id,
            kind,
            viewport_ids: env.viewport_ids.clone(),
            anchor: canvas,
            pointer,
        });
        env.viewport_ids.clone()
    }

    fn continue_placement(
        &mut self,
        env: &mut ToolEnv<'_>,
        placement: Placement,
        canvas: Point2,
    ) -> Vec<String> {
        let world = env.viewport.canvas_to_world(canvas);
        let Some(annotation) = env.store.get_mut(&placement.annotation_id) else {
            self.state = ToolState::Idle;
            return Vec::new();
        };

        let complete = match placement.kind {
            ShapeKind::Contour => {
                let first = annotation
                    .points()
                    .first()
                    .map(|p| env.viewport.world_to_canvas(*p));
                let closes = annotation.points().len() >= 3
                    && first.is_some_and(|first| {
                        first.distance(canvas) <= self.close_contour_proximity
                    });
                if closes {
                    annotation.close_contour();
                } else {
                    annotation.push_point(world);
                    annotation.set_active_handle(Some(annotation.points().len() - 1));
                }
                closes
            }
            kind => {
                let last = annotation.points().len().saturating_sub(1);
                annotation.set_point(last, world);
                if kind.cardinality().fixed() == Some(annotation.points().len()) {
                    true
                } else {
                    annotation.push_point(world);
                    annotation.set_active_handle(Some(last + 1));
                    false
                }
            }
        };

        if complete {
            self.state = ToolState::Idle;
            return self.finish_placement(env, placement);
        }
        placement.viewport_ids
    }

    fn start_edit(
        &mut self,
        env: &mut ToolEnv<'_>,
        annotation_id: String,
        target: DragTarget,
        canvas: Point2,
    ) -> Vec<String> {
        debug!(annotation_id = annotation_id.as_str(), target:? = target; "Edit session started");
        if let Some(annotation) = env.store.get_mut(&annotation_id) {
            if let DragTarget::Handle(index) = target {
                annotation.set_active_handle(Some(index));
            }
        }
        run_hooks(&self.hooks, LifecyclePhase::DragStart, env, &annotation_id, false);
        self.state = ToolState::Editing(EditSession {
            annotation_id,
            viewport_ids: env.viewport_ids.clone(),
            target,
            new_annotation: false,
            has_moved: false,
            last_world: env.viewport.canvas_to_world(canvas),
        });
        env.viewport_ids.clone()
    }

    /// Completes a placement and returns the viewports to render.
    fn finish_placement(&mut self, env: &mut ToolEnv<'_>, placement: Placement) -> Vec<String> {
        if placement.pointer == PointerKind::Touch {
            self.last_touch_placement = Some(env.now);
        }
        info!(annotation_id = placement.annotation_id.as_str(); "Placement completed");
        self.release(env, &placement.annotation_id, true);
        placement.viewport_ids
    }

    fn release(&self, env: &mut ToolEnv<'_>, annotation_id: &str, new_annotation: bool) {
        run_hooks(&self.hooks, LifecyclePhase::Release, env, annotation_id, new_annotation);
    }

    /// Finds what lies under `canvas`: handles first, then text boxes, then
    /// lines and outlines.
    fn hit_test(&self, env: &ToolEnv<'_>, canvas: Point2) -> Option<(String, DragTarget)> {
        let viewport = env.viewport;
        let normal = viewport.camera().view_plane_normal();
        let candidates: Vec<&Annotation> = ShapeKind::all()
            .iter()
            .flat_map(|kind| env.store.annotation_ids(kind.tool_name(), viewport.frame_of_reference()))
            .filter_map(|id| env.store.get(&id))
            .filter(|annotation| {
                annotation.is_visible()
                    && !annotation.is_locked()
                    && annotation
                        .metadata()
                        .view_plane_normal()
                        .is_parallel_to(normal, 1e-3)
            })
            .collect();

        let project = |annotation: &Annotation| -> Vec<Point2> {
            annotation
                .points()
                .iter()
                .map(|p| viewport.world_to_canvas(*p))
                .collect()
        };

        for annotation in &candidates {
            let handle = project(annotation)
                .iter()
                .position(|p| p.distance(canvas) <= self.handle_proximity);
            if let Some(index) = handle {
                return Some((annotation.id().to_string(), DragTarget::Handle(index)));
            }
        }
        for annotation in &candidates {
            let bounds = annotation.text_box().world_bounding_box();
            let top_left = viewport.world_to_canvas(bounds.top_left);
            let bottom_right = viewport.world_to_canvas(bounds.bottom_right);
            let bounds = Bounds::new(
                top_left.x().min(bottom_right.x()),
                top_left.y().min(bottom_right.y()),
                top_left.x().max(bottom_right.x()),
                top_left.y().max(bottom_right.y()),
            );
            if bounds.width() > 0.0 && bounds.height() > 0.0 && bounds.contains(canvas) {
                return Some((annotation.id().to_string(), DragTarget::TextBox));
            }
        }
        for annotation in &candidates {
            if let Some(target) = self.hit_outline(annotation, &project(annotation), canvas) {
                return Some((annotation.id().to_string(), target));
            }
        }
        None
    }

    fn hit_outline(
        &self,
        annotation: &Annotation,
        canvas_points: &[Point2],
        canvas: Point2,
    ) -> Option<DragTarget> {
        let near = |a: Point2, b: Point2| distance_to_segment(canvas, a, b) <= self.handle_proximity;
        match (annotation.kind(), canvas_points) {
            (ShapeKind::CobbAngle, [p0, p1, p2, p3, ..]) => {
                if near(*p0, *p1) {
                    Some(DragTarget::Segment(0))
                } else if near(*p2, *p3) {
                    Some(DragTarget::Segment(1))
                } else {
                    None
                }
            }
            (ShapeKind::Length | ShapeKind::Angle, points) => points
                .windows(2)
                .any(|pair| near(pair[0], pair[1]))
                .then_some(DragTarget::WholeShape),
            (ShapeKind::Bidirectional, [p0, p1, p2, p3, ..]) => {
                (near(*p0, *p1) || near(*p2, *p3)).then_some(DragTarget::WholeShape)
            }
            (ShapeKind::EllipticalRoi, &[bottom, top, left, right]) => {
                let geometry = EllipseGeometry::from_diameters([bottom, top, left, right]);
                near_ellipse(&geometry, canvas, self.handle_proximity)
                    .then_some(DragTarget::WholeShape)
            }
            (ShapeKind::Contour, points) if points.len() >= 2 => {
                let closing = annotation
                    .is_closed()
                    .then(|| (points[points.len() - 1], points[0]));
                points
                    .windows(2)
                    .map(|pair| (pair[0], pair[1]))
                    .chain(closing)
                    .any(|(a, b)| near(a, b))
                    .then_some(DragTarget::WholeShape)
            }
            _ => None,
        }
    }
}

/// Whether `point` lies within `tolerance` canvas pixels of the outline.
fn near_ellipse(geometry: &EllipseGeometry, point: Point2, tolerance: f64) -> bool {
    let (rx, ry) = (geometry.radius_x(), geometry.radius_y());
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let angle = geometry.angle_degrees().to_radians();
    let offset = point.sub_point(geometry.center());
    let (sin, cos) = angle.sin_cos();
    let local = Point2::new(
        offset.x() * cos + offset.y() * sin,
        -offset.x() * sin + offset.y() * cos,
    );
    let radial = (local.x() / rx).hypot(local.y() / ry);
    (radial - 1.0).abs() * rx.min(ry) <= tolerance
}

/// Control points of a drag-out shape anchored at `anchor` with the pointer
/// at `current`, both in canvas space.
fn drag_out_points(
    kind: ShapeKind,
    viewport: &dyn Viewport,
    anchor: Point2,
    current: Point2,
) -> Vec<Point3> {
    match kind {
        ShapeKind::EllipticalRoi => {
            let rx = (current.x() - anchor.x()).abs();
            let ry = (current.y() - anchor.y()).abs();
            [
                Point2::new(anchor.x(), anchor.y() + ry),
                Point2::new(anchor.x(), anchor.y() - ry),
                Point2::new(anchor.x() - rx, anchor.y()),
                Point2::new(anchor.x() + rx, anchor.y()),
            ]
            .into_iter()
            .map(|p| viewport.canvas_to_world(p))
            .collect()
        }
        ShapeKind::Bidirectional => {
            let start = viewport.canvas_to_world(anchor);
            let end = viewport.canvas_to_world(current);
            let long_axis = end.sub_point(start);
            let normal = viewport.camera().view_plane_normal();
            let half_short = long_axis.length() / 6.0;
            let perpendicular = if half_short > 0.0 {
                long_axis.cross(normal).normalize().scale(half_short)
            } else {
                Point3::zero()
            };
            let mid = start.midpoint(end);
            vec![
                start,
                end,
                mid.sub_point(perpendicular),
                mid.add_point(perpendicular),
            ]
        }
        _ => vec![
            viewport.canvas_to_world(anchor),
            viewport.canvas_to_world(current),
        ],
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use caliper_core::geometry::Size;

    use super::*;
    use crate::viewport::PlanarViewport;

    fn viewport() -> PlanarViewport {
        PlanarViewport::new("vp", "for", Size::new(200.0, 200.0))
    }

    #[test]
    fn test_bidirectional_short_axis_is_perpendicular_third() {
        let points = drag_out_points(
            ShapeKind::Bidirectional,
            &viewport(),
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 0.0),
        );
        let long = points[1].sub_point(points[0]);
        let short = points[3].sub_point(points[2]);
        assert_approx_eq!(f64, long.dot(short), 0.0);
        assert_approx_eq!(f64, short.length(), 10.0);
    }

    #[test]
    fn test_ellipse_drag_out_is_center_based() {
        let points = drag_out_points(
            ShapeKind::EllipticalRoi,
            &viewport(),
            Point2::new(50.0, 50.0),
            Point2::new(70.0, 40.0),
        );
        assert_eq!(points[0], Point3::new(50.0, 60.0, 0.0));
        assert_eq!(points[1], Point3::new(50.0, 40.0, 0.0));
        assert_eq!(points[2], Point3::new(30.0, 50.0, 0.0));
        assert_eq!(points[3], Point3::new(70.0, 50.0, 0.0));
    }

    #[test]
    fn test_near_ellipse() {
        let geometry = EllipseGeometry::from_diameters([
            Point2::new(50.0, 60.0),
            Point2::new(50.0, 40.0),
            Point2::new(20.0, 50.0),
            Point2::new(80.0, 50.0),
        ]);
        assert!(near_ellipse(&geometry, Point2::new(80.0, 50.0), 1.0));
        assert!(near_ellipse(&geometry, Point2::new(50.0, 41.0), 2.0));
        assert!(!near_ellipse(&geometry, Point2::new(50.0, 50.0), 2.0));
    }

    #[test]
    fn test_default_hooks_order() {
        let controller = ToolController::new(&InteractionConfig::default());
        assert_eq!(controller.hooks(), LifecycleHook::defaults().as_slice());
        assert!(controller.is_idle());
        assert_eq!(controller.active_tool(), None);
    }
}

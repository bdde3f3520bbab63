//! Per-frame render pass.
//!
//! A render pass walks the annotations of one tool on one viewport, keeps
//! their stats fresh, and hands each one to the tool's
//! [`AnnotationRenderer`]. The rendering engine can be torn down while a pass
//! is running, so its presence is checked before and after every annotation
//! and the pass aborts as soon as it is gone.
//!
//! # Overview
//!
//! - [`RenderContext`] - Everything a pass draws with and reports to
//! - [`AnnotationFrame`] - Resolved per-annotation inputs (canvas points, styles)
//! - [`AnnotationRenderer`] - Shape-specific drawing behind one interface
//! - [`RenderStatus`] - Whether anything was drawn and whether the pass aborted
//! - [`render_tool`] - The pass itself

use std::time::Duration;

use log::{debug, warn};

use caliper_core::{
    draw::{HandleOptions, SceneCache, ShapeOptions, StrokeDefinition, draw_linked_text_box},
    geometry::{Bounds, Point2},
};

use crate::{
    annotation::{Annotation, NO_LABEL, ShapeKind, WorldBoundingBox},
    calibration::Calibration,
    error::CaliperError,
    events::{AnnotationEvent, ChangeNotifier, ChangeType},
    label::LabelProvider,
    measurement::MeasurementCalculator,
    store::AnnotationStore,
    style::{AnnotationState, StyleResolver, StyleSpecifier, TextBoxStyle},
    viewport::Viewport,
};

/// Tolerance used to decide whether an annotation lies in the viewport plane.
const PLANE_TOLERANCE: f64 = 1e-3;

/// Inputs and collaborators of one render pass.
pub struct RenderContext<'a> {
    pub viewport: &'a dyn Viewport,
    pub cache: &'a mut SceneCache,
    pub style: &'a dyn StyleResolver,
    pub calibration: &'a dyn Calibration,
    pub labels: &'a dyn LabelProvider,
    pub notifier: &'a dyn ChangeNotifier,
    pub calculator: &'a mut MeasurementCalculator,
    pub tool_group_id: &'a str,
    pub now: Duration,
    /// Annotation currently being placed, if any.
    pub placing: Option<&'a str>,
    /// Last pointer position on this viewport, in canvas space.
    pub pointer: Option<Point2>,
}

/// Resolved inputs for drawing one annotation.
#[derive(Debug, Clone)]
pub struct AnnotationFrame {
    pub canvas: Vec<Point2>,
    pub stroke: StrokeDefinition,
    pub handles: HandleOptions,
    pub text_box: TextBoxStyle,
    /// The annotation is still being placed.
    pub is_new: bool,
    /// Canvas outlines of child contours, drawn as holes.
    pub holes: Vec<Vec<Point2>>,
}

impl AnnotationFrame {
    /// Outline options with the highlight override applied when the
    /// annotation is both highlighted and selected.
    pub fn shape_options(&self, annotation: &Annotation) -> ShapeOptions {
        ShapeOptions::new(self.stroke.clone())
            .with_highlight(annotation.is_highlighted() && annotation.is_selected())
    }
}

/// Outcome of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStatus {
    pub drawn: bool,
    pub aborted: bool,
}

/// Shape-specific drawing of one annotation.
pub trait AnnotationRenderer {
    fn kind(&self) -> ShapeKind;

    /// Derived geometry that must be current before stats are computed.
    fn prepare(&self, _annotation: &mut Annotation, _viewport: &dyn Viewport) {}

    /// Draws `annotation`. Called only for visible annotations of
    /// [`AnnotationRenderer::kind`] with at least two control points.
    ///
    /// # Errors
    ///
    /// Only broken ownership invariants are errors; anything else is a local
    /// skip.
    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError>;
}

/// Renders every annotation of `renderer`'s kind on `ctx.viewport`.
///
/// # Errors
///
/// Returns [`CaliperError::MissingChildContour`] when a contour references a
/// child that is not in `store`.
pub fn render_tool(
    renderer: &dyn AnnotationRenderer,
    store: &mut dyn AnnotationStore,
    ctx: &mut RenderContext<'_>,
) -> Result<RenderStatus, CaliperError> {
    let kind = renderer.kind();
    let viewport = ctx.viewport;
    let camera_normal = viewport.camera().view_plane_normal();
    let ids: Vec<String> = store
        .annotation_ids(kind.tool_name(), viewport.frame_of_reference())
        .into_iter()
        .filter(|id| {
            store.get(id).is_some_and(|annotation| {
                annotation.parent_id().is_none()
                    && annotation
                        .metadata()
                        .view_plane_normal()
                        .is_parallel_to(camera_normal, PLANE_TOLERANCE)
            })
        })
        .collect();

    let mut status = RenderStatus::default();
    if ids.is_empty() {
        return Ok(status);
    }

    for id in ids {
        if !viewport.has_rendering_engine() {
            return Ok(abort(status, viewport));
        }
        let holes = child_outlines(store, &id, viewport)?;
        let visible = store.is_visible(&id);
        let Some(annotation) = store.get_mut(&id) else {
            continue;
        };

        renderer.prepare(annotation, viewport);
        ctx.calculator.ensure_fresh(
            annotation,
            viewport,
            ctx.calibration,
            ctx.notifier,
            ctx.now,
        );
        if !viewport.has_rendering_engine() {
            return Ok(abort(status, viewport));
        }
        if !visible || annotation.points().len() < 2 {
            continue;
        }

        let frame = resolve_frame(annotation, ctx, holes);
        renderer.render_annotation(annotation, &frame, ctx)?;
        status.drawn = true;
    }
    Ok(status)
}

fn abort(mut status: RenderStatus, viewport: &dyn Viewport) -> RenderStatus {
    warn!(
        viewport_id = viewport.id();
        "Rendering engine has been destroyed, aborting render pass"
    );
    status.aborted = true;
    status
}

fn child_outlines(
    store: &dyn AnnotationStore,
    id: &str,
    viewport: &dyn Viewport,
) -> Result<Vec<Vec<Point2>>, CaliperError> {
    let Some(annotation) = store.get(id) else {
        return Ok(Vec::new());
    };
    let mut outlines = Vec::with_capacity(annotation.child_ids().len());
    let mut missing = Vec::new();
    for child_id in annotation.child_ids() {
        match store.get(child_id) {
            Some(child) => {
                let outline = match child.contour() {
                    Some(contour) if !contour.polyline().is_empty() => contour.polyline(),
                    _ => child.points(),
                };
                outlines.push(outline.iter().map(|p| viewport.world_to_canvas(*p)).collect());
            }
            None => missing.push(child_id.clone()),
        }
    }
    if missing.is_empty() {
        Ok(outlines)
    } else {
        Err(CaliperError::MissingChildContour {
            parent: id.to_string(),
            children: missing,
        })
    }
}

fn resolve_frame(
    annotation: &Annotation,
    ctx: &RenderContext<'_>,
    holes: Vec<Vec<Point2>>,
) -> AnnotationFrame {
    let specifier = StyleSpecifier {
        tool_group_id: ctx.tool_group_id,
        tool_name: annotation.kind().tool_name(),
        viewport_id: ctx.viewport.id(),
        annotation_id: annotation.id(),
    };
    let state = AnnotationState {
        locked: annotation.is_locked(),
        selected: annotation.is_selected(),
        highlighted: annotation.is_highlighted(),
    };
    AnnotationFrame {
        canvas: annotation
            .points()
            .iter()
            .map(|p| ctx.viewport.world_to_canvas(*p))
            .collect(),
        stroke: ctx.style.stroke(&specifier, state),
        handles: ctx.style.handle_options(&specifier, state),
        text_box: ctx.style.text_box(&specifier),
        is_new: ctx.placing == Some(annotation.id()),
        holes,
    }
}

/// Resets the stored text box when text boxes are hidden.
///
/// Returns whether text boxes should be drawn.
pub(crate) fn text_box_enabled(annotation: &mut Annotation, frame: &AnnotationFrame) -> bool {
    if frame.text_box.visibility {
        true
    } else {
        annotation.text_box_mut().reset();
        false
    }
}

/// Canvas position of the primary text box.
///
/// An unmoved box follows `anchor`; a moved box stays at its world position.
pub(crate) fn primary_text_position(
    annotation: &mut Annotation,
    viewport: &dyn Viewport,
    anchor: Point2,
) -> Point2 {
    annotation
        .text_box_mut()
        .follow(viewport.canvas_to_world(anchor));
    viewport.world_to_canvas(annotation.text_box().world_position())
}

/// Projects realized canvas bounds of the primary text box back to world
/// space.
pub(crate) fn record_text_bounds(
    annotation: &mut Annotation,
    viewport: &dyn Viewport,
    bounds: Bounds,
) {
    let world = |x: f64, y: f64| viewport.canvas_to_world(Point2::new(x, y));
    annotation
        .text_box_mut()
        .set_world_bounding_box(WorldBoundingBox {
            top_left: world(bounds.min_x(), bounds.min_y()),
            top_right: world(bounds.max_x(), bounds.min_y()),
            bottom_left: world(bounds.min_x(), bounds.max_y()),
            bottom_right: world(bounds.max_x(), bounds.max_y()),
        });
}

/// Draws the primary linked text box and records its bounds.
pub(crate) fn draw_primary_text(
    annotation: &mut Annotation,
    frame: &AnnotationFrame,
    ctx: &mut RenderContext<'_>,
    uid: &str,
    lines: &[String],
    anchor: Point2,
) -> Option<Bounds> {
    let position = primary_text_position(annotation, ctx.viewport, anchor);
    let bounds = draw_linked_text_box(
        ctx.cache,
        annotation.id(),
        uid,
        lines,
        position,
        &frame.canvas,
        &frame.text_box.options,
        frame.text_box.link.as_ref(),
    )?;
    record_text_bounds(annotation, ctx.viewport, bounds);
    Some(bounds)
}

/// Applies the secondary label policy and draws the label box.
///
/// Nothing happens while the annotation is being placed or before it has
/// `min_points` control points. The current label is assigned at most once;
/// the label box is drawn unless the label is the "No label" sentinel.
pub(crate) fn draw_secondary_label(
    annotation: &mut Annotation,
    frame: &AnnotationFrame,
    ctx: &mut RenderContext<'_>,
    uid: &str,
    min_points: usize,
) {
    if frame.is_new || annotation.points().len() < min_points {
        return;
    }
    if annotation.assign_label_once(&ctx.labels.current_label()) {
        debug!(annotation_id = annotation.id(); "Label assigned");
        ctx.notifier.notify(
            AnnotationEvent::new(annotation.id(), ChangeType::LabelChange)
                .with_viewport(ctx.viewport.id()),
        );
    }
    let Some(label) = annotation.label().filter(|label| *label != NO_LABEL) else {
        return;
    };
    let Some(anchor) = frame.canvas.get(annotation.kind().label_anchor_index()) else {
        return;
    };
    draw_linked_text_box(
        ctx.cache,
        annotation.id(),
        uid,
        &[label.to_string()],
        *anchor,
        &frame.canvas,
        &frame.text_box.options,
        frame.text_box.link.as_ref(),
    );
}

//! Caliper - Interactive measurement annotations over image viewports.
//!
//! Caliper keeps a world-space model of length, angle, Cobb angle,
//! bidirectional, ellipse and contour annotations, derives calibrated
//! measurements from them, and keeps a retained vector scene per viewport in
//! sync with the model as the user places and drags annotations.

pub mod annotation;
pub mod calibration;
pub mod clock;
pub mod config;
pub mod drag;
pub mod events;
pub mod format;
pub mod label;
pub mod measurement;
pub mod render;
pub mod store;
pub mod style;
pub mod tool;
pub mod tools;
pub mod viewport;

mod error;

pub use caliper_core::{color, draw, geometry, spline};

pub use error::CaliperError;

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info};

use caliper_core::{
    draw::SceneCache,
    geometry::{Point2, Point3},
};

use annotation::{Annotation, AnnotationMetadata, ShapeKind};
use calibration::{Calibration, MetadataCalibration};
use clock::{Clock, SystemClock};
use config::AppConfig;
use events::{AnnotationEvent, ChangeNotifier, ChangeType, LogNotifier};
use label::{LabelProvider, StaticLabel};
use measurement::{MeasurementCalculator, ThrottlePolicy};
use render::{RenderContext, RenderStatus, render_tool};
use store::{AnnotationStore, InMemoryAnnotationStore};
use style::{ConfigStyleResolver, StyleResolver};
use tool::{PointerKind, ToolController, ToolEnv};
use tools::ShapeRenderer;
use viewport::Viewport;

const DEFAULT_TOOL_GROUP: &str = "default";

/// Annotation overlay across a set of viewports.
///
/// The overlay owns the collaborators of every render pass and pointer
/// event: the annotation store, one scene cache per viewport, style,
/// calibration, label and notification providers, and the tool controller.
///
/// # Examples
///
/// ```
/// use caliper::{Overlay, annotation::ShapeKind, config::AppConfig};
/// use caliper::geometry::{Point3, Size};
/// use caliper::viewport::PlanarViewport;
///
/// let mut overlay = Overlay::new(AppConfig::default()).unwrap();
/// overlay.add_viewport(PlanarViewport::new("vp", "for-1", Size::new(256.0, 256.0)));
/// let id = overlay
///     .hydrate("vp", ShapeKind::Length, vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)])
///     .unwrap();
///
/// let status = overlay.render("vp").unwrap();
/// assert!(status.drawn);
/// assert!(overlay.annotation(&id).is_some());
/// ```
pub struct Overlay {
    config: AppConfig,
    store: Box<dyn AnnotationStore>,
    viewports: IndexMap<String, Box<dyn Viewport>>,
    scenes: HashMap<String, SceneCache>,
    pointers: HashMap<String, Point2>,
    style: Box<dyn StyleResolver>,
    calibration: Box<dyn Calibration>,
    labels: Box<dyn LabelProvider>,
    notifier: Box<dyn ChangeNotifier>,
    clock: Box<dyn Clock>,
    calculator: MeasurementCalculator,
    renderers: Vec<ShapeRenderer>,
    controller: ToolController,
    tool_group_id: String,
}

impl Overlay {
    /// Creates an overlay with an in-memory store, metadata calibration, an
    /// empty current label, logging notifications and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error when the style section of `config` holds an invalid
    /// color or dash pattern.
    pub fn new(config: AppConfig) -> Result<Self, CaliperError> {
        let style = ConfigStyleResolver::new(config.style())?;
        let renderers = ShapeKind::all()
            .iter()
            .map(|kind| ShapeRenderer::from_config(*kind, &config))
            .collect();
        Ok(Self {
            store: Box::new(InMemoryAnnotationStore::new()),
            viewports: IndexMap::new(),
            scenes: HashMap::new(),
            pointers: HashMap::new(),
            style: Box::new(style),
            calibration: Box::new(MetadataCalibration),
            labels: Box::new(StaticLabel::default()),
            notifier: Box::new(LogNotifier),
            clock: Box::new(SystemClock::new()),
            calculator: MeasurementCalculator::new(ThrottlePolicy::new(
                config.measurement().throttle_interval(),
            )),
            renderers,
            controller: ToolController::new(config.interaction()),
            tool_group_id: DEFAULT_TOOL_GROUP.to_string(),
            config,
        })
    }

    pub fn with_store(mut self, store: impl AnnotationStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn with_style_resolver(mut self, style: impl StyleResolver + 'static) -> Self {
        self.style = Box::new(style);
        self
    }

    pub fn with_calibration(mut self, calibration: impl Calibration + 'static) -> Self {
        self.calibration = Box::new(calibration);
        self
    }

    pub fn with_label_provider(mut self, labels: impl LabelProvider + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    pub fn with_notifier(mut self, notifier: impl ChangeNotifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_tool_group(mut self, tool_group_id: impl Into<String>) -> Self {
        self.tool_group_id = tool_group_id.into();
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Adds a viewport and returns its id. A viewport with the same id is
    /// replaced and its scene cleared.
    pub fn add_viewport(&mut self, viewport: impl Viewport + 'static) -> String {
        let id = viewport.id().to_string();
        info!(viewport_id = id.as_str(); "Viewport added");
        self.scenes.insert(id.clone(), SceneCache::new());
        self.viewports.insert(id.clone(), Box::new(viewport));
        id
    }

    pub fn remove_viewport(&mut self, viewport_id: &str) -> bool {
        self.scenes.remove(viewport_id);
        self.pointers.remove(viewport_id);
        self.viewports.shift_remove(viewport_id).is_some()
    }

    pub fn viewport(&self, viewport_id: &str) -> Option<&dyn Viewport> {
        self.viewports.get(viewport_id).map(|viewport| viewport.as_ref())
    }

    pub fn activate_tool(&mut self, kind: ShapeKind) {
        self.controller.activate(kind);
    }

    /// Deactivates the current tool, abandoning any placement in progress.
    /// Returns the viewports that need a render.
    pub fn deactivate_tool(&mut self, viewport_id: &str) -> Result<Vec<String>, CaliperError> {
        self.with_tool_env(viewport_id, |controller, env| controller.deactivate(env))
    }

    pub fn active_tool(&self) -> Option<ShapeKind> {
        self.controller.active_tool()
    }

    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    /// Stores a fully built annotation and returns its id.
    pub fn add_annotation(&mut self, annotation: Annotation) -> String {
        self.store.add(annotation)
    }

    /// Creates an annotation from world points in the plane of `viewport_id`.
    ///
    /// Hydrated contours are closed.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::HandleCount`] when the point count does not
    /// fit `kind`, or [`CaliperError::Scene`] for an unknown viewport.
    pub fn hydrate(
        &mut self,
        viewport_id: &str,
        kind: ShapeKind,
        points: Vec<Point3>,
    ) -> Result<String, CaliperError> {
        let viewport = self.viewport_or_err(viewport_id)?;
        let camera = viewport.camera();
        let mut metadata = AnnotationMetadata::new(kind.tool_name(), viewport.frame_of_reference())
            .with_camera(camera.view_plane_normal(), camera.view_up());
        if let Some(image) = viewport.image() {
            metadata = metadata.with_referenced_image_id(image.image_id());
        }
        let mut annotation = Annotation::new("", kind, points, metadata)?;
        annotation.close_contour();
        let id = self.store.add(annotation);
        debug!(annotation_id = id.as_str(), tool:% = kind; "Annotation hydrated");
        Ok(id)
    }

    /// Makes contour `child_id` a hole of contour `parent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::UnknownAnnotation`] when either id is unknown.
    pub fn attach_hole(&mut self, parent_id: &str, child_id: &str) -> Result<(), CaliperError> {
        for id in [parent_id, child_id] {
            if self.store.get(id).is_none() {
                return Err(CaliperError::UnknownAnnotation(id.to_string()));
            }
        }
        if let Some(child) = self.store.get_mut(child_id) {
            child.set_parent_id(parent_id);
        }
        if let Some(parent) = self.store.get_mut(parent_id) {
            parent.add_child_id(child_id);
            parent.invalidate();
        }
        Ok(())
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.store.get(id)
    }

    /// Mutable access for host-driven flag changes (visibility, lock,
    /// selection).
    pub fn annotation_mut(&mut self, id: &str) -> Option<&mut Annotation> {
        self.store.get_mut(id)
    }

    /// Removes an annotation. A removed hole is detached from its parent
    /// contour.
    pub fn remove_annotation(&mut self, id: &str) -> Option<Annotation> {
        let removed = self.store.remove(id)?;
        if let Some(parent) = removed
            .parent_id()
            .and_then(|parent_id| self.store.get_mut(parent_id))
        {
            parent.remove_child_id(id);
            parent.invalidate();
        }
        Some(removed)
    }

    /// Explicit user edit of an annotation label.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::UnknownAnnotation`] for an unknown id.
    pub fn set_label(&mut self, id: &str, label: Option<String>) -> Result<(), CaliperError> {
        let annotation = self
            .store
            .get_mut(id)
            .ok_or_else(|| CaliperError::UnknownAnnotation(id.to_string()))?;
        annotation.set_label(label);
        self.notifier
            .notify(AnnotationEvent::new(id, ChangeType::LabelChange));
        Ok(())
    }

    /// Runs one render pass over every tool on `viewport_id` and prunes the
    /// scene nodes no tool touched.
    ///
    /// A pass that aborts because the rendering engine was torn down keeps
    /// the scene as it is.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::Scene`] for an unknown viewport and
    /// [`CaliperError::MissingChildContour`] for broken contour ownership.
    pub fn render(&mut self, viewport_id: &str) -> Result<RenderStatus, CaliperError> {
        let viewport = self
            .viewports
            .get(viewport_id)
            .ok_or_else(|| unknown_viewport(viewport_id))?;
        let cache = self.scenes.entry(viewport_id.to_string()).or_default();
        let mut ctx = RenderContext {
            viewport: viewport.as_ref(),
            cache,
            style: self.style.as_ref(),
            calibration: self.calibration.as_ref(),
            labels: self.labels.as_ref(),
            notifier: self.notifier.as_ref(),
            calculator: &mut self.calculator,
            tool_group_id: &self.tool_group_id,
            now: self.clock.now(),
            placing: self.controller.placing_id(),
            pointer: self.pointers.get(viewport_id).copied(),
        };

        let mut status = RenderStatus::default();
        for renderer in &self.renderers {
            let pass = render_tool(renderer, self.store.as_mut(), &mut ctx)?;
            status.drawn |= pass.drawn;
            if pass.aborted {
                status.aborted = true;
                return Ok(status);
            }
        }
        ctx.cache.prune_untouched();
        Ok(status)
    }

    /// Handles pointer-down at canvas position `canvas` of `viewport_id`.
    /// Returns the viewports that need a render.
    pub fn pointer_down(
        &mut self,
        viewport_id: &str,
        canvas: Point2,
        pointer: PointerKind,
    ) -> Result<Vec<String>, CaliperError> {
        self.pointers.insert(viewport_id.to_string(), canvas);
        self.with_tool_env(viewport_id, |controller, env| {
            controller.pointer_down(env, canvas, pointer)
        })
    }

    /// Handles pointer-move. Returns the viewports that need a render.
    pub fn pointer_move(
        &mut self,
        viewport_id: &str,
        canvas: Point2,
    ) -> Result<Vec<String>, CaliperError> {
        self.pointers.insert(viewport_id.to_string(), canvas);
        self.with_tool_env(viewport_id, |controller, env| {
            controller.pointer_move(env, canvas)
        })
    }

    /// Handles pointer-up. Returns the viewports that need a render.
    pub fn pointer_up(&mut self, viewport_id: &str) -> Result<Vec<String>, CaliperError> {
        self.with_tool_env(viewport_id, |controller, env| controller.pointer_up(env))
    }

    /// Completes the contour being placed as an open contour.
    pub fn finish_open_contour(&mut self, viewport_id: &str) -> Result<Vec<String>, CaliperError> {
        self.with_tool_env(viewport_id, |controller, env| {
            controller.finish_open_contour(env)
        })
    }

    pub fn scene(&self, viewport_id: &str) -> Option<&SceneCache> {
        self.scenes.get(viewport_id)
    }

    /// Serializes the scene of `viewport_id` as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::Scene`] for an unknown viewport.
    pub fn to_svg(&self, viewport_id: &str) -> Result<String, CaliperError> {
        let viewport = self.viewport_or_err(viewport_id)?;
        let size = viewport.canvas_size();
        let document = match self.scenes.get(viewport_id) {
            Some(cache) => cache.render_document(size.width(), size.height()),
            None => SceneCache::new().render_document(size.width(), size.height()),
        };
        Ok(document.to_string())
    }

    fn viewport_or_err(&self, viewport_id: &str) -> Result<&dyn Viewport, CaliperError> {
        self.viewport(viewport_id)
            .ok_or_else(|| unknown_viewport(viewport_id))
    }

    fn with_tool_env<R>(
        &mut self,
        viewport_id: &str,
        f: impl FnOnce(&mut ToolController, &mut ToolEnv<'_>) -> R,
    ) -> Result<R, CaliperError> {
        let viewport = self
            .viewports
            .get(viewport_id)
            .ok_or_else(|| unknown_viewport(viewport_id))?;
        let frame_of_reference = viewport.frame_of_reference();
        let viewport_ids = self
            .viewports
            .values()
            .filter(|other| other.frame_of_reference() == frame_of_reference)
            .map(|other| other.id().to_string())
            .collect();
        let mut env = ToolEnv {
            store: self.store.as_mut(),
            viewport: viewport.as_ref(),
            viewport_ids,
            calculator: &mut self.calculator,
            calibration: self.calibration.as_ref(),
            notifier: self.notifier.as_ref(),
            now: self.clock.now(),
        };
        Ok(f(&mut self.controller, &mut env))
    }
}

fn unknown_viewport(viewport_id: &str) -> CaliperError {
    CaliperError::Scene(format!("unknown viewport `{viewport_id}`"))
}

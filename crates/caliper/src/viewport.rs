//! Viewport projection contract.
//!
//! The host toolkit owns the camera, the image, and the rendering engine. The
//! overlay only needs to project points both ways and to know whether the
//! surface is still alive. [`PlanarViewport`] is a simple axis-aligned
//! implementation used by the CLI and the tests.

use serde::Deserialize;

use caliper_core::geometry::{Point2, Point3, Size};

use crate::calibration::ImageMetadata;

/// Orientation of a viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    view_plane_normal: Point3,
    view_up: Point3,
}

impl Camera {
    pub fn new(view_plane_normal: Point3, view_up: Point3) -> Self {
        Self {
            view_plane_normal,
            view_up,
        }
    }

    pub fn view_plane_normal(&self) -> Point3 {
        self.view_plane_normal
    }

    pub fn view_up(&self) -> Point3 {
        self.view_up
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, -1.0, 0.0))
    }
}

/// A drawing surface showing one image.
pub trait Viewport {
    fn id(&self) -> &str;

    /// Frame of reference the displayed image lives in.
    fn frame_of_reference(&self) -> &str;

    fn world_to_canvas(&self, point: Point3) -> Point2;

    fn canvas_to_world(&self, point: Point2) -> Point3;

    fn camera(&self) -> Camera;

    /// False once the rendering engine behind the viewport was torn down.
    fn has_rendering_engine(&self) -> bool;

    fn image(&self) -> Option<&ImageMetadata>;

    fn canvas_size(&self) -> Size;

    /// Key under which measurement stats are cached for this viewport.
    fn target_id(&self) -> String {
        match self.image() {
            Some(image) => format!("imageId:{}", image.image_id()),
            None => format!("viewport:{}", self.id()),
        }
    }
}

/// Serializable description of a [`PlanarViewport`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    pub id: String,
    pub frame_of_reference: String,
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
    pub pan: [f64; 2],
    pub plane_z: f64,
    pub image: Option<ImageMetadata>,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            id: "viewport-1".to_string(),
            frame_of_reference: "for-1".to_string(),
            width: 512.0,
            height: 512.0,
            zoom: 1.0,
            pan: [0.0, 0.0],
            plane_z: 0.0,
            image: None,
        }
    }
}

/// Axis-aligned viewport looking down the z axis.
///
/// Canvas coordinates are `(world - pan) * zoom`.
#[derive(Debug, Clone)]
pub struct PlanarViewport {
    id: String,
    frame_of_reference: String,
    size: Size,
    zoom: f64,
    pan: Point2,
    plane_z: f64,
    camera: Camera,
    image: Option<ImageMetadata>,
    torn_down: bool,
}

impl PlanarViewport {
    pub fn new(id: impl Into<String>, frame_of_reference: impl Into<String>, size: Size) -> Self {
        Self {
            id: id.into(),
            frame_of_reference: frame_of_reference.into(),
            size,
            zoom: 1.0,
            pan: Point2::default(),
            plane_z: 0.0,
            camera: Camera::default(),
            image: None,
            torn_down: false,
        }
    }

    pub fn from_spec(spec: &ViewportSpec) -> Self {
        let mut viewport = Self::new(
            spec.id.clone(),
            spec.frame_of_reference.clone(),
            Size::new(spec.width, spec.height),
        )
        .with_zoom(spec.zoom)
        .with_pan(Point2::new(spec.pan[0], spec.pan[1]))
        .with_plane_z(spec.plane_z);
        viewport.image = spec.image.clone();
        viewport
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_pan(mut self, pan: Point2) -> Self {
        self.pan = pan;
        self
    }

    pub fn with_plane_z(mut self, plane_z: f64) -> Self {
        self.plane_z = plane_z;
        self
    }

    pub fn with_image(mut self, image: ImageMetadata) -> Self {
        self.image = Some(image);
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn pan(&self) -> Point2 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: Point2) {
        self.pan = pan;
    }

    /// Simulates the host destroying the rendering engine.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }
}

impl Viewport for PlanarViewport {
    fn id(&self) -> &str {
        &self.id
    }

    fn frame_of_reference(&self) -> &str {
        &self.frame_of_reference
    }

    fn world_to_canvas(&self, point: Point3) -> Point2 {
        Point2::new(
            (point.x() - self.pan.x()) * self.zoom,
            (point.y() - self.pan.y()) * self.zoom,
        )
    }

    fn canvas_to_world(&self, point: Point2) -> Point3 {
        Point3::new(
            point.x() / self.zoom + self.pan.x(),
            point.y() / self.zoom + self.pan.y(),
            self.plane_z,
        )
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn has_rendering_engine(&self) -> bool {
        !self.torn_down
    }

    fn image(&self) -> Option<&ImageMetadata> {
        self.image.as_ref()
    }

    fn canvas_size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_projection_round_trip_with_zoom_and_pan() {
        let viewport = PlanarViewport::new("vp", "for", Size::new(100.0, 100.0))
            .with_zoom(2.0)
            .with_pan(Point2::new(10.0, -5.0))
            .with_plane_z(3.0);
        let canvas = viewport.world_to_canvas(Point3::new(12.0, 0.0, 3.0));
        assert_approx_eq!(f64, canvas.x(), 4.0);
        assert_approx_eq!(f64, canvas.y(), 10.0);

        let world = viewport.canvas_to_world(canvas);
        assert_approx_eq!(f64, world.x(), 12.0);
        assert_approx_eq!(f64, world.y(), 0.0);
        assert_approx_eq!(f64, world.z(), 3.0);
    }

    #[test]
    fn test_target_id_prefers_image() {
        let viewport = PlanarViewport::new("vp", "for", Size::new(1.0, 1.0));
        assert_eq!(viewport.target_id(), "viewport:vp");
        let viewport = viewport.with_image(ImageMetadata::new("ct-1"));
        assert_eq!(viewport.target_id(), "imageId:ct-1");
    }

    #[test]
    fn test_tear_down_drops_engine() {
        let mut viewport = PlanarViewport::new("vp", "for", Size::new(1.0, 1.0));
        assert!(viewport.has_rendering_engine());
        viewport.tear_down();
        assert!(!viewport.has_rendering_engine());
    }
}

//! Scene files rendered by the CLI.
//!
//! A scene describes one viewport and the annotations drawn on it:
//!
//! ```toml
//! [viewport]
//! id = "axial"
//! frame_of_reference = "study-1"
//! width = 256
//! height = 256
//!
//! [viewport.image]
//! image_id = "ct-1"
//! has_pixel_spacing = true
//!
//! [[annotation]]
//! tool = "length"
//! points = [[10, 10, 0], [40, 50, 0]]
//! label = "Liver"
//! ```
//!
//! Contours are closed unless `closed = false`; a contour naming a `parent`
//! becomes a hole of that contour.

use serde::Deserialize;

use caliper::{
    CaliperError, Overlay,
    annotation::{Annotation, AnnotationMetadata, ShapeKind},
    geometry::Point3,
    viewport::{PlanarViewport, Viewport, ViewportSpec},
};

/// A parsed scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    viewport: ViewportSpec,
    #[serde(default, rename = "annotation")]
    annotations: Vec<AnnotationSpec>,
}

/// One annotation entry of a scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationSpec {
    #[serde(default)]
    id: String,
    tool: ShapeKind,
    points: Vec<[f64; 3]>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default = "default_true")]
    closed: bool,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    locked: bool,
}

fn default_true() -> bool {
    true
}

impl Scene {
    /// Parses a scene from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::Scene`] when the source is not a valid scene.
    pub fn parse(source: &str) -> Result<Self, CaliperError> {
        toml::from_str(source).map_err(|e| CaliperError::Scene(format!("Failed to parse scene: {e}")))
    }

    pub fn viewport(&self) -> &ViewportSpec {
        &self.viewport
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    /// Adds the scene viewport and annotations to `overlay`.
    ///
    /// Returns the viewport id and the annotation ids in file order.
    ///
    /// # Errors
    ///
    /// Returns an error when an annotation has the wrong number of points or
    /// names an unknown parent.
    pub fn populate(&self, overlay: &mut Overlay) -> Result<(String, Vec<String>), CaliperError> {
        let viewport = PlanarViewport::from_spec(&self.viewport);
        let camera = viewport.camera();
        let frame_of_reference = viewport.frame_of_reference().to_string();
        let image_id = viewport.image().map(|image| image.image_id().to_string());
        let viewport_id = overlay.add_viewport(viewport);

        let mut ids = Vec::with_capacity(self.annotations.len());
        for spec in &self.annotations {
            let mut metadata = AnnotationMetadata::new(spec.tool.tool_name(), &frame_of_reference)
                .with_camera(camera.view_plane_normal(), camera.view_up())
                .with_tag_name(spec.tag_name.clone());
            if let Some(image_id) = &image_id {
                metadata = metadata.with_referenced_image_id(image_id);
            }
            let points = spec
                .points
                .iter()
                .map(|[x, y, z]| Point3::new(*x, *y, *z))
                .collect();

            let mut annotation = Annotation::new(spec.id.clone(), spec.tool, points, metadata)?;
            if spec.closed {
                annotation.close_contour();
            }
            if spec.label.is_some() {
                annotation.set_label(spec.label.clone());
            }
            annotation.set_visible(spec.visible);
            annotation.set_locked(spec.locked);
            ids.push(overlay.add_annotation(annotation));
        }

        for (spec, id) in self.annotations.iter().zip(&ids) {
            if let Some(parent) = &spec.parent {
                overlay.attach_hole(parent, id)?;
            }
        }
        Ok((viewport_id, ids))
    }
}

#[cfg(test)]
mod tests {
    use caliper::config::AppConfig;

    use super::*;

    const SCENE: &str = r#"
        [viewport]
        id = "axial"
        frame_of_reference = "study-1"

        [[annotation]]
        id = "outer"
        tool = "contour"
        points = [[0, 0, 0], [100, 0, 0], [100, 100, 0], [0, 100, 0]]

        [[annotation]]
        tool = "contour"
        parent = "outer"
        points = [[25, 25, 0], [75, 25, 0], [75, 75, 0]]

        [[annotation]]
        tool = "length"
        points = [[0, 0, 0], [3, 4, 0]]
        label = "Liver"
    "#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::parse(SCENE).unwrap();
        assert_eq!(scene.viewport().id, "axial");
        assert_eq!(scene.annotations().len(), 3);
        assert_eq!(scene.annotations()[0].tool, ShapeKind::Contour);
        assert!(scene.annotations()[0].closed);
    }

    #[test]
    fn test_populate_links_holes_and_labels() {
        let scene = Scene::parse(SCENE).unwrap();
        let mut overlay = Overlay::new(AppConfig::default()).unwrap();
        let (viewport_id, ids) = scene.populate(&mut overlay).unwrap();

        assert_eq!(viewport_id, "axial");
        assert_eq!(ids[0], "outer");
        let hole = overlay.annotation(&ids[1]).unwrap();
        assert_eq!(hole.parent_id(), Some("outer"));
        assert_eq!(overlay.annotation("outer").unwrap().child_ids(), &[ids[1].clone()]);
        assert_eq!(overlay.annotation(&ids[2]).unwrap().label(), Some("Liver"));
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let err = Scene::parse("[[annotation]]\ntool = \"protractor\"\npoints = []\n").unwrap_err();
        assert!(matches!(err, CaliperError::Scene(_)));
    }

    #[test]
    fn test_wrong_point_count_is_rejected() {
        let scene = Scene::parse("[[annotation]]\ntool = \"angle\"\npoints = [[0, 0, 0]]\n").unwrap();
        let mut overlay = Overlay::new(AppConfig::default()).unwrap();
        assert!(matches!(
            scene.populate(&mut overlay),
            Err(CaliperError::HandleCount { .. })
        ));
    }
}

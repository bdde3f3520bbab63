//! Spline contour region, closed or open.
//!
//! Control points are interpolated into a world-space polyline before stats
//! are computed, and the polyline is what gets drawn. Child contours are
//! drawn as holes in their parent's path and never on their own.

use caliper_core::{
    color::Color,
    draw::{
        ShapeOptions, StrokeDefinition, draw_handles, draw_handles_plus, draw_path, draw_polyline,
    },
    geometry::{Point2, chord_peak_vector},
    spline::Spline,
};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    error::CaliperError,
    format::round_or_omit,
    render::{
        AnnotationFrame, AnnotationRenderer, RenderContext, draw_primary_text,
        draw_secondary_label, text_box_enabled,
    },
    viewport::Viewport,
};

const MIN_LINE_WIDTH: f64 = 0.1;
const AID_COLOR: &str = "#0000ff";

#[derive(Debug, Clone, Copy)]
pub struct ContourRenderer {
    spline: Spline,
    show_control_point_connectors: bool,
    draw_preview: bool,
    aid_color: Color,
}

impl ContourRenderer {
    pub fn new(spline: Spline) -> Self {
        Self {
            spline,
            show_control_point_connectors: false,
            draw_preview: true,
            aid_color: Color::new(AID_COLOR).expect("valid CSS color"),
        }
    }

    pub fn with_control_point_connectors(mut self, show: bool) -> Self {
        self.show_control_point_connectors = show;
        self
    }

    pub fn with_preview(mut self, draw_preview: bool) -> Self {
        self.draw_preview = draw_preview;
        self
    }

    fn aid_options(&self) -> ShapeOptions {
        ShapeOptions::new(StrokeDefinition::new(self.aid_color, 1.0))
    }
}

impl Default for ContourRenderer {
    fn default() -> Self {
        Self::new(Spline::default())
    }
}

impl AnnotationRenderer for ContourRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Contour
    }

    fn prepare(&self, annotation: &mut Annotation, viewport: &dyn Viewport) {
        let stale = annotation.is_invalidated()
            || annotation
                .contour()
                .is_some_and(|contour| contour.polyline().is_empty());
        if !stale {
            return;
        }
        let closed = annotation.is_closed();
        let canvas: Vec<Point2> = annotation
            .points()
            .iter()
            .map(|p| viewport.world_to_canvas(*p))
            .collect();
        let outline = self.spline.interpolate(&canvas, closed);
        let peak = (!closed && canvas.len() >= 3)
            .then(|| chord_peak_vector(&outline))
            .flatten();

        let Some(contour) = annotation.contour_mut() else {
            return;
        };
        contour.set_polyline(outline.iter().map(|p| viewport.canvas_to_world(*p)).collect());
        if contour.open_u_peak().is_none() {
            if let Some([peak, chord_mid]) = peak {
                contour.set_open_u_peak([
                    viewport.canvas_to_world(peak),
                    viewport.canvas_to_world(chord_mid),
                ]);
            }
        }
    }

    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError> {
        let id = annotation.id().to_string();
        let canvas = &frame.canvas;
        let closed = annotation.is_closed();

        let handles = if annotation.active_handle().is_some() || annotation.is_highlighted() {
            frame.handles.clone()
        } else {
            frame.handles.clone().with_radius(0.0)
        };
        draw_handles(ctx.cache, &id, "0", canvas, &handles);
        draw_handles_plus(ctx.cache, &id, "0", canvas);

        let outline: Vec<Point2> = match annotation.contour() {
            Some(contour) if !contour.polyline().is_empty() => contour
                .polyline()
                .iter()
                .map(|p| ctx.viewport.world_to_canvas(*p))
                .collect(),
            _ => canvas.clone(),
        };
        let mut contours = Vec::with_capacity(frame.holes.len() + 1);
        contours.push(outline);
        contours.extend(frame.holes.iter().cloned());

        let stroke = frame
            .stroke
            .clone()
            .with_width(frame.stroke.width().max(MIN_LINE_WIDTH));
        let highlight =
            annotation.is_highlighted() && (annotation.is_selected() || !closed);
        let options = ShapeOptions::new(stroke).with_highlight(highlight);
        draw_path(ctx.cache, &id, "contourPolyline", &contours, &options, closed);

        if frame.is_new && self.draw_preview && !closed && canvas.len() > 1 {
            if let (Some(last), Some(pointer)) = (canvas.last(), ctx.pointer) {
                draw_polyline(
                    ctx.cache,
                    &id,
                    "previewSplineChange",
                    &[*last, pointer],
                    &self.aid_options(),
                    false,
                );
            }
        }
        if self.show_control_point_connectors {
            draw_polyline(
                ctx.cache,
                &id,
                "controlPointsConnectors",
                canvas,
                &self.aid_options(),
                closed,
            );
        }

        if !text_box_enabled(annotation, frame) {
            return Ok(());
        }
        if closed {
            let lines = text_lines(
                annotation.metadata().tag_name(),
                annotation.cached_stats(&ctx.viewport.target_id()),
            );
            if let Some(anchor) = canvas.get(1).copied() {
                draw_primary_text(annotation, frame, ctx, "textBox", &lines, anchor);
            }
        }
        draw_secondary_label(annotation, frame, ctx, "2", 3);
        Ok(())
    }
}

/// Tag name when set, else `"Area:<area><unit>"`. Nothing for unknown areas.
fn text_lines(tag_name: Option<&str>, stats: Option<&Measurement>) -> Vec<String> {
    if let Some(tag) = tag_name {
        return vec![tag.to_string()];
    }
    match stats {
        Some(Measurement::Area { area, area_unit, .. }) => round_or_omit(*area)
            .map(|area| format!("Area:{area}{}", area_unit.as_deref().unwrap_or_default()))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use caliper_core::geometry::{Point3, Size};

    use super::*;
    use crate::{annotation::AnnotationMetadata, viewport::PlanarViewport};

    #[test]
    fn test_prepare_interpolates_polyline() {
        let viewport = PlanarViewport::new("vp", "for", Size::new(100.0, 100.0));
        let mut annotation = Annotation::new(
            "c",
            ShapeKind::Contour,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 0.0),
                Point3::new(20.0, 0.0, 0.0),
            ],
            AnnotationMetadata::new("SplineROI", "for"),
        )
        .unwrap();
        let renderer = ContourRenderer::new(Spline::default());
        renderer.prepare(&mut annotation, &viewport);

        let contour = annotation.contour().unwrap();
        assert_eq!(contour.polyline().len(), 3);
        let [peak, chord_mid] = contour.open_u_peak().unwrap();
        assert_eq!(peak, Point3::new(10.0, 10.0, 0.0));
        assert_eq!(chord_mid, Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_aid_strokes_are_blue() {
        let renderer = ContourRenderer::default().with_control_point_connectors(true);
        let options = renderer.aid_options();
        assert_eq!(options.stroke().color(), Color::new(AID_COLOR).unwrap());
        assert_eq!(options.stroke().width(), 1.0);
    }

    #[test]
    fn test_tag_name_replaces_area_text() {
        let stats = Measurement::Area {
            modality: None,
            area: Some(4.0),
            area_unit: Some("mm²".to_string()),
        };
        assert_eq!(text_lines(None, Some(&stats)), vec!["Area:4.00mm²"]);
        assert_eq!(text_lines(Some("Tumor"), Some(&stats)), vec!["Tumor"]);
    }
}

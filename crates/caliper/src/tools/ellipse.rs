//! Elliptical region of interest.

use caliper_core::draw::{
    EllipseGeometry, ShapeOptions, draw_circle, draw_ellipse, draw_handles, draw_handles_plus,
};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    error::CaliperError,
    format::round_or_omit,
    render::{
        AnnotationFrame, AnnotationRenderer, RenderContext, draw_primary_text,
        draw_secondary_label, text_box_enabled,
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseRenderer {
    center_point_radius: f64,
}

impl EllipseRenderer {
    pub fn new(center_point_radius: f64) -> Self {
        Self {
            center_point_radius,
        }
    }
}

impl AnnotationRenderer for EllipseRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::EllipticalRoi
    }

    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError> {
        let id = annotation.id().to_string();
        let canvas = &frame.canvas;
        let &[bottom, top, left, right] = canvas.as_slice() else {
            return Ok(());
        };
        let options = frame.shape_options(annotation);

        if annotation.active_handle().is_some() || annotation.is_highlighted() {
            draw_handles(ctx.cache, &id, "0", canvas, &frame.handles);
        }
        draw_handles_plus(ctx.cache, &id, "0", canvas);
        draw_ellipse(ctx.cache, &id, "0", [bottom, top, left, right], &options);

        let geometry = EllipseGeometry::from_diameters([bottom, top, left, right]);
        let min_radius = geometry.radius_x().min(geometry.radius_y());
        if self.center_point_radius > 0.0 && min_radius > 3.0 * self.center_point_radius {
            let marker = ShapeOptions::new(frame.stroke.clone())
                .with_fill(frame.stroke.color(), 1.0);
            draw_circle(
                ctx.cache,
                &id,
                "0-center",
                geometry.center(),
                self.center_point_radius,
                &marker,
            );
        }

        if !text_box_enabled(annotation, frame) {
            return Ok(());
        }
        let lines = text_lines(annotation.cached_stats(&ctx.viewport.target_id()));
        draw_primary_text(annotation, frame, ctx, "2", &lines, left);
        draw_secondary_label(annotation, frame, ctx, "label", 4);
        Ok(())
    }
}

/// `"Area:<area><unit>"`, or nothing when the area is unknown.
fn text_lines(stats: Option<&Measurement>) -> Vec<String> {
    match stats {
        Some(Measurement::Area { area, area_unit, .. }) => round_or_omit(*area)
            .map(|area| format!("Area:{area}{}", area_unit.as_deref().unwrap_or_default()))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

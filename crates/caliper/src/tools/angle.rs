//! Three-point angle with the vertex in the middle.

use caliper_core::draw::{draw_handles, draw_handles_plus, draw_line};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    error::CaliperError,
    render::{
        AnnotationFrame, AnnotationRenderer, RenderContext, draw_primary_text,
        draw_secondary_label, text_box_enabled,
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AngleRenderer;

impl AnnotationRenderer for AngleRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Angle
    }

    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError> {
        let id = annotation.id().to_string();
        let canvas = &frame.canvas;
        let options = frame.shape_options(annotation);

        if (annotation.active_handle().is_some() && frame.is_new) || annotation.is_highlighted() {
            draw_handles(ctx.cache, &id, "0", canvas, &frame.handles);
        }
        draw_handles_plus(ctx.cache, &id, "0", canvas);
        draw_line(ctx.cache, &id, "1", canvas[0], canvas[1], &options);
        if let Some(end) = canvas.get(2) {
            draw_line(ctx.cache, &id, "2", canvas[1], *end, &options);
        }

        if canvas.len() != 3 || !text_box_enabled(annotation, frame) {
            return Ok(());
        }
        let Some(text) = angle_text(annotation.cached_stats(&ctx.viewport.target_id())) else {
            return Ok(());
        };
        draw_primary_text(annotation, frame, ctx, "2", &[text], canvas[1]);
        draw_secondary_label(annotation, frame, ctx, "label", 3);
        Ok(())
    }
}

fn angle_text(stats: Option<&Measurement>) -> Option<String> {
    match stats {
        Some(Measurement::Angle { angle: Some(angle) }) if *angle != 0.0 => {
            Some(format!("Angle:{angle:.2}°"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_text() {
        let stats = Measurement::Angle { angle: Some(90.0) };
        assert_eq!(angle_text(Some(&stats)).as_deref(), Some("Angle:90.00°"));
        assert_eq!(angle_text(Some(&Measurement::Angle { angle: None })), None);
        assert_eq!(angle_text(Some(&Measurement::Angle { angle: Some(0.0) })), None);
    }
}

//! Two-point length line.

use caliper_core::{
    draw::{draw_handles, draw_handles_plus, draw_line},
    geometry::Point2,
};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    error::CaliperError,
    format::{DEFAULT_PRECISION, round_number},
    render::{
        AnnotationFrame, AnnotationRenderer, RenderContext, draw_primary_text,
        draw_secondary_label, text_box_enabled,
    },
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LengthRenderer;

impl AnnotationRenderer for LengthRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Length
    }

    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError> {
        let id = annotation.id().to_string();
        let canvas = &frame.canvas;

        if annotation.active_handle().is_some() || annotation.is_highlighted() {
            draw_handles(ctx.cache, &id, "0", canvas, &frame.handles);
        }
        draw_handles_plus(ctx.cache, &id, "0", canvas);
        draw_line(
            ctx.cache,
            &id,
            "1",
            canvas[0],
            canvas[1],
            &frame.shape_options(annotation),
        );

        if !text_box_enabled(annotation, frame) {
            return Ok(());
        }

        let lines = text_lines(annotation.cached_stats(&ctx.viewport.target_id()));
        let (left, right) = left_and_right(canvas[0], canvas[1]);
        let mut primary = frame.clone();
        primary.text_box.options = primary
            .text_box
            .options
            .clone()
            .with_left_down(left.y() >= right.y());
        draw_primary_text(annotation, &primary, ctx, "1", &lines, right);

        draw_secondary_label(annotation, frame, ctx, "2", 2);
        Ok(())
    }
}

/// `"<length> <unit>"`, or nothing when the length is unknown.
fn text_lines(stats: Option<&Measurement>) -> Vec<String> {
    match stats {
        Some(Measurement::Length {
            length: Some(length),
            unit,
        }) => vec![format!(
            "{} {}",
            round_number(Some(*length), DEFAULT_PRECISION),
            unit.as_deref().unwrap_or_default()
        )],
        _ => Vec::new(),
    }
}

/// Orders the endpoints by x.
fn left_and_right(a: Point2, b: Point2) -> (Point2, Point2) {
    if a.x() <= b.x() { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        let stats = Measurement::Length {
            length: Some(5.0),
            unit: Some("mm".to_string()),
        };
        assert_eq!(text_lines(Some(&stats)), vec!["5.00 mm".to_string()]);

        let unknown = Measurement::placeholder(ShapeKind::Length);
        assert!(text_lines(Some(&unknown)).is_empty());
        assert!(text_lines(None).is_empty());
    }

    #[test]
    fn test_left_and_right() {
        let a = Point2::new(10.0, 0.0);
        let b = Point2::new(0.0, 5.0);
        assert_eq!(left_and_right(a, b), (b, a));
    }
}

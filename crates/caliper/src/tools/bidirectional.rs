//! Bidirectional calipers: a long axis and a perpendicular short axis.

use caliper_core::draw::{draw_handle, draw_handles_plus, draw_line};

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
pub struct BidirectionalRenderer;

impl AnnotationRenderer for BidirectionalRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Bidirectional
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

        if let Some(active) = annotation.active_handle().filter(|_| !annotation.is_locked()) {
            if let Some(point) = canvas.get(active) {
                draw_handle(ctx.cache, &id, "0", *point, active, &frame.handles);
            }
        }
        draw_handles_plus(ctx.cache, &id, "2", canvas);
        draw_line(ctx.cache, &id, "0", canvas[0], canvas[1], &options);
        if let [_, _, p2, p3, ..] = canvas.as_slice() {
            draw_line(ctx.cache, &id, "1", *p2, *p3, &options);
        }

        if !text_box_enabled(annotation, frame) {
            return Ok(());
        }
        let lines = text_lines(
            annotation.label(),
            annotation.cached_stats(&ctx.viewport.target_id()),
        );
        if let Some(anchor) = canvas.get(1).copied() {
            draw_primary_text(annotation, frame, ctx, "1", &lines, anchor);
        }
        draw_secondary_label(annotation, frame, ctx, "2", 4);
        Ok(())
    }
}

/// Label (if any), then `L:` and `W:` lines. Missing values print as `NaN`.
fn text_lines(label: Option<&str>, stats: Option<&Measurement>) -> Vec<String> {
    let Some(Measurement::Bidirectional {
        length: length @ Some(_),
        width,
        unit,
    }) = stats
    else {
        return Vec::new();
    };
    let unit = unit.as_deref().unwrap_or_default();
    let mut lines = Vec::with_capacity(3);
    if let Some(label) = label.filter(|label| !label.is_empty()) {
        lines.push(label.to_string());
    }
    lines.push(format!("L: {} {unit}", round_number(*length, DEFAULT_PRECISION)));
    lines.push(format!("W: {} {unit}", round_number(*width, DEFAULT_PRECISION)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines_use_nan_placeholder() {
        let stats = Measurement::Bidirectional {
            length: Some(10.0),
            width: None,
            unit: Some("mm".to_string()),
        };
        assert_eq!(
            text_lines(Some("Lesion"), Some(&stats)),
            vec!["Lesion", "L: 10.0 mm", "W: NaN mm"]
        );
    }

    #[test]
    fn test_no_lines_without_length() {
        let stats = Measurement::placeholder(ShapeKind::Bidirectional);
        assert!(text_lines(None, Some(&stats)).is_empty());
    }
}

//! Cobb angle between two independent lines.
//!
//! Besides the two lines, a dotted link joins their midpoints. With arc lines
//! enabled, two short arcs mark the angles between each line and the link,
//! each with its own small text box.

use caliper_core::{
    draw::{
        ShapeOptions, StrokeDefinition, StrokeStyle, draw_handles, draw_handles_plus, draw_line,
        draw_linked_text_box,
    },
    geometry::Point2,
};

use crate::{
    annotation::{Annotation, Measurement, ShapeKind},
    error::CaliperError,
    render::{
        AnnotationFrame, AnnotationRenderer, RenderContext, draw_primary_text,
        draw_secondary_label, text_box_enabled,
    },
};

/// Arc length as a fraction of the link length.
const ARC_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct CobbRenderer {
    show_arc_lines: bool,
}

impl CobbRenderer {
    pub fn new(show_arc_lines: bool) -> Self {
        Self { show_arc_lines }
    }
}

impl AnnotationRenderer for CobbRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::CobbAngle
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

        let active = annotation.active_handle().is_some() && !annotation.is_locked();
        if active || annotation.is_highlighted() {
            draw_handles(ctx.cache, &id, "0", canvas, &frame.handles);
        }
        draw_handles_plus(ctx.cache, &id, "0", canvas);
        draw_line(ctx.cache, &id, "line1", canvas[0], canvas[1], &options);

        let stats = annotation
            .cached_stats(&ctx.viewport.target_id())
            .cloned();
        if let [p0, p1, p2, p3, ..] = canvas.as_slice() {
            draw_line(ctx.cache, &id, "line2", *p2, *p3, &options);

            let mid1 = p0.midpoint(*p1);
            let mid2 = p2.midpoint(*p3);
            let link_stroke = StrokeDefinition::new(frame.stroke.color(), 1.0)
                .with_style(StrokeStyle::Custom("1,4".to_string()));
            draw_line(
                ctx.cache,
                &id,
                "linkLine",
                mid1,
                mid2,
                &ShapeOptions::new(link_stroke),
            );

            if self.show_arc_lines {
                self.draw_arcs(&id, frame, ctx, [*p0, *p1, *p2, *p3], stats.as_ref());
            }
        }

        if !text_box_enabled(annotation, frame) {
            return Ok(());
        }
        let text = match (annotation.metadata().tag_name(), stats.as_ref()) {
            (Some(tag), _) => tag.to_string(),
            (None, Some(Measurement::Cobb { angle: Some(angle), .. })) => {
                format!("Angle: {angle:.2}°")
            }
            (None, _) => String::new(),
        };
        if let Some(anchor) = canvas.get(1).copied() {
            draw_primary_text(annotation, frame, ctx, "cobbAngleTextLabel", &[text], anchor);
        }
        draw_secondary_label(annotation, frame, ctx, "labelTextBox", 4);
        Ok(())
    }
}

impl CobbRenderer {
    fn draw_arcs(
        &self,
        id: &str,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
        [p0, p1, p2, p3]: [Point2; 4],
        stats: Option<&Measurement>,
    ) {
        let mid1 = p0.midpoint(p1);
        let mid2 = p2.midpoint(p3);
        let arc_length = mid1.distance(mid2) * ARC_RATIO;
        let link_direction = mid2.sub_point(mid1).normalize();

        let options = ShapeOptions::new(StrokeDefinition::new(frame.stroke.color(), 1.0));
        let arcs = [
            ("arc1", "arcAngle1", mid1, p1.sub_point(p0), link_direction),
            ("arc2", "arcAngle2", mid2, p3.sub_point(p2), link_direction.scale(-1.0)),
        ];
        let (arc1_angle, arc2_angle) = match stats {
            Some(Measurement::Cobb {
                arc1_angle,
                arc2_angle,
                ..
            }) => (*arc1_angle, *arc2_angle),
            _ => (None, None),
        };

        for ((line_uid, text_uid, center, line, link), angle) in
            arcs.into_iter().zip([arc1_angle, arc2_angle])
        {
            let mut along = line.normalize();
            if along.dot(link) < 0.0 {
                along = along.scale(-1.0);
            }
            let start = center.add_point(along.scale(arc_length));
            let end = center.add_point(link.scale(arc_length));
            draw_line(ctx.cache, id, line_uid, start, end, &options);

            let Some(angle) = angle else {
                continue;
            };
            let text_options = frame.text_box.options.clone().with_padding(3.0);
            draw_linked_text_box(
                ctx.cache,
                id,
                text_uid,
                &[format!("{angle:.2} °")],
                start.midpoint(end),
                &[],
                &text_options,
                None,
            );
        }
    }
}

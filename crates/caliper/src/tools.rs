//! Shape-specific renderers.
//!
//! Each shape kind has one [`AnnotationRenderer`] implementation.
//! [`ShapeRenderer`] wraps them in a tagged variant so the overlay can select
//! the renderer from an annotation's [`ShapeKind`].

mod angle;
mod bidirectional;
mod cobb;
mod contour;
mod ellipse;
mod length;

pub use angle::AngleRenderer;
pub use bidirectional::BidirectionalRenderer;
pub use cobb::CobbRenderer;
pub use contour::ContourRenderer;
pub use ellipse::EllipseRenderer;
pub use length::LengthRenderer;

use crate::{
    annotation::{Annotation, ShapeKind},
    config::AppConfig,
    error::CaliperError,
    render::{AnnotationFrame, AnnotationRenderer, RenderContext},
    viewport::Viewport,
};

/// A renderer for one shape kind.
#[derive(Debug, Clone, Copy)]
pub enum ShapeRenderer {
    Length(LengthRenderer),
    Angle(AngleRenderer),
    Cobb(CobbRenderer),
    Bidirectional(BidirectionalRenderer),
    Ellipse(EllipseRenderer),
    Contour(ContourRenderer),
}

impl ShapeRenderer {
    /// Builds the renderer of `kind` configured from `config`.
    pub fn from_config(kind: ShapeKind, config: &AppConfig) -> Self {
        let style = config.style();
        match kind {
            ShapeKind::Length => Self::Length(LengthRenderer),
            ShapeKind::Angle => Self::Angle(AngleRenderer),
            ShapeKind::CobbAngle => Self::Cobb(CobbRenderer::new(style.show_arc_lines())),
            ShapeKind::Bidirectional => Self::Bidirectional(BidirectionalRenderer),
            ShapeKind::EllipticalRoi => {
                Self::Ellipse(EllipseRenderer::new(style.center_point_radius()))
            }
            ShapeKind::Contour => {
                let spline = config.interaction().spline();
                Self::Contour(
                    ContourRenderer::new(spline.spline())
                        .with_control_point_connectors(spline.show_control_point_connectors())
                        .with_preview(spline.draw_preview()),
                )
            }
        }
    }

    fn inner(&self) -> &dyn AnnotationRenderer {
        match self {
            Self::Length(renderer) => renderer,
            Self::Angle(renderer) => renderer,
            Self::Cobb(renderer) => renderer,
            Self::Bidirectional(renderer) => renderer,
            Self::Ellipse(renderer) => renderer,
            Self::Contour(renderer) => renderer,
        }
    }
}

impl AnnotationRenderer for ShapeRenderer {
    fn kind(&self) -> ShapeKind {
        self.inner().kind()
    }

    fn prepare(&self, annotation: &mut Annotation, viewport: &dyn Viewport) {
        self.inner().prepare(annotation, viewport);
    }

    fn render_annotation(
        &self,
        annotation: &mut Annotation,
        frame: &AnnotationFrame,
        ctx: &mut RenderContext<'_>,
    ) -> Result<(), CaliperError> {
        self.inner().render_annotation(annotation, frame, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_kind_matches_requested_kind() {
        let config = AppConfig::default();
        for kind in ShapeKind::all() {
            assert_eq!(ShapeRenderer::from_config(*kind, &config).kind(), *kind);
        }
    }
}

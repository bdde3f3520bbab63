//! Drag and edit state machine shared by every tool.
//!
//! A drag event carries the world-space delta since the previous event and
//! the pointer's current world position. [`apply_drag`] maps it onto the part
//! of the annotation the edit session grabbed.

use log::trace;

use caliper_core::geometry::Point3;

use crate::annotation::Annotation;

/// Part of an annotation grabbed by an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// The primary text box
    TextBox,
    /// One line of a multi-line shape, by line index; line `i` spans control
    /// points `2i` and `2i + 1`
    Segment(usize),
    /// Every control point
    WholeShape,
    /// A single control point, repositioned absolutely
    Handle(usize),
}

/// Applies one drag event to `annotation`.
///
/// Text box moves translate the box and freeze it. Segment and whole-shape
/// drags translate points by `world_delta`. Handle drags move the handle to
/// `current_world`, the pointer's absolute world position.
///
/// Returns true when the geometry changed and the annotation was
/// invalidated.
pub fn apply_drag(
    annotation: &mut Annotation,
    target: DragTarget,
    world_delta: Point3,
    current_world: Point3,
) -> bool {
    trace!(annotation_id = annotation.id(), target:? = target; "Applying drag");
    match target {
        DragTarget::TextBox => {
            annotation.text_box_mut().translate(world_delta);
            false
        }
        DragTarget::Segment(line) => {
            let start = line * 2;
            annotation.translate_points([start, start + 1], world_delta);
            true
        }
        DragTarget::WholeShape => {
            annotation.translate_all(world_delta);
            true
        }
        DragTarget::Handle(index) => annotation.set_point(index, current_world),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationMetadata, ShapeKind};

    fn cobb() -> Annotation {
        let mut annotation = Annotation::new(
            "cobb",
            ShapeKind::CobbAngle,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(0.0, 10.0, 0.0),
                Point3::new(10.0, 20.0, 0.0),
            ],
            AnnotationMetadata::new("CobbAngle", "for"),
        )
        .unwrap();
        annotation.clear_invalidated();
        annotation
    }

    #[test]
    fn test_handle_drag_is_absolute() {
        let mut annotation = cobb();
        let delta = Point3::new(1.0, 1.0, 0.0);
        let pointer = Point3::new(4.0, -3.0, 0.0);
        assert!(apply_drag(&mut annotation, DragTarget::Handle(1), delta, pointer));
        assert_eq!(annotation.points()[1], pointer);
        assert_ne!(annotation.points()[1], Point3::new(11.0, 1.0, 0.0));
        assert!(annotation.is_invalidated());
    }

    #[test]
    fn test_whole_shape_drag_is_relative() {
        let mut annotation = cobb();
        let before = annotation.points().to_vec();
        let delta = Point3::new(1.0, 2.0, 3.0);
        assert!(apply_drag(&mut annotation, DragTarget::WholeShape, delta, Point3::zero()));
        for (after, before) in annotation.points().iter().zip(before) {
            assert_eq!(*after, before.add_point(delta));
        }
    }

    #[test]
    fn test_segment_drag_moves_one_line() {
        let mut annotation = cobb();
        let delta = Point3::new(0.0, 5.0, 0.0);
        apply_drag(&mut annotation, DragTarget::Segment(1), delta, Point3::zero());
        assert_eq!(annotation.points()[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(annotation.points()[1], Point3::new(10.0, 0.0, 0.0));
        assert_eq!(annotation.points()[2], Point3::new(0.0, 15.0, 0.0));
        assert_eq!(annotation.points()[3], Point3::new(10.0, 25.0, 0.0));
    }

    #[test]
    fn test_text_box_drag_does_not_invalidate() {
        let mut annotation = cobb();
        let delta = Point3::new(5.0, 0.0, 0.0);
        let before = annotation.text_box().world_position();
        assert!(!apply_drag(&mut annotation, DragTarget::TextBox, delta, Point3::zero()));
        assert!(annotation.text_box().has_moved());
        assert_eq!(annotation.text_box().world_position().x(), before.x() + 5.0);
        assert!(!annotation.is_invalidated());
    }

    #[test]
    fn test_out_of_range_handle_is_ignored() {
        let mut annotation = cobb();
        assert!(!apply_drag(
            &mut annotation,
            DragTarget::Handle(9),
            Point3::zero(),
            Point3::zero()
        ));
        assert!(!annotation.is_invalidated());
    }
}

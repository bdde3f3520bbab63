//! Annotation data model.
//!
//! An [`Annotation`] is the unit of identity and persistence. It owns its
//! world-space control points, its text box placement, and the measurement
//! cache keyed by display target. Geometry always flows from here into the
//! scene; nothing is read back from drawn nodes.
//!
//! # Overview
//!
//! - [`ShapeKind`] - Concrete tools (length, angle, Cobb angle, ...)
//! - [`ShapeFamily`] - The four geometric families the tools belong to
//! - [`Cardinality`] - Required control point count of a shape
//! - [`TextBox`] / [`WorldBoundingBox`] - Text box placement in world space
//! - [`Measurement`] - Cached statistics of one display target
//! - [`AnnotationMetadata`] / [`MeasurementValue`] - Host-facing metadata
//! - [`ContourData`] - Interpolated outline and openness of a contour

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::Deserialize;

use caliper_core::geometry::Point3;

use crate::error::CaliperError;

/// Label assigned automatically when no current label is available.
pub const NO_LABEL: &str = "No label";

/// Concrete annotation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Two-point line
    Length,
    /// Three-point angle with the vertex in the middle
    Angle,
    /// Angle between two independent two-point lines
    CobbAngle,
    /// Long and short axis calipers
    Bidirectional,
    /// Ellipse through two diameters ordered `[bottom, top, left, right]`
    EllipticalRoi,
    /// Spline region, closed or open
    Contour,
}

impl ShapeKind {
    /// Every shape kind, in tool registration order.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Length,
            ShapeKind::Angle,
            ShapeKind::CobbAngle,
            ShapeKind::Bidirectional,
            ShapeKind::EllipticalRoi,
            ShapeKind::Contour,
        ]
    }

    /// Name under which annotations of this kind are stored.
    pub fn tool_name(self) -> &'static str {
        match self {
            ShapeKind::Length => "Length",
            ShapeKind::Angle => "Angle",
            ShapeKind::CobbAngle => "CobbAngle",
            ShapeKind::Bidirectional => "Bidirectional",
            ShapeKind::EllipticalRoi => "EllipticalROI",
            ShapeKind::Contour => "SplineROI",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.tool_name() == name)
    }

    pub fn family(self) -> ShapeFamily {
        match self {
            ShapeKind::Length => ShapeFamily::TwoPointLine,
            ShapeKind::Angle | ShapeKind::CobbAngle | ShapeKind::Bidirectional => {
                ShapeFamily::ThreeOrFourPointAngleLike
            }
            ShapeKind::EllipticalRoi => ShapeFamily::EllipseFourPoint,
            ShapeKind::Contour => ShapeFamily::ClosedOrOpenContour,
        }
    }

    pub fn cardinality(self) -> Cardinality {
        match self {
            ShapeKind::Length => Cardinality::Exactly(2),
            ShapeKind::Angle => Cardinality::Exactly(3),
            ShapeKind::CobbAngle | ShapeKind::Bidirectional | ShapeKind::EllipticalRoi => {
                Cardinality::Exactly(4)
            }
            ShapeKind::Contour => Cardinality::AtLeast(2),
        }
    }

    /// Control point next to which the secondary label box is drawn.
    pub fn label_anchor_index(self) -> usize {
        match self {
            ShapeKind::Length | ShapeKind::Angle | ShapeKind::Contour => 0,
            ShapeKind::CobbAngle => 2,
            ShapeKind::Bidirectional | ShapeKind::EllipticalRoi => 3,
        }
    }

    /// Whether the shape is placed by dragging from an anchor (as opposed to
    /// clicking one point at a time).
    pub fn is_drag_out(self) -> bool {
        matches!(
            self,
            ShapeKind::Length | ShapeKind::Bidirectional | ShapeKind::EllipticalRoi
        )
    }
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// The geometric families annotation tools belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFamily {
    TwoPointLine,
    ThreeOrFourPointAngleLike,
    ClosedOrOpenContour,
    EllipseFourPoint,
}

/// Required number of control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Exactly(usize),
    AtLeast(usize),
}

impl Cardinality {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Cardinality::Exactly(n) => count == n,
            Cardinality::AtLeast(n) => count >= n,
        }
    }

    /// Point count at which placement of the shape is complete, if fixed.
    pub fn fixed(self) -> Option<usize> {
        match self {
            Cardinality::Exactly(n) => Some(n),
            Cardinality::AtLeast(_) => None,
        }
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Exactly(n) => write!(f, "{n}"),
            Cardinality::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// World-space corners of a realized text box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldBoundingBox {
    pub top_left: Point3,
    pub top_right: Point3,
    pub bottom_left: Point3,
    pub bottom_right: Point3,
}

/// Placement of an annotation's primary text box.
///
/// Until the user drags the box, its position follows the geometry on every
/// render. Once moved, [`TextBox::world_position`] is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextBox {
    has_moved: bool,
    world_position: Point3,
    world_bounding_box: WorldBoundingBox,
}

impl TextBox {
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn world_position(&self) -> Point3 {
        self.world_position
    }

    pub fn world_bounding_box(&self) -> &WorldBoundingBox {
        &self.world_bounding_box
    }

    /// Moves the box to follow the geometry. Ignored once the user has moved it.
    pub fn follow(&mut self, position: Point3) {
        if !self.has_moved {
            self.world_position = position;
        }
    }

    /// Translates the box by a world delta and freezes it.
    pub fn translate(&mut self, delta: Point3) {
        self.world_position = self.world_position.add_point(delta);
        self.has_moved = true;
    }

    pub fn set_world_bounding_box(&mut self, bounding_box: WorldBoundingBox) {
        self.world_bounding_box = bounding_box;
    }

    /// Resets to the untouched zero state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cached statistics for one display target.
///
/// A record whose trust marker (unit, angle or area unit depending on the
/// variant) is `None` is a placeholder and forces an immediate recompute.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Length {
        length: Option<f64>,
        unit: Option<String>,
    },
    Angle {
        angle: Option<f64>,
    },
    Cobb {
        angle: Option<f64>,
        arc1_angle: Option<f64>,
        arc2_angle: Option<f64>,
    },
    Bidirectional {
        length: Option<f64>,
        width: Option<f64>,
        unit: Option<String>,
    },
    Area {
        modality: Option<String>,
        area: Option<f64>,
        area_unit: Option<String>,
    },
}

impl Measurement {
    /// Empty record of the variant used by `kind`.
    pub fn placeholder(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Length => Measurement::Length {
                length: None,
                unit: None,
            },
            ShapeKind::Angle => Measurement::Angle { angle: None },
            ShapeKind::CobbAngle => Measurement::Cobb {
                angle: None,
                arc1_angle: None,
                arc2_angle: None,
            },
            ShapeKind::Bidirectional => Measurement::Bidirectional {
                length: None,
                width: None,
                unit: None,
            },
            ShapeKind::EllipticalRoi | ShapeKind::Contour => Measurement::Area {
                modality: None,
                area: None,
                area_unit: None,
            },
        }
    }

    /// Whether the record has been computed and may be trusted.
    pub fn is_trusted(&self) -> bool {
        match self {
            Measurement::Length { unit, .. } | Measurement::Bidirectional { unit, .. } => {
                unit.is_some()
            }
            Measurement::Angle { angle } | Measurement::Cobb { angle, .. } => angle.is_some(),
            Measurement::Area { area_unit, .. } => area_unit.is_some(),
        }
    }

    /// Flat `(name, value, unit)` view used for annotation metadata.
    pub fn values(&self) -> Vec<MeasurementValue> {
        match self {
            Measurement::Length { length, unit } => vec![MeasurementValue::new(
                "length",
                *length,
                unit.as_deref().unwrap_or_default(),
            )],
            Measurement::Angle { angle } => vec![MeasurementValue::new("angle", *angle, "deg")],
            Measurement::Cobb { angle, .. } => {
                vec![MeasurementValue::new("angle", *angle, "deg")]
            }
            Measurement::Bidirectional {
                length,
                width,
                unit,
            } => {
                let unit = unit.as_deref().unwrap_or_default();
                vec![
                    MeasurementValue::new("length", *length, unit),
                    MeasurementValue::new("width", *width, unit),
                ]
            }
            Measurement::Area {
                area, area_unit, ..
            } => vec![MeasurementValue::new(
                "area",
                *area,
                area_unit.as_deref().unwrap_or_default(),
            )],
        }
    }
}

/// One named measurement value exposed to measurement panels.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementValue {
    name: String,
    value: Option<f64>,
    unit: String,
}

impl MeasurementValue {
    pub fn new(name: impl Into<String>, value: Option<f64>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Host-facing annotation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMetadata {
    tool_name: String,
    frame_of_reference: String,
    view_plane_normal: Point3,
    view_up: Point3,
    referenced_image_id: Option<String>,
    /// Replaces the computed primary text of angle-like shapes when set.
    tag_name: Option<String>,
    measurement_values: Vec<MeasurementValue>,
}

impl AnnotationMetadata {
    pub fn new(tool_name: impl Into<String>, frame_of_reference: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            frame_of_reference: frame_of_reference.into(),
            view_plane_normal: Point3::new(0.0, 0.0, 1.0),
            view_up: Point3::new(0.0, -1.0, 0.0),
            referenced_image_id: None,
            tag_name: None,
            measurement_values: Vec::new(),
        }
    }

    pub fn with_camera(mut self, view_plane_normal: Point3, view_up: Point3) -> Self {
        self.view_plane_normal = view_plane_normal;
        self.view_up = view_up;
        self
    }

    pub fn with_referenced_image_id(mut self, image_id: impl Into<String>) -> Self {
        self.referenced_image_id = Some(image_id.into());
        self
    }

    pub fn with_tag_name(mut self, tag_name: Option<String>) -> Self {
        self.tag_name = tag_name;
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn frame_of_reference(&self) -> &str {
        &self.frame_of_reference
    }

    pub fn view_plane_normal(&self) -> Point3 {
        self.view_plane_normal
    }

    pub fn view_up(&self) -> Point3 {
        self.view_up
    }

    pub fn referenced_image_id(&self) -> Option<&str> {
        self.referenced_image_id.as_deref()
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    pub fn measurement_values(&self) -> &[MeasurementValue] {
        &self.measurement_values
    }

    pub fn set_measurement_values(&mut self, values: Vec<MeasurementValue>) {
        self.measurement_values = values;
    }
}

/// Outline state of a contour annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourData {
    closed: bool,
    /// Interpolated outline in world space
    polyline: Vec<Point3>,
    /// `[peak, chord_midpoint]` of an open U-shaped contour, in world space
    open_u_peak: Option<[Point3; 2]>,
}

impl ContourData {
    pub fn new(closed: bool) -> Self {
        Self {
            closed,
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn polyline(&self) -> &[Point3] {
        &self.polyline
    }

    pub fn open_u_peak(&self) -> Option<[Point3; 2]> {
        self.open_u_peak
    }

    pub fn set_polyline(&mut self, polyline: Vec<Point3>) {
        self.polyline = polyline;
    }

    pub fn set_open_u_peak(&mut self, peak: [Point3; 2]) {
        self.open_u_peak = Some(peak);
    }
}

/// A measurement annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    id: String,
    kind: ShapeKind,
    points: Vec<Point3>,
    active_handle: Option<usize>,
    text_box: TextBox,
    cached_stats: IndexMap<String, Measurement>,
    label: Option<String>,
    invalidated: bool,
    visible: bool,
    locked: bool,
    highlighted: bool,
    selected: bool,
    metadata: AnnotationMetadata,
    contour: Option<ContourData>,
    parent_id: Option<String>,
    child_ids: Vec<String>,
}

impl Annotation {
    /// Creates a fully placed annotation.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::HandleCount`] when `points` does not match the
    /// cardinality of `kind`.
    pub fn new(
        id: impl Into<String>,
        kind: ShapeKind,
        points: Vec<Point3>,
        metadata: AnnotationMetadata,
    ) -> Result<Self, CaliperError> {
        let id = id.into();
        let cardinality = kind.cardinality();
        if !cardinality.accepts(points.len()) {
            return Err(CaliperError::HandleCount {
                id,
                kind,
                expected: cardinality.to_string(),
                actual: points.len(),
            });
        }
        Ok(Self::with_points(id, kind, points, metadata))
    }

    /// Creates an annotation that is still being placed and may hold fewer
    /// points than its kind requires.
    pub fn begin_placement(
        id: impl Into<String>,
        kind: ShapeKind,
        points: Vec<Point3>,
        metadata: AnnotationMetadata,
    ) -> Self {
        Self::with_points(id.into(), kind, points, metadata)
    }

    fn with_points(
        id: String,
        kind: ShapeKind,
        points: Vec<Point3>,
        metadata: AnnotationMetadata,
    ) -> Self {
        let contour = (kind == ShapeKind::Contour).then(|| ContourData::new(false));
        Self {
            id,
            kind,
            points,
            active_handle: None,
            text_box: TextBox::default(),
            cached_stats: IndexMap::new(),
            label: None,
            invalidated: true,
            visible: true,
            locked: false,
            highlighted: false,
            selected: false,
            metadata,
            contour,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Whether the annotation holds the point count its kind requires.
    pub fn has_required_points(&self) -> bool {
        self.kind.cardinality().accepts(self.points.len())
    }

    /// Replaces one control point. Returns false for an out of range index.
    pub fn set_point(&mut self, index: usize, point: Point3) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                self.invalidated = true;
                true
            }
            None => false,
        }
    }

    pub fn push_point(&mut self, point: Point3) {
        self.points.push(point);
        self.invalidated = true;
    }

    /// Replaces every control point.
    pub fn set_points(&mut self, points: Vec<Point3>) {
        self.points = points;
        self.invalidated = true;
    }

    /// Translates the control points at `indices` by `delta`.
    pub fn translate_points(&mut self, indices: impl IntoIterator<Item = usize>, delta: Point3) {
        for index in indices {
            if let Some(point) = self.points.get_mut(index) {
                *point = point.add_point(delta);
            }
        }
        self.invalidated = true;
    }

    /// Translates every control point by `delta`.
    pub fn translate_all(&mut self, delta: Point3) {
        self.translate_points(0..self.points.len(), delta);
    }

    pub fn active_handle(&self) -> Option<usize> {
        self.active_handle
    }

    pub fn set_active_handle(&mut self, index: Option<usize>) {
        self.active_handle = index;
    }

    pub fn text_box(&self) -> &TextBox {
        &self.text_box
    }

    pub fn text_box_mut(&mut self) -> &mut TextBox {
        &mut self.text_box
    }

    pub fn cached_stats(&self, target_id: &str) -> Option<&Measurement> {
        self.cached_stats.get(target_id)
    }

    pub fn cached_targets(&self) -> impl Iterator<Item = &str> {
        self.cached_stats.keys().map(String::as_str)
    }

    /// Whether the cache for `target_id` exists and carries its trust marker.
    pub fn has_trusted_stats(&self, target_id: &str) -> bool {
        self.cached_stats
            .get(target_id)
            .is_some_and(Measurement::is_trusted)
    }

    pub fn set_cached_stats(&mut self, target_id: impl Into<String>, stats: Measurement) {
        self.cached_stats.insert(target_id.into(), stats);
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Assigns the label automatically, at most once.
    ///
    /// An empty `current` label assigns [`NO_LABEL`]. Returns true when the
    /// label was assigned by this call.
    pub fn assign_label_once(&mut self, current: &str) -> bool {
        if self.label.as_deref().is_some_and(|label| !label.is_empty()) {
            return false;
        }
        let current = current.trim();
        self.label = Some(if current.is_empty() {
            NO_LABEL.to_string()
        } else {
            current.to_string()
        });
        true
    }

    /// Explicit user edit of the label.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn clear_invalidated(&mut self) {
        self.invalidated = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn metadata(&self) -> &AnnotationMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut AnnotationMetadata {
        &mut self.metadata
    }

    pub fn contour(&self) -> Option<&ContourData> {
        self.contour.as_ref()
    }

    pub fn contour_mut(&mut self) -> Option<&mut ContourData> {
        self.contour.as_mut()
    }

    /// Whether this is a closed contour. Non-contour shapes are never closed.
    pub fn is_closed(&self) -> bool {
        self.contour.as_ref().is_some_and(ContourData::is_closed)
    }

    /// Marks a contour as closed. No effect on other shapes.
    pub fn close_contour(&mut self) {
        if let Some(contour) = &mut self.contour {
            contour.closed = true;
            self.invalidated = true;
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn child_ids(&self) -> &[String] {
        &self.child_ids
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: impl Into<String>) {
        self.parent_id = Some(parent_id.into());
    }

    pub(crate) fn add_child_id(&mut self, child_id: impl Into<String>) {
        self.child_ids.push(child_id.into());
    }

    pub(crate) fn remove_child_id(&mut self, child_id: &str) {
        self.child_ids.retain(|id| id != child_id);
    }
}

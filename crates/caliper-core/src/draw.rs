//! Drawing primitives for annotation overlays.
//!
//! Every drawer takes the [`SceneCache`] of the target surface, the owning
//! annotation id, a primitive sub key, canvas-space geometry and a style
//! options structure. Drawers create or patch cached nodes; they never read
//! geometry back from them.
//!
//! # Overview
//!
//! - [`scene`]: Node keys, attribute sets and the keyed node cache
//! - [`stroke`]: Stroke color, width and dash pattern
//! - [`handle`]: Handle markers and the always-visible "plus" crosshair
//! - [`line`]: Lines, polylines and multi-contour paths
//! - [`ellipse`]: Rotated ellipses from two diameters, and circles
//! - [`text_box`]: Linked text boxes with backgrounds, leader lines and the delete affordance
//! - [`text`]: Text measurement backed by cosmic-text

mod ellipse;
mod handle;
mod line;
mod scene;
mod stroke;
mod text;
mod text_box;

pub use ellipse::{EllipseGeometry, draw_circle, draw_ellipse};
pub use handle::{HandleOptions, HandleShape, PLUS_RADIUS, draw_handle, draw_handles, draw_handles_plus};
pub use line::{ShapeOptions, draw_line, draw_path, draw_polyline, path_data};
pub use scene::{Attributes, NodeKey, PrimitiveKind, SceneCache, SceneNode, UpsertOutcome};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::measure_text;
pub use text_box::{
    LinkOptions, TextBackground, TextBoxOptions, draw_link, draw_linked_text_box, draw_text_box,
};

//! Linked text boxes.
//!
//! A text box is a `<g>` group translated to its canvas position holding an
//! optional background rectangle, a `<text>` element with one `tspan` per
//! line, and an optional delete affordance. A linked text box additionally
//! draws a dotted leader line from the closest annotation anchor to the
//! closest edge midpoint of the realized box.
//!
//! # Layout
//!
//! ```text
//!   position ─┐
//!             ▼ (x - 3, y + offset)
//!             ┌──────────────────(−)
//!             │ Length: 12.40 mm  │
//!             │ Label             │
//!             └───────────────────┘
//! ```
//!
//! The vertical offset is `padding + 2` below the position, or
//! `padding * -5.5` above it when the box is placed "left-down".

use crate::{
    color::Color,
    draw::{
        Attributes, NodeKey, PrimitiveKind, SceneCache, SceneNode, ShapeOptions,
        StrokeDefinition, UpsertOutcome, draw_line,
        text::{LINE_HEIGHT_EM, measure_text},
    },
    geometry::{Bounds, Point2, Size, closest_point},
};

/// Padding between the text and its background rectangle
const BACKGROUND_PADDING: f64 = 6.0;

/// Corner radius of a non-pill background
const BACKGROUND_RADIUS: f64 = 4.0;

/// Radius of the delete affordance circle
const DELETE_BUTTON_RADIUS: f64 = 8.0;

const NO_SELECT_STYLE: &str =
    "user-select: none; pointer-events: none; -webkit-tap-highlight-color:  rgba(255, 255, 255, 0);";

/// Background of a text box.
///
/// Defaults: white, no border, pill shaped, delete affordance shown.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBackground {
    color: Color,
    border: Option<StrokeDefinition>,
    pill: bool,
    delete_button: bool,
}

impl TextBackground {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            border: None,
            pill: true,
            delete_button: true,
        }
    }

    pub fn with_border(mut self, border: StrokeDefinition) -> Self {
        self.border = Some(border);
        self
    }

    pub fn with_pill(mut self, pill: bool) -> Self {
        self.pill = pill;
        self
    }

    pub fn with_delete_button(mut self, delete_button: bool) -> Self {
        self.delete_button = delete_button;
        self
    }
}

impl Default for TextBackground {
    fn default() -> Self {
        Self::new(Color::new("white").expect("valid CSS color"))
    }
}

/// Text styling and placement options of a text box.
///
/// Defaults: `Helvetica, Arial, sans-serif` at 14px, yellow
/// `rgb(255, 255, 0)`, padding 7, placed below the position, no background.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxOptions {
    font_family: String,
    font_size: f64,
    color: Color,
    padding: f64,
    left_down: bool,
    background: Option<TextBackground>,
    opacity: f64,
}

impl TextBoxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f64) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Places the box above the position instead of below it
    pub fn with_left_down(mut self, left_down: bool) -> Self {
        self.left_down = left_down;
        self
    }

    pub fn with_background(mut self, background: Option<TextBackground>) -> Self {
        self.background = background;
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn background(&self) -> Option<&TextBackground> {
        self.background.as_ref()
    }

    /// Group origin for a box anchored at `position`
    pub fn origin(&self, position: Point2) -> Point2 {
        let offset = if self.left_down {
            self.padding * -5.5
        } else {
            self.padding + 2.0
        };
        Point2::new(position.x() - 3.0, position.y() + offset)
    }
}

impl Default for TextBoxOptions {
    fn default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            color: Color::new("rgb(255, 255, 0)").expect("valid CSS color"),
            padding: 7.0,
            left_down: false,
            background: None,
            opacity: 1.0,
        }
    }
}

/// Leader line style. Defaults to a 1px dotted (`2,3`) yellow line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOptions {
    stroke: StrokeDefinition,
}

impl LinkOptions {
    pub fn new(stroke: StrokeDefinition) -> Self {
        Self { stroke }
    }
}

impl Default for LinkOptions {
    fn default() -> Self {
        let yellow = Color::new("rgb(255, 255, 0)").expect("valid CSS color");
        Self::new(StrokeDefinition::dotted(yellow, 1.0))
    }
}

/// Draws a text box and returns its realized canvas bounding box.
///
/// The returned bounds cover the background (including half the border) when
/// a background is configured, and the measured text block otherwise.
pub fn draw_text_box(
    cache: &mut SceneCache,
    annotation_id: &str,
    text_uid: &str,
    lines: &[String],
    position: Point2,
    options: &TextBoxOptions,
) -> Bounds {
    let origin = options.origin(position);
    let text_size = measure_text(lines, &options.font_family, options.font_size);
    let text_bounds = Bounds::new_from_top_left(
        Point2::new(0.0, options.font_size * (LINE_HEIGHT_EM - 1.0)),
        text_size,
    );

    let text = lines.iter().fold(
        SceneNode::new(
            "text",
            Attributes::new()
                .set("x", 0)
                .set("y", 0)
                .set("fill", options.color)
                .set("font-family", &options.font_family)
                .set("font-size", format!("{}px", options.font_size))
                .set("opacity", options.opacity)
                .set("style", NO_SELECT_STYLE)
                .set("pointer-events", "visible"),
        ),
        |text, line| {
            text.with_child(
                SceneNode::new("tspan", Attributes::new().set("x", 0).set("dy", "1.2em"))
                    .with_text(line.as_str()),
            )
        },
    );

    let (background, local_bounds, delete_button) = match &options.background {
        Some(background) => background_nodes(background, text_bounds),
        None => (
            SceneNode::new(
                "rect",
                Attributes::new().set("class", "text-background").set("fill", "none"),
            ),
            text_bounds,
            None,
        ),
    };

    let mut group = SceneNode::new(
        "g",
        Attributes::new()
            .set("data-annotation-uid", annotation_id)
            .set("transform", format!("translate({} {})", origin.x(), origin.y())),
    )
    .with_child(background)
    .with_child(text);
    if let Some(button) = delete_button {
        group = group.with_child(button);
    }

    let key = NodeKey::new(annotation_id, PrimitiveKind::Text, text_uid);
    cache.upsert_tree(&key, group);

    Bounds::new_from_top_left(
        local_bounds.min_point().add_point(origin),
        Size::new(local_bounds.width(), local_bounds.height()),
    )
}

fn background_nodes(
    background: &TextBackground,
    text_bounds: Bounds,
) -> (SceneNode, Bounds, Option<SceneNode>) {
    let rect_x = text_bounds.min_x() - BACKGROUND_PADDING;
    let rect_y = text_bounds.min_y() - BACKGROUND_PADDING;
    let rect_w = text_bounds.width() + BACKGROUND_PADDING * 2.0;
    let rect_h = text_bounds.height() + BACKGROUND_PADDING * 2.0;
    let radius = if background.pill {
        rect_h / 2.0
    } else {
        BACKGROUND_RADIUS
    };

    let mut attrs = Attributes::new()
        .set("class", "text-background")
        .set("fill", background.color)
        .set("x", rect_x)
        .set("y", rect_y)
        .set("width", rect_w)
        .set("height", rect_h)
        .set("rx", radius)
        .set("ry", radius);
    if let Some(border) = &background.border {
        attrs = attrs
            .set("stroke", border.color())
            .set("stroke-width", border.width());
    }
    let rect = SceneNode::new("rect", attrs);

    let border_width = background.border.as_ref().map_or(0.0, |b| b.width());
    let realized = Bounds::new_from_top_left(
        Point2::new(rect_x - border_width / 2.0, rect_y - border_width / 2.0),
        Size::new(rect_w + border_width, rect_h + border_width),
    );

    let button = background.delete_button.then(|| {
        let half = DELETE_BUTTON_RADIUS / 2.0;
        SceneNode::new(
            "g",
            Attributes::new()
                .set("class", "delete-button")
                .set("style", "cursor: pointer;")
                .set("pointer-events", "all")
                .set(
                    "transform",
                    format!("translate({}, {})", rect_x - 2.0 + rect_w, rect_y + 2.0),
                ),
        )
        .with_child(SceneNode::new(
            "circle",
            Attributes::new()
                .set("r", DELETE_BUTTON_RADIUS)
                .set("fill", "white"),
        ))
        .with_child(SceneNode::new(
            "line",
            Attributes::new()
                .set("stroke-width", 2)
                .set("x1", -half)
                .set("y1", 0)
                .set("x2", half)
                .set("y2", 0)
                .set("stroke", "black"),
        ))
    });

    (rect, realized, button)
}

/// Draws a leader line from the anchor closest to `reference` to the closest
/// edge midpoint of `bounds`. Without anchors the line starts at `reference`.
pub fn draw_link(
    cache: &mut SceneCache,
    annotation_id: &str,
    link_uid: &str,
    anchors: &[Point2],
    reference: Point2,
    bounds: Bounds,
    options: &LinkOptions,
) -> Option<UpsertOutcome> {
    let start = closest_point(anchors, reference).unwrap_or(reference);
    let end = closest_point(&bounds.edge_midpoints(), start)?;
    draw_line(
        cache,
        annotation_id,
        &format!("link-{link_uid}"),
        start,
        end,
        &ShapeOptions::new(options.stroke.clone()),
    )
}

/// Draws a text box and, when `link` is given, its leader line.
///
/// Returns `None` without drawing anything when the first line is missing,
/// empty, or the literal `"undefined"`.
///
/// # Examples
///
/// ```
/// # use caliper_core::draw::{SceneCache, TextBoxOptions, draw_linked_text_box};
/// # use caliper_core::geometry::Point2;
/// let mut cache = SceneCache::new();
/// let drawn = draw_linked_text_box(
///     &mut cache, "a", "textBox", &[String::new()],
///     Point2::new(0.0, 0.0), &[], &TextBoxOptions::default(), None,
/// );
/// assert!(drawn.is_none());
/// assert!(cache.is_empty());
/// ```
#[allow(clippy::too_many_arguments)]
pub fn draw_linked_text_box(
    cache: &mut SceneCache,
    annotation_id: &str,
    text_box_uid: &str,
    lines: &[String],
    position: Point2,
    anchors: &[Point2],
    options: &TextBoxOptions,
    link: Option<&LinkOptions>,
) -> Option<Bounds> {
    match lines.first().map(String::as_str) {
        None | Some("") | Some("undefined") => return None,
        Some(_) => {}
    }
    let bounds = draw_text_box(cache, annotation_id, text_box_uid, lines, position, options);
    if let Some(link) = link {
        draw_link(cache, annotation_id, text_box_uid, anchors, position, bounds, link);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_origin_offsets() {
        let options = TextBoxOptions::default();
        assert_eq!(options.origin(Point2::new(10.0, 10.0)), Point2::new(7.0, 19.0));

        let left_down = options.clone().with_left_down(true);
        assert_eq!(
            left_down.origin(Point2::new(10.0, 10.0)),
            Point2::new(7.0, 10.0 - 7.0 * 5.5)
        );
    }

    #[test]
    fn test_text_box_structure() {
        let mut cache = SceneCache::new();
        let bounds = draw_text_box(
            &mut cache,
            "a",
            "textBox",
            &lines(&["Length: 5.00 mm", "Label"]),
            Point2::new(100.0, 50.0),
            &TextBoxOptions::default(),
        );
        let group = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Text, "textBox"))
            .unwrap();
        assert_eq!(group.tag(), "g");
        assert_eq!(group.attribute("transform"), Some("translate(97 59)"));

        let text = group.find("text", None).unwrap();
        assert_eq!(text.children().len(), 2);
        assert_eq!(text.children()[1].text(), Some("Label"));
        assert_eq!(text.attribute("font-size"), Some("14px"));

        let rect = group.find("rect", Some("text-background")).unwrap();
        assert_eq!(rect.attribute("fill"), Some("none"));
        assert!(group.find("g", Some("delete-button")).is_none());

        assert_approx_eq!(f64, bounds.min_x(), 97.0);
        assert_approx_eq!(f64, bounds.height(), 2.0 * 1.2 * 14.0);
    }

    #[test]
    fn test_pill_background_with_delete_button() {
        let mut cache = SceneCache::new();
        let options = TextBoxOptions::default().with_background(Some(TextBackground::default()));
        let bounds = draw_text_box(
            &mut cache,
            "a",
            "textBox",
            &lines(&["Area: 4.00 mm²"]),
            Point2::new(0.0, 0.0),
            &options,
        );
        let group = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Text, "textBox"))
            .unwrap();
        let rect = group.find("rect", Some("text-background")).unwrap();
        let height: f64 = rect.attribute("height").unwrap().parse().unwrap();
        let rx: f64 = rect.attribute("rx").unwrap().parse().unwrap();
        assert_approx_eq!(f64, rx, height / 2.0);
        assert_approx_eq!(f64, bounds.height(), height);

        let button = group.find("g", Some("delete-button")).unwrap();
        assert_eq!(button.children()[0].attribute("r"), Some("8"));
        assert_eq!(button.children()[1].attribute("stroke"), Some("black"));
    }

    #[test]
    fn test_bordered_square_background() {
        let mut cache = SceneCache::new();
        let border = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
        let options = TextBoxOptions::default().with_background(Some(
            TextBackground::default()
                .with_pill(false)
                .with_border(border)
                .with_delete_button(false),
        ));
        let bounds = draw_text_box(
            &mut cache,
            "a",
            "t",
            &lines(&["x"]),
            Point2::new(0.0, 0.0),
            &options,
        );
        let group = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Text, "t"))
            .unwrap();
        let rect = group.find("rect", None).unwrap();
        assert_eq!(rect.attribute("rx"), Some("4"));
        assert_eq!(rect.attribute("stroke-width"), Some("2"));
        let height: f64 = rect.attribute("height").unwrap().parse().unwrap();
        assert_approx_eq!(f64, bounds.height(), height + 2.0);
        assert!(group.find("g", Some("delete-button")).is_none());
    }

    #[test]
    fn test_linked_text_box_guards() {
        let mut cache = SceneCache::new();
        let options = TextBoxOptions::default();
        for guarded in [vec![], lines(&[""]), lines(&["undefined", "x"])] {
            let drawn = draw_linked_text_box(
                &mut cache,
                "a",
                "textBox",
                &guarded,
                Point2::new(0.0, 0.0),
                &[],
                &options,
                Some(&LinkOptions::default()),
            );
            assert!(drawn.is_none());
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_linked_text_box_draws_link_to_closest_edge() {
        let mut cache = SceneCache::new();
        let anchors = [Point2::new(0.0, 0.0), Point2::new(200.0, 0.0)];
        let bounds = draw_linked_text_box(
            &mut cache,
            "a",
            "textBox",
            &lines(&["Angle:90.00°"]),
            Point2::new(190.0, 40.0),
            &anchors,
            &TextBoxOptions::default(),
            Some(&LinkOptions::default()),
        )
        .unwrap();

        let link = cache
            .get_node(&NodeKey::new("a", PrimitiveKind::Line, "link-textBox"))
            .unwrap();
        assert_eq!(link.attribute("x1"), Some("200"));
        assert_eq!(link.attribute("y1"), Some("0"));
        assert_eq!(link.attribute("stroke-dasharray"), Some("2,3"));

        let top_mid = bounds.edge_midpoints()[0];
        assert_eq!(link.attribute("x2"), Some(top_mid.x().to_string().as_str()));
    }
}

//! Style resolution for annotations.
//!
//! Renderers never read configuration directly. They describe which
//! annotation they are drawing with a [`StyleSpecifier`] and its
//! [`AnnotationState`], and a [`StyleResolver`] answers with concrete drawing
//! options.

use caliper_core::{
    color::Color,
    draw::{
        HandleOptions, HandleShape, LinkOptions, StrokeDefinition, StrokeStyle, TextBackground,
        TextBoxOptions,
    },
};

use crate::{config::StyleConfig, error::CaliperError};

/// Identifies the annotation a style is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpecifier<'a> {
    pub tool_group_id: &'a str,
    pub tool_name: &'a str,
    pub viewport_id: &'a str,
    pub annotation_id: &'a str,
}

/// Interaction flags that affect styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationState {
    pub locked: bool,
    pub selected: bool,
    pub highlighted: bool,
}

/// Resolved text box style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxStyle {
    /// When false the text box is hidden and its stored geometry is reset.
    pub visibility: bool,
    pub options: TextBoxOptions,
    /// Leader line style, `None` to draw no leader line.
    pub link: Option<LinkOptions>,
}

/// Resolves drawing options for one annotation.
pub trait StyleResolver {
    fn stroke(&self, specifier: &StyleSpecifier<'_>, state: AnnotationState) -> StrokeDefinition;

    fn handle_options(
        &self,
        specifier: &StyleSpecifier<'_>,
        state: AnnotationState,
    ) -> HandleOptions;

    fn text_box(&self, specifier: &StyleSpecifier<'_>) -> TextBoxStyle;
}

/// [`StyleResolver`] backed by a parsed [`StyleConfig`].
///
/// Stroke color priority is locked, then selected, then highlighted, then
/// the idle color.
#[derive(Debug, Clone)]
pub struct ConfigStyleResolver {
    color: Color,
    selected_color: Color,
    highlighted_color: Color,
    locked_color: Color,
    line_width: f64,
    line_dash: StrokeStyle,
    handle_radius: f64,
    handle_shape: HandleShape,
    text_box: TextBoxStyle,
}

impl ConfigStyleResolver {
    /// Parses every color and dash pattern of `config` up front.
    ///
    /// # Errors
    ///
    /// Returns [`CaliperError::InvalidColor`] or [`CaliperError::Config`] for
    /// malformed values.
    pub fn new(config: &StyleConfig) -> Result<Self, CaliperError> {
        let text_config = config.text_box();
        let text_color = text_config.color().map_err(CaliperError::InvalidColor)?;
        let background = text_config
            .background()
            .map_err(CaliperError::InvalidColor)?
            .map(|color| {
                TextBackground::new(color)
                    .with_pill(text_config.pill())
                    .with_delete_button(text_config.delete_button())
            });
        let options = TextBoxOptions::new()
            .with_font(text_config.font_family(), text_config.font_size())
            .with_color(text_color)
            .with_background(background);
        let link = text_config
            .link()
            .then(|| LinkOptions::new(StrokeDefinition::dotted(text_color, 1.0)));

        Ok(Self {
            color: config.color().map_err(CaliperError::InvalidColor)?,
            selected_color: config
                .selected_color()
                .map_err(CaliperError::InvalidColor)?,
            highlighted_color: config
                .highlighted_color()
                .map_err(CaliperError::InvalidColor)?,
            locked_color: config.locked_color().map_err(CaliperError::InvalidColor)?,
            line_width: config.line_width(),
            line_dash: config.line_dash().map_err(CaliperError::Config)?,
            handle_radius: config.handle_radius(),
            handle_shape: config.handle_shape(),
            text_box: TextBoxStyle {
                visibility: text_config.visibility(),
                options,
                link,
            },
        })
    }

    fn color_for(&self, state: AnnotationState) -> Color {
        if state.locked {
            self.locked_color
        } else if state.selected {
            self.selected_color
        } else if state.highlighted {
            self.highlighted_color
        } else {
            self.color
        }
    }
}

impl StyleResolver for ConfigStyleResolver {
    fn stroke(&self, _specifier: &StyleSpecifier<'_>, state: AnnotationState) -> StrokeDefinition {
        StrokeDefinition::new(self.color_for(state), self.line_width)
            .with_style(self.line_dash.clone())
    }

    fn handle_options(
        &self,
        _specifier: &StyleSpecifier<'_>,
        state: AnnotationState,
    ) -> HandleOptions {
        let color = self.color_for(state);
        HandleOptions::new(StrokeDefinition::new(color, 2.0), self.handle_radius)
            .with_fill(color.with_alpha(0.1))
            .with_shape(self.handle_shape)
    }

    fn text_box(&self, _specifier: &StyleSpecifier<'_>) -> TextBoxStyle {
        self.text_box.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specifier() -> StyleSpecifier<'static> {
        StyleSpecifier {
            tool_group_id: "default",
            tool_name: "Length",
            viewport_id: "vp",
            annotation_id: "a",
        }
    }

    #[test]
    fn test_color_priority() {
        let config = StyleConfig::default();
        let resolver = ConfigStyleResolver::new(&config).unwrap();
        let spec = specifier();

        let idle = resolver.stroke(&spec, AnnotationState::default());
        assert_eq!(idle.color(), config.color().unwrap());

        let locked_and_selected = AnnotationState {
            locked: true,
            selected: true,
            highlighted: true,
        };
        assert_eq!(
            resolver.stroke(&spec, locked_and_selected).color(),
            config.locked_color().unwrap()
        );

        let selected = AnnotationState {
            selected: true,
            highlighted: true,
            ..AnnotationState::default()
        };
        assert_eq!(
            resolver.stroke(&spec, selected).color(),
            config.selected_color().unwrap()
        );
    }

    #[test]
    fn test_text_box_defaults() {
        let resolver = ConfigStyleResolver::new(&StyleConfig::default()).unwrap();
        let style = resolver.text_box(&specifier());
        assert!(style.visibility);
        assert!(style.link.is_some());
        assert!(style.options.background().is_none());
    }

    #[test]
    fn test_handle_radius_from_config() {
        let resolver = ConfigStyleResolver::new(&StyleConfig::default()).unwrap();
        let handles = resolver.handle_options(&specifier(), AnnotationState::default());
        assert_eq!(handles.radius(), 16.0);
        assert_eq!(handles.shape(), HandleShape::Circle);
    }
}

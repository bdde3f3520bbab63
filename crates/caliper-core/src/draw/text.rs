//! Text measurement for text boxes.
//!
//! Text boxes need their realized size before the host renders them, both to
//! size their background and to report a bounding box back to the caller.
//! Widths come from cosmic-text shaping; line advance follows the `1.2em`
//! spacing used by the emitted `tspan` elements.

use std::sync::{Arc, Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::geometry::Size;

/// Line advance in `em` used for every text line
pub const LINE_HEIGHT_EM: f64 = 1.2;

/// Average glyph advance in `em` used when no font could shape the text
const FALLBACK_ADVANCE_EM: f64 = 0.6;

/// Measures a block of text lines.
///
/// `font_family` accepts a CSS family list; the first entry is used for
/// shaping and generic names map to cosmic-text generic families.
pub fn measure_text(lines: &[String], font_family: &str, font_size: f64) -> Size {
    if lines.is_empty() {
        return Size::default();
    }
    let manager = TEXT_MANAGER.get_or_init(TextManager::new);
    let width = lines
        .iter()
        .map(|line| manager.line_width(line, font_family, font_size))
        .fold(0.0, f64::max);
    Size::new(width, lines.len() as f64 * LINE_HEIGHT_EM * font_size)
}

/// TextManager keeps a reusable FontSystem instance since loading the system
/// font database is expensive.
struct TextManager {
    font_system: Arc<Mutex<FontSystem>>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Arc::new(Mutex::new(FontSystem::new())),
        }
    }

    fn line_width(&self, text: &str, font_family: &str, font_size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let font_size_px = font_size as f32;
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT_EM as f32);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let family_name = font_family
            .split(',')
            .map(|name| name.trim().trim_matches(['"', '\'']))
            .find(|name| !name.is_empty())
            .unwrap_or("sans-serif");
        let family = match family_name {
            "sans-serif" => Family::SansSerif,
            "serif" => Family::Serif,
            "monospace" => Family::Monospace,
            name => Family::Name(name),
        };
        let attrs = Attrs::new().family(family);

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0f32, f32::max);

        if width > 0.0 {
            f64::from(width)
        } else {
            text.chars().count() as f64 * font_size * FALLBACK_ADVANCE_EM
        }
    }
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_measure_empty() {
        assert!(measure_text(&[], "Helvetica", 14.0).is_zero());
    }

    #[test]
    fn test_measure_height_follows_line_count() {
        let lines = vec!["Area: 12.5 mm²".to_string(), "Label".to_string()];
        let size = measure_text(&lines, "Helvetica, Arial, sans-serif", 14.0);
        assert_approx_eq!(f64, size.height(), 2.0 * 1.2 * 14.0);
        assert!(size.width() > 0.0);
    }

    #[test]
    fn test_longer_line_is_wider() {
        let short = measure_text(&["ab".to_string()], "sans-serif", 14.0);
        let long = measure_text(&["abcdefghij".to_string()], "sans-serif", 14.0);
        assert!(long.width() > short.width());
    }
}

//! Text measurement and wrapping.

/// Measures text for a loaded font.
///
/// Implemented by the host's font backend. Must be callable from the render
/// thread only, but is shared behind an `Arc` so it needs `Send + Sync`.
pub trait FontMetrics: Send + Sync {
    /// Width in pixels of `text` rendered at `font_size`.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Line height in pixels at `font_size`. Non-positive means unknown.
    fn line_height(&self, font_size: f32) -> f32;

    /// Width of a representative glyph at `font_size`.
    fn glyph_width(&self, font_size: f32) -> f32 {
        self.text_width("a", font_size)
    }
}

/// Fixed-advance metrics: every char is `advance × font_size` wide.
///
/// Used headless (tests, benches, the soak binary) and as a fallback when no
/// font backend is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Glyph advance as a fraction of the font size.
    pub advance: f32,
    /// Line height as a fraction of the font size.
    pub line_spacing: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_spacing: 1.0,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.advance * font_size
    }

    fn line_height(&self, font_size: f32) -> f32 {
        self.line_spacing * font_size
    }
}

/// Greedy word wrap to lines of at most `line_width` chars.
///
/// At most `max_lines` lines are produced; the last one takes whatever is
/// left. A word longer than a line is kept whole on its own line.
#[must_use]
pub fn word_wrap(text: &str, line_width: usize, max_lines: usize) -> String {
    let line_width = line_width.max(1);
    let max_lines = max_lines.max(1);

    let mut out = String::with_capacity(text.len() + max_lines);
    let mut line_len = 0usize;
    let mut lines = 1usize;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_len = word.chars().count();

        if line_len == 0 {
            out.push_str(word);
            line_len = word_len;
            continue;
        }

        if lines < max_lines && line_len + 1 + word_len > line_width {
            out.push('\n');
            out.push_str(word);
            line_len = word_len;
            lines += 1;
        } else {
            out.push(' ');
            out.push_str(word);
            line_len += 1 + word_len;
        }
    }

    out
}

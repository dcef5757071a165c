//! Screen geometry and the derived widget metrics.
//!
//! Every size the widgets use is derived from a single number, the font line
//! height `F`, so the whole layer scales with the display. The metrics are
//! recomputed whenever the screen size or the scale factor changes.

use crate::assets::IconSet;
use crate::config::WidgetsConfig;
use crate::error::{WidgetsError, WidgetsResult};
use crate::text::FontMetrics;

/// A rectangle in screen coordinates (origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true if two rectangles intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Some(Self::new(x, y, right - x, bottom - y))
    }
}

/// Output surface description, supplied by the host every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Display scale factor (1.0 = reference size).
    pub scale_factor: f32,
}

impl ScreenInfo {
    /// Creates a screen description.
    #[must_use]
    pub const fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Rejects screens with no area.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetsError::EmptyScreen`] if either side is zero.
    pub fn validate(&self) -> WidgetsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WidgetsError::EmptyScreen {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Font size floor; smaller sizes break glyph rasterization.
pub const MIN_FONT_SIZE: f32 = 2.0;

/// Row cap art is 280x284.
const ICON_HEIGHT_RATIO: f32 = 1.234_782_6;
const ICON_ASPECT: f32 = 0.985_915_5;
/// Share of the icon cap hidden under the row while folded.
const SCISSOR_ICON_OVERLAP: f32 = 0.289_285_7;

/// All derived sizes, in pixels.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct WidgetLayout {
    pub screen_width: f32,
    pub screen_height: f32,
    pub scale_factor: f32,
    pub has_icons: bool,

    /// Requested font size (before the backend reports its real height).
    pub requested_font_size: f32,
    /// Line height `F`.
    pub font_size: f32,
    pub padding: f32,
    pub simple_height: f32,
    pub glyph_width: f32,
    pub divider_width: f32,

    /// Notification row height.
    pub row_height: f32,
    pub icon_size_x: f32,
    pub icon_size_y: f32,
    pub text_scale: f32,
    pub spacing: f32,
    /// Glyph width at `text_scale`.
    pub msg_glyph_width: f32,
    pub rect_start_x: f32,
    pub internal_icon_size: f32,
    pub internal_icon_offset: f32,
    pub icon_offset_y: f32,
    pub scissor_start_x: f32,
    pub regular_padding_x: f32,
    pub task_rect_start_x: f32,
    pub task_text_start_x: f32,
    pub task_hourglass_x: f32,
    pub regular_text_start: f32,
    pub regular_text_base_y: f32,

    pub generic_message_height: f32,
    /// Column width of messages pushed while the menu is open.
    pub column_width_menu_alive: f32,
    /// Column width of every other free-standing message.
    pub column_width: f32,
}

impl WidgetLayout {
    /// Derives the metrics for `screen`.
    #[must_use]
    pub fn compute(
        screen: ScreenInfo,
        config: &WidgetsConfig,
        metrics: &dyn FontMetrics,
        icons: &IconSet,
    ) -> Self {
        let scale_factor = screen.scale_factor;
        let requested_font_size = (config.base_font_size * scale_factor).max(MIN_FONT_SIZE);

        let reported = metrics.line_height(requested_font_size);
        let font_size = if reported > 0.0 {
            reported
        } else {
            requested_font_size
        };

        let padding = font_size * 2.0 / 3.0;
        let simple_height = font_size + padding;
        let glyph_width = metrics.glyph_width(requested_font_size);

        let has_icons = icons.has_msg_queue_icons();
        let row_height = font_size * 2.5;
        let (icon_size_x, icon_size_y) = if has_icons {
            let y = row_height * ICON_HEIGHT_RATIO;
            (ICON_ASPECT * y, y)
        } else {
            (0.0, 0.0)
        };

        let text_scale = config.text_scale;
        let spacing = row_height / 3.0;
        let msg_glyph_width = glyph_width * text_scale;
        let rect_start_x = spacing + icon_size_x;
        let internal_icon_size = icon_size_y;
        let internal_icon_offset = (icon_size_y - internal_icon_size) / 2.0;
        let icon_offset_y = (icon_size_y - row_height) / 2.0;
        let scissor_start_x = spacing + icon_size_x - icon_size_x * SCISSOR_ICON_OVERLAP;

        let regular_padding_x = if has_icons { padding / 2.0 } else { padding };

        let task_rect_start_x = rect_start_x - icon_size_x;
        let mut task_text_start_x = task_rect_start_x + row_height / 2.0;
        if !icons.has_hourglass() {
            task_text_start_x -= msg_glyph_width * 2.0;
        }

        let regular_text_start = rect_start_x + regular_padding_x;
        let regular_text_base_y = font_size * text_scale + row_height / 2.0;
        let task_hourglass_x = rect_start_x - icon_size_x;

        let screen_width = screen.width as f32;
        let column_width_menu_alive = msg_glyph_width * config.menu_alive_columns as f32;
        let column_width = (screen_width - regular_text_start - 2.0 * padding).max(0.0);

        let divider_width = if scale_factor > 1.0 {
            (scale_factor + 0.5).floor()
        } else {
            1.0
        };

        Self {
            screen_width,
            screen_height: screen.height as f32,
            scale_factor,
            has_icons,
            requested_font_size,
            font_size,
            padding,
            simple_height,
            glyph_width,
            divider_width,
            row_height,
            icon_size_x,
            icon_size_y,
            text_scale,
            spacing,
            msg_glyph_width,
            rect_start_x,
            internal_icon_size,
            internal_icon_offset,
            icon_offset_y,
            scissor_start_x,
            regular_padding_x,
            task_rect_start_x,
            task_text_start_x,
            task_hourglass_x,
            regular_text_start,
            regular_text_base_y,
            generic_message_height: font_size * 2.0,
            column_width_menu_alive,
            column_width,
        }
    }

    /// True if `screen` differs from the one these metrics were built for.
    #[must_use]
    pub fn is_stale_for(&self, screen: ScreenInfo) -> bool {
        (self.scale_factor - screen.scale_factor).abs() > f32::EPSILON
            || (self.screen_width - screen.width as f32).abs() > f32::EPSILON
            || (self.screen_height - screen.height as f32).abs() > f32::EPSILON
    }

    /// Width of `text` at full scale.
    #[must_use]
    pub fn text_width(&self, metrics: &dyn FontMetrics, text: &str) -> f32 {
        metrics.text_width(text, self.requested_font_size)
    }

    /// Width of `text` at the notification row scale.
    #[must_use]
    pub fn msg_text_width(&self, metrics: &dyn FontMetrics, text: &str) -> f32 {
        self.text_width(metrics, text) * self.text_scale
    }
}

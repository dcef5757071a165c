//! Colors and the widget palette.
//!
//! Flat dark panels with a blue accent, tinted per message category.

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from a hex value (0xRRGGBB).
    #[must_use]
    pub const fn hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgba(r, g, b, 1.0)
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Returns the color with its alpha multiplied by `factor`.
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor.clamp(0.0, 1.0))
    }

    /// Blends toward `other`; `t` of 0 is `self`, 1 is `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Widget palette.
pub mod palette {
    use super::Color;

    /// Notification row background.
    pub const MSG_BACKGROUND: Color = Color::hex(0x3A_3A3A);
    /// Icon disc behind a regular message.
    pub const MSG_INFO: Color = Color::hex(0x12_ACF8);
    /// Task row fill while running.
    pub const TASK_PROGRESS: Color = Color::hex(0x39_7869);
    /// Task row fill once finished.
    pub const TASK_FINISHED: Color = Color::hex(0x31_7198);
    /// Error accent.
    pub const ERROR: Color = Color::hex(0xC2_3B22);
    /// Warning accent.
    pub const WARNING: Color = Color::hex(0xF5_A623);
    /// Success accent.
    pub const SUCCESS: Color = Color::hex(0x22_B14C);
    /// Main text.
    pub const TEXT: Color = Color::WHITE;
    /// Secondary text (percentages, achievement heading).
    pub const TEXT_FAINT: Color = Color::hex(0x87_8787);
    /// Highlighted text on banners.
    pub const TEXT_INFO: Color = Color::hex(0xD8_EEFF);
    /// Load splash icon before it turns white.
    pub const LOAD_ICON: Color = Color::hex(0x04_73C9);
    /// Content name on the load splash.
    pub const LOAD_TEXT: Color = Color::hex(0xB8_B8B8);
    /// Backdrop behind banners, indicators and popups. Alpha comes from config.
    pub const BACKDROP: Color = Color::BLACK;
}

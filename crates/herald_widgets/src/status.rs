//! Top-right status corner: fps text and run-state indicators.

use crate::assets::WidgetIcon;

/// Run-state flags, refreshed by the host every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusIndicators {
    /// Emulation paused.
    pub paused: bool,
    /// Fast-forward engaged.
    pub fast_forward: bool,
    /// Rewinding.
    pub rewind: bool,
    /// Slow motion engaged.
    pub slow_motion: bool,
}

impl StatusIndicators {
    /// Active indicators, right to left, with their fallback labels.
    pub fn active(self) -> impl Iterator<Item = (WidgetIcon, &'static str)> {
        [
            (self.paused, WidgetIcon::Paused, "Paused"),
            (self.fast_forward, WidgetIcon::FastForward, "Fast-Forward"),
            (self.rewind, WidgetIcon::Rewind, "Rewinding"),
            (self.slow_motion, WidgetIcon::SlowMotion, "Slow-Motion"),
        ]
        .into_iter()
        .filter(|(on, _, _)| *on)
        .map(|(_, icon, label)| (icon, label))
    }
}

/// Text shown in the fps box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpsText {
    text: String,
    visible: bool,
}

impl FpsText {
    /// Placeholder shown before the first measurement.
    pub const PLACEHOLDER: &'static str = "N/A";

    /// Replaces the text. Returns true if it changed.
    pub fn set(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        text.clone_into(&mut self.text);
        true
    }

    /// Shows or hides the box.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// True if the box is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Text to draw.
    #[must_use]
    pub fn display(&self) -> &str {
        if self.text.is_empty() {
            Self::PLACEHOLDER
        } else {
            &self.text
        }
    }
}

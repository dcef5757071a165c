//! # Widget Configuration
//!
//! Every timing and capacity constant of the widget layer. Defaults match the
//! shipped look; a TOML file may override any subset:
//!
//! ```toml
//! pending_capacity = 64
//! animation_duration_ms = 250
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{WidgetsError, WidgetsResult};

/// Timing, capacity and layout constants for the widget layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetsConfig {
    /// Capacity N of the pending notification FIFO.
    pub pending_capacity: usize,
    /// Maximum number M of notifications on screen at once.
    pub onscreen_max: usize,
    /// Duration A of a single slide/fade/unfold step.
    pub animation_duration_ms: u64,
    /// Time a finished task stays on screen before it expires.
    pub task_finished_duration_ms: u64,
    /// Pause between two hourglass spins.
    pub hourglass_interval_ms: u64,
    /// Duration of one hourglass spin.
    pub hourglass_duration_ms: u64,
    /// Capacity K of the achievement ring.
    pub achievement_capacity: usize,
    /// Time an unfolded achievement popup is held on screen.
    pub achievement_hold_ms: u64,
    /// Heading line of the achievement popup.
    pub achievement_heading: String,
    /// Font size at scale factor 1.0.
    pub base_font_size: f32,
    /// Text scale used inside notification rows.
    pub text_scale: f32,
    /// Backdrop opacity for banners, indicators and popups.
    pub backdrop_alpha: f32,
    /// Column width, in glyphs, of messages pushed while the menu is open.
    pub menu_alive_columns: u32,
    /// Step length of the load-content splash; the whole splash takes 10.5 steps.
    pub load_content_step_ms: u64,
}

impl Default for WidgetsConfig {
    fn default() -> Self {
        Self {
            pending_capacity: 32,
            onscreen_max: 4,
            animation_duration_ms: 330,
            task_finished_duration_ms: 3000,
            hourglass_interval_ms: 5000,
            hourglass_duration_ms: 1000,
            achievement_capacity: 8,
            achievement_hold_ms: 4000,
            achievement_heading: "Achievement Unlocked".to_owned(),
            base_font_size: 32.0,
            text_scale: 0.69,
            backdrop_alpha: 0.75,
            menu_alive_columns: 40,
            load_content_step_ms: 333,
        }
    }
}

impl WidgetsConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetsError::ConfigParse`] for malformed TOML and
    /// [`WidgetsError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> WidgetsResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetsError::ConfigIo`] if the file cannot be read, plus
    /// everything [`from_toml_str`](Self::from_toml_str) returns.
    pub fn load(path: impl AsRef<Path>) -> WidgetsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| WidgetsError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> WidgetsResult<()> {
        if self.pending_capacity == 0 {
            return Err(WidgetsError::InvalidConfig(
                "pending_capacity must be at least 1".into(),
            ));
        }
        if self.onscreen_max == 0 {
            return Err(WidgetsError::InvalidConfig(
                "onscreen_max must be at least 1".into(),
            ));
        }
        if self.achievement_capacity == 0 {
            return Err(WidgetsError::InvalidConfig(
                "achievement_capacity must be at least 1".into(),
            ));
        }
        if !(self.base_font_size.is_finite() && self.base_font_size > 0.0) {
            return Err(WidgetsError::InvalidConfig(format!(
                "base_font_size must be positive, got {}",
                self.base_font_size
            )));
        }
        if !(self.text_scale.is_finite() && self.text_scale > 0.0) {
            return Err(WidgetsError::InvalidConfig(format!(
                "text_scale must be positive, got {}",
                self.text_scale
            )));
        }
        if !(0.0..=1.0).contains(&self.backdrop_alpha) {
            return Err(WidgetsError::InvalidConfig(format!(
                "backdrop_alpha must be within 0..=1, got {}",
                self.backdrop_alpha
            )));
        }
        Ok(())
    }

    /// Duration A of one animation step.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Expiry delay for finished tasks.
    #[must_use]
    pub fn task_finished_duration(&self) -> Duration {
        Duration::from_millis(self.task_finished_duration_ms)
    }

    /// Pause between hourglass spins.
    #[must_use]
    pub fn hourglass_interval(&self) -> Duration {
        Duration::from_millis(self.hourglass_interval_ms)
    }

    /// Length of one hourglass spin.
    #[must_use]
    pub fn hourglass_duration(&self) -> Duration {
        Duration::from_millis(self.hourglass_duration_ms)
    }

    /// Hold time of an unfolded achievement popup.
    #[must_use]
    pub fn achievement_hold(&self) -> Duration {
        Duration::from_millis(self.achievement_hold_ms)
    }

    /// Step length of the load-content splash.
    #[must_use]
    pub fn load_content_step(&self) -> Duration {
        Duration::from_millis(self.load_content_step_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WidgetsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.animation_duration(), Duration::from_millis(330));
        assert_eq!(config.achievement_capacity, 8);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WidgetsConfig::from_toml_str("pending_capacity = 5\nonscreen_max = 2\n").unwrap();
        assert_eq!(config.pending_capacity, 5);
        assert_eq!(config.onscreen_max, 2);
        assert_eq!(config.task_finished_duration_ms, 3000);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = WidgetsConfig::from_toml_str("pending_capacity = 0").unwrap_err();
        assert!(matches!(err, WidgetsError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = WidgetsConfig::from_toml_str("pending_capacity = \"many\"").unwrap_err();
        assert!(matches!(err, WidgetsError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WidgetsConfig::load("/definitely/not/here/widgets.toml").unwrap_err();
        match err {
            WidgetsError::ConfigIo { path, .. } => assert!(path.ends_with("widgets.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

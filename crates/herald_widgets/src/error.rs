//! # Widget Error Types
//!
//! Only initialization can fail. Everything that happens at runtime (full
//! queues, stale task bindings, arena exhaustion) is an outcome, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while bringing the widgets up.
#[derive(Error, Debug)]
pub enum WidgetsError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`WidgetsConfig`](crate::WidgetsConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The screen has no area to draw on.
    #[error("screen size {width}x{height} is empty")]
    EmptyScreen {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Result type for widget setup.
pub type WidgetsResult<T> = Result<T, WidgetsError>;

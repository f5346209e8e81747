//! Configuration types
//!
//! - `Config`: level filter, output format, writer, display toggles
//! - `presets`: development, production, test and environment setups

mod presets;

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level filter (e.g. `"info"`, `"debug,reqwest=warn"`).
    pub level: String,

    /// Output format.
    pub format: Format,

    /// Output destination.
    pub writer: WriterConfig,

    /// Display toggles.
    pub display: DisplayConfig,

    /// Service name recorded on a root span, if set.
    pub service: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            writer: WriterConfig::Stderr,
            display: DisplayConfig::default(),
            service: None,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Single line per event
    Compact,
    /// Structured JSON, one object per line
    Json,
}

impl Format {
    /// Parses a format name; unknown names fall back to compact.
    #[must_use]
    pub fn parse_lossy(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Output destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterConfig {
    /// Write to stderr
    #[default]
    Stderr,
    /// Write to stdout
    Stdout,
}

/// Display toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Flatten JSON event fields into the top-level object
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: false,
            target: true,
            colors: true,
            flatten: false,
        }
    }
}

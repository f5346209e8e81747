//! Sync endpoint configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how timezone changes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneConfig {
    /// Base URL of the diary server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Zone used when nothing better is known.
    pub fallback: String,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            timeout_secs: 10,
            fallback: crate::resolve::UTC.to_owned(),
        }
    }
}

impl TimezoneConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

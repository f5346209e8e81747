//! System timezone detection

use crate::error::{TimezoneError, TimezoneResult};

/// Source of the local IANA timezone name.
pub trait TimezoneDetector: Send + Sync {
    /// The local zone, e.g. `"America/New_York"`.
    fn detect(&self) -> TimezoneResult<String>;
}

/// Reads the operating system's configured zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDetector;

impl TimezoneDetector for SystemDetector {
    fn detect(&self) -> TimezoneResult<String> {
        iana_time_zone::get_timezone().map_err(|e| TimezoneError::Detection(e.to_string()))
    }
}

/// Always reports the same zone, or always fails.
#[derive(Debug, Clone, Default)]
pub struct FixedDetector {
    zone: Option<String>,
}

impl FixedDetector {
    /// Reports `zone`.
    pub fn new(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
        }
    }

    /// Fails every detection.
    pub fn failing() -> Self {
        Self { zone: None }
    }
}

impl TimezoneDetector for FixedDetector {
    fn detect(&self) -> TimezoneResult<String> {
        self.zone
            .clone()
            .ok_or_else(|| TimezoneError::Detection("no zone configured".to_owned()))
    }
}

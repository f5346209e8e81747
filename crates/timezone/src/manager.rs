//! Detect, resolve, remember and report the user's timezone

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::detect::TimezoneDetector;
use crate::error::TimezoneError;
use crate::report::{TimezoneReport, TimezoneReporter};
use crate::resolve::{UTC, effective_timezone};
use crate::session::{DETECTED_TIMEZONE_KEY, EFFECTIVE_TIMEZONE_KEY, SessionStore};
use crate::settings::UserTimezoneSettings;

/// Owns the timezone state of one page session.
///
/// Sync failures are logged and never surface to callers; the effective
/// zone is always returned.
pub struct TimezoneManager<D, R, S> {
    detector: D,
    reporter: R,
    session: S,
    fallback: String,
    preference: Option<String>,
    auto_detect: bool,
    detected: Option<String>,
    effective: Option<String>,
    ready: watch::Sender<Option<String>>,
}

impl<D, R, S> TimezoneManager<D, R, S>
where
    D: TimezoneDetector,
    R: TimezoneReporter,
    S: SessionStore,
{
    /// Creates a manager falling back to `UTC`.
    pub fn new(detector: D, reporter: R, session: S) -> Self {
        let (ready, _) = watch::channel(None);
        Self {
            detector,
            reporter,
            session,
            fallback: UTC.to_owned(),
            preference: None,
            auto_detect: true,
            detected: None,
            effective: None,
            ready,
        }
    }

    /// Replaces the zone used when detection fails.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Detects the local zone, falling back on failure, and remembers it.
    pub fn detect_timezone(&mut self) -> String {
        let zone = match self.detector.detect() {
            Ok(zone) if !zone.is_empty() => {
                info!(timezone = %zone, "detected timezone");
                zone
            }
            Ok(_) => {
                warn!(fallback = %self.fallback, "detector returned an empty zone, using fallback");
                self.fallback.clone()
            }
            Err(e) => {
                warn!(error = %e, fallback = %self.fallback, "failed to detect timezone, using fallback");
                self.fallback.clone()
            }
        };
        self.detected = Some(zone.clone());
        zone
    }

    /// Resolves and remembers the effective zone for the given settings.
    pub fn resolve(&mut self, preference: Option<&str>, auto_detect: bool) -> String {
        let zone =
            effective_timezone(preference, auto_detect, self.detected.as_deref()).to_owned();
        info!(
            timezone = %zone,
            preference = ?preference,
            auto_detect,
            "effective timezone"
        );
        self.effective = Some(zone.clone());
        zone
    }

    /// Reports a zone to the server. Returns whether it was accepted.
    pub async fn save_timezone(&self, timezone: &str, detected: Option<&str>) -> bool {
        let report = TimezoneReport::now(timezone, detected.map(str::to_owned));
        match self.reporter.report(&report).await {
            Ok(()) => {
                info!(timezone, "timezone saved");
                true
            }
            Err(TimezoneError::Status { status }) => {
                warn!(status, "failed to save timezone");
                false
            }
            Err(e) => {
                error!(error = %e, "error saving timezone");
                false
            }
        }
    }

    /// Runs the page-load flow.
    ///
    /// Detection always runs. The effective zone is only reported when
    /// auto-detection is on. Both zones are written to the session and
    /// subscribers are notified.
    pub async fn initialize(&mut self, settings: &UserTimezoneSettings) -> String {
        self.preference = settings.user_timezone.clone().filter(|z| !z.is_empty());
        self.auto_detect = settings.timezone_auto_detect;

        let detected = self.detect_timezone();
        let preference = self.preference.clone();
        let effective = self.resolve(preference.as_deref(), self.auto_detect);

        if self.auto_detect {
            self.save_timezone(&effective, Some(&detected)).await;
        }

        self.session.set(EFFECTIVE_TIMEZONE_KEY, &effective);
        self.session.set(DETECTED_TIMEZONE_KEY, &detected);
        self.ready.send_replace(Some(effective.clone()));
        effective
    }

    /// The zone entries should use right now.
    ///
    /// Prefers the session value, then a fresh detection.
    pub fn current_timezone(&mut self) -> String {
        if let Some(zone) = self.session.get(EFFECTIVE_TIMEZONE_KEY) {
            return zone;
        }
        self.detect_timezone()
    }

    /// Applies a preference change from the settings screen.
    ///
    /// The result is always reported, whatever the auto-detect flag.
    pub async fn update_preference(&mut self, preference: Option<&str>, auto_detect: bool) -> String {
        self.preference = preference.filter(|z| !z.is_empty()).map(str::to_owned);
        self.auto_detect = auto_detect;

        let effective = self.resolve(preference, auto_detect);
        let detected = self.detected.clone();
        self.save_timezone(&effective, detected.as_deref()).await;

        self.session.set(EFFECTIVE_TIMEZONE_KEY, &effective);
        self.ready.send_replace(Some(effective.clone()));
        effective
    }

    /// Receives the effective zone once initialized and after every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.ready.subscribe()
    }

    /// The manual preference in force.
    pub fn preference(&self) -> Option<&str> {
        self.preference.as_deref()
    }

    /// Whether auto-detection is on.
    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    /// The last detected zone.
    pub fn detected(&self) -> Option<&str> {
        self.detected.as_deref()
    }

    /// The last resolved effective zone.
    pub fn effective(&self) -> Option<&str> {
        self.effective.as_deref()
    }

    /// The session store.
    pub fn session(&self) -> &S {
        &self.session
    }
}

//! Reporting the effective zone to the server

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TimezoneConfig;
use crate::error::{TimezoneError, TimezoneResult};

/// Path of the user timezone endpoint, relative to the server root.
pub const ENDPOINT_PATH: &str = "/api/user/timezone";

/// Body posted to the timezone endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneReport {
    /// The effective zone.
    pub timezone: String,
    /// The detected zone, if detection has run.
    pub detected: Option<String>,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
}

impl TimezoneReport {
    /// Builds a report stamped with `at`.
    pub fn new(timezone: impl Into<String>, detected: Option<String>, at: DateTime<Utc>) -> Self {
        Self {
            timezone: timezone.into(),
            detected,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Builds a report stamped now.
    pub fn now(timezone: impl Into<String>, detected: Option<String>) -> Self {
        Self::new(timezone, detected, Utc::now())
    }
}

/// Delivers timezone reports.
#[async_trait]
pub trait TimezoneReporter: Send + Sync {
    /// Sends one report. Only an accepted report is `Ok`.
    async fn report(&self, report: &TimezoneReport) -> TimezoneResult<()>;
}

/// Posts reports as JSON to `{base_url}/api/user/timezone`.
#[derive(Debug, Clone)]
pub struct HttpReporter {
    client: Client,
    endpoint: Url,
}

impl HttpReporter {
    /// Builds a reporter from configuration.
    pub fn new(config: &TimezoneConfig) -> TimezoneResult<Self> {
        let invalid = |reason: String| TimezoneError::InvalidEndpoint {
            url: config.base_url.clone(),
            reason,
        };
        let endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join(ENDPOINT_PATH))
            .map_err(|e| invalid(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", endpoint.scheme())));
        }

        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, endpoint })
    }

    /// The resolved endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TimezoneReporter for HttpReporter {
    async fn report(&self, report: &TimezoneReport) -> TimezoneResult<()> {
        debug!(endpoint = %self.endpoint, timezone = %report.timezone, "posting timezone");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(report)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TimezoneError::Status {
                status: status.as_u16(),
            })
        }
    }
}

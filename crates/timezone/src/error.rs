//! Error type for timezone detection and sync

use thiserror::Error;

/// Errors raised by `diary-timezone`.
#[derive(Debug, Error)]
pub enum TimezoneError {
    /// The system timezone could not be determined.
    #[error("timezone detection failed: {0}")]
    Detection(String),

    /// The request could not be sent or its response not read.
    #[error("timezone sync request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("timezone sync rejected with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The configured base URL is not usable.
    #[error("invalid timezone endpoint '{url}': {reason}")]
    InvalidEndpoint {
        /// The configured URL.
        url: String,
        /// Parser message.
        reason: String,
    },
}

/// Result alias for timezone operations.
pub type TimezoneResult<T> = Result<T, TimezoneError>;

//! Error type for logger setup

use thiserror::Error;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LogError {
    /// The level directive could not be parsed.
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The directive as configured.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// The global subscriber could not be installed.
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Result alias for logger operations.
pub type LogResult<T> = Result<T, LogError>;

//! Error type for page configuration and title formatting

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by `diary-form`.
#[derive(Debug, Error)]
pub enum FormError {
    /// A character limit has inconsistent settings.
    #[error("invalid character limit for '{field}': {reason}")]
    InvalidLimit {
        /// Field the limit applies to.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A progressive group is malformed.
    #[error("invalid field group '{group}': {reason}")]
    InvalidGroup {
        /// Group name.
        group: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The locale is not known to the date formatter.
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    /// A date string could not be parsed.
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration document could not be parsed.
    #[error("failed to parse {format} configuration: {reason}")]
    Parse {
        /// `toml` or `json`.
        format: &'static str,
        /// Parser message.
        reason: String,
    },

    /// The configuration file extension is neither `.toml` nor `.json`.
    #[error("unsupported configuration file '{0}' (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}

/// Result alias for `diary-form` operations.
pub type FormResult<T> = Result<T, FormError>;

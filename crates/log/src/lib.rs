//! # diary-log
//!
//! Logging setup shared by every diary binary and test harness.
//!
//! Library crates only emit `tracing` events; whoever owns `main` picks a
//! configuration and installs the subscriber once:
//!
//! ```rust,no_run
//! fn main() -> Result<(), diary_log::LogError> {
//!     let _guard = diary_log::auto_init()?;
//!     tracing::info!(form = "entry-form", "page bound");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format, WriterConfig};
pub use error::{LogError, LogResult};

/// Auto-detect and initialize the best logging configuration.
///
/// `DIARY_LOG` / `RUST_LOG` in the environment win; otherwise debug builds
/// get [`Config::development`] and release builds [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var("DIARY_LOG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with the default configuration.
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with a custom configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests: compact, uncoloured, no timestamps.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test() -> LogResult<LoggerGuard> {
    init_with(Config::test())
}

//! # diary-timezone
//!
//! Works out which timezone a user's entries are dated in and keeps the
//! server informed.
//!
//! The effective zone follows a fixed priority: the user's manual preference,
//! then the detected system zone when auto-detection is on, then `UTC`.
//!
//! ```rust
//! use diary_timezone::effective_timezone;
//!
//! assert_eq!(effective_timezone(Some("Asia/Tokyo"), true, Some("Europe/Berlin")), "Asia/Tokyo");
//! assert_eq!(effective_timezone(None, true, Some("Europe/Berlin")), "Europe/Berlin");
//! assert_eq!(effective_timezone(None, false, Some("Europe/Berlin")), "UTC");
//! ```

mod config;
mod detect;
mod error;
mod manager;
mod report;
mod resolve;
mod session;
mod settings;

pub use config::TimezoneConfig;
pub use detect::{FixedDetector, SystemDetector, TimezoneDetector};
pub use error::{TimezoneError, TimezoneResult};
pub use manager::TimezoneManager;
pub use report::{ENDPOINT_PATH, HttpReporter, TimezoneReport, TimezoneReporter};
pub use resolve::{UTC, effective_timezone};
pub use session::{DETECTED_TIMEZONE_KEY, EFFECTIVE_TIMEZONE_KEY, MemorySessionStore, SessionStore};
pub use settings::UserTimezoneSettings;

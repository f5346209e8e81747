//! # diary-form
//!
//! Headless behaviours of the diary entry page.
//!
//! The crate never touches widgets directly: a host implements
//! [`Surface`](surface::Surface) and [`ErrorDisplay`](display::ErrorDisplay)
//! and forwards [`UiEvent`](page::UiEvent)s to a [`Page`](page::Page).
//!
//! - [`counter`]: character-limit counters, keystroke gate, truncation
//! - [`progressive`]: sequential reveal of field groups
//! - [`engine`]: declarative validation with debounced triggers
//! - [`unsaved`]: unsaved-changes guard
//! - [`title`]: locale-aware entry titles
//! - [`display`]: inline errors, toasts, connectivity notices
//! - [`debounce`]: the keyed timer map behind all of the above
//!
//! ```rust
//! use chrono::NaiveDate;
//! use diary_form::prelude::*;
//!
//! let surface = MemorySurface::from_fields([
//!     ("title", ""),
//!     ("success_1", ""),
//!     ("success_2", ""),
//!     ("success_3", ""),
//! ]);
//! let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
//! let mut page = Page::bind_on(PageConfig::default(), surface, date).unwrap();
//!
//! assert_eq!(page.surface().value_of("title"), Some("October 18, 2026"));
//! assert!(!page.surface().is_shown("success_2"));
//!
//! page.handle(UiEvent::Input { field: "success_1".into(), value: Some("Ran 5k".into()) });
//! page.flush();
//! assert!(page.surface().is_shown("success_2"));
//! ```

pub mod config;
pub mod counter;
pub mod debounce;
pub mod display;
pub mod engine;
mod error;
pub mod page;
pub mod prelude;
pub mod progressive;
pub mod surface;
pub mod title;
pub mod unsaved;

pub use error::{FormError, FormResult};

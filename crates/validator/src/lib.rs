//! # diary-validator
//!
//! Declarative field rules for diary forms.
//!
//! A form declares, per field, an ordered list of [`Rule`]s
//! (`required`, `min_length`, `max_length`, `range`, `format`), each tagged
//! with the [`Trigger`] that evaluates it. [`validate_rules`] runs them and
//! yields a [`FieldValidation`]; [`FormValidation`] folds field states into
//! form-level validity.
//!
//! ```rust
//! use diary_validator::prelude::*;
//!
//! let rules: Vec<Rule> = serde_json::from_str(r#"[
//!     {"type": "required", "value": true, "message": "Please add a title", "trigger": "blur"},
//!     {"type": "max_length", "value": 100, "message": "Titles stay under 100 characters"}
//! ]"#).unwrap();
//!
//! assert!(validate_rules("title", &rules, "A good day").is_valid);
//! assert!(!validate_rules("title", &rules, "   ").is_valid);
//! ```
//!
//! The underlying checks are plain [`Validate`](foundation::Validate)
//! implementations in [`validators`] and can be used on their own.

// ValidationError is the fundamental error type for all validators;
// boxing it would add indirection to every validation call.
#![allow(clippy::result_large_err)]

pub mod foundation;
mod macros;
pub mod prelude;
pub mod rule;
pub mod state;
pub mod validators;

pub use foundation::{ErrorSeverity, ValidationError};
pub use rule::{Rule, RuleConfigError, RuleKind, Trigger};
pub use state::{FieldValidation, FormValidation, validate_rules};

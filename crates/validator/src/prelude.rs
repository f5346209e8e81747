//! Common imports.
//!
//! ```rust
//! use diary_validator::prelude::*;
//! ```

pub use crate::foundation::{ErrorSeverity, Validate, ValidationError};
pub use crate::rule::{Rule, RuleKind, Trigger};
pub use crate::state::{FieldValidation, FormValidation, validate_rules};
pub use crate::validators::{
    Format, email, max_length, min_length, numeric_range, parse_leading_float, required,
};

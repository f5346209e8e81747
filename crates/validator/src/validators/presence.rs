//! Presence validator

use crate::foundation::ValidationError;

crate::validator! {
    /// Fails when the value is empty after trimming whitespace.
    pub Required for str;
    rule(input) { !input.trim().is_empty() }
    error(input) { ValidationError::required() }
    fn required();
}

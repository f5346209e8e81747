//! Numeric range validator
//!
//! The value is parsed the way a browser's `parseFloat` would: leading
//! whitespace is skipped and the longest numeric prefix is used. A value
//! with no numeric prefix passes; checking that a value is a number is left
//! to a format rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::ValidationError;

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("leading float pattern is valid")
});

/// Parses the longest numeric prefix of `input`, ignoring leading whitespace.
///
/// Returns `None` when there is no numeric prefix.
///
/// ```rust
/// use diary_validator::validators::parse_leading_float;
///
/// assert_eq!(parse_leading_float(" 12.5kg"), Some(12.5));
/// assert_eq!(parse_leading_float("-3e2"), Some(-300.0));
/// assert_eq!(parse_leading_float("abc"), None);
/// ```
pub fn parse_leading_float(input: &str) -> Option<f64> {
    let matched = LEADING_FLOAT.find(input.trim_start())?.as_str();
    if matched.trim_start_matches(['+', '-']) == "Infinity" {
        return Some(if matched.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    matched.parse::<f64>().ok()
}

crate::validator! {
    /// Validates that a numeric value lies within `[min, max]` (inclusive).
    #[derive(Copy, PartialEq)]
    pub NumericRange { min: f64, max: f64 } for str;
    rule(self, input) {
        match parse_leading_float(input) {
            Some(value) => value >= self.min && value <= self.max,
            None => true,
        }
    }
    error(self, input) {
        ValidationError::out_of_range(
            self.min,
            self.max,
            parse_leading_float(input).unwrap_or(f64::NAN),
        )
    }
    fn numeric_range(min: f64, max: f64);
}

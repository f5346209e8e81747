//! Error types for validation failures
//!
//! A failed rule produces a [`ValidationError`] carrying a stable code, the
//! message configured on the rule, an optional field name, and a severity.
//! All string fields use `Cow<'static, str>` so built-in codes never allocate.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity level of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    /// Error that must be fixed (default).
    #[default]
    Error,
    /// Warning that should be addressed.
    Warning,
    /// Informational message.
    Info,
}

impl ErrorSeverity {
    /// Lowercase name, as used in configuration and rendered markup.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A structured validation error.
///
/// ```rust
/// use diary_validator::foundation::{ErrorSeverity, ValidationError};
///
/// let error = ValidationError::new("min_length", "Tell us a little more")
///     .with_field("success_1")
///     .with_param("min", "3")
///     .with_severity(ErrorSeverity::Warning);
///
/// assert_eq!(error.param("min"), Some("3"));
/// assert_eq!(error.to_string(), "[success_1] min_length: Tell us a little more (params: [min=3])");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Error code for programmatic handling, e.g. `"required"`, `"format"`.
    pub code: Cow<'static, str>,

    /// Human-readable message shown next to the field.
    pub message: Cow<'static, str>,

    /// Name of the field the error belongs to, when known.
    pub field: Option<Cow<'static, str>>,

    /// Ordered key-value parameters (typically 0-3).
    pub params: SmallVec<[(Cow<'static, str>, Cow<'static, str>); 2]>,

    /// Severity level.
    pub severity: ErrorSeverity,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: SmallVec::new(),
            severity: ErrorSeverity::Error,
        }
    }

    /// Sets the field name for this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Replaces the message, keeping code and params.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the severity level.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// COMMON CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// Creates a "required" error.
    pub fn required() -> Self {
        Self::new("required", "This field is required")
    }

    /// Creates a "min_length" error.
    pub fn min_length(min: usize, actual: usize) -> Self {
        Self::new("min_length", format!("Must be at least {min} characters"))
            .with_param("min", min.to_string())
            .with_param("actual", actual.to_string())
    }

    /// Creates a "max_length" error.
    pub fn max_length(max: usize, actual: usize) -> Self {
        Self::new("max_length", format!("Must be at most {max} characters"))
            .with_param("max", max.to_string())
            .with_param("actual", actual.to_string())
    }

    /// Creates an "out_of_range" error.
    pub fn out_of_range<T: fmt::Display>(min: T, max: T, actual: T) -> Self {
        Self::new(
            "out_of_range",
            format!("Value must be between {min} and {max}"),
        )
        .with_param("min", min.to_string())
        .with_param("max", max.to_string())
        .with_param("actual", actual.to_string())
    }

    /// Creates a "format" error.
    pub fn invalid_format(expected: impl Into<Cow<'static, str>>) -> Self {
        let expected = expected.into();
        Self::new("format", format!("Must be a valid {expected}")).with_param("expected", expected)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_error() {
        let error = ValidationError::new("test", "Test error");
        assert_eq!(error.code, "test");
        assert_eq!(error.message, "Test error");
        assert!(error.field.is_none());
        assert_eq!(error.severity, ErrorSeverity::Error);
    }

    #[test]
    fn test_display_without_field() {
        let error = ValidationError::required();
        assert_eq!(error.to_string(), "required: This field is required");
    }

    #[test]
    fn test_with_message_keeps_params() {
        let error = ValidationError::min_length(3, 1).with_message("Too short");
        assert_eq!(error.message, "Too short");
        assert_eq!(error.param("min"), Some("3"));
        assert_eq!(error.param("actual"), Some("1"));
    }

    #[test]
    fn test_out_of_range_params() {
        let error = ValidationError::out_of_range(1.0, 10.0, 12.5);
        assert_eq!(error.code, "out_of_range");
        assert_eq!(error.param("max"), Some("10"));
        assert_eq!(error.param("actual"), Some("12.5"));
    }

    #[test]
    fn test_severity_serde_roundtrip_names() {
        let parsed: ErrorSeverity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, ErrorSeverity::Warning);
        assert_eq!(ErrorSeverity::Info.to_string(), "info");
    }
}

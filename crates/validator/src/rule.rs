//! Declarative validation rules
//!
//! A rule is configured as `{type, value, message, severity, trigger}`,
//! the same shape the page configuration uses:
//!
//! ```json
//! { "type": "min_length", "value": 3, "message": "Tell us a little more",
//!   "severity": "warning", "trigger": "input" }
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::{ErrorSeverity, Validate, ValidationError};
use crate::validators::{Format, MaxLength, MinLength, NumericRange, Required};

/// Errors raised while turning a configured rule into a [`Rule`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleConfigError {
    /// The `type` is not one of the known rule types.
    #[error("unknown rule type '{0}'")]
    UnknownType(String),

    /// The `value` does not fit the rule type.
    #[error("rule '{rule}' expects {expected}, got {actual}")]
    InvalidValue {
        /// Rule type.
        rule: &'static str,
        /// Expected shape of the value.
        expected: &'static str,
        /// The value that was supplied.
        actual: String,
    },

    /// A `range` rule whose low bound exceeds its high bound.
    #[error("range rule has low bound {low} above high bound {high}")]
    InvertedRange {
        /// Low bound.
        low: f64,
        /// High bound.
        high: f64,
    },
}

// ============================================================================
// TRIGGER
// ============================================================================

/// The UI event that (re)evaluates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Every keystroke, debounced.
    #[default]
    Input,
    /// Focus leaves the field.
    Blur,
    /// The committed value changes.
    Change,
}

impl Trigger {
    /// Whether rules with this trigger wait for the debounce window.
    #[must_use]
    pub const fn is_debounced(self) -> bool {
        matches!(self, Self::Input)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Blur => "blur",
            Self::Change => "change",
        })
    }
}

// ============================================================================
// RULE KIND
// ============================================================================

/// The check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleKind {
    /// Trimmed value must be non-empty. `Required(false)` never fails.
    Required(bool),
    /// Non-empty value must have at least this many chars.
    MinLength(usize),
    /// Non-empty value must have at most this many chars.
    MaxLength(usize),
    /// Numeric value must lie within `[low, high]`; non-numeric passes.
    Range {
        /// Inclusive low bound.
        low: f64,
        /// Inclusive high bound.
        high: f64,
    },
    /// Non-empty value must match the named format.
    Format(Format),
}

impl RuleKind {
    /// Configuration name of the rule type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required(_) => "required",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Range { .. } => "range",
            Self::Format(_) => "format",
        }
    }

    /// Runs the underlying validator.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        match *self {
            Self::Required(false) => Ok(()),
            Self::Required(true) => Required.validate(value),
            Self::MinLength(min) => MinLength::new(min).validate(value),
            Self::MaxLength(max) => MaxLength::new(max).validate(value),
            Self::Range { low, high } => NumericRange::new(low, high).validate(value),
            Self::Format(format) => format.check(value),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Self::Required(flag) => Value::Bool(flag),
            Self::MinLength(n) | Self::MaxLength(n) => Value::from(n),
            Self::Range { low, high } => Value::from(vec![low, high]),
            Self::Format(format) => Value::from(format.as_str()),
        }
    }

    fn from_parts(rule_type: &str, value: &Value) -> Result<Self, RuleConfigError> {
        let invalid = |rule: &'static str, expected: &'static str| RuleConfigError::InvalidValue {
            rule,
            expected,
            actual: value.to_string(),
        };

        match rule_type {
            "required" => match value {
                Value::Null => Ok(Self::Required(true)),
                Value::Bool(flag) => Ok(Self::Required(*flag)),
                _ => Err(invalid("required", "a boolean")),
            },
            "min_length" => value
                .as_u64()
                .map(|n| Self::MinLength(n as usize))
                .ok_or_else(|| invalid("min_length", "a non-negative integer")),
            "max_length" => value
                .as_u64()
                .map(|n| Self::MaxLength(n as usize))
                .ok_or_else(|| invalid("max_length", "a non-negative integer")),
            "range" => {
                let bounds = value
                    .as_array()
                    .filter(|a| a.len() == 2)
                    .and_then(|a| Some((a[0].as_f64()?, a[1].as_f64()?)))
                    .ok_or_else(|| invalid("range", "a [low, high] pair of numbers"))?;
                let (low, high) = bounds;
                if low > high {
                    return Err(RuleConfigError::InvertedRange { low, high });
                }
                Ok(Self::Range { low, high })
            }
            "format" => match value.as_str() {
                Some("email") => Ok(Self::Format(Format::Email)),
                _ => Err(invalid("format", "a known format name (\"email\")")),
            },
            other => Err(RuleConfigError::UnknownType(other.to_string())),
        }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A configured validation rule.
///
/// ```rust
/// use diary_validator::{Rule, Trigger};
///
/// let rule: Rule = serde_json::from_str(
///     r#"{"type": "max_length", "value": 5, "message": "Keep it short", "trigger": "blur"}"#,
/// ).unwrap();
///
/// assert_eq!(rule.trigger, Trigger::Blur);
/// let err = rule.evaluate("success_1", "far too long").unwrap_err();
/// assert_eq!(err.message, "Keep it short");
/// assert_eq!(err.field.as_deref(), Some("success_1"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct Rule {
    /// The check to perform.
    pub kind: RuleKind,
    /// Message shown when the check fails.
    pub message: Cow<'static, str>,
    /// Severity attached to the failure.
    pub severity: ErrorSeverity,
    /// Event that evaluates the rule.
    pub trigger: Trigger,
}

impl Rule {
    /// Creates a rule with error severity.
    pub fn new(kind: RuleKind, message: impl Into<Cow<'static, str>>, trigger: Trigger) -> Self {
        Self {
            kind,
            message: message.into(),
            severity: ErrorSeverity::Error,
            trigger,
        }
    }

    /// Sets the severity.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Evaluates the rule against a field value.
    ///
    /// The produced error carries the configured message and severity and
    /// the field name.
    pub fn evaluate(&self, field: &str, value: &str) -> Result<(), ValidationError> {
        self.kind.check(value).map_err(|e| {
            e.with_message(self.message.clone())
                .with_severity(self.severity)
                .with_field(field.to_owned())
        })
    }
}

/// Wire shape of a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRule {
    #[serde(rename = "type")]
    rule_type: String,
    #[serde(default)]
    value: Value,
    message: String,
    #[serde(default)]
    severity: ErrorSeverity,
    #[serde(default)]
    trigger: Trigger,
}

impl TryFrom<RawRule> for Rule {
    type Error = RuleConfigError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: RuleKind::from_parts(&raw.rule_type, &raw.value)?,
            message: Cow::Owned(raw.message),
            severity: raw.severity,
            trigger: raw.trigger,
        })
    }
}

impl From<Rule> for RawRule {
    fn from(rule: Rule) -> Self {
        Self {
            rule_type: rule.kind.name().to_owned(),
            value: rule.kind.to_value(),
            message: rule.message.into_owned(),
            severity: rule.severity,
            trigger: rule.trigger,
        }
    }
}

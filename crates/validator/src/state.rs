//! Per-field and form-level validation state

use serde::Serialize;

use crate::foundation::ValidationError;
use crate::rule::Rule;

/// Result of evaluating a field's rules.
///
/// Every rule is evaluated; failures are kept in declaration order and the
/// first one is the one a UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    /// `true` when no rule failed.
    pub is_valid: bool,
    /// Failures in rule declaration order.
    pub errors: Vec<ValidationError>,
}

impl FieldValidation {
    /// A passing state with no errors.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Builds the state from collected failures.
    #[must_use]
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// The failure that drives the display, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&ValidationError> {
        self.errors.first()
    }
}

impl Default for FieldValidation {
    fn default() -> Self {
        Self::valid()
    }
}

/// Aggregate over every recorded field state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    /// Conjunction of all field validity flags.
    pub is_valid: bool,
    /// All field errors, field by field.
    pub errors: Vec<ValidationError>,
}

impl FormValidation {
    /// Folds field states into the form-level view.
    pub fn aggregate<'a>(states: impl IntoIterator<Item = &'a FieldValidation>) -> Self {
        let mut is_valid = true;
        let mut errors = Vec::new();
        for state in states {
            is_valid &= state.is_valid;
            errors.extend(state.errors.iter().cloned());
        }
        Self { is_valid, errors }
    }
}

/// Evaluates `rules` against `value` for the named field.
///
/// ```rust
/// use diary_validator::{Rule, RuleKind, Trigger, validate_rules};
///
/// let rules = [
///     Rule::new(RuleKind::Required(true), "Required", Trigger::Blur),
///     Rule::new(RuleKind::MinLength(3), "Too short", Trigger::Input),
/// ];
///
/// let state = validate_rules("title", rules.iter(), "");
/// assert!(!state.is_valid);
/// assert_eq!(state.first_error().unwrap().message, "Required");
/// ```
pub fn validate_rules<'a>(
    field: &str,
    rules: impl IntoIterator<Item = &'a Rule>,
    value: &str,
) -> FieldValidation {
    let errors = rules
        .into_iter()
        .filter_map(|rule| rule.evaluate(field, value).err())
        .collect();
    FieldValidation::from_errors(errors)
}

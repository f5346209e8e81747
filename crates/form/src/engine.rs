//! Validation engine
//!
//! Binds the configured rules of a page to its fields and routes UI events
//! to them: `input` rules wait for the debounce window and see the value of
//! the last keystroke, `blur` and `change` rules run at once. Submitting
//! runs every rule of every field.

use std::time::Duration;

use diary_validator::{FieldValidation, FormValidation, Rule, Trigger, ValidationError, validate_rules};
use indexmap::IndexMap;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::debounce::Debouncer;
use crate::display::ErrorScope;
use crate::surface::{FieldId, Surface};

#[derive(Debug, Clone)]
struct BoundField {
    name: String,
    rules: Vec<Rule>,
}

impl BoundField {
    fn has_trigger(&self, trigger: Trigger) -> bool {
        self.rules.iter().any(|r| r.trigger == trigger)
    }

    fn has_debounced(&self) -> bool {
        self.rules.iter().any(|r| r.trigger.is_debounced())
    }
}

/// What the host should do with a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "submit", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Every field passed.
    Proceed,
    /// Submission is cancelled.
    Blocked {
        /// Field that received focus.
        focus: Option<FieldId>,
        /// Every failure, field by field.
        errors: Vec<ValidationError>,
    },
}

impl SubmitOutcome {
    /// Whether the submission may go ahead.
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }
}

/// Rule routing and validation state for one form.
#[derive(Debug)]
pub struct ValidationEngine {
    fields: IndexMap<FieldId, BoundField>,
    states: IndexMap<String, FieldValidation>,
    debouncer: Debouncer<FieldId, String>,
}

impl ValidationEngine {
    /// Binds each configured field once.
    ///
    /// Fields absent from the surface are skipped.
    pub fn bind<S: Surface + ?Sized>(
        rules: &IndexMap<String, Vec<Rule>>,
        debounce: Duration,
        surface: &S,
    ) -> Self {
        let mut fields = IndexMap::new();
        for (name, field_rules) in rules {
            match surface.field(name) {
                Some(id) => {
                    fields.insert(
                        id,
                        BoundField {
                            name: name.clone(),
                            rules: field_rules.clone(),
                        },
                    );
                }
                None => debug!(field = %name, "no field for validation rules, skipping"),
            }
        }

        debug!(fields = fields.len(), debounce_ms = debounce.as_millis() as u64, "validation engine bound");
        Self {
            fields,
            states: IndexMap::new(),
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Whether `field` has rules.
    pub fn is_bound(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    /// Records a keystroke; `input` rules run once the field goes quiet.
    ///
    /// Returns `true` when a deferred validation was (re)armed.
    pub fn on_input(&mut self, field: FieldId, value: &str) -> bool {
        let armed = self
            .fields
            .get(&field)
            .is_some_and(BoundField::has_debounced);
        if armed {
            self.debouncer.schedule(field, value.to_owned());
        }
        armed
    }

    /// Runs `blur` rules against the current value.
    pub fn on_blur<S: Surface + ?Sized>(&mut self, field: FieldId, surface: &mut S) -> Option<FieldValidation> {
        let value = surface.value(field);
        self.validate_field(field, Some(Trigger::Blur), &value, surface)
    }

    /// Runs `change` rules against the current value.
    pub fn on_change<S: Surface + ?Sized>(&mut self, field: FieldId, surface: &mut S) -> Option<FieldValidation> {
        let value = surface.value(field);
        self.validate_field(field, Some(Trigger::Change), &value, surface)
    }

    /// Waits for the next deferred validation.
    pub async fn next_due(&mut self) -> Option<(FieldId, String)> {
        self.debouncer.next_due().await
    }

    /// Deferred validations due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<(FieldId, String)> {
        self.debouncer.take_due(now)
    }

    /// Every deferred validation, earliest first.
    pub fn drain(&mut self) -> Vec<(FieldId, String)> {
        self.debouncer.drain()
    }

    /// Whether a deferred validation is pending.
    pub fn has_pending(&self) -> bool {
        !self.debouncer.is_empty()
    }

    /// Runs `input` rules with the value captured at the last keystroke.
    pub fn run_deferred<S: Surface + ?Sized>(
        &mut self,
        field: FieldId,
        value: &str,
        surface: &mut S,
    ) -> Option<FieldValidation> {
        self.validate_field(field, Some(Trigger::Input), value, surface)
    }

    /// Evaluates the rules of `field` for `trigger` (all rules when `None`),
    /// records the state and updates the display.
    ///
    /// Returns `None` when the field has no rules for the trigger.
    pub fn validate_field<S: Surface + ?Sized>(
        &mut self,
        field: FieldId,
        trigger: Option<Trigger>,
        value: &str,
        surface: &mut S,
    ) -> Option<FieldValidation> {
        let bound = self.fields.get(&field)?;
        if let Some(trigger) = trigger
            && !bound.has_trigger(trigger)
        {
            return None;
        }

        let rules = bound
            .rules
            .iter()
            .filter(|r| trigger.is_none_or(|t| r.trigger == t));
        let state = validate_rules(&bound.name, rules, value);
        trace!(field = %bound.name, ?trigger, valid = state.is_valid, "field validated");

        surface.clear_errors(ErrorScope::Field(field));
        match state.first_error() {
            Some(error) => surface.show_field_error(field, &error.message, error.severity),
            None => surface.mark_valid(field),
        }

        self.states.insert(bound.name.clone(), state.clone());
        Some(state)
    }

    /// Validates every bound field with all of its rules.
    pub fn validate_form<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FormValidation {
        let fields: Vec<FieldId> = self.fields.keys().copied().collect();
        let results: Vec<FieldValidation> = fields
            .into_iter()
            .filter_map(|field| {
                let value = surface.value(field);
                self.validate_field(field, None, &value, surface)
            })
            .collect();
        FormValidation::aggregate(&results)
    }

    /// Validates the whole form; on failure moves focus to the first invalid
    /// field in document order.
    pub fn on_submit<S: Surface + ?Sized>(&mut self, surface: &mut S) -> SubmitOutcome {
        let form = self.validate_form(surface);
        if form.is_valid {
            return SubmitOutcome::Proceed;
        }

        let focus = surface.focus_first_invalid();
        debug!(errors = form.errors.len(), ?focus, "submit blocked by validation");
        SubmitOutcome::Blocked {
            focus,
            errors: form.errors,
        }
    }

    /// Recorded state of `name`; fields never validated are valid.
    pub fn field_state(&self, name: &str) -> FieldValidation {
        self.states.get(name).cloned().unwrap_or_default()
    }

    /// Conjunction of every recorded field state.
    pub fn form_state(&self) -> FormValidation {
        FormValidation::aggregate(self.states.values())
    }

    /// Drops state and pending validations and clears error displays.
    pub fn reset<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.states.clear();
        self.debouncer.clear();
        for &field in self.fields.keys() {
            surface.clear_errors(ErrorScope::Field(field));
        }
    }
}

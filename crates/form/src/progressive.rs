//! Progressive field groups
//!
//! A group reveals its fields one at a time: the next field appears once the
//! current one holds at least `min_trigger` trimmed characters, and clearing
//! a field hides everything after it. Hidden fields keep their values.

use std::time::Duration;

use indexmap::IndexMap;
use tokio::time::Instant;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::surface::{FieldId, Surface, Transition};

/// Default minimum trimmed length that reveals the next field.
pub const DEFAULT_MIN_TRIGGER: usize = 2;

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// An ordered set of fields sharing a reveal policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    name: String,
    fields: Vec<FieldId>,
    min_trigger: usize,
}

impl FieldGroup {
    /// Resolves the group's fields once.
    ///
    /// Missing fields are skipped; `None` when fewer than two remain.
    pub fn bind<S, I>(name: &str, field_names: I, min_trigger: usize, surface: &S) -> Option<Self>
    where
        S: Surface + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let fields: Vec<FieldId> = field_names
            .into_iter()
            .filter_map(|n| {
                let id = surface.field(n.as_ref());
                if id.is_none() {
                    debug!(group = name, field = n.as_ref(), "group field not found, skipping");
                }
                id
            })
            .collect();

        if fields.len() < 2 {
            debug!(group = name, resolved = fields.len(), "group needs at least two fields");
            return None;
        }

        Some(Self {
            name: name.to_owned(),
            fields,
            min_trigger,
        })
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved fields in order.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    /// Position of `field` within the group.
    pub fn position(&self, field: FieldId) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// Sets visibility from current content.
    ///
    /// The first field is shown. Each later field is shown when the previous
    /// one meets the trigger length or the field itself has content; the
    /// first field failing that is hidden with everything after it.
    pub fn evaluate_initial_visibility<S: Surface + ?Sized>(&self, surface: &mut S) {
        for (i, &field) in self.fields.iter().enumerate() {
            if i == 0 {
                surface.set_visible(field, true, Transition::Immediate);
                continue;
            }

            let previous_ready = trimmed_len(&surface.value(self.fields[i - 1])) >= self.min_trigger;
            let has_content = !surface.value(field).trim().is_empty();

            if previous_ready || has_content {
                surface.set_visible(field, true, Transition::Immediate);
            } else {
                self.hide_from(i, surface);
                break;
            }
        }
    }

    /// Re-runs the reveal sweep starting at `from`.
    pub fn handle_sequential_trigger<S: Surface + ?Sized>(&self, from: usize, surface: &mut S) {
        for i in from..self.fields.len().saturating_sub(1) {
            let next = self.fields[i + 1];
            if trimmed_len(&surface.value(self.fields[i])) >= self.min_trigger {
                if !surface.is_visible(next) {
                    debug!(group = %self.name, position = i + 1, "revealing field");
                    surface.set_visible(next, true, Transition::FadeSlide);
                }
            } else {
                self.hide_from(i + 1, surface);
                break;
            }
        }
    }

    fn hide_from<S: Surface + ?Sized>(&self, start: usize, surface: &mut S) {
        for &field in &self.fields[start..] {
            surface.set_visible(field, false, Transition::Immediate);
        }
    }
}

/// Debounce key: group index and position in the group.
pub type GroupKey = (usize, usize);

/// Every progressive group of a page plus their debounce timers.
#[derive(Debug)]
pub struct ProgressiveGroups {
    groups: Vec<FieldGroup>,
    debouncer: Debouncer<GroupKey, ()>,
}

impl ProgressiveGroups {
    /// Binds each configured group and applies initial visibility.
    pub fn bind<S: Surface + ?Sized>(
        config: &IndexMap<String, Vec<String>>,
        min_trigger: usize,
        delay: Duration,
        surface: &mut S,
    ) -> Self {
        let groups: Vec<_> = config
            .iter()
            .filter_map(|(name, fields)| FieldGroup::bind(name, fields, min_trigger, surface))
            .collect();

        for group in &groups {
            group.evaluate_initial_visibility(surface);
        }

        Self {
            groups,
            debouncer: Debouncer::new(delay),
        }
    }

    /// Bound groups.
    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    /// Schedules a sweep for every group containing `field`.
    pub fn on_input(&mut self, field: FieldId) {
        for (g, group) in self.groups.iter().enumerate() {
            if let Some(position) = group.position(field) {
                self.debouncer.schedule((g, position), ());
            }
        }
    }

    /// Runs the sweep for a fired key.
    pub fn fire<S: Surface + ?Sized>(&self, (group, position): GroupKey, surface: &mut S) {
        if let Some(group) = self.groups.get(group) {
            group.handle_sequential_trigger(position, surface);
        }
    }

    /// Waits for the next due sweep.
    pub async fn next_due(&mut self) -> Option<GroupKey> {
        self.debouncer.next_due().await.map(|(key, ())| key)
    }

    /// Sweeps due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<GroupKey> {
        self.debouncer.take_due(now).into_iter().map(|(key, ())| key).collect()
    }

    /// Every pending sweep, earliest first.
    pub fn drain(&mut self) -> Vec<GroupKey> {
        self.debouncer.drain().into_iter().map(|(key, ())| key).collect()
    }

    /// Whether a sweep is pending.
    pub fn has_pending(&self) -> bool {
        !self.debouncer.is_empty()
    }
}

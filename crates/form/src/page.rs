//! Page composition
//!
//! A [`Page`] is built once per page load. It binds every component to the
//! host surface, routes [`UiEvent`]s to them and owns the debounce timers,
//! which go away with the page.
//!
//! Hosts either hand the page an event channel and await [`Page::run`], or
//! call [`Page::handle`] themselves and drive time with [`Page::fire_due`].

use std::collections::VecDeque;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::config::PageConfig;
use crate::counter::{CounterSet, KeyPress};
use crate::display::Connectivity;
use crate::engine::{SubmitOutcome, ValidationEngine};
use crate::error::FormResult;
use crate::progressive::ProgressiveGroups;
use crate::surface::{FieldId, Surface};
use crate::title;
use crate::unsaved::{LinkClick, LinkDecision, UnsavedChangesGuard};

/// A UI event forwarded by the host.
///
/// Fields are addressed by name. `value`, when present, is written to the
/// field before the event is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The field's value changed by typing or pasting.
    Input {
        /// Field name.
        field: String,
        /// New value.
        #[serde(default)]
        value: Option<String>,
    },
    /// A key is about to be applied to the field.
    KeyDown {
        /// Field name.
        field: String,
        /// The key.
        #[serde(flatten)]
        key: KeyPress,
    },
    /// Focus left the field.
    Blur {
        /// Field name.
        field: String,
    },
    /// The field's committed value changed.
    Change {
        /// Field name.
        field: String,
        /// New value.
        #[serde(default)]
        value: Option<String>,
    },
    /// The form is being submitted.
    Submit,
    /// A link was clicked; `confirm` answers the leave prompt if one is shown.
    LinkClick {
        /// The link.
        #[serde(flatten)]
        link: LinkClick,
        /// Answer to the confirmation prompt.
        #[serde(default)]
        confirm: bool,
    },
    /// The page is about to unload.
    BeforeUnload,
    /// Connectivity came back.
    Online,
    /// Connectivity was lost.
    Offline,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Processed; nothing for the host to act on.
    Handled,
    /// The event named a field the surface does not have.
    UnknownField(String),
    /// The key press must be suppressed.
    KeyRejected,
    /// Result of a submit.
    Submit(SubmitOutcome),
    /// Whether a link navigation goes ahead.
    Link(LinkDecision),
    /// Prompt to show before unloading, if any.
    Unload(Option<&'static str>),
}

/// All form behaviours of one page, bound to a surface.
#[derive(Debug)]
pub struct Page<S> {
    config: PageConfig,
    surface: S,
    counters: CounterSet,
    groups: ProgressiveGroups,
    engine: ValidationEngine,
    unsaved: Option<UnsavedChangesGuard>,
    connectivity: Connectivity,
}

impl<S: Surface> Page<S> {
    /// Binds `config` to `surface`, dating the auto title today.
    pub fn bind(config: PageConfig, surface: S) -> FormResult<Self> {
        Self::bind_on(config, surface, Local::now().date_naive())
    }

    /// Binds `config` to `surface` with an explicit entry date.
    ///
    /// The title is filled before the unsaved-changes snapshot is taken, so
    /// an auto title does not count as an edit.
    pub fn bind_on(config: PageConfig, mut surface: S, entry_date: NaiveDate) -> FormResult<Self> {
        config.validate()?;

        if config.auto_title {
            title::initialize_title_field(&mut surface, entry_date, &config.locale);
        }

        let counters = CounterSet::bind(&config.limits, &config.locale, &mut surface);
        let groups = ProgressiveGroups::bind(
            &config.groups,
            config.min_trigger_length,
            config.debounce(),
            &mut surface,
        );
        let engine = ValidationEngine::bind(&config.rules, config.debounce(), &surface);
        let unsaved = config.track_unsaved.then(|| UnsavedChangesGuard::bind(&surface));

        info!(
            form = %config.form,
            counters = counters.len(),
            groups = groups.groups().len(),
            unsaved = unsaved.is_some(),
            "page bound"
        );

        Ok(Self {
            config,
            surface,
            counters,
            groups,
            engine,
            unsaved,
            connectivity: Connectivity::default(),
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// The host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The host surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unbinds and returns the surface; pending timers are dropped.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The validation engine.
    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// The bound counters.
    pub fn counters(&self) -> &CounterSet {
        &self.counters
    }

    /// The unsaved-changes guard, when tracking is on.
    pub fn unsaved(&self) -> Option<&UnsavedChangesGuard> {
        self.unsaved.as_ref()
    }

    /// Mutable access to the unsaved-changes guard.
    pub fn unsaved_mut(&mut self) -> Option<&mut UnsavedChangesGuard> {
        self.unsaved.as_mut()
    }

    /// Connectivity state.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Processes one event.
    pub fn handle(&mut self, event: UiEvent) -> EventOutcome {
        trace!(?event, "ui event");
        match event {
            UiEvent::Input { field, value } => self.with_field(&field, value, Self::on_input),
            UiEvent::Change { field, value } => self.with_field(&field, value, Self::on_change),
            UiEvent::Blur { field } => self.with_field(&field, None, |page, id| {
                page.engine.on_blur(id, &mut page.surface);
            }),
            UiEvent::KeyDown { field, key } => match self.surface.field(&field) {
                Some(id) if !self.counters.on_keydown(id, &key, &self.surface) => EventOutcome::KeyRejected,
                Some(_) => EventOutcome::Handled,
                None => EventOutcome::UnknownField(field),
            },
            UiEvent::Submit => EventOutcome::Submit(self.submit()),
            UiEvent::LinkClick { link, confirm } => {
                let decision = self
                    .unsaved
                    .as_mut()
                    .map_or(LinkDecision::Follow, |guard| guard.on_link_click(&link, |_| confirm));
                EventOutcome::Link(decision)
            }
            UiEvent::BeforeUnload => {
                EventOutcome::Unload(self.unsaved.as_ref().and_then(UnsavedChangesGuard::before_unload))
            }
            UiEvent::Online => {
                self.connectivity.on_online(&mut self.surface);
                EventOutcome::Handled
            }
            UiEvent::Offline => {
                self.connectivity.on_offline(&mut self.surface);
                EventOutcome::Handled
            }
        }
    }

    fn with_field(
        &mut self,
        name: &str,
        value: Option<String>,
        apply: impl FnOnce(&mut Self, FieldId),
    ) -> EventOutcome {
        let Some(id) = self.surface.field(name) else {
            debug!(field = name, "event for unknown field");
            return EventOutcome::UnknownField(name.to_owned());
        };
        if let Some(value) = value {
            self.surface.set_value(id, &value);
        }
        apply(self, id);
        EventOutcome::Handled
    }

    fn on_input(&mut self, field: FieldId) {
        let mut dispatch = VecDeque::from([field]);
        while let Some(field) = dispatch.pop_front() {
            if self.surface.is_invalid(field) {
                self.surface.clear_field_error(field);
            }

            if self.counters.on_input(field, &mut self.surface) {
                dispatch.push_back(field);
            }

            let value = self.surface.value(field);
            self.engine.on_input(field, &value);
            self.groups.on_input(field);
            if let Some(guard) = &mut self.unsaved {
                guard.on_input(&mut self.surface);
            }
        }
    }

    fn on_change(&mut self, field: FieldId) {
        self.engine.on_change(field, &mut self.surface);
        if let Some(guard) = &mut self.unsaved {
            guard.on_input(&mut self.surface);
        }
    }

    fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.engine.on_submit(&mut self.surface);
        if let Some(guard) = &mut self.unsaved {
            guard.on_submit();
        }
        outcome
    }

    /// Runs debounced work due at `now`; returns how many callbacks ran.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let validations = self.engine.take_due(now);
        let sweeps = self.groups.take_due(now);
        self.run_fired(validations, sweeps)
    }

    /// Runs every pending debounced callback immediately.
    pub fn flush(&mut self) -> usize {
        let validations = self.engine.drain();
        let sweeps = self.groups.drain();
        self.run_fired(validations, sweeps)
    }

    fn run_fired(&mut self, validations: Vec<(FieldId, String)>, sweeps: Vec<(usize, usize)>) -> usize {
        let count = validations.len() + sweeps.len();
        for (field, value) in validations {
            self.engine.run_deferred(field, &value, &mut self.surface);
        }
        for key in sweeps {
            self.groups.fire(key, &mut self.surface);
        }
        count
    }

    /// Whether any debounced callback is pending.
    pub fn has_pending(&self) -> bool {
        self.engine.has_pending() || self.groups.has_pending()
    }

    /// Clears validation state, pending validations and counters.
    pub fn reset(&mut self) {
        self.engine.reset(&mut self.surface);
        self.counters.reset(&mut self.surface);
    }

    /// Processes events and debounce deadlines until the channel closes.
    ///
    /// Work still pending when the channel closes is dropped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        let outcome = self.handle(event);
                        trace!(?outcome, "event handled");
                    }
                    None => break,
                },
                Some((field, value)) = self.engine.next_due() => {
                    self.engine.run_deferred(field, &value, &mut self.surface);
                }
                Some(key) = self.groups.next_due() => {
                    self.groups.fire(key, &mut self.surface);
                }
            }
        }
        debug!(form = %self.config.form, "event channel closed");
    }
}

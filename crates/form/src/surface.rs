//! Host surface abstraction
//!
//! The engine never owns widgets. A host implements [`Surface`] over its own
//! widget tree (DOM bindings, a TUI, a test double) and the components drive
//! it through [`FieldId`] handles resolved once by name at bind time.
//!
//! [`MemorySurface`] is the in-process implementation used by tests and the
//! CLI.

use diary_validator::ErrorSeverity;
use indexmap::IndexMap;
use serde::Serialize;

use crate::counter::{CounterView, LimitClass};
use crate::display::{ErrorDisplay, ErrorScope, Toast, ToastKind};

/// Handle to a field, valid for the lifetime of the surface that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FieldId(usize);

impl FieldId {
    /// Wraps a host-side index. Hosts must keep document order.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Host-side index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// How a visibility change is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Applied without animation.
    Immediate,
    /// Fade in with a short slide.
    FadeSlide,
}

/// Widget-tree operations the engine needs from a host.
pub trait Surface: ErrorDisplay {
    /// Resolves a field by its `name`.
    fn field(&self, name: &str) -> Option<FieldId>;

    /// Name of a field.
    fn field_name(&self, field: FieldId) -> Option<&str>;

    /// Every field of the form in document order.
    fn fields(&self) -> Vec<FieldId>;

    /// Current value; empty for unknown handles.
    fn value(&self, field: FieldId) -> String;

    /// Replaces the value. Does not emit an input event.
    fn set_value(&mut self, field: FieldId, value: &str);

    /// Sets the placeholder text.
    fn set_placeholder(&mut self, field: FieldId, text: &str);

    /// Whether the field's container is shown.
    fn is_visible(&self, field: FieldId) -> bool;

    /// Shows or hides the field's container.
    fn set_visible(&mut self, field: FieldId, visible: bool, transition: Transition);

    /// Renders the counter below the field, or hides it.
    fn render_counter(&mut self, field: FieldId, view: Option<&CounterView>);

    /// Replaces the limit styling class on the field.
    fn set_limit_class(&mut self, field: FieldId, class: Option<LimitClass>);

    /// Marks the submit control as having unsaved changes.
    fn set_unsaved_marker(&mut self, unsaved: bool);

    /// Name/value snapshot of the whole form.
    fn form_data(&self) -> IndexMap<String, String> {
        self.fields()
            .into_iter()
            .filter_map(|id| Some((self.field_name(id)?.to_owned(), self.value(id))))
            .collect()
    }
}

// ============================================================================
// IN-MEMORY SURFACE
// ============================================================================

/// Inline error currently shown on a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineError {
    /// Message text.
    pub message: String,
    /// Severity styling.
    pub severity: ErrorSeverity,
}

/// One field of a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryField {
    /// Field name.
    pub name: String,
    /// Current value.
    pub value: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Container visibility.
    pub visible: bool,
    /// Transition used by the last visibility change.
    pub last_transition: Option<Transition>,
    /// Rendered counter.
    pub counter: Option<CounterView>,
    /// Limit styling class.
    pub limit_class: Option<LimitClass>,
    /// Inline error.
    pub error: Option<InlineError>,
    /// Brief valid highlight.
    pub valid_highlight: bool,
}

impl MemoryField {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
            placeholder: None,
            visible: true,
            last_transition: None,
            counter: None,
            limit_class: None,
            error: None,
            valid_highlight: false,
        }
    }
}

/// A form held in memory.
///
/// ```rust
/// use diary_form::surface::{MemorySurface, Surface};
///
/// let mut surface = MemorySurface::new()
///     .with_field("title", "")
///     .with_field("journal", "Dear diary");
///
/// let title = surface.field("title").unwrap();
/// surface.set_value(title, "Monday");
/// assert_eq!(surface.value_of("title"), Some("Monday"));
/// assert_eq!(surface.form_data()["journal"], "Dear diary");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemorySurface {
    fields: Vec<MemoryField>,
    unsaved_marker: bool,
    toasts: Vec<Toast>,
    focused: Option<FieldId>,
    scrolled_into_view: Option<FieldId>,
}

impl MemorySurface {
    /// An empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field in document order.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.push(MemoryField::new(name, value));
        self
    }

    /// Builds a form from name/value pairs.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        fields
            .into_iter()
            .fold(Self::new(), |surface, (name, value)| surface.with_field(name, value))
    }

    /// Field state by name.
    pub fn field_state(&self, name: &str) -> Option<&MemoryField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field value by name.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.field_state(name).map(|f| f.value.as_str())
    }

    /// Whether the named field exists and is shown.
    pub fn is_shown(&self, name: &str) -> bool {
        self.field_state(name).is_some_and(|f| f.visible)
    }

    /// Inline error message of the named field.
    pub fn error_of(&self, name: &str) -> Option<&str> {
        self.field_state(name)
            .and_then(|f| f.error.as_ref())
            .map(|e| e.message.as_str())
    }

    /// Toasts currently shown.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Field that last received focus.
    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    /// Field last scrolled into view.
    pub fn scrolled_into_view(&self) -> Option<FieldId> {
        self.scrolled_into_view
    }

    /// Whether the submit control carries the unsaved marker.
    pub fn unsaved_marker(&self) -> bool {
        self.unsaved_marker
    }

    fn get_mut(&mut self, field: FieldId) -> Option<&mut MemoryField> {
        self.fields.get_mut(field.index())
    }
}

impl Surface for MemorySurface {
    fn field(&self, name: &str) -> Option<FieldId> {
        self.fields.iter().position(|f| f.name == name).map(FieldId::new)
    }

    fn field_name(&self, field: FieldId) -> Option<&str> {
        self.fields.get(field.index()).map(|f| f.name.as_str())
    }

    fn fields(&self) -> Vec<FieldId> {
        (0..self.fields.len()).map(FieldId::new).collect()
    }

    fn value(&self, field: FieldId) -> String {
        self.fields
            .get(field.index())
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&mut self, field: FieldId, value: &str) {
        if let Some(f) = self.get_mut(field) {
            value.clone_into(&mut f.value);
        }
    }

    fn set_placeholder(&mut self, field: FieldId, text: &str) {
        if let Some(f) = self.get_mut(field) {
            f.placeholder = Some(text.to_owned());
        }
    }

    fn is_visible(&self, field: FieldId) -> bool {
        self.fields.get(field.index()).is_some_and(|f| f.visible)
    }

    fn set_visible(&mut self, field: FieldId, visible: bool, transition: Transition) {
        if let Some(f) = self.get_mut(field) {
            f.visible = visible;
            f.last_transition = Some(transition);
        }
    }

    fn render_counter(&mut self, field: FieldId, view: Option<&CounterView>) {
        if let Some(f) = self.get_mut(field) {
            f.counter = view.cloned();
        }
    }

    fn set_limit_class(&mut self, field: FieldId, class: Option<LimitClass>) {
        if let Some(f) = self.get_mut(field) {
            f.limit_class = class;
        }
    }

    fn set_unsaved_marker(&mut self, unsaved: bool) {
        self.unsaved_marker = unsaved;
    }
}

impl ErrorDisplay for MemorySurface {
    fn show_field_error(&mut self, field: FieldId, message: &str, severity: ErrorSeverity) {
        if let Some(f) = self.get_mut(field) {
            f.error = Some(InlineError {
                message: message.to_owned(),
                severity,
            });
            f.valid_highlight = false;
        }
    }

    fn clear_field_error(&mut self, field: FieldId) {
        if let Some(f) = self.get_mut(field) {
            f.error = None;
        }
    }

    fn clear_errors(&mut self, scope: ErrorScope) {
        match scope {
            ErrorScope::Field(field) => self.clear_field_error(field),
            ErrorScope::Document => self.fields.iter_mut().for_each(|f| f.error = None),
        }
    }

    fn mark_valid(&mut self, field: FieldId) {
        if let Some(f) = self.get_mut(field) {
            f.error = None;
            f.valid_highlight = !f.value.trim().is_empty();
        }
    }

    fn is_invalid(&self, field: FieldId) -> bool {
        self.fields
            .get(field.index())
            .is_some_and(|f| f.error.is_some())
    }

    fn focus_first_invalid(&mut self) -> Option<FieldId> {
        let first = self
            .fields
            .iter()
            .position(|f| f.error.is_some())
            .map(FieldId::new)?;
        self.focused = Some(first);
        self.scrolled_into_view = Some(first);
        Some(first)
    }

    fn show_toast(&mut self, toast: Toast) {
        self.toasts.retain(|t| t.kind != toast.kind);
        self.toasts.push(toast);
    }

    fn dismiss_toast(&mut self, kind: ToastKind) {
        self.toasts.retain(|t| t.kind != kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn surface() -> MemorySurface {
        MemorySurface::from_fields([("title", ""), ("success_1", "ran"), ("email", "x")])
    }

    #[test]
    fn test_handles_follow_document_order() {
        let surface = surface();
        assert_eq!(surface.field("success_1"), Some(FieldId::new(1)));
        assert_eq!(surface.field("nope"), None);
        assert_eq!(surface.field_name(FieldId::new(2)), Some("email"));
        assert_eq!(surface.value(FieldId::new(9)), "");
    }

    #[test]
    fn test_focus_first_invalid_in_document_order() {
        let mut surface = surface();
        let email = surface.field("email").unwrap();
        let success = surface.field("success_1").unwrap();
        surface.show_field_error(email, "bad", ErrorSeverity::Error);
        surface.show_field_error(success, "short", ErrorSeverity::Warning);

        assert_eq!(surface.focus_first_invalid(), Some(success));
        assert_eq!(surface.scrolled_into_view(), Some(success));

        surface.clear_errors(ErrorScope::Document);
        assert_eq!(surface.focus_first_invalid(), None);
    }

    #[test]
    fn test_mark_valid_highlights_only_non_empty() {
        let mut surface = surface();
        let title = surface.field("title").unwrap();
        let success = surface.field("success_1").unwrap();
        surface.show_field_error(success, "bad", ErrorSeverity::Error);

        surface.mark_valid(title);
        surface.mark_valid(success);
        assert!(!surface.field_state("title").unwrap().valid_highlight);
        assert!(surface.field_state("success_1").unwrap().valid_highlight);
        assert!(!surface.is_invalid(success));
    }

    #[test]
    fn test_toasts_replace_same_kind() {
        let mut surface = surface();
        surface.show_toast(Toast::success("one", None));
        surface.show_toast(Toast::offline());
        surface.show_toast(Toast::success("two", None));
        assert_eq!(surface.toasts().len(), 2);
        assert_eq!(surface.toasts()[1].message, "two");

        surface.dismiss_toast(ToastKind::Offline);
        assert_eq!(surface.toasts().len(), 1);
    }
}

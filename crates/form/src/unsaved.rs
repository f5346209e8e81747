//! Unsaved-changes guard
//!
//! Snapshots the form at bind time and keeps a dirty flag in sync with it.
//! While dirty, leaving the page (unload or an internal link) asks for
//! confirmation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::surface::Surface;

/// Prompt returned for the unload confirmation.
pub const UNLOAD_PROMPT: &str = "You have unsaved changes. Are you sure you want to leave?";

/// Prompt shown before following an internal link.
pub const LINK_PROMPT: &str = "You have unsaved changes. Are you sure you want to leave this page?";

/// A click on a link, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClick {
    /// The link's `href` attribute.
    pub href: String,
    /// The link sits inside the form (cancel buttons and the like).
    #[serde(default)]
    pub inside_form: bool,
    /// The link opts out with `data-no-warning`.
    #[serde(default)]
    pub no_warning: bool,
}

impl LinkClick {
    /// A plain link outside the form.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            inside_form: false,
            no_warning: false,
        }
    }

    /// Whether the link navigates within the application.
    pub fn is_internal(&self) -> bool {
        !self.href.is_empty()
            && !self.href.starts_with("http")
            && !self.href.starts_with("mailto")
            && !self.href.starts_with("tel")
    }
}

/// What to do with a link click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDecision {
    /// Let the navigation happen.
    Follow,
    /// Cancel the navigation.
    Stay,
}

fn value_in<'a>(data: &'a IndexMap<String, String>, key: &str) -> &'a str {
    data.get(key).map_or("", String::as_str)
}

/// Tracks whether the form differs from its state at bind time.
#[derive(Debug, Clone)]
pub struct UnsavedChangesGuard {
    snapshot: IndexMap<String, String>,
    dirty: bool,
}

impl UnsavedChangesGuard {
    /// Captures the current form data as the saved state.
    pub fn bind<S: Surface + ?Sized>(surface: &S) -> Self {
        let snapshot = surface.form_data();
        debug!(fields = snapshot.len(), "unsaved-changes snapshot captured");
        Self {
            snapshot,
            dirty: false,
        }
    }

    /// Whether the form has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes the dirty flag after an input or change event.
    ///
    /// A key missing on either side counts as an empty value.
    pub fn on_input<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let current = surface.form_data();

        self.dirty = current
            .iter()
            .any(|(key, value)| value != value_in(&self.snapshot, key))
            || self
                .snapshot
                .iter()
                .any(|(key, original)| original != value_in(&current, key));

        surface.set_unsaved_marker(self.dirty);
        self.dirty
    }

    /// The unload prompt while dirty.
    pub fn before_unload(&self) -> Option<&'static str> {
        self.dirty.then_some(UNLOAD_PROMPT)
    }

    /// Decides a link click, asking `confirm` for internal links while dirty.
    ///
    /// ```rust
    /// use diary_form::surface::{MemorySurface, Surface};
    /// use diary_form::unsaved::{LinkClick, LinkDecision, UnsavedChangesGuard};
    ///
    /// let mut surface = MemorySurface::new().with_field("journal", "");
    /// let mut guard = UnsavedChangesGuard::bind(&surface);
    ///
    /// let journal = surface.field("journal").unwrap();
    /// surface.set_value(journal, "Today I...");
    /// guard.on_input(&mut surface);
    ///
    /// let link = LinkClick::new("/entries");
    /// assert_eq!(guard.on_link_click(&link, |_| false), LinkDecision::Stay);
    /// assert_eq!(guard.on_link_click(&link, |_| true), LinkDecision::Follow);
    /// assert!(!guard.is_dirty());
    /// ```
    pub fn on_link_click(&mut self, link: &LinkClick, confirm: impl FnOnce(&str) -> bool) -> LinkDecision {
        if !self.dirty || link.inside_form || link.no_warning || !link.is_internal() {
            return LinkDecision::Follow;
        }

        if confirm(LINK_PROMPT) {
            self.dirty = false;
            LinkDecision::Follow
        } else {
            LinkDecision::Stay
        }
    }

    /// Submitting saves the changes.
    pub fn on_submit(&mut self) {
        self.dirty = false;
    }

    /// Drops the warning and the submit marker.
    pub fn clear_warning<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.dirty = false;
        surface.set_unsaved_marker(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use rstest::rstest;

    fn dirty_guard() -> (MemorySurface, UnsavedChangesGuard) {
        let mut surface = MemorySurface::from_fields([("title", "Monday"), ("journal", "")]);
        let mut guard = UnsavedChangesGuard::bind(&surface);
        let journal = surface.field("journal").unwrap();
        surface.set_value(journal, "x");
        assert!(guard.on_input(&mut surface));
        (surface, guard)
    }

    #[test]
    fn test_reverting_clears_dirty() {
        let (mut surface, mut guard) = dirty_guard();
        assert!(surface.unsaved_marker());
        assert_eq!(guard.before_unload(), Some(UNLOAD_PROMPT));

        let journal = surface.field("journal").unwrap();
        surface.set_value(journal, "");
        assert!(!guard.on_input(&mut surface));
        assert!(!surface.unsaved_marker());
        assert_eq!(guard.before_unload(), None);
    }

    #[test]
    fn test_submit_clears_without_touching_marker() {
        let (surface, mut guard) = dirty_guard();
        guard.on_submit();
        assert!(!guard.is_dirty());
        assert!(surface.unsaved_marker());
    }

    #[test]
    fn test_clear_warning_refreshes_marker() {
        let (mut surface, mut guard) = dirty_guard();
        guard.clear_warning(&mut surface);
        assert!(!guard.is_dirty());
        assert!(!surface.unsaved_marker());
    }

    #[rstest]
    #[case(LinkClick::new("https://example.com"))]
    #[case(LinkClick::new("mailto:me@example.com"))]
    #[case(LinkClick::new("tel:+15555550100"))]
    #[case(LinkClick { inside_form: true, ..LinkClick::new("/cancel") })]
    #[case(LinkClick { no_warning: true, ..LinkClick::new("/logout") })]
    fn test_links_that_never_prompt(#[case] link: LinkClick) {
        let (_, mut guard) = dirty_guard();
        let decision = guard.on_link_click(&link, |_| panic!("no prompt expected"));
        assert_eq!(decision, LinkDecision::Follow);
        assert!(guard.is_dirty());
    }

    #[test]
    fn test_internal_link_prompt_text() {
        let (_, mut guard) = dirty_guard();
        let mut asked = None;
        let decision = guard.on_link_click(&LinkClick::new("/history"), |prompt| {
            asked = Some(prompt.to_owned());
            false
        });
        assert_eq!(decision, LinkDecision::Stay);
        assert_eq!(asked.as_deref(), Some(LINK_PROMPT));
        assert!(guard.is_dirty());
    }

    #[test]
    fn test_clean_form_never_prompts() {
        let surface = MemorySurface::from_fields([("journal", "")]);
        let mut guard = UnsavedChangesGuard::bind(&surface);
        let decision = guard.on_link_click(&LinkClick::new("/history"), |_| panic!("no prompt expected"));
        assert_eq!(decision, LinkDecision::Follow);
    }
}

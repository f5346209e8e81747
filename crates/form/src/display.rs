//! Error presentation seam
//!
//! Every component that needs to show a problem to the user goes through
//! [`ErrorDisplay`]: inline field errors, the valid highlight, focusing the
//! first invalid field, and toasts. Hosts implement it next to their
//! [`Surface`](crate::surface::Surface).

use std::time::Duration;

use diary_validator::ErrorSeverity;
use serde::{Deserialize, Serialize};

use crate::surface::FieldId;

/// How long a success toast stays up unless told otherwise.
pub const SUCCESS_TOAST_DURATION: Duration = Duration::from_secs(3);

/// Message of the persistent offline notice.
pub const OFFLINE_MESSAGE: &str = "You appear to be offline";

/// Message shown when connectivity comes back.
pub const RECONNECTED_MESSAGE: &str = "Connection restored";

/// Which errors [`ErrorDisplay::clear_errors`] removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// A single field.
    Field(FieldId),
    /// Every inline error in the document.
    Document,
}

/// Toast category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    /// Positive confirmation.
    Success,
    /// The persistent connectivity notice.
    Offline,
}

/// A transient or persistent notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Category; at most one toast per kind is shown.
    pub kind: ToastKind,
    /// Text shown to the user.
    pub message: String,
    /// Auto-dismiss delay; `None` stays until dismissed.
    #[serde(with = "duration_ms")]
    pub duration: Option<Duration>,
}

impl Toast {
    /// A success toast dismissed after `duration` (default three seconds).
    pub fn success(message: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            duration: Some(duration.unwrap_or(SUCCESS_TOAST_DURATION)),
        }
    }

    /// The persistent offline notice.
    pub fn offline() -> Self {
        Self {
            kind: ToastKind::Offline,
            message: OFFLINE_MESSAGE.to_owned(),
            duration: None,
        }
    }
}

/// Host-side error presentation.
pub trait ErrorDisplay {
    /// Shows `message` next to `field` and marks it invalid.
    fn show_field_error(&mut self, field: FieldId, message: &str, severity: ErrorSeverity);

    /// Removes the inline error and invalid marking from `field`.
    fn clear_field_error(&mut self, field: FieldId);

    /// Removes inline errors in `scope`.
    fn clear_errors(&mut self, scope: ErrorScope);

    /// Removes invalid styling; a non-empty field gets a brief valid highlight,
    /// which the host removes after a couple of seconds.
    fn mark_valid(&mut self, field: FieldId);

    /// Whether `field` currently shows an error.
    fn is_invalid(&self, field: FieldId) -> bool;

    /// Focuses the first invalid field in document order and scrolls it into
    /// view.
    fn focus_first_invalid(&mut self) -> Option<FieldId>;

    /// Shows a toast, replacing any toast of the same kind.
    fn show_toast(&mut self, toast: Toast);

    /// Removes the toast of `kind`, if shown.
    fn dismiss_toast(&mut self, kind: ToastKind);
}

/// Shows a success toast.
pub fn show_success_message<D: ErrorDisplay + ?Sized>(
    display: &mut D,
    message: &str,
    duration: Option<Duration>,
) {
    display.show_toast(Toast::success(message, duration));
}

/// Tracks online/offline transitions and the matching notices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Connectivity {
    offline: bool,
}

impl Connectivity {
    /// Whether the last transition was to offline.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Shows the persistent offline notice.
    pub fn on_offline<D: ErrorDisplay + ?Sized>(&mut self, display: &mut D) {
        self.offline = true;
        display.show_toast(Toast::offline());
        tracing::warn!("connection lost");
    }

    /// Removes the offline notice and confirms the reconnection.
    pub fn on_online<D: ErrorDisplay + ?Sized>(&mut self, display: &mut D) {
        self.offline = false;
        display.dismiss_toast(ToastKind::Offline);
        show_success_message(display, RECONNECTED_MESSAGE, None);
        tracing::info!("connection restored");
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

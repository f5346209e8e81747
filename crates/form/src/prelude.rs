//! Common imports for hosts.

pub use crate::config::PageConfig;
pub use crate::counter::{CounterBand, CounterView, KeyPress, LimitClass, LimitConfig};
pub use crate::display::{Connectivity, ErrorDisplay, ErrorScope, Toast, ToastKind};
pub use crate::engine::{SubmitOutcome, ValidationEngine};
pub use crate::error::{FormError, FormResult};
pub use crate::page::{EventOutcome, Page, UiEvent};
pub use crate::surface::{FieldId, MemorySurface, Surface, Transition};
pub use crate::unsaved::{LinkClick, LinkDecision, UnsavedChangesGuard};

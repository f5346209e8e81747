//! Core validation types and traits
//!
//! - **Traits**: [`Validate`]
//! - **Errors**: [`ValidationError`], [`ErrorSeverity`]
//!
//! Validators are generic over their input type. Every rule in this crate
//! validates `str`, the raw value of a form field:
//!
//! ```rust
//! use diary_validator::foundation::{Validate, ValidationError};
//!
//! struct NoTabs;
//!
//! impl Validate for NoTabs {
//!     type Input = str;
//!
//!     fn validate(&self, input: &str) -> Result<(), ValidationError> {
//!         if input.contains('\t') {
//!             Err(ValidationError::new("no_tabs", "Tabs are not allowed"))
//!         } else {
//!             Ok(())
//!         }
//!     }
//! }
//!
//! assert!(NoTabs.validate("hello").is_ok());
//! ```

pub mod error;
pub mod traits;

pub use error::{ErrorSeverity, ValidationError};
pub use traits::Validate;

//! Built-in validators backing the declarative rule types.
//!
//! Length, range and format checks treat an empty value as passing: a
//! missing value is solely a [`Required`] concern.

mod format;
mod length;
mod presence;
mod range;

pub use format::{Email, Format, email};
pub use length::{MaxLength, MinLength, max_length, min_length};
pub use presence::{Required, required};
pub use range::{NumericRange, numeric_range, parse_leading_float};

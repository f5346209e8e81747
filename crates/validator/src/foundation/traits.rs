//! Core traits for the validation system

use crate::foundation::ValidationError;

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// The core trait that all validators implement.
///
/// `Input` may be unsized so that `str` can be validated without copying.
pub trait Validate {
    /// The type of input being validated.
    type Input: ?Sized;

    /// Validates the input value.
    ///
    /// Returns `Ok(())` when the input passes and the failure otherwise.
    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError>;

    /// Returns `true` if the input passes.
    fn is_valid(&self, input: &Self::Input) -> bool {
        self.validate(input).is_ok()
    }
}

impl<V: Validate + ?Sized> Validate for &V {
    type Input = V::Input;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        (**self).validate(input)
    }
}

impl<V: Validate + ?Sized> Validate for Box<V> {
    type Input = V::Input;

    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError> {
        (**self).validate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysValid;

    impl Validate for AlwaysValid {
        type Input = str;

        fn validate(&self, _input: &Self::Input) -> Result<(), ValidationError> {
            Ok(())
        }
    }

    struct AlwaysFails;

    impl Validate for AlwaysFails {
        type Input = str;

        fn validate(&self, _input: &Self::Input) -> Result<(), ValidationError> {
            Err(ValidationError::new("always_fails", "Always fails"))
        }
    }

    #[test]
    fn test_is_valid_follows_validate() {
        assert!(AlwaysValid.is_valid("x"));
        assert!(!AlwaysFails.is_valid("x"));
    }

    #[test]
    fn test_boxed_dyn_validator() {
        let boxed: Box<dyn Validate<Input = str>> = Box::new(AlwaysValid);
        assert!(boxed.validate("x").is_ok());
    }
}

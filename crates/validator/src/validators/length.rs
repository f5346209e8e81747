//! String length validators
//!
//! Length is measured in Unicode scalar values (chars), the same unit the
//! character counters use.

use crate::foundation::ValidationError;

crate::validator! {
    /// Validates that a non-empty string has at least `min` chars.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize } for str;
    rule(self, input) { input.is_empty() || input.chars().count() >= self.min }
    error(self, input) { ValidationError::min_length(self.min, input.chars().count()) }
    fn min_length(min: usize);
}

crate::validator! {
    /// Validates that a non-empty string has at most `max` chars.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize } for str;
    rule(self, input) { input.is_empty() || input.chars().count() <= self.max }
    error(self, input) { ValidationError::max_length(self.max, input.chars().count()) }
    fn max_length(max: usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("ab", false)]
    #[case("abc", true)]
    #[case("héllo", true)]
    fn test_min_length(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(min_length(3).validate(input).is_ok(), ok);
    }

    #[rstest]
    #[case("", true)]
    #[case("abc", true)]
    #[case("abcd", false)]
    #[case("äöü", true)]
    fn test_max_length(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(max_length(3).validate(input).is_ok(), ok);
    }

    #[test]
    fn test_error_params() {
        let err = min_length(5).validate("abc").unwrap_err();
        assert_eq!(err.code, "min_length");
        assert_eq!(err.param("min"), Some("5"));
        assert_eq!(err.param("actual"), Some("3"));
    }
}

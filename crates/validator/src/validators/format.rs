//! Format validators

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::foundation::{Validate, ValidationError};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Named formats a `format` rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// `local@domain.tld`
    Email,
}

impl Format {
    /// Configuration name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
        }
    }

    /// Checks `input` against this format. Empty values pass.
    pub fn check(self, input: &str) -> Result<(), ValidationError> {
        match self {
            Self::Email => Email.validate(input),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

crate::validator! {
    /// Validates a simple `local@domain.tld` shape on non-empty values.
    pub Email for str;
    rule(input) { input.is_empty() || EMAIL_REGEX.is_match(input) }
    error(input) { ValidationError::invalid_format("email") }
    fn email();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", true)]
    #[case("me@example.com", true)]
    #[case("a.b+c@sub.example.co.uk", true)]
    #[case("me@example", false)]
    #[case("me example@x.io", false)]
    #[case("@example.com", false)]
    #[case("me@@example.com", false)]
    fn test_email(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(email().validate(input).is_ok(), ok);
    }

    #[test]
    fn test_format_check_dispatches() {
        let err = Format::Email.check("nope").unwrap_err();
        assert_eq!(err.code, "format");
        assert_eq!(err.param("expected"), Some("email"));
    }
}

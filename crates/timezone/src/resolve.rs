//! Priority resolution

/// The last-resort zone.
pub const UTC: &str = "UTC";

/// Picks the zone entries are dated in.
///
/// A non-empty `preference` wins; otherwise the detected zone when
/// auto-detection is on; otherwise [`UTC`].
pub fn effective_timezone<'a>(
    preference: Option<&'a str>,
    auto_detect: bool,
    detected: Option<&'a str>,
) -> &'a str {
    let non_empty = |zone: &&str| !zone.trim().is_empty();

    preference
        .filter(non_empty)
        .or_else(|| detected.filter(|_| auto_detect).filter(non_empty))
        .unwrap_or(UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Asia/Tokyo"), true, Some("Europe/Berlin"), "Asia/Tokyo")]
    #[case(Some("Asia/Tokyo"), false, None, "Asia/Tokyo")]
    #[case(None, true, Some("Europe/Berlin"), "Europe/Berlin")]
    #[case(Some(""), true, Some("Europe/Berlin"), "Europe/Berlin")]
    #[case(None, false, Some("Europe/Berlin"), "UTC")]
    #[case(None, true, None, "UTC")]
    fn test_priority_chain(
        #[case] preference: Option<&str>,
        #[case] auto_detect: bool,
        #[case] detected: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(effective_timezone(preference, auto_detect, detected), expected);
    }
}

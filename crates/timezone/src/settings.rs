//! User timezone settings as rendered into the page

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The signed-in user's stored timezone settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserTimezoneSettings {
    /// Manual preference, if the user picked one.
    pub user_timezone: Option<String>,
    /// Whether the detected zone may be used and reported.
    pub timezone_auto_detect: bool,
    /// Zone detected on a previous visit.
    pub last_detected_timezone: Option<String>,
}

impl Default for UserTimezoneSettings {
    fn default() -> Self {
        Self {
            user_timezone: None,
            timezone_auto_detect: true,
            last_detected_timezone: None,
        }
    }
}

impl UserTimezoneSettings {
    /// Reads the `data-*` attributes of the settings element.
    ///
    /// Empty values count as absent, and only the literal `"false"` turns
    /// auto-detection off.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use diary_timezone::UserTimezoneSettings;
    ///
    /// let attrs = HashMap::from([
    ///     ("data-user-timezone".to_owned(), "".to_owned()),
    ///     ("data-timezone-auto-detect".to_owned(), "False".to_owned()),
    /// ]);
    /// let settings = UserTimezoneSettings::from_data_attributes(&attrs);
    /// assert_eq!(settings.user_timezone, None);
    /// assert!(settings.timezone_auto_detect);
    /// ```
    pub fn from_data_attributes(attrs: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| attrs.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            user_timezone: non_empty("data-user-timezone"),
            timezone_auto_detect: attrs
                .get("data-timezone-auto-detect")
                .is_none_or(|v| v.as_str() != "false"),
            last_detected_timezone: non_empty("data-last-detected-timezone"),
        }
    }
}

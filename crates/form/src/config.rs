//! Page configuration
//!
//! Everything a page binds is described by a [`PageConfig`], loadable from
//! TOML or JSON. The defaults describe the daily entry form.
//!
//! ```toml
//! locale = "de-DE"
//! debounce_ms = 250
//!
//! [groups]
//! success = ["success_1", "success_2", "success_3"]
//!
//! [limits.journal]
//! max_length = 8000
//!
//! [[rules.success_1]]
//! type = "required"
//! value = true
//! message = "Please share at least one success from today"
//! trigger = "blur"
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use diary_validator::{Rule, RuleKind, Trigger};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::counter::LimitConfig;
use crate::error::{FormError, FormResult};
use crate::progressive::DEFAULT_MIN_TRIGGER;
use crate::title;

/// Configuration of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Identifier of the form the page binds.
    pub form: String,
    /// Locale for titles and number grouping.
    pub locale: String,
    /// Debounce window for input-driven work.
    pub debounce_ms: u64,
    /// Trimmed length that reveals the next field of a group.
    pub min_trigger_length: usize,
    /// Progressive groups, in order.
    pub groups: IndexMap<String, Vec<String>>,
    /// Character limits per field.
    #[serde(alias = "characterLimits")]
    pub limits: IndexMap<String, LimitConfig>,
    /// Validation rules per field, in declaration order.
    pub rules: IndexMap<String, Vec<Rule>>,
    /// Whether the unsaved-changes guard is bound.
    pub track_unsaved: bool,
    /// Whether an empty title is filled from the date.
    pub auto_title: bool,
}

const EMOTION_GROUPS: [(&str, &str); 3] = [
    ("success", "Success highlights"),
    ("gratitude", "Gratitude entries"),
    ("anxiety", "Challenge entries"),
];

const EMOTION_FIELD_LIMIT: usize = 255;

impl Default for PageConfig {
    fn default() -> Self {
        let mut groups = IndexMap::new();
        let mut limits = IndexMap::new();
        let mut rules: IndexMap<String, Vec<Rule>> = IndexMap::new();

        for (group, label) in EMOTION_GROUPS {
            let fields: Vec<String> = (1..=3).map(|i| format!("{group}_{i}")).collect();
            for field in &fields {
                limits.insert(field.clone(), LimitConfig::new(EMOTION_FIELD_LIMIT));
                rules.entry(field.clone()).or_default().push(Rule::new(
                    RuleKind::MaxLength(EMOTION_FIELD_LIMIT),
                    format!("{label} should be 255 characters or less"),
                    Trigger::Input,
                ));
            }
            groups.insert(group.to_owned(), fields);
        }

        let required = [
            ("success_1", "Please share at least one success from today"),
            ("gratitude_1", "Please share at least one thing you're grateful for"),
            (
                "anxiety_1",
                "Please share at least one challenge or worry (this helps with processing)",
            ),
        ];
        for (field, message) in required {
            if let Some(field_rules) = rules.get_mut(field) {
                field_rules.insert(0, Rule::new(RuleKind::Required(true), message, Trigger::Blur));
            }
        }

        limits.insert("journal".to_owned(), LimitConfig::new(8000));
        limits.insert(title::TITLE_FIELD.to_owned(), LimitConfig::new(100));
        rules.insert(
            "journal".to_owned(),
            vec![Rule::new(
                RuleKind::MaxLength(8000),
                "Daily journal should be 8,000 characters or less",
                Trigger::Input,
            )],
        );
        rules.insert(
            "score".to_owned(),
            vec![Rule::new(
                RuleKind::Range { low: 1.0, high: 5.0 },
                "Please rate your day from 1 to 5",
                Trigger::Change,
            )],
        );

        Self {
            form: "entry-form".to_owned(),
            locale: title::FALLBACK_LOCALE.to_owned(),
            debounce_ms: 300,
            min_trigger_length: DEFAULT_MIN_TRIGGER,
            groups,
            limits,
            rules,
            track_unsaved: true,
            auto_title: true,
        }
    }
}

impl PageConfig {
    /// Login/registration form: email and password checks on blur.
    pub fn auth_form() -> Self {
        let mut rules = IndexMap::new();
        rules.insert(
            "email".to_owned(),
            vec![
                Rule::new(RuleKind::Required(true), "Email address is required", Trigger::Blur),
                Rule::new(
                    RuleKind::Format(diary_validator::validators::Format::Email),
                    "Please enter a valid email address",
                    Trigger::Blur,
                ),
            ],
        );
        rules.insert(
            "password".to_owned(),
            vec![
                Rule::new(RuleKind::Required(true), "Password is required", Trigger::Blur),
                Rule::new(
                    RuleKind::MinLength(8),
                    "Password must be at least 8 characters long",
                    Trigger::Blur,
                ),
            ],
        );

        Self {
            form: "auth-form".to_owned(),
            groups: IndexMap::new(),
            limits: IndexMap::new(),
            rules,
            track_unsaved: false,
            auto_title: false,
            ..Self::default()
        }
    }

    /// Debounce window.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> FormResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| FormError::Parse {
            format: "toml",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(input: &str) -> FormResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| FormError::Parse {
            format: "json",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| FormError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&input),
            Some("json") => Self::from_json_str(&input),
            _ => Err(FormError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Checks limits and groups; an unknown locale only warns since titles
    /// fall back.
    pub fn validate(&self) -> FormResult<()> {
        for (field, limit) in &self.limits {
            limit.validate(field)?;
        }

        for (group, fields) in &self.groups {
            let mut seen = HashSet::new();
            if let Some(dup) = fields.iter().find(|f| !seen.insert(f.as_str())) {
                return Err(FormError::InvalidGroup {
                    group: group.clone(),
                    reason: format!("field '{dup}' listed twice"),
                });
            }
        }

        if let Err(error) = title::resolve_locale(&self.locale) {
            warn!(locale = %self.locale, %error, "locale not recognised, titles will use the fallback");
        }

        Ok(())
    }
}

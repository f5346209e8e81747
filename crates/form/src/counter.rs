//! Character-limit counters
//!
//! A counter stays hidden until a field is close to its limit, then shows
//! `current / max` in one of three bands. Keystrokes that would grow a full
//! field are rejected, and anything longer than the limit (a paste, a host
//! setting the value directly) is truncated.

use indexmap::IndexMap;
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FormError, FormResult};
use crate::surface::{FieldId, Surface};

// ============================================================================
// CONFIG
// ============================================================================

/// Limit and thresholds for one field.
///
/// Thresholds are fractions of `max_length`. The client-side shape is also
/// accepted, where `showCounterAt` is a character count rather than a
/// fraction:
///
/// ```rust
/// use diary_form::counter::LimitConfig;
///
/// let limit: LimitConfig = serde_json::from_str(r#"{"maxLength": 200, "showCounterAt": 150}"#).unwrap();
/// assert_eq!(limit.show_counter_at, 0.75);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLimitConfig")]
pub struct LimitConfig {
    /// Hard limit in characters.
    pub max_length: usize,
    /// Fraction at which the counter appears.
    pub show_counter_at: f64,
    /// Fraction at which the counter turns to a warning.
    pub warning_threshold: f64,
    /// Fraction at which the counter turns to an error.
    pub highlight_threshold: f64,
}

/// Wire shape of a limit. `show_counter_at` wins over `showCounterAt`.
#[derive(Deserialize)]
struct RawLimitConfig {
    #[serde(alias = "maxLength")]
    max_length: usize,
    #[serde(default)]
    show_counter_at: Option<f64>,
    #[serde(default, rename = "showCounterAt")]
    show_counter_chars: Option<f64>,
    #[serde(default = "default_warning", alias = "warningThreshold")]
    warning_threshold: f64,
    #[serde(default = "default_highlight", alias = "highlightThreshold")]
    highlight_threshold: f64,
}

impl From<RawLimitConfig> for LimitConfig {
    fn from(raw: RawLimitConfig) -> Self {
        let show_counter_at = raw
            .show_counter_at
            .or_else(|| raw.show_counter_chars.map(|chars| chars / raw.max_length as f64))
            .unwrap_or_else(default_show_at);

        Self {
            max_length: raw.max_length,
            show_counter_at,
            warning_threshold: raw.warning_threshold,
            highlight_threshold: raw.highlight_threshold,
        }
    }
}

const fn default_show_at() -> f64 {
    0.85
}

const fn default_warning() -> f64 {
    0.90
}

const fn default_highlight() -> f64 {
    0.95
}

impl LimitConfig {
    /// A limit with the default thresholds.
    pub const fn new(max_length: usize) -> Self {
        Self {
            max_length,
            show_counter_at: default_show_at(),
            warning_threshold: default_warning(),
            highlight_threshold: default_highlight(),
        }
    }

    /// Checks that the limit is positive and thresholds ascend within `(0, 1]`.
    pub fn validate(&self, field: &str) -> FormResult<()> {
        let invalid = |reason: String| FormError::InvalidLimit {
            field: field.to_owned(),
            reason,
        };

        if self.max_length == 0 {
            return Err(invalid("max_length must be positive".into()));
        }
        for (name, value) in [
            ("show_counter_at", self.show_counter_at),
            ("warning_threshold", self.warning_threshold),
            ("highlight_threshold", self.highlight_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} must be in (0, 1], got {value}")));
            }
        }
        if self.show_counter_at > self.warning_threshold
            || self.warning_threshold > self.highlight_threshold
        {
            return Err(invalid(
                "thresholds must satisfy show_counter_at <= warning_threshold <= highlight_threshold"
                    .into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// VIEW
// ============================================================================

/// Severity band of a visible counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterBand {
    /// Close to the limit.
    Info,
    /// Past the warning threshold.
    Warning,
    /// Past the highlight threshold or at the limit.
    Error,
}

impl CounterBand {
    /// Styling class applied to the field for this band.
    pub const fn limit_class(self) -> LimitClass {
        match self {
            Self::Info => LimitClass::ApproachingLimit,
            Self::Warning => LimitClass::NearLimit,
            Self::Error => LimitClass::AtLimit,
        }
    }
}

/// Field styling class while a counter is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitClass {
    /// `approaching-limit`
    ApproachingLimit,
    /// `near-limit`
    NearLimit,
    /// `at-limit`
    AtLimit,
}

impl LimitClass {
    /// CSS class name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApproachingLimit => "approaching-limit",
            Self::NearLimit => "near-limit",
            Self::AtLimit => "at-limit",
        }
    }
}

/// What a visible counter shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    /// Current length in characters.
    pub current: usize,
    /// The limit.
    pub max: usize,
    /// Severity band.
    pub band: CounterBand,
    /// Characters left, shown from the warning threshold on.
    pub remaining: Option<usize>,
    /// Rendered text, e.g. `"7,650 / 8,000 (350 remaining)"`.
    pub text: String,
    /// Accessibility label.
    pub aria_label: &'static str,
}

impl CounterView {
    /// Computes the counter for `length` characters, `None` when hidden.
    ///
    /// ```rust
    /// use diary_form::counter::{CounterBand, CounterView, LimitConfig};
    /// use num_format::Locale;
    ///
    /// let limit = LimitConfig::new(8000);
    /// assert!(CounterView::evaluate(6799, &limit, &Locale::en).is_none());
    ///
    /// let view = CounterView::evaluate(7650, &limit, &Locale::en).unwrap();
    /// assert_eq!(view.band, CounterBand::Error);
    /// assert_eq!(view.text, "7,650 / 8,000 (350 remaining)");
    /// ```
    pub fn evaluate(length: usize, config: &LimitConfig, locale: &Locale) -> Option<Self> {
        let max = config.max_length;
        let at_limit = length >= max;
        let ratio = length as f64 / max as f64;

        if !at_limit && ratio < config.show_counter_at {
            return None;
        }

        let band = if at_limit || ratio >= config.highlight_threshold {
            CounterBand::Error
        } else if ratio >= config.warning_threshold {
            CounterBand::Warning
        } else {
            CounterBand::Info
        };

        let aria_label = match band {
            CounterBand::Info => "Character count",
            CounterBand::Warning => "Character limit warning",
            CounterBand::Error if at_limit => "Character limit reached",
            CounterBand::Error => "Approaching character limit",
        };

        let remaining = (band >= CounterBand::Warning).then(|| max.saturating_sub(length));

        let mut text = format!(
            "{} / {}",
            length.to_formatted_string(locale),
            max.to_formatted_string(locale)
        );
        if let Some(remaining) = remaining {
            text.push_str(&format!(" ({} remaining)", remaining.to_formatted_string(locale)));
        }

        Some(Self {
            current: length,
            max,
            band,
            remaining,
            text,
            aria_label,
        })
    }
}

/// Resolves a BCP-47 or POSIX tag to a number-grouping locale.
///
/// Falls back to the bare language, then to English.
pub fn number_locale(tag: &str) -> Locale {
    let tag = tag.replace('_', "-");
    Locale::from_name(&tag)
        .or_else(|_| Locale::from_name(tag.split('-').next().unwrap_or_default()))
        .unwrap_or(Locale::en)
}

// ============================================================================
// KEYSTROKES
// ============================================================================

/// A key press as reported by the host (`KeyboardEvent.key` naming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key name (`"a"`, `"Backspace"`, `"ArrowLeft"`, ...).
    pub key: String,
    /// Whether Ctrl was held.
    #[serde(default)]
    pub ctrl: bool,
}

impl KeyPress {
    /// A plain key press.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
        }
    }

    /// The same key with Ctrl held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    fn is_editing_key(&self) -> bool {
        matches!(
            self.key.as_str(),
            "Backspace"
                | "Tab"
                | "Escape"
                | "Enter"
                | "ArrowLeft"
                | "ArrowUp"
                | "ArrowRight"
                | "ArrowDown"
                | "Delete"
        )
    }

    fn is_clipboard_shortcut(&self) -> bool {
        self.ctrl && matches!(self.key.to_ascii_lowercase().as_str(), "a" | "c" | "v" | "x" | "z")
    }
}

/// Whether `press` may go through on a field holding `length` of `max` chars.
pub fn allows_keystroke(length: usize, max: usize, press: &KeyPress) -> bool {
    press.is_editing_key() || press.is_clipboard_shortcut() || length < max
}

// ============================================================================
// COUNTERS
// ============================================================================

/// A counter bound to one field.
#[derive(Debug, Clone)]
pub struct CharacterCounter {
    field: FieldId,
    name: String,
    config: LimitConfig,
}

impl CharacterCounter {
    /// Binds to `name`; `None` when the surface has no such field.
    pub fn bind<S: Surface + ?Sized>(name: &str, config: LimitConfig, surface: &S) -> Option<Self> {
        let field = surface.field(name)?;
        Some(Self {
            field,
            name: name.to_owned(),
            config,
        })
    }

    /// The bound field.
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The limit.
    pub fn config(&self) -> &LimitConfig {
        &self.config
    }

    /// Renders the counter and field class for the current value.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, locale: &Locale) -> Option<CounterView> {
        let length = surface.value(self.field).chars().count();
        let view = CounterView::evaluate(length, &self.config, locale);
        surface.render_counter(self.field, view.as_ref());
        surface.set_limit_class(self.field, view.as_ref().map(|v| v.band.limit_class()));
        view
    }

    /// Hides the counter and drops the field class.
    pub fn hide<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.render_counter(self.field, None);
        surface.set_limit_class(self.field, None);
    }

    /// Truncates an over-long value to the limit; `true` if it did.
    pub fn enforce_limit<S: Surface + ?Sized>(&self, surface: &mut S) -> bool {
        let value = surface.value(self.field);
        let max = self.config.max_length;
        match value.char_indices().nth(max) {
            Some((cut, _)) => {
                let truncated = value[..cut].to_owned();
                debug!(field = %self.name, max, "value truncated to limit");
                surface.set_value(self.field, &truncated);
                true
            }
            None => false,
        }
    }

    /// Whether `press` may go through.
    pub fn allows<S: Surface + ?Sized>(&self, surface: &S, press: &KeyPress) -> bool {
        let length = surface.value(self.field).chars().count();
        allows_keystroke(length, self.config.max_length, press)
    }
}

/// All configured counters of a page.
#[derive(Debug, Clone)]
pub struct CounterSet {
    counters: Vec<CharacterCounter>,
    locale: Locale,
}

impl CounterSet {
    /// Binds every configured limit and renders the initial state.
    ///
    /// Fields missing from the surface are skipped.
    pub fn bind<S: Surface + ?Sized>(
        limits: &IndexMap<String, LimitConfig>,
        locale: &str,
        surface: &mut S,
    ) -> Self {
        let locale = number_locale(locale);
        let counters: Vec<_> = limits
            .iter()
            .filter_map(|(name, config)| {
                let counter = CharacterCounter::bind(name, *config, surface);
                if counter.is_none() {
                    debug!(field = %name, "no field for character limit, skipping");
                }
                counter
            })
            .collect();

        for counter in &counters {
            counter.render(surface, &locale);
        }

        Self { counters, locale }
    }

    /// Counter for `field`, if any.
    pub fn get(&self, field: FieldId) -> Option<&CharacterCounter> {
        self.counters.iter().find(|c| c.field == field)
    }

    /// Bound counters.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterCounter> {
        self.counters.iter()
    }

    /// Number of bound counters.
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    /// `true` when no counter is bound.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Enforces the limit and re-renders; `true` when the value was truncated
    /// and listeners need to see the input again.
    pub fn on_input<S: Surface + ?Sized>(&self, field: FieldId, surface: &mut S) -> bool {
        let Some(counter) = self.get(field) else {
            return false;
        };
        let truncated = counter.enforce_limit(surface);
        counter.render(surface, &self.locale);
        truncated
    }

    /// Keystroke gate; fields without a counter accept everything.
    pub fn on_keydown<S: Surface + ?Sized>(&self, field: FieldId, press: &KeyPress, surface: &S) -> bool {
        self.get(field).is_none_or(|c| c.allows(surface, press))
    }

    /// Hides every counter.
    pub fn reset<S: Surface + ?Sized>(&self, surface: &mut S) {
        for counter in &self.counters {
            counter.hide(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(84, None)]
    #[case(85, Some(CounterBand::Info))]
    #[case(89, Some(CounterBand::Info))]
    #[case(90, Some(CounterBand::Warning))]
    #[case(94, Some(CounterBand::Warning))]
    #[case(95, Some(CounterBand::Error))]
    #[case(100, Some(CounterBand::Error))]
    fn test_bands_for_max_100(#[case] length: usize, #[case] band: Option<CounterBand>) {
        let view = CounterView::evaluate(length, &LimitConfig::new(100), &Locale::en);
        assert_eq!(view.map(|v| v.band), band);
    }

    #[test]
    fn test_labels_and_remaining() {
        let limit = LimitConfig::new(100);
        let info = CounterView::evaluate(85, &limit, &Locale::en).unwrap();
        assert_eq!(info.text, "85 / 100");
        assert_eq!(info.remaining, None);
        assert_eq!(info.aria_label, "Character count");

        let warning = CounterView::evaluate(92, &limit, &Locale::en).unwrap();
        assert_eq!(warning.text, "92 / 100 (8 remaining)");
        assert_eq!(warning.aria_label, "Character limit warning");

        let near = CounterView::evaluate(97, &limit, &Locale::en).unwrap();
        assert_eq!(near.aria_label, "Approaching character limit");

        let full = CounterView::evaluate(100, &limit, &Locale::en).unwrap();
        assert_eq!(full.text, "100 / 100 (0 remaining)");
        assert_eq!(full.aria_label, "Character limit reached");
    }

    #[test]
    fn test_grouping_follows_locale() {
        let view = CounterView::evaluate(7200, &LimitConfig::new(8000), &number_locale("de-DE")).unwrap();
        assert_eq!(view.text, "7.200 / 8.000 (800 remaining)");
        assert_eq!(number_locale("xx-YY"), Locale::en);
    }

    #[rstest]
    #[case("a", false, 100, false)]
    #[case("a", false, 99, true)]
    #[case("Backspace", false, 100, true)]
    #[case("ArrowLeft", false, 100, true)]
    #[case("Delete", false, 120, true)]
    #[case("v", true, 100, true)]
    #[case("Z", true, 100, true)]
    #[case("b", true, 100, false)]
    fn test_keystroke_gate(
        #[case] key: &str,
        #[case] ctrl: bool,
        #[case] length: usize,
        #[case] allowed: bool,
    ) {
        let press = KeyPress { key: key.into(), ctrl };
        assert_eq!(allows_keystroke(length, 100, &press), allowed);
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        assert!(LimitConfig::new(10).validate("f").is_ok());
        assert!(LimitConfig::new(0).validate("f").is_err());
        let inverted = LimitConfig {
            warning_threshold: 0.99,
            ..LimitConfig::new(10)
        };
        assert!(inverted.validate("f").is_err());
        let over = LimitConfig {
            highlight_threshold: 1.5,
            ..LimitConfig::new(10)
        };
        assert!(over.validate("f").is_err());
    }

    #[test]
    fn test_limit_config_accepts_client_shape() {
        let config: LimitConfig = serde_json::from_str(
            r#"{"maxLength": 255, "warningThreshold": 0.9, "highlightThreshold": 0.95}"#,
        )
        .unwrap();
        assert_eq!(config, LimitConfig::new(255));
    }

    #[rstest]
    #[case(84, None)]
    #[case(85, Some(CounterBand::Info))]
    #[case(96, Some(CounterBand::Error))]
    fn test_show_counter_at_as_char_count(#[case] length: usize, #[case] band: Option<CounterBand>) {
        let config: LimitConfig = serde_json::from_str(
            r#"{"maxLength": 100, "showCounterAt": 85, "warningThreshold": 0.9, "highlightThreshold": 0.95}"#,
        )
        .unwrap();
        config.validate("journal").unwrap();
        assert_eq!(config.show_counter_at, 0.85);

        let view = CounterView::evaluate(length, &config, &Locale::en);
        assert_eq!(view.map(|v| v.band), band);
    }

    #[test]
    fn test_fraction_key_wins_over_char_count() {
        let config: LimitConfig =
            serde_json::from_str(r#"{"max_length": 100, "show_counter_at": 0.5, "showCounterAt": 85}"#)
                .unwrap();
        assert_eq!(config.show_counter_at, 0.5);

        let config: LimitConfig = toml::from_str("max_length = 40").unwrap();
        assert_eq!(config, LimitConfig::new(40));
    }

    #[test]
    fn test_enforce_truncates_by_chars() {
        let mut surface = MemorySurface::new().with_field("title", "héllo wörld");
        let counter = CharacterCounter::bind("title", LimitConfig::new(7), &surface).unwrap();
        assert!(counter.enforce_limit(&mut surface));
        assert_eq!(surface.value_of("title"), Some("héllo w"));
        assert!(!counter.enforce_limit(&mut surface));
    }

    #[test]
    fn test_set_renders_initial_state_and_resets() {
        let mut limits = IndexMap::new();
        limits.insert("title".to_owned(), LimitConfig::new(10));
        limits.insert("missing".to_owned(), LimitConfig::new(10));
        let mut surface = MemorySurface::new().with_field("title", "123456789");

        let set = CounterSet::bind(&limits, "en-US", &mut surface);
        assert_eq!(set.len(), 1);
        let field = surface.field_state("title").unwrap();
        assert_eq!(field.counter.as_ref().map(|c| c.band), Some(CounterBand::Warning));
        assert_eq!(field.limit_class, Some(LimitClass::NearLimit));

        set.reset(&mut surface);
        let field = surface.field_state("title").unwrap();
        assert!(field.counter.is_none());
        assert!(field.limit_class.is_none());
        assert_eq!(field.value, "123456789");
    }

    proptest! {
        #[test]
        fn prop_hidden_below_show_threshold(max in 1usize..10_000, frac in 0.0f64..0.85) {
            let length = (max as f64 * frac) as usize;
            prop_assume!((length as f64 / max as f64) < 0.85 && length < max);
            prop_assert!(CounterView::evaluate(length, &LimitConfig::new(max), &Locale::en).is_none());
        }

        #[test]
        fn prop_band_monotonic_in_length(max in 1usize..2_000, a in 0usize..2_500, b in 0usize..2_500) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let limit = LimitConfig::new(max);
            let band = |n| CounterView::evaluate(n, &limit, &Locale::en).map(|v| v.band);
            prop_assert!(band(lo) <= band(hi));
        }

        #[test]
        fn prop_at_or_over_limit_is_error(max in 1usize..2_000, extra in 0usize..100) {
            let view = CounterView::evaluate(max + extra, &LimitConfig::new(max), &Locale::en);
            prop_assert_eq!(view.map(|v| v.band), Some(CounterBand::Error));
        }
    }
}

//! Entry titles from dates
//!
//! A new entry's title defaults to its date written out long-form in the
//! user's locale: `October 18, 2026`, `18. Oktober 2026`, `2026年10月18日`.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use crate::error::{FormError, FormResult};
use crate::surface::Surface;

/// Locale used when the requested one cannot be resolved.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Placeholder put on an auto-filled title field.
pub const TITLE_PLACEHOLDER: &str = "Enter custom title or keep auto-generated";

/// Name of the title field.
pub const TITLE_FIELD: &str = "title";

/// Resolves a BCP-47 (`en-US`) or POSIX (`en_US`) tag.
///
/// A bare language gets its most common region (`de` is `de_DE`).
pub fn resolve_locale(tag: &str) -> FormResult<Locale> {
    resolve(tag).map(|(locale, _)| locale)
}

fn resolve(tag: &str) -> FormResult<(Locale, &'static str)> {
    let normalized = tag.trim().replace('-', "_");
    let mut parts = normalized.splitn(2, '_');
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_uppercase);

    let name = match (language.as_str(), region) {
        (_, Some(region)) => format!("{language}_{region}"),
        ("en", None) => "en_US".to_owned(),
        ("ja", None) => "ja_JP".to_owned(),
        ("zh", None) => "zh_CN".to_owned(),
        ("ko", None) => "ko_KR".to_owned(),
        (lang, None) => format!("{lang}_{}", lang.to_ascii_uppercase()),
    };

    let locale = Locale::try_from(name.as_str()).map_err(|_| FormError::UnknownLocale(tag.to_owned()))?;
    Ok((locale, long_date_pattern(&name)))
}

/// Field order of a long date for a resolved `lang_REGION` name.
fn long_date_pattern(name: &str) -> &'static str {
    match name.split('_').next().unwrap_or_default() {
        "en" if name == "en_US" => "%B %-d, %Y",
        "de" => "%-d. %B %Y",
        "ja" | "zh" => "%Y年%-m月%-d日",
        "ko" => "%Y년 %-m월 %-d일",
        _ => "%-d %B %Y",
    }
}

fn render(date: NaiveDate, locale: Locale, pattern: &str) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(pattern, locale)
        .to_string()
}

/// Formats `date` as a long-form title in `locale`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use diary_form::title::format_entry_title;
///
/// let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
/// assert_eq!(format_entry_title(date, "en-US").unwrap(), "October 18, 2026");
/// assert_eq!(format_entry_title(date, "de-DE").unwrap(), "18. Oktober 2026");
/// ```
pub fn format_entry_title(date: NaiveDate, locale: &str) -> FormResult<String> {
    let (locale, pattern) = resolve(locale)?;
    Ok(render(date, locale, pattern))
}

/// Like [`format_entry_title`], falling back to [`FALLBACK_LOCALE`].
pub fn safe_format_entry_title(date: NaiveDate, locale: &str) -> String {
    format_entry_title(date, locale).unwrap_or_else(|error| {
        warn!(locale, %error, "locale not usable for titles, falling back to {FALLBACK_LOCALE}");
        render(date, Locale::en_US, long_date_pattern("en_US"))
    })
}

/// Something that names an entry date.
pub trait EntryDate {
    /// The calendar date.
    fn entry_date(&self) -> FormResult<NaiveDate>;
}

impl EntryDate for NaiveDate {
    fn entry_date(&self) -> FormResult<NaiveDate> {
        Ok(*self)
    }
}

impl EntryDate for NaiveDateTime {
    fn entry_date(&self) -> FormResult<NaiveDate> {
        Ok(self.date())
    }
}

/// ISO-8601 date (`2026-10-18`) or date-time, with or without offset.
impl EntryDate for str {
    fn entry_date(&self) -> FormResult<NaiveDate> {
        let s = self.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map(|dt| dt.date()))
            .map_err(|_| FormError::InvalidDate(self.to_owned()))
    }
}

impl EntryDate for String {
    fn entry_date(&self) -> FormResult<NaiveDate> {
        self.as_str().entry_date()
    }
}

/// Title for an entry dated `date`.
///
/// ```rust
/// use diary_form::title::generate_auto_title;
///
/// assert_eq!(generate_auto_title("2026-10-18T21:30:00Z", "en-US").unwrap(), "October 18, 2026");
/// assert!(generate_auto_title("yesterday", "en-US").is_err());
/// ```
pub fn generate_auto_title<D: EntryDate + ?Sized>(date: &D, locale: &str) -> FormResult<String> {
    Ok(safe_format_entry_title(date.entry_date()?, locale))
}

/// Fills an empty title field with the auto title for `date`.
///
/// Returns the title written, or `None` when the field is missing or the
/// user already typed something.
pub fn initialize_title_field<S: Surface + ?Sized>(
    surface: &mut S,
    date: NaiveDate,
    locale: &str,
) -> Option<String> {
    let field = surface.field(TITLE_FIELD)?;
    if !surface.value(field).trim().is_empty() {
        return None;
    }

    let title = safe_format_entry_title(date, locale);
    surface.set_value(field, &title);
    surface.set_placeholder(field, TITLE_PLACEHOLDER);
    Some(title)
}

//! End-to-end behaviour of a bound page against the in-memory surface.

use std::time::Duration;

use chrono::NaiveDate;
use diary_form::counter::CounterBand;
use diary_form::prelude::*;
use diary_form::unsaved::UNLOAD_PROMPT;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn entry_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn input(field: &str, value: &str) -> UiEvent {
    UiEvent::Input {
        field: field.to_owned(),
        value: Some(value.to_owned()),
    }
}

fn group_config() -> PageConfig {
    let mut groups = IndexMap::new();
    groups.insert("g".to_owned(), vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]);
    PageConfig {
        groups,
        limits: IndexMap::new(),
        rules: IndexMap::new(),
        auto_title: false,
        ..PageConfig::default()
    }
}

fn group_page() -> Page<MemorySurface> {
    let surface = MemorySurface::from_fields([("a", ""), ("b", ""), ("c", "")]);
    Page::bind_on(group_config(), surface, entry_date()).unwrap()
}

fn visible(page: &Page<MemorySurface>) -> [bool; 3] {
    ["a", "b", "c"].map(|n| page.surface().is_shown(n))
}

#[test]
fn group_reveals_after_quiet_period_and_collapses() {
    let mut page = group_page();
    assert_eq!(visible(&page), [true, false, false]);

    let start = Instant::now();
    page.handle(input("a", "hi"));
    assert_eq!(visible(&page), [true, false, false], "reveal waits for the debounce");

    assert_eq!(page.fire_due(start + Duration::from_millis(100)), 0);
    assert_eq!(page.fire_due(start + Duration::from_millis(400)), 1);
    assert_eq!(visible(&page), [true, true, false]);

    page.handle(input("b", "ok"));
    page.flush();
    assert_eq!(visible(&page), [true, true, true]);

    page.handle(input("a", "h"));
    page.flush();
    assert_eq!(visible(&page), [true, false, false]);
    assert_eq!(page.surface().value_of("b"), Some("ok"));
    assert_eq!(page.surface().value_of("c"), Some(""));
}

#[test]
fn group_initial_state_respects_existing_content() {
    let surface = MemorySurface::from_fields([("a", "done"), ("b", ""), ("c", "")]);
    let page = Page::bind_on(group_config(), surface, entry_date()).unwrap();
    assert_eq!(visible(&page), [true, true, false]);
}

fn counter_page() -> Page<MemorySurface> {
    let mut limits = IndexMap::new();
    limits.insert("note".to_owned(), LimitConfig::new(100));
    let config = PageConfig {
        groups: IndexMap::new(),
        limits,
        rules: IndexMap::new(),
        auto_title: false,
        ..PageConfig::default()
    };
    Page::bind_on(config, MemorySurface::new().with_field("note", ""), entry_date()).unwrap()
}

fn counter(page: &Page<MemorySurface>) -> Option<CounterView> {
    page.surface().field_state("note").unwrap().counter.clone()
}

#[test]
fn counter_bands_follow_length_without_debounce() {
    let mut page = counter_page();
    assert!(counter(&page).is_none());

    page.handle(input("note", &"x".repeat(84)));
    assert!(counter(&page).is_none());

    page.handle(input("note", &"x".repeat(85)));
    let view = counter(&page).unwrap();
    assert_eq!(view.band, CounterBand::Info);
    assert_eq!(view.text, "85 / 100");

    page.handle(input("note", &"x".repeat(90)));
    let view = counter(&page).unwrap();
    assert_eq!(view.band, CounterBand::Warning);
    assert_eq!(view.remaining, Some(10));

    page.handle(input("note", &"x".repeat(95)));
    assert_eq!(counter(&page).unwrap().band, CounterBand::Error);
    assert_eq!(
        page.surface().field_state("note").unwrap().limit_class,
        Some(LimitClass::AtLimit)
    );
}

#[test]
fn paste_over_limit_is_truncated_and_redispatched() {
    let mut page = counter_page();
    page.handle(input("note", &"y".repeat(120)));

    assert_eq!(page.surface().value_of("note").map(str::len), Some(100));
    let view = counter(&page).unwrap();
    assert_eq!(view.current, 100);
    assert_eq!(view.aria_label, "Character limit reached");

    let rejected = page.handle(UiEvent::KeyDown {
        field: "note".to_owned(),
        key: KeyPress::new("z"),
    });
    assert_eq!(rejected, EventOutcome::KeyRejected);

    let backspace = page.handle(UiEvent::KeyDown {
        field: "note".to_owned(),
        key: KeyPress::new("Backspace"),
    });
    assert_eq!(backspace, EventOutcome::Handled);
}

#[test]
fn submit_blocks_on_default_entry_rules() {
    let surface = MemorySurface::from_fields([
        ("title", ""),
        ("success_1", ""),
        ("gratitude_1", "my cat"),
        ("anxiety_1", ""),
        ("score", "9"),
    ]);
    let mut page = Page::bind_on(PageConfig::default(), surface, entry_date()).unwrap();

    let outcome = page.handle(UiEvent::Submit);
    let EventOutcome::Submit(SubmitOutcome::Blocked { focus, errors }) = outcome else {
        panic!("expected a blocked submit, got {outcome:?}");
    };
    let success_1 = page.surface().field("success_1");
    assert_eq!(focus, success_1);
    assert_eq!(errors.len(), 3);
    assert_eq!(
        page.surface().error_of("success_1"),
        Some("Please share at least one success from today")
    );
    assert_eq!(page.surface().error_of("score"), Some("Please rate your day from 1 to 5"));
    assert!(!page.engine().form_state().is_valid);
}

#[test]
fn typing_into_an_invalid_field_clears_its_error() {
    let surface = MemorySurface::from_fields([("success_1", "")]);
    let mut page = Page::bind_on(PageConfig::default(), surface, entry_date()).unwrap();

    page.handle(UiEvent::Blur {
        field: "success_1".to_owned(),
    });
    assert!(page.surface().error_of("success_1").is_some());

    page.handle(input("success_1", "w"));
    assert!(page.surface().error_of("success_1").is_none());
}

#[test]
fn auto_title_is_not_an_unsaved_change() {
    let surface = MemorySurface::from_fields([("title", ""), ("journal", "")]);
    let mut page = Page::bind_on(PageConfig::default(), surface, entry_date()).unwrap();

    assert_eq!(page.surface().value_of("title"), Some("October 18, 2026"));
    assert_eq!(page.handle(UiEvent::BeforeUnload), EventOutcome::Unload(None));

    page.handle(input("journal", "Slept well"));
    assert!(page.surface().unsaved_marker());
    assert_eq!(page.handle(UiEvent::BeforeUnload), EventOutcome::Unload(Some(UNLOAD_PROMPT)));

    let stay = page.handle(UiEvent::LinkClick {
        link: LinkClick::new("/entries"),
        confirm: false,
    });
    assert_eq!(stay, EventOutcome::Link(LinkDecision::Stay));

    let leave = page.handle(UiEvent::LinkClick {
        link: LinkClick::new("/entries"),
        confirm: true,
    });
    assert_eq!(leave, EventOutcome::Link(LinkDecision::Follow));
    assert_eq!(page.handle(UiEvent::BeforeUnload), EventOutcome::Unload(None));
}

#[test]
fn submit_clears_unsaved_even_when_blocked() {
    let surface = MemorySurface::from_fields([("success_1", ""), ("journal", "")]);
    let mut page = Page::bind_on(PageConfig::default(), surface, entry_date()).unwrap();

    page.handle(input("journal", "draft"));
    assert!(page.unsaved().unwrap().is_dirty());

    let outcome = page.handle(UiEvent::Submit);
    assert!(matches!(outcome, EventOutcome::Submit(SubmitOutcome::Blocked { .. })));
    assert!(!page.unsaved().unwrap().is_dirty());
}

#[test]
fn unknown_fields_are_reported() {
    let mut page = group_page();
    assert_eq!(
        page.handle(input("nope", "x")),
        EventOutcome::UnknownField("nope".to_owned())
    );
}

#[test]
fn connectivity_toasts() {
    let mut page = group_page();
    page.handle(UiEvent::Offline);
    assert!(page.connectivity().is_offline());
    assert_eq!(page.surface().toasts()[0].kind, ToastKind::Offline);

    page.handle(UiEvent::Online);
    let toasts = page.surface().toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Connection restored");
}

#[test]
fn reset_hides_counters_and_clears_state() {
    let surface = MemorySurface::from_fields([("success_1", "")]);
    let mut page = Page::bind_on(PageConfig::default(), surface, entry_date()).unwrap();
    page.handle(input("success_1", &"z".repeat(250)));
    page.handle(UiEvent::Blur {
        field: "success_1".to_owned(),
    });
    assert!(page.surface().field_state("success_1").unwrap().counter.is_some());

    page.reset();
    assert!(!page.has_pending());
    assert!(page.surface().field_state("success_1").unwrap().counter.is_none());
    assert!(page.engine().form_state().errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_loop_debounces_a_burst_into_one_validation() {
    let _log = diary_log::init_test();

    let mut limits = IndexMap::new();
    limits.insert("note".to_owned(), LimitConfig::new(10));
    let mut rules = IndexMap::new();
    rules.insert(
        "note".to_owned(),
        vec![serde_json::from_str(r#"{"type": "min_length", "value": 4, "message": "Too short"}"#).unwrap()],
    );
    let config = PageConfig {
        groups: IndexMap::new(),
        limits,
        rules,
        auto_title: false,
        ..PageConfig::default()
    };
    let mut page = Page::bind_on(config, MemorySurface::new().with_field("note", ""), entry_date()).unwrap();

    let (tx, rx) = mpsc::channel(16);
    let driver = async move {
        for value in ["a", "ab", "abc", "abcd", "abc"] {
            tx.send(input("note", value)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(tx);
    };

    let ((), ()) = tokio::join!(page.run(rx), driver);

    // the channel closed 150ms after the last keystroke, inside the window
    assert!(page.has_pending());
    assert_eq!(page.surface().error_of("note"), None);

    assert_eq!(page.flush(), 1);
    assert_eq!(page.surface().error_of("note"), Some("Too short"));
}

#[tokio::test(start_paused = true)]
async fn run_loop_fires_when_quiet() {
    let mut page = group_page();
    let (tx, rx) = mpsc::channel(4);

    let driver = async move {
        tx.send(input("a", "go")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        drop(tx);
    };
    let ((), ()) = tokio::join!(page.run(rx), driver);

    assert!(!page.has_pending());
    assert_eq!(visible(&page), [true, true, false]);
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use diary_form::config::PageConfig;
use diary_form::page::{EventOutcome, Page, UiEvent};
use diary_form::surface::MemorySurface;
use diary_form::title::TITLE_FIELD;
use diary_form::unsaved::UnsavedChangesGuard;
use diary_validator::FormValidation;
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::print_json;

enum Step {
    Event(UiEvent),
    Settle,
}

#[derive(Debug, Serialize)]
struct StepResult {
    line: usize,
    outcome: EventOutcome,
}

#[derive(Debug, Serialize)]
struct ReplayOut<'a> {
    steps: Vec<StepResult>,
    form: FormValidation,
    dirty: bool,
    surface: &'a MemorySurface,
}

pub fn run(config: PageConfig, script: &Path, date: Option<NaiveDate>) -> Result<()> {
    let input = fs::read_to_string(script)
        .with_context(|| format!("failed to read script {}", script.display()))?;
    let steps = parse_script(&input)?;

    let surface = surface_for(&config);
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let mut page = Page::bind_on(config, surface, date)?;

    let mut results = Vec::new();
    for (line, step) in steps {
        match step {
            Step::Event(event) => {
                let outcome = page.handle(event);
                results.push(StepResult { line, outcome });
            }
            Step::Settle => {
                let fired = page.flush();
                debug!(line, fired, "settled");
            }
        }
    }
    page.flush();

    print_json(&ReplayOut {
        steps: results,
        form: page.engine().form_state(),
        dirty: page.unsaved().is_some_and(UnsavedChangesGuard::is_dirty),
        surface: page.surface(),
    })
}

fn parse_script(input: &str) -> Result<Vec<(usize, Step)>> {
    let mut steps = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(raw).with_context(|| format!("line {line}: not JSON"))?;
        let step = if value.get("type").and_then(Value::as_str) == Some("settle") {
            Step::Settle
        } else {
            Step::Event(
                serde_json::from_value(value)
                    .with_context(|| format!("line {line}: not a UI event"))?,
            )
        };
        steps.push((line, step));
    }
    Ok(steps)
}

/// One empty field per name the configuration mentions, title first.
fn surface_for(config: &PageConfig) -> MemorySurface {
    let mut names: IndexSet<&str> = IndexSet::new();
    names.insert(TITLE_FIELD);
    names.extend(config.groups.values().flatten().map(String::as_str));
    names.extend(config.limits.keys().map(String::as_str));
    names.extend(config.rules.keys().map(String::as_str));

    MemorySurface::from_fields(names.into_iter().map(|name| (name, "")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_covers_configured_fields_once() {
        let surface = surface_for(&PageConfig::default());
        for name in ["title", "success_1", "anxiety_3", "journal", "score"] {
            assert!(surface.value_of(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_parse_script_skips_blank_lines() {
        let steps = parse_script(
            "{\"type\":\"input\",\"field\":\"a\",\"value\":\"x\"}\n\n{\"type\":\"settle\"}\n",
        )
        .unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].0, 3);
        assert!(matches!(steps[1].1, Step::Settle));
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"type\":\"settle\"}\n{\"type\":\"teleport\"}")
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("line 2"));
    }
}

use anyhow::Result;
use diary_timezone::{
    FixedDetector, HttpReporter, MemorySessionStore, SystemDetector, TimezoneConfig,
    TimezoneDetector, TimezoneManager,
};
use serde::Serialize;

use super::print_json;

#[derive(Debug, Serialize)]
struct TimezoneOut {
    detected: String,
    preference: Option<String>,
    auto_detect: bool,
    effective: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    synced: Option<bool>,
}

pub async fn run(
    config: &TimezoneConfig,
    preference: Option<&str>,
    auto_detect: bool,
    detected: Option<String>,
    sync: bool,
) -> Result<()> {
    match detected {
        Some(zone) => resolve(config, FixedDetector::new(zone), preference, auto_detect, sync).await,
        None => resolve(config, SystemDetector, preference, auto_detect, sync).await,
    }
}

async fn resolve<D: TimezoneDetector>(
    config: &TimezoneConfig,
    detector: D,
    preference: Option<&str>,
    auto_detect: bool,
    sync: bool,
) -> Result<()> {
    let reporter = HttpReporter::new(config)?;
    let mut manager = TimezoneManager::new(detector, reporter, MemorySessionStore::new())
        .with_fallback(config.fallback.clone());

    let detected = manager.detect_timezone();
    let effective = manager.resolve(preference, auto_detect);
    let synced = if sync {
        Some(manager.save_timezone(&effective, Some(&detected)).await)
    } else {
        None
    };

    print_json(&TimezoneOut {
        detected,
        preference: preference.map(str::to_owned),
        auto_detect,
        effective,
        synced,
    })
}

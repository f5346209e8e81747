use std::path::Path;

use anyhow::{Context, Result, bail};
use diary_form::config::PageConfig;
use diary_timezone::TimezoneConfig;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

/// Everything the CLI can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page: PageConfig,
    pub timezone: TimezoneConfig,
}

impl Settings {
    /// Defaults, then the file, then `DIARY_` variables.
    ///
    /// Defaults come from serde rather than a figment layer so that a map
    /// given in the file (groups, limits, rules) replaces the default one
    /// instead of being merged into it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }

        let settings: Self = figment
            .merge(
                Env::prefixed("DIARY_")
                    .ignore(&["config", "log", "log_format"])
                    .split("__"),
            )
            .extract()
            .context("invalid configuration")?;

        settings.page.validate()?;
        Ok(settings)
    }
}

//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

impl Config {
    /// Create configuration from environment variables
    ///
    /// `DIARY_LOG` (then `RUST_LOG`) sets the filter and `DIARY_LOG_FORMAT`
    /// the format.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("DIARY_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup("DIARY_LOG_FORMAT") {
            config.format = Format::parse_lossy(&format);
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Test configuration
    #[must_use]
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], "info", Format::Compact)]
    #[case(&[("RUST_LOG", "warn")], "warn", Format::Compact)]
    #[case(&[("DIARY_LOG", "debug"), ("RUST_LOG", "warn")], "debug", Format::Compact)]
    #[case(&[("DIARY_LOG_FORMAT", "json")], "info", Format::Json)]
    fn test_from_lookup(
        #[case] vars: &[(&str, &str)],
        #[case] level: &str,
        #[case] format: Format,
    ) {
        let config = Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        });
        assert_eq!(config.level, level);
        assert_eq!(config.format, format);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert!(Config::production().display.flatten);
        assert!(!Config::test().display.time);
    }
}

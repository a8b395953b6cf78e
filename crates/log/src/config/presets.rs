//! Configuration presets for common scenarios

use super::{Config, DisplayConfig, Format};

impl Config {
    /// Configuration from `FORMBRIDGE_LOG` (or `RUST_LOG`) and
    /// `FORMBRIDGE_LOG_FORMAT`. An unknown format name keeps the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = var("FORMBRIDGE_LOG").or_else(|| var("RUST_LOG")) {
            config.level = level;
        }
        if let Some(format) = var("FORMBRIDGE_LOG_FORMAT").and_then(|raw| raw.parse().ok()) {
            config.format = format;
        }
        if let Some(colors) = var("FORMBRIDGE_LOG_COLORS") {
            config.display.colors = matches!(colors.as_str(), "1" | "true" | "yes");
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_owned(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
            reloadable: true,
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_owned(),
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

    /// Test configuration (no colors, no timestamps)
    #[cfg(test)]
    pub(crate) fn test() -> Self {
        Self {
            level: "trace".to_owned(),
            format: Format::Compact,
            display: DisplayConfig {
                time: false,
                ..DisplayConfig::default()
            },
            reloadable: true,
        }
    }
}

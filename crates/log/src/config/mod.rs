//! Logger configuration

mod presets;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Single-line, human readable.
    #[default]
    Compact,
    /// Multi-line, for local development.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for Format {
    type Err = LogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(LogError::UnknownFormat(raw.to_owned())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        })
    }
}

/// What each event line carries besides the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// ANSI colors.
    pub colors: bool,
    /// Timestamps.
    pub time: bool,
    /// Event target (module path).
    pub target: bool,
    /// Source file and line.
    pub source: bool,
    /// Lift event fields to the top level of JSON lines.
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            colors: false,
            time: true,
            target: true,
            source: false,
            flatten: false,
        }
    }
}

/// Logger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive, e.g. `info,formbridge_validator=debug`.
    pub level: String,
    /// Output format.
    pub format: Format,
    /// Line contents.
    pub display: DisplayConfig,
    /// Keep a handle for changing the filter at runtime.
    pub reloadable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: Format::default(),
            display: DisplayConfig::default(),
            reloadable: false,
        }
    }
}

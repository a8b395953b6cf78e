//! Logger builder
//!
//! The subscriber is a `Registry` with one filter layer (optionally
//! reloadable, see [`ReloadHandle`]) and one fmt layer chosen by
//! [`Format`].

mod reload;

pub use reload::ReloadHandle;

use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{Config, DisplayConfig, Format};
use crate::error::{LogError, LogResult};

type FilterLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;
type FmtLayer = Box<dyn Layer<Layered<FilterLayer, Registry>> + Send + Sync + 'static>;

/// Boxes a fmt layer, dropping timestamps when the display asks for it.
macro_rules! boxed_with_time {
    ($layer:expr, $time:expr) => {{
        let layer = $layer;
        if $time {
            layer.boxed()
        } else {
            layer.without_time().boxed()
        }
    }};
}

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Keeps the logger's runtime handles alive.
#[derive(Debug)]
pub struct LoggerGuard {
    reload: Option<ReloadHandle>,
}

impl LoggerGuard {
    /// Handle for changing the filter, if the logger was built reloadable.
    pub fn reload_handle(&self) -> Option<&ReloadHandle> {
        self.reload.as_ref()
    }
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Build and install the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the filter directive cannot be parsed
    /// - a global subscriber is already installed
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = parse_filter(&self.config.level)?;
        let (filter_layer, reload) =
            reload::create_filter_layer(filter, &self.config.level, self.config.reloadable);
        let fmt_layer = fmt_layer(self.config.format, &self.config.display);

        Registry::default()
            .with(filter_layer)
            .with(fmt_layer)
            .try_init()?;

        tracing::debug!(
            level = %self.config.level,
            format = %self.config.format,
            reloadable = self.config.reloadable,
            "logger initialized"
        );
        Ok(LoggerGuard { reload })
    }
}

pub(crate) fn parse_filter(level: &str) -> LogResult<EnvFilter> {
    EnvFilter::try_new(level).map_err(|source| LogError::Filter {
        filter: level.to_owned(),
        source,
    })
}

fn fmt_layer(format: Format, display: &DisplayConfig) -> FmtLayer {
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(display.colors)
        .with_target(display.target)
        .with_file(display.source)
        .with_line_number(display.source);

    match format {
        Format::Compact => boxed_with_time!(base.compact(), display.time),
        Format::Pretty => boxed_with_time!(base.pretty(), display.time),
        Format::Json => boxed_with_time!(base.json().flatten_event(display.flatten), display.time),
    }
}

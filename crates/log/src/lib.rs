//! # formbridge-log
//!
//! Subscriber setup shared by formbridge binaries: an `EnvFilter` plus one
//! compact, pretty or JSON fmt layer writing to stderr.
//!
//! ```rust,ignore
//! let _guard = formbridge_log::init()?;
//! tracing::info!(addr = %addr, "listening");
//! ```

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard, ReloadHandle};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Initializes logging from the environment.
///
/// # Errors
///
/// Fails on an unparsable filter or when a global subscriber is already set.
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::from_env())
}

/// Initializes logging with an explicit configuration.
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

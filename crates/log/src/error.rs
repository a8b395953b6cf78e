//! Logger errors.

use thiserror::Error;

/// Result alias for logger setup.
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building or reconfiguring the logger.
#[derive(Debug, Error)]
pub enum LogError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        /// Directive as given.
        filter: String,
        /// Parser error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// The output format name is not one of `compact`, `pretty`, `json`.
    #[error("unknown log format `{0}`")]
    UnknownFormat(String),

    /// A global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] tracing_subscriber::util::TryInitError),

    /// The reloadable filter is gone.
    #[error("failed to reload filter: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),
}

//! Server settings from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`FORMBRIDGE_ADDR`).
    pub addr: SocketAddr,
    /// Fixture file (`FORMBRIDGE_FIXTURES`).
    pub fixtures: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads settings through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, std::net::AddrParseError> {
        let addr = var("FORMBRIDGE_ADDR")
            .as_deref()
            .unwrap_or(DEFAULT_ADDR)
            .parse()?;
        Ok(Self {
            addr,
            fixtures: var("FORMBRIDGE_FIXTURES")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        })
    }
}

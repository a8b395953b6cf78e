//! Serves the remote validation endpoints.
//!
//! Environment: `FORMBRIDGE_ADDR`, `FORMBRIDGE_FIXTURES`, and the logging
//! variables read by `formbridge-log`.

use std::sync::Arc;

use formbridge_api::{AppState, Fixtures, ServerConfig, router};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _log = formbridge_log::init()?;
    let config = ServerConfig::from_env()?;

    let fixtures = match &config.fixtures {
        Some(path) => Fixtures::load(path)?,
        None => Fixtures::default(),
    };
    info!(
        entities = fixtures.entities.len(),
        fixtures = ?config.fixtures,
        "fixtures loaded"
    );
    let (store, catalog) = fixtures.into_parts();
    let app = router(AppState::new(Arc::new(store), catalog));

    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await?;
    info!("shut down");
    Ok(())
}

async fn shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}

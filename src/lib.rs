pub mod api;
pub mod config;
pub mod core_state;
pub mod lookup;
pub mod model;
pub mod pipeline;
pub mod reference;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::{CoreError, CoreState};
use crate::lookup::{LookupClient, LookupError};

/// Anything that stops the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Loading state: {0}")]
    Core(#[from] CoreError),
    #[error("Lookup client: {0}")]
    Lookup(#[from] LookupError),
    #[error("Server: {0}")]
    Server(#[from] api::ServerError),
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;

    // Load dataset + model before binding: no request can reach a
    // partially initialized state.
    let load_config = config.clone();
    let core = tokio::task::spawn_blocking(move || CoreState::load(&load_config))
        .await
        .map_err(|e| CoreError::Task(e.to_string()))??;
    let core = Arc::new(core);

    let lookup = LookupClient::from_config(&config)?;
    let mut server = api::start_api_server(core.clone(), lookup, config.bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;

    match Arc::try_unwrap(core) {
        Ok(state) => state.teardown(),
        Err(_) => tracing::warn!("Core state still referenced at shutdown"),
    }
    Ok(())
}

//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded `Config` to a router: tracing, the database
//! pool, the blob store, the services and the routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use medias_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let blob_store = storage::setup_storage(&config)?;
    let state = services::initialize_services(&config, pool, blob_store);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

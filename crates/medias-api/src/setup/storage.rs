//! Storage setup and initialization

use anyhow::{Context, Result};
use medias_core::Config;
use medias_storage::{create_blob_store, ConfiguredBlobStore};

pub fn setup_storage(config: &Config) -> Result<ConfiguredBlobStore> {
    tracing::info!("Initializing blob store...");
    let configured = create_blob_store(config).context("Failed to initialize blob store")?;

    tracing::info!(
        backend = %configured.store.backend_type(),
        bucket = config.s3_bucket().unwrap_or(""),
        presign_expiry_secs = config.presign_expiry().as_secs(),
        "Blob store initialized successfully"
    );
    if let Some(memory) = &configured.memory {
        tracing::warn!(
            base_url = %memory.base_url(),
            "Using in-memory blob store; objects are lost on restart"
        );
    }

    Ok(configured)
}

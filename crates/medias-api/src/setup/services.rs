//! Wire repositories and the blob store into the workflow services.

use crate::state::AppState;
use medias_core::Config;
use medias_db::{PgMediaRepository, PgTagRepository};
use medias_services::{MediaService, TagService};
use medias_storage::ConfiguredBlobStore;
use sqlx::PgPool;
use std::sync::Arc;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    blob_store: ConfiguredBlobStore,
) -> Arc<AppState> {
    let media = MediaService::new(
        Arc::new(PgMediaRepository::new(pool.clone())),
        blob_store.store.clone(),
    );
    let tags = TagService::new(Arc::new(PgTagRepository::new(pool.clone())));

    let mut state = AppState::new(media, tags, config.request_timeout()).with_db_pool(pool);
    if let Some(memory) = blob_store.memory {
        state = state.with_memory_storage(memory);
    }

    tracing::info!(
        request_timeout_secs = config.request_timeout().as_secs(),
        "Services initialized"
    );
    Arc::new(state)
}

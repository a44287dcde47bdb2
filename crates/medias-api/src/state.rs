//! Application state shared by handlers.

use crate::http_metrics::HttpMetrics;
use medias_services::{MediaService, TagService};
use medias_storage::MemoryBlobStore;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub media: MediaService,
    pub tags: TagService,
    /// Deadline applied to every workflow a handler runs.
    pub request_timeout: Duration,
    /// Pool pinged by `/health`. Absent when the repositories are not Postgres-backed.
    pub db_pool: Option<PgPool>,
    pub metrics: HttpMetrics,
    /// Set when the in-memory blob backend is active so its upload routes can be mounted.
    pub memory_storage: Option<Arc<MemoryBlobStore>>,
}

impl AppState {
    pub fn new(media: MediaService, tags: TagService, request_timeout: Duration) -> Self {
        Self {
            media,
            tags,
            request_timeout,
            db_pool: None,
            metrics: HttpMetrics::new(),
            memory_storage: None,
        }
    }

    pub fn with_db_pool(mut self, pool: PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    pub fn with_memory_storage(mut self, store: Arc<MemoryBlobStore>) -> Self {
        self.memory_storage = Some(store);
        self
    }
}

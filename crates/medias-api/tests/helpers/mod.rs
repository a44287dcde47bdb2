//! Test helpers: build AppState and router over in-memory repositories and blob store.
//!
//! Run with `cargo test -p medias-api`. No database or object storage is needed.

#![allow(dead_code)]

use axum_test::TestServer;
use medias_api::constants;
use medias_api::setup::routes::build_router;
use medias_api::state::AppState;
use medias_core::models::{Media, MediaStatus};
use medias_services::test_helpers::{stored_media, TestCatalog};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus handles on the in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub catalog: TestCatalog,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a media record directly into the repository.
    pub fn seed_media(&self, filename: &str, sha256: &str, status: MediaStatus) -> Media {
        let media = stored_media(filename, sha256, status);
        self.catalog.media_repo.add_media(media.clone());
        media
    }
}

pub fn setup_test_app() -> TestApp {
    let catalog = TestCatalog::new();
    let state = Arc::new(
        AppState::new(
            catalog.media.clone(),
            catalog.tags.clone(),
            Duration::from_secs(5),
        )
        .with_memory_storage(Arc::new(catalog.blobs.clone())),
    );
    let server =
        TestServer::new(build_router(state.clone())).expect("Failed to create test server");

    TestApp {
        server,
        catalog,
        state,
    }
}

/// The `clip.mp4` reservation body.
pub fn clip_request(tags: &[&str]) -> Value {
    json!({
        "title": "clip.mp4",
        "description": "match highlights",
        "mime_type": "video/mp4",
        "size": 500,
        "sha256": "abc123",
        "tags": tags,
    })
}

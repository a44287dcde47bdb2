//! Test helpers for workflow tests
//!
//! In-memory repositories and a ready-wired catalog so tests in this crate and in the API
//! crate run without Postgres or S3.

pub mod mock_repositories;

pub use mock_repositories::{MockMediaRepository, MockTagRepository, RepoOp};

use crate::{MediaService, TagService};
use chrono::Utc;
use medias_core::models::{Media, MediaStatus, MediaType, NewMedia};
use medias_storage::MemoryBlobStore;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_STORAGE_BASE_URL: &str = "http://storage.test";

/// Services wired to in-memory doubles, with handles to inspect them.
#[derive(Clone)]
pub struct TestCatalog {
    pub media: MediaService,
    pub tags: TagService,
    pub media_repo: MockMediaRepository,
    pub tag_repo: MockTagRepository,
    pub blobs: MemoryBlobStore,
}

impl TestCatalog {
    pub fn new() -> Self {
        let tag_repo = MockTagRepository::new();
        let media_repo = MockMediaRepository::new(tag_repo.clone());
        let blobs = MemoryBlobStore::new(TEST_STORAGE_BASE_URL);

        Self {
            media: MediaService::new(Arc::new(media_repo.clone()), Arc::new(blobs.clone())),
            tags: TagService::new(Arc::new(tag_repo.clone())),
            media_repo,
            tag_repo,
            blobs,
        }
    }
}

impl Default for TestCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid candidate: `clip.mp4`, `video/mp4`, 500 bytes, checksum `abc123`.
pub fn clip_input() -> NewMedia {
    NewMedia {
        filename: "clip.mp4".to_string(),
        description: Some("match highlights".to_string()),
        mime_type: "video/mp4".to_string(),
        size: 500,
        sha256: "abc123".to_string(),
    }
}

/// A stored media record in the given status, without tags.
pub fn stored_media(filename: &str, sha256: &str, status: MediaStatus) -> Media {
    let now = Utc::now();
    Media {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        description: None,
        status,
        url: None,
        media_type: MediaType::Image,
        mime_type: "image/png".to_string(),
        size: 1024,
        sha256: sha256.to_string(),
        operation: None,
        tags: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

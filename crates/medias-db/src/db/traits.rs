//! Repository traits
//!
//! Workflows depend on these traits only; Postgres implementations live next door and
//! in-memory doubles live in `medias-services` behind the `test-helpers` feature.

use async_trait::async_trait;
use medias_core::models::{Media, MediaDraft, MediaStatus, NewTag, Page, Tag};
use medias_core::AppError;
use uuid::Uuid;

/// Result of an insert keyed on `(filename, sha256)`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Media),
    /// A concurrent request inserted the same pair first; carries that record.
    AlreadyExists(Media),
}

#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// `NotFound` when no record has this filename and checksum.
    async fn find_by_filename_and_checksum(
        &self,
        filename: &str,
        sha256: &str,
    ) -> Result<Media, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Media, AppError>;

    /// Insert the draft and link it to existing tags, atomically.
    ///
    /// Fails with `InvalidEntity` if any tag name is unknown, in which case nothing is written.
    async fn create(&self, draft: &MediaDraft, tag_names: &[String])
        -> Result<CreateOutcome, AppError>;

    /// Move `media` to `status` if it is still in the status it was read with.
    async fn update_status(&self, media: &Media, status: MediaStatus) -> Result<Media, AppError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// `Conflict` when the name is taken.
    async fn create(&self, tag: &NewTag) -> Result<Tag, AppError>;

    /// One page ordered by name, plus the total number of tags.
    async fn list_page(&self, page: Page) -> Result<(Vec<Tag>, i64), AppError>;
}

pub fn tags_not_found() -> AppError {
    AppError::invalid_entity("some tags not found", "one or more tag names do not exist")
}

pub fn transition_conflict(current: MediaStatus) -> AppError {
    match current {
        MediaStatus::Finalized => AppError::conflict(
            "media already finalized",
            "media status changed to finalized before this update",
        ),
        MediaStatus::Failed => AppError::conflict(
            "media upload failed",
            "media status changed to failed before this update",
        ),
        MediaStatus::Reserved => AppError::conflict(
            "invalid status transition",
            "media is still reserved",
        ),
    }
}

//! Mock repository implementations for testing
//!
//! These mocks follow the Postgres repositories' contracts without a database: the
//! `(filename, sha256)` pair is unique, tag links are all-or-nothing and status updates are
//! compare-and-set.

use async_trait::async_trait;
use chrono::Utc;
use medias_core::models::{Media, MediaDraft, MediaStatus, NewTag, Page, Tag};
use medias_core::AppError;
use medias_db::db::{tags_not_found, transition_conflict};
use medias_db::{CreateOutcome, MediaRepository, TagRepository};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Repository calls that can be made to fail with an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    Find,
    Create,
    UpdateStatus,
    ListTags,
}

fn injected_failure(op: RepoOp) -> AppError {
    AppError::Storage(format!("injected {:?} failure", op))
}

/// Mock tag repository for testing without database
#[derive(Clone, Default)]
pub struct MockTagRepository {
    tags: Arc<Mutex<BTreeMap<String, Tag>>>,
    failing: Arc<Mutex<HashSet<RepoOp>>>,
}

impl MockTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag directly, bypassing validation.
    pub fn add_tag(&self, name: &str) -> Tag {
        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.tags
            .lock()
            .unwrap()
            .insert(tag.name.clone(), tag.clone());
        tag
    }

    pub fn fail_on(&self, op: RepoOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn count(&self) -> usize {
        self.tags.lock().unwrap().len()
    }

    fn lookup(&self, names: &[String]) -> Option<Vec<Tag>> {
        let tags = self.tags.lock().unwrap();
        names.iter().map(|n| tags.get(n).cloned()).collect()
    }

    fn check(&self, op: RepoOp) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(injected_failure(op));
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for MockTagRepository {
    async fn create(&self, tag: &NewTag) -> Result<Tag, AppError> {
        self.check(RepoOp::Create)?;
        let mut tags = self.tags.lock().unwrap();
        if tags.contains_key(&tag.name) {
            return Err(AppError::conflict(
                "tag name already exists",
                format!("a tag named '{}' already exists", tag.name),
            ));
        }
        let now = Utc::now();
        let created = Tag {
            id: Uuid::new_v4(),
            name: tag.name.clone(),
            description: tag.description.clone(),
            created_at: now,
            updated_at: now,
        };
        tags.insert(created.name.clone(), created.clone());
        Ok(created)
    }

    async fn list_page(&self, page: Page) -> Result<(Vec<Tag>, i64), AppError> {
        self.check(RepoOp::ListTags)?;
        let tags = self.tags.lock().unwrap();
        let items = tags
            .values()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok((items, tags.len() as i64))
    }
}

/// Mock media repository for testing without database
#[derive(Clone)]
pub struct MockMediaRepository {
    media: Arc<Mutex<HashMap<Uuid, Media>>>,
    tags: MockTagRepository,
    failing: Arc<Mutex<HashSet<RepoOp>>>,
    race_winner: Arc<Mutex<Option<Media>>>,
    writes: Arc<AtomicUsize>,
}

impl MockMediaRepository {
    /// Tag names passed to `create` are resolved against `tags`.
    pub fn new(tags: MockTagRepository) -> Self {
        Self {
            media: Arc::new(Mutex::new(HashMap::new())),
            tags,
            failing: Arc::new(Mutex::new(HashSet::new())),
            race_winner: Arc::new(Mutex::new(None)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn add_media(&self, media: Media) {
        self.media.lock().unwrap().insert(media.id, media);
    }

    pub fn get(&self, id: Uuid) -> Option<Media> {
        self.media.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.media.lock().unwrap().len()
    }

    /// Number of inserts and status updates that changed stored state.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_on(&self, op: RepoOp) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Store `media` just before the next `create` runs, as a concurrent request would.
    pub fn insert_before_next_create(&self, media: Media) {
        *self.race_winner.lock().unwrap() = Some(media);
    }

    fn check(&self, op: RepoOp) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(injected_failure(op));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaRepository for MockMediaRepository {
    async fn find_by_filename_and_checksum(
        &self,
        filename: &str,
        sha256: &str,
    ) -> Result<Media, AppError> {
        self.check(RepoOp::Find)?;
        self.media
            .lock()
            .unwrap()
            .values()
            .find(|m| m.filename == filename && m.sha256 == sha256)
            .cloned()
            .ok_or_else(|| AppError::not_found("media not found"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Media, AppError> {
        self.check(RepoOp::Find)?;
        self.get(id)
            .ok_or_else(|| AppError::not_found("media not found"))
    }

    async fn create(
        &self,
        draft: &MediaDraft,
        tag_names: &[String],
    ) -> Result<CreateOutcome, AppError> {
        self.check(RepoOp::Create)?;

        if let Some(winner) = self.race_winner.lock().unwrap().take() {
            self.add_media(winner);
        }

        let mut media = self.media.lock().unwrap();
        if let Some(existing) = media
            .values()
            .find(|m| m.filename == draft.filename && m.sha256 == draft.sha256)
        {
            return Ok(CreateOutcome::AlreadyExists(existing.clone()));
        }

        let tags = self.tags.lookup(tag_names).ok_or_else(tags_not_found)?;

        let now = Utc::now();
        let created = Media {
            id: Uuid::new_v4(),
            filename: draft.filename.clone(),
            description: draft.description.clone(),
            status: draft.status,
            url: None,
            media_type: draft.media_type,
            mime_type: draft.mime_type.clone(),
            size: draft.size,
            sha256: draft.sha256.clone(),
            operation: None,
            tags,
            created_at: now,
            updated_at: now,
        };
        media.insert(created.id, created.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(CreateOutcome::Created(created))
    }

    async fn update_status(&self, media: &Media, status: MediaStatus) -> Result<Media, AppError> {
        self.check(RepoOp::UpdateStatus)?;
        if !media.status.can_transition_to(status) {
            return Err(transition_conflict(media.status));
        }

        let mut stored = self.media.lock().unwrap();
        let current = stored
            .get_mut(&media.id)
            .ok_or_else(|| AppError::not_found("media not found"))?;
        if current.status != media.status {
            return Err(transition_conflict(current.status));
        }

        current.status = status;
        current.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medias_core::models::MediaType;

    fn draft() -> MediaDraft {
        MediaDraft {
            filename: "clip.mp4".to_string(),
            description: None,
            mime_type: "video/mp4".to_string(),
            media_type: MediaType::Video,
            size: 500,
            sha256: "abc123".to_string(),
            status: MediaStatus::Reserved,
        }
    }

    #[tokio::test]
    async fn unknown_tag_writes_nothing() {
        let tags = MockTagRepository::new();
        tags.add_tag("soccer");
        let repo = MockMediaRepository::new(tags);

        let err = repo
            .create(&draft(), &["beach".to_string(), "soccer".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.message(), "some tags not found");
        assert_eq!(repo.count(), 0);
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn stale_update_is_conflict() {
        let repo = MockMediaRepository::new(MockTagRepository::new());
        let created = match repo.create(&draft(), &[]).await.unwrap() {
            CreateOutcome::Created(m) => m,
            other => panic!("expected Created, got {:?}", other),
        };
        repo.update_status(&created, MediaStatus::Failed)
            .await
            .unwrap();

        let err = repo
            .update_status(&created, MediaStatus::Finalized)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "media upload failed");
        assert_eq!(repo.get(created.id).unwrap().status, MediaStatus::Failed);
    }
}

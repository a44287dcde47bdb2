//! Media workflows
//!
//! Reservation, finalization and read of media records. File bytes never pass through here:
//! clients upload to and download from presigned URLs handed out by the blob store.

use medias_core::models::{Media, MediaOperation, MediaStatus, NewMedia};
use medias_core::validation::{normalize_tag_names, validate_new_media};
use medias_core::{AppError, ResultExt};
use medias_db::{CreateOutcome, MediaRepository};
use medias_storage::BlobStore;
use std::sync::Arc;
use uuid::Uuid;

/// Result of finalization. A missing upload yields both the now-failed media and an error.
#[must_use]
#[derive(Debug)]
pub struct FinalizeOutcome {
    pub media: Option<Media>,
    pub error: Option<AppError>,
}

impl FinalizeOutcome {
    fn finalized(media: Media) -> Self {
        Self {
            media: Some(media),
            error: None,
        }
    }

    fn failed(media: Media, error: AppError) -> Self {
        Self {
            media: Some(media),
            error: Some(error),
        }
    }

    fn error(error: AppError) -> Self {
        Self {
            media: None,
            error: Some(error),
        }
    }

    /// Collapse to a plain result, discarding the media when an error is present.
    pub fn into_result(self) -> Result<Media, AppError> {
        match (self.media, self.error) {
            (_, Some(err)) => Err(err),
            (Some(media), None) => Ok(media),
            (None, None) => Err(AppError::internal("finalization produced no result")),
        }
    }
}

#[derive(Clone)]
pub struct MediaService {
    media_repository: Arc<dyn MediaRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl MediaService {
    pub fn new(media_repository: Arc<dyn MediaRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            media_repository,
            blob_store,
        }
    }

    /// Reserve a media record and hand out an upload URL.
    ///
    /// Calling again with the same filename and checksum while the record is still `reserved`
    /// returns the same record with a fresh URL and `operation = update`.
    #[tracing::instrument(skip(self, input, tag_names), fields(media.filename = %input.filename))]
    pub async fn create_media(
        &self,
        input: NewMedia,
        tag_names: Vec<String>,
    ) -> Result<Media, AppError> {
        let draft = validate_new_media(input).inspect_err(log_rejection)?;
        let tag_names = normalize_tag_names(&tag_names).inspect_err(log_rejection)?;

        let existing = match self
            .media_repository
            .find_by_filename_and_checksum(&draft.filename, &draft.sha256)
            .await
        {
            Ok(media) => Some(media),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.with_detail("error finding media")),
        };

        if let Some(media) = existing {
            return self.resume_reservation(media, &tag_names, None).await;
        }

        let upload_url = self
            .blob_store
            .presign_upload(draft.object_ref())
            .await
            .context_detail("error generating upload URL")?;

        match self
            .media_repository
            .create(&draft, &tag_names)
            .await
            .context_detail("error creating media")
            .inspect_err(log_rejection)?
        {
            CreateOutcome::Created(mut media) => {
                tracing::info!(
                    media_id = %media.id,
                    media_type = %media.media_type,
                    tags = media.tags.len(),
                    "Media reserved"
                );
                media.url = Some(upload_url);
                media.operation = Some(MediaOperation::Create);
                Ok(media)
            }
            CreateOutcome::AlreadyExists(media) => {
                tracing::debug!(media_id = %media.id, "Lost reservation race, resuming existing media");
                self.resume_reservation(media, &tag_names, Some(upload_url))
                    .await
            }
        }
    }

    async fn resume_reservation(
        &self,
        mut media: Media,
        tag_names: &[String],
        upload_url: Option<String>,
    ) -> Result<Media, AppError> {
        match media.status {
            MediaStatus::Reserved => {}
            MediaStatus::Finalized => {
                let err = AppError::conflict(
                    "media already exists",
                    "a finalized media file with this filename and sha256 already exists",
                );
                log_rejection(&err);
                return Err(err);
            }
            MediaStatus::Failed => {
                let err = AppError::conflict(
                    "media upload previously failed",
                    "cannot retry upload with same filename and sha256",
                );
                log_rejection(&err);
                return Err(err);
            }
        }

        if media.tag_names() != tag_names {
            let err = AppError::conflict(
                "different tags",
                "requested tags do not match the existing reservation",
            );
            log_rejection(&err);
            return Err(err);
        }

        let upload_url = match upload_url {
            Some(url) => url,
            None => self
                .blob_store
                .presign_upload(media.object_ref())
                .await
                .context_detail("error generating upload URL")?,
        };

        tracing::info!(media_id = %media.id, "Media reservation renewed");
        media.url = Some(upload_url);
        media.operation = Some(MediaOperation::Update);
        Ok(media)
    }

    /// Check that the upload landed and move the record to a terminal status.
    #[tracing::instrument(skip(self), fields(media.id = %id))]
    pub async fn finalize_media(&self, id: Uuid) -> FinalizeOutcome {
        let media = match self.find(id).await {
            Ok(media) => media,
            Err(e) => return FinalizeOutcome::error(e),
        };

        match media.status {
            MediaStatus::Reserved => {}
            MediaStatus::Finalized => {
                let err =
                    AppError::conflict("media already finalized", "media can only be finalized once");
                log_rejection(&err);
                return FinalizeOutcome::error(err);
            }
            MediaStatus::Failed => {
                let err = AppError::conflict(
                    "media upload failed",
                    "media upload previously failed and cannot be finalized",
                );
                log_rejection(&err);
                return FinalizeOutcome::error(err);
            }
        }

        let exists = match self
            .blob_store
            .exists(media.object_ref())
            .await
            .context_detail("error checking media existence in storage")
        {
            Ok(exists) => exists,
            Err(e) => return FinalizeOutcome::error(e),
        };

        if !exists {
            return match self
                .media_repository
                .update_status(&media, MediaStatus::Failed)
                .await
                .context_detail("error marking media as failed")
            {
                Ok(failed) => {
                    tracing::info!(media_id = %failed.id, "Media marked as failed, upload missing");
                    FinalizeOutcome::failed(
                        failed,
                        AppError::invalid_entity(
                            "media file not found in file storage",
                            "upload was not completed or file was deleted",
                        ),
                    )
                }
                Err(e) => FinalizeOutcome::error(e),
            };
        }

        match self
            .media_repository
            .update_status(&media, MediaStatus::Finalized)
            .await
            .context_detail("error marking media as finalized")
        {
            Ok(finalized) => {
                tracing::info!(media_id = %finalized.id, "Media finalized");
                FinalizeOutcome::finalized(finalized)
            }
            Err(e) => FinalizeOutcome::error(e),
        }
    }

    /// Load a media record with a fresh download URL. The URL is never stored.
    #[tracing::instrument(skip(self), fields(media.id = %id))]
    pub async fn get_media(&self, id: Uuid) -> Result<Media, AppError> {
        let mut media = self.find(id).await?;

        let url = self
            .blob_store
            .presign_download(media.object_ref())
            .await
            .context_detail("error generating download URL")?;

        media.url = Some(url);
        Ok(media)
    }

    async fn find(&self, id: Uuid) -> Result<Media, AppError> {
        match self.media_repository.find_by_id(id).await {
            Ok(media) => Ok(media),
            Err(e) if e.is_not_found() => {
                log_rejection(&e);
                Err(e)
            }
            Err(e) => Err(e.with_detail("error finding media")),
        }
    }
}

fn log_rejection(err: &AppError) {
    if err.kind() != medias_core::ErrorKind::Internal {
        tracing::debug!(
            error = %err.message(),
            details = err.details().unwrap_or_default(),
            "Media request rejected"
        );
    }
}

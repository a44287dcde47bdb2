use async_trait::async_trait;
use medias_core::models::{Media, MediaDraft, MediaRow, MediaStatus, Tag};
use medias_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::traits::{tags_not_found, transition_conflict, CreateOutcome, MediaRepository};

const MEDIA_COLUMNS: &str =
    "id, filename, description, status, type, mime_type, size, sha256, created_at, updated_at";

/// Postgres-backed media repository
#[derive(Clone)]
pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn tags_for<'e, E>(executor: E, media_id: Uuid) -> Result<Vec<Tag>, AppError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let tags = sqlx::query_as::<Postgres, Tag>(
            r#"
            SELECT t.id, t.name, t.description, t.created_at, t.updated_at
            FROM tags t
            JOIN media_tags mt ON mt.tag_id = t.id
            WHERE mt.media_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(media_id)
        .fetch_all(executor)
        .await?;

        Ok(tags)
    }

    async fn with_tags(&self, row: Option<MediaRow>) -> Result<Media, AppError> {
        let row = row.ok_or_else(|| AppError::not_found("media not found"))?;
        let tags = Self::tags_for(&self.pool, row.id).await?;
        Ok(row.into_media(tags))
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    async fn find_by_filename_and_checksum(
        &self,
        filename: &str,
        sha256: &str,
    ) -> Result<Media, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRow>(&format!(
            "SELECT {} FROM media WHERE filename = $1 AND sha256 = $2",
            MEDIA_COLUMNS
        ))
        .bind(filename)
        .bind(sha256)
        .fetch_optional(&self.pool)
        .await?;

        self.with_tags(row).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Media, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRow>(&format!(
            "SELECT {} FROM media WHERE id = $1",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.with_tags(row).await
    }

    #[tracing::instrument(
        skip(self, draft),
        fields(db.table = "media", db.operation = "insert", media.filename = %draft.filename)
    )]
    async fn create(
        &self,
        draft: &MediaDraft,
        tag_names: &[String],
    ) -> Result<CreateOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Zero rows back means the (filename, sha256) pair already exists.
        let inserted = sqlx::query_as::<Postgres, MediaRow>(&format!(
            r#"
            INSERT INTO media (id, filename, description, status, type, mime_type, size, sha256)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (filename, sha256) DO NOTHING
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.filename)
        .bind(&draft.description)
        .bind(draft.status)
        .bind(draft.media_type)
        .bind(&draft.mime_type)
        .bind(draft.size)
        .bind(&draft.sha256)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = inserted else {
            tx.rollback().await?;
            tracing::debug!("media already inserted by a concurrent request");
            let existing = self
                .find_by_filename_and_checksum(&draft.filename, &draft.sha256)
                .await?;
            return Ok(CreateOutcome::AlreadyExists(existing));
        };

        let tags = if tag_names.is_empty() {
            Vec::new()
        } else {
            let tags = sqlx::query_as::<Postgres, Tag>(
                r#"
                SELECT id, name, description, created_at, updated_at
                FROM tags
                WHERE name = ANY($1)
                ORDER BY name ASC
                "#,
            )
            .bind(tag_names)
            .fetch_all(&mut *tx)
            .await?;

            if tags.len() != tag_names.len() {
                // Dropping the transaction rolls back the insert.
                return Err(tags_not_found());
            }

            let tag_ids: Vec<Uuid> = tags.iter().map(|t| t.id).collect();
            sqlx::query(
                r#"
                INSERT INTO media_tags (media_id, tag_id)
                SELECT $1::uuid, UNNEST($2::uuid[])
                "#,
            )
            .bind(row.id)
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await?;

            tags
        };

        tx.commit().await?;

        tracing::debug!(media_id = %row.id, tags = tags.len(), "media inserted");
        Ok(CreateOutcome::Created(row.into_media(tags)))
    }

    #[tracing::instrument(
        skip(self, media),
        fields(db.table = "media", db.operation = "update", db.record_id = %media.id)
    )]
    async fn update_status(&self, media: &Media, status: MediaStatus) -> Result<Media, AppError> {
        if !media.status.can_transition_to(status) {
            return Err(transition_conflict(media.status));
        }

        let updated = sqlx::query_as::<Postgres, MediaRow>(&format!(
            r#"
            UPDATE media
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        ))
        .bind(media.id)
        .bind(status)
        .bind(media.status)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => Ok(row.into_media(media.tags.clone())),
            None => {
                let current = self.find_by_id(media.id).await?;
                Err(transition_conflict(current.status))
            }
        }
    }
}

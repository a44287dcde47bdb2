use async_trait::async_trait;
use medias_core::models::{NewTag, Page, Tag};
use medias_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::traits::TagRepository;

/// PostgreSQL error code for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Postgres-backed tag repository
#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "insert"))]
    async fn create(&self, tag: &NewTag) -> Result<Tag, AppError> {
        let result = sqlx::query_as::<Postgres, Tag>(
            r#"
            INSERT INTO tags (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&tag.name)
        .bind(&tag.description)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(tag) => Ok(tag),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(AppError::conflict(
                    "tag name already exists",
                    format!("a tag named '{}' already exists", tag.name),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "tags", db.operation = "select"))]
    async fn list_page(&self, page: Page) -> Result<(Vec<Tag>, i64), AppError> {
        // Count and page read from the same snapshot.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total = sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM tags")
            .fetch_one(&mut *tx)
            .await?;

        let tags = sqlx::query_as::<Postgres, Tag>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM tags
            ORDER BY name ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((tags, total))
    }
}

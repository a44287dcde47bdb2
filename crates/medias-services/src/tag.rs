use medias_core::models::{NewTag, PaginatedResult, PaginationParams, Tag};
use medias_core::validation::validate_new_tag;
use medias_core::{AppError, ResultExt};
use medias_db::TagRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct TagService {
    tag_repository: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tag_repository: Arc<dyn TagRepository>) -> Self {
        Self { tag_repository }
    }

    #[tracing::instrument(skip(self, input), fields(tag.name = %input.name))]
    pub async fn create_tag(&self, input: NewTag) -> Result<Tag, AppError> {
        let tag = validate_new_tag(input)?;

        let created = self
            .tag_repository
            .create(&tag)
            .await
            .context_detail("error creating tag")?;

        tracing::info!(tag_id = %created.id, tag_name = %created.name, "Tag created");
        Ok(created)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_tags(&self, params: PaginationParams) -> Result<PaginatedResult<Tag>, AppError> {
        let page = params.resolve()?;

        let (items, total) = self
            .tag_repository
            .list_page(page)
            .await
            .context_detail("error listing tags")?;

        Ok(PaginatedResult {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        })
    }
}

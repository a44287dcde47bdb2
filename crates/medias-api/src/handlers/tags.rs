use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::responses::{TagListResponse, TagResponse};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use medias_core::models::{NewTag, PaginationParams};
use medias_services::with_deadline;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateTagRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Raw paging query. Values that do not parse as integers count as 0.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTagsQuery {
    /// Page size, 1-100 (0 or absent means 50)
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn lenient_int(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

impl ListTagsQuery {
    fn params(&self) -> PaginationParams {
        PaginationParams::new(
            lenient_int(self.limit.as_deref()),
            lenient_int(self.offset.as_deref()),
        )
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Tag name already exists", body = ErrorResponse),
        (status = 422, description = "Invalid tag", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateTagRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let input = NewTag {
        name: request.name,
        description: request.description,
    };
    let tag = with_deadline(state.request_timeout, state.tags.create_tag(input)).await??;
    Ok((StatusCode::CREATED, Json(TagResponse { data: tag })))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "tags",
    params(ListTagsQuery),
    responses(
        (status = 200, description = "One page of tags ordered by name", body = TagListResponse),
        (status = 422, description = "Limit or offset out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTagsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = with_deadline(state.request_timeout, state.tags.list_tags(query.params())).await??;
    Ok(Json(TagListResponse::from(page)))
}

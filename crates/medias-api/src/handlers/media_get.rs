use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{parse_media_id, responses::MediaResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use medias_services::with_deadline;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/v1/media/{id}",
    tag = "media",
    params(
        ("id" = uuid::Uuid, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media found; `url` is a presigned download URL", body = MediaResponse),
        (status = 400, description = "Malformed media ID", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_media_id(&id)?;
    let media = with_deadline(state.request_timeout, state.media.get_media(id)).await??;
    Ok(Json(MediaResponse { data: media }))
}

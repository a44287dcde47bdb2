use crate::error::{log_error, status_for, ErrorBody, ErrorResponse, HttpAppError};
use crate::handlers::parse_media_id;
use crate::handlers::responses::{FinalizeFailureResponse, MediaResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use medias_core::AppError;
use medias_services::with_deadline;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v1/media/{id}/finalize",
    tag = "media",
    params(
        ("id" = uuid::Uuid, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Upload verified and media finalized", body = MediaResponse),
        (status = 400, description = "Malformed media ID", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 409, description = "Media already finalized or failed", body = ErrorResponse),
        (status = 422, description = "Uploaded file missing; media marked failed", body = FinalizeFailureResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn finalize_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, HttpAppError> {
    let id = parse_media_id(&id)?;
    let outcome = with_deadline(state.request_timeout, state.media.finalize_media(id)).await?;

    match (outcome.media, outcome.error) {
        (Some(media), None) => Ok(Json(MediaResponse { data: media }).into_response()),
        (Some(media), Some(err)) => {
            log_error(&err);
            let body = FinalizeFailureResponse {
                data: media,
                error: ErrorBody::from_app_error(&err),
            };
            Ok((status_for(&err), Json(body)).into_response())
        }
        (None, Some(err)) => Err(err.into()),
        (None, None) => Err(AppError::internal("finalization produced no result").into()),
    }
}

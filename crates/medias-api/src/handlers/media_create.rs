use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::responses::MediaResponse;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use medias_core::models::{MediaOperation, NewMedia};
use medias_services::with_deadline;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Reservation request. Missing fields decode as empty and are rejected by validation.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateMediaRequest {
    /// File name of the upload
    pub title: String,
    pub description: Option<String>,
    pub mime_type: String,
    /// Size in bytes
    pub size: i64,
    /// SHA-256 checksum of the file contents
    pub sha256: String,
    /// Names of existing tags to attach
    pub tags: Vec<String>,
}

impl CreateMediaRequest {
    fn into_parts(self) -> (NewMedia, Vec<String>) {
        (
            NewMedia {
                filename: self.title,
                description: self.description,
                mime_type: self.mime_type,
                size: self.size,
                sha256: self.sha256,
            },
            self.tags,
        )
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/media",
    tag = "media",
    request_body = CreateMediaRequest,
    responses(
        (status = 201, description = "Media reserved; `url` is a presigned upload URL", body = MediaResponse),
        (status = 200, description = "Existing reservation returned with a fresh upload URL", body = MediaResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Media already finalized or failed, or tags differ", body = ErrorResponse),
        (status = 422, description = "Invalid media or unknown tags", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_media(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateMediaRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (input, tags) = request.into_parts();
    let media = with_deadline(state.request_timeout, state.media.create_media(input, tags)).await??;

    let status = match media.operation {
        Some(MediaOperation::Update) => StatusCode::OK,
        _ => StatusCode::CREATED,
    };
    Ok((status, Json(MediaResponse { data: media })))
}

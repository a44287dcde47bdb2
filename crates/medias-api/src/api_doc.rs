//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use medias_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Medias API",
        version = "0.1.0",
        description = "Media catalog with presigned uploads. Reserve a media record, upload the file straight to object storage with the returned URL, then finalize. All catalog endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::media_create::create_media,
        handlers::media_finalize::finalize_media,
        handlers::media_get::get_media,
        handlers::tags::create_tag,
        handlers::tags::list_tags,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::Media,
            models::MediaStatus,
            models::MediaType,
            models::Tag,
            handlers::media_create::CreateMediaRequest,
            handlers::tags::CreateTagRequest,
            handlers::responses::MediaResponse,
            handlers::responses::FinalizeFailureResponse,
            handlers::responses::TagResponse,
            handlers::responses::TagListResponse,
            handlers::responses::PaginationMeta,
            handlers::health::HealthCheckResponse,
            error::ErrorResponse,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "media", description = "Media reservation, finalization and retrieval"),
        (name = "tags", description = "Tag management"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

//! Response envelopes. Successful bodies wrap their payload in `data`.

use crate::error::ErrorBody;
use medias_core::models::{Media, PaginatedResult, Tag};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaResponse {
    pub data: Media,
}

/// Finalization that marked the media failed: the record and the error travel together.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalizeFailureResponse {
    pub data: Media,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    pub data: Tag,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagListResponse {
    pub data: Vec<Tag>,
    pub pagination: PaginationMeta,
}

impl From<PaginatedResult<Tag>> for TagListResponse {
    fn from(page: PaginatedResult<Tag>) -> Self {
        Self {
            data: page.items,
            pagination: PaginationMeta {
                limit: page.limit,
                offset: page.offset,
                total: page.total,
            },
        }
    }
}

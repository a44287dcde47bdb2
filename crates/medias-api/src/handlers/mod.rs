pub mod health;
pub mod media_create;
pub mod media_finalize;
pub mod media_get;
pub mod memory_storage;
pub mod responses;
pub mod tags;

use medias_core::AppError;
use uuid::Uuid;

/// Parse a media id path segment. Malformed ids are transport errors, not lookups.
pub(crate) fn parse_media_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(AppError::from)
}

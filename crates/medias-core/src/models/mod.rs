//! Data models for the catalog
//!
//! Media records, tags and pagination. Row types used by the Postgres repositories derive
//! `FromRow` when the `sqlx` feature is enabled.

mod media;
mod pagination;
mod tag;

pub use media::{
    Media, MediaDraft, MediaOperation, MediaRow, MediaStatus, MediaType, NewMedia, ObjectRef,
};
pub use pagination::{Page, PaginatedResult, PaginationParams, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use tag::{normalize_tag_name, NewTag, Tag};

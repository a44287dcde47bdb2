//! Database repositories for the catalog
//!
//! Each repository owns one table family: `media` (with its `media_tags` links) and `tags`.

pub mod media;
pub mod tag;
pub mod traits;

pub use media::PgMediaRepository;
pub use tag::PgTagRepository;
pub use traits::{tags_not_found, transition_conflict, CreateOutcome, MediaRepository, TagRepository};

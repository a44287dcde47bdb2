//! Domain validation for media and tags

pub mod media;
pub mod tag;

pub use media::{
    normalize_tag_names, validate_new_media, MAX_FILENAME_LENGTH, MAX_MEDIA_DESCRIPTION_LENGTH,
};
pub use tag::{validate_new_tag, MAX_TAG_DESCRIPTION_LENGTH, MAX_TAG_NAME_LENGTH};

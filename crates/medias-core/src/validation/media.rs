use std::collections::BTreeSet;

use crate::error::AppError;
use crate::models::{normalize_tag_name, MediaDraft, MediaStatus, MediaType, NewMedia};

pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MAX_MEDIA_DESCRIPTION_LENGTH: usize = 1000;

/// Validate a candidate media and derive its type.
///
/// Filename, MIME type and checksum are trimmed; the returned draft is always `reserved`.
pub fn validate_new_media(input: NewMedia) -> Result<MediaDraft, AppError> {
    let filename = input.filename.trim();
    if filename.is_empty() {
        return Err(AppError::invalid_entity(
            "invalid filename",
            "filename cannot be empty",
        ));
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(AppError::invalid_entity(
            "invalid filename",
            format!("filename cannot exceed {} characters", MAX_FILENAME_LENGTH),
        ));
    }

    if let Some(description) = &input.description {
        if description.chars().count() > MAX_MEDIA_DESCRIPTION_LENGTH {
            return Err(AppError::invalid_entity(
                "invalid description",
                format!(
                    "description cannot exceed {} characters",
                    MAX_MEDIA_DESCRIPTION_LENGTH
                ),
            ));
        }
    }

    let mime_type = input.mime_type.trim();
    if mime_type.is_empty() {
        return Err(AppError::invalid_entity(
            "invalid mimeType",
            "mimeType cannot be empty",
        ));
    }
    let media_type = MediaType::from_mime(mime_type).ok_or_else(|| {
        AppError::invalid_entity(
            "unsupported media type",
            format!("mimeType must be image/* or video/*, got: {}", mime_type),
        )
    })?;

    if input.size <= 0 {
        return Err(AppError::invalid_entity(
            "invalid size",
            "size must be positive",
        ));
    }

    let sha256 = input.sha256.trim();
    if sha256.is_empty() {
        return Err(AppError::invalid_entity(
            "invalid sha256",
            "sha256 cannot be empty",
        ));
    }

    Ok(MediaDraft {
        filename: filename.to_string(),
        description: input.description,
        mime_type: mime_type.to_string(),
        media_type,
        size: input.size,
        sha256: sha256.to_string(),
        status: MediaStatus::Reserved,
    })
}

/// Normalize requested tag names into a sorted, de-duplicated list.
pub fn normalize_tag_names(names: &[String]) -> Result<Vec<String>, AppError> {
    let mut set = BTreeSet::new();
    for name in names {
        let normalized = normalize_tag_name(name);
        if normalized.is_empty() {
            return Err(AppError::invalid_entity(
                "invalid tags",
                "tag names cannot be empty",
            ));
        }
        set.insert(normalized);
    }
    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn valid() -> NewMedia {
        NewMedia {
            filename: "clip.mp4".to_string(),
            description: Some("a clip".to_string()),
            mime_type: "video/mp4".to_string(),
            size: 500,
            sha256: "abc123".to_string(),
        }
    }

    fn details_of(input: NewMedia) -> String {
        let err = validate_new_media(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntity);
        err.details().unwrap_or_default().to_string()
    }

    #[test]
    fn valid_input_produces_reserved_draft() {
        let draft = validate_new_media(valid()).unwrap();
        assert_eq!(draft.media_type, MediaType::Video);
        assert_eq!(draft.status, MediaStatus::Reserved);
        assert_eq!(draft.filename, "clip.mp4");
    }

    #[test]
    fn fields_are_trimmed_and_type_uses_lowercase_prefix() {
        let draft = validate_new_media(NewMedia {
            filename: "  photo.PNG ".to_string(),
            mime_type: " IMAGE/PNG ".to_string(),
            sha256: " xyz ".to_string(),
            ..valid()
        })
        .unwrap();
        assert_eq!(draft.filename, "photo.PNG");
        assert_eq!(draft.mime_type, "IMAGE/PNG");
        assert_eq!(draft.sha256, "xyz");
        assert_eq!(draft.media_type, MediaType::Image);
    }

    #[test]
    fn filename_rules() {
        assert_eq!(
            details_of(NewMedia {
                filename: "   ".to_string(),
                ..valid()
            }),
            "filename cannot be empty"
        );
        assert_eq!(
            details_of(NewMedia {
                filename: "a".repeat(256),
                ..valid()
            }),
            "filename cannot exceed 255 characters"
        );
        assert!(validate_new_media(NewMedia {
            filename: "é".repeat(255),
            ..valid()
        })
        .is_ok());
    }

    #[test]
    fn description_limit() {
        assert!(validate_new_media(NewMedia {
            description: Some("d".repeat(1000)),
            ..valid()
        })
        .is_ok());
        assert_eq!(
            details_of(NewMedia {
                description: Some("d".repeat(1001)),
                ..valid()
            }),
            "description cannot exceed 1000 characters"
        );
    }

    #[test]
    fn mime_rules() {
        assert_eq!(
            details_of(NewMedia {
                mime_type: " ".to_string(),
                ..valid()
            }),
            "mimeType cannot be empty"
        );
        let err = validate_new_media(NewMedia {
            mime_type: "application/pdf".to_string(),
            ..valid()
        })
        .unwrap_err();
        assert_eq!(err.message(), "unsupported media type");
        assert_eq!(
            err.details(),
            Some("mimeType must be image/* or video/*, got: application/pdf")
        );
    }

    #[test]
    fn size_and_checksum_rules() {
        for size in [0, -1] {
            assert_eq!(
                details_of(NewMedia { size, ..valid() }),
                "size must be positive"
            );
        }
        assert_eq!(
            details_of(NewMedia {
                sha256: "\t".to_string(),
                ..valid()
            }),
            "sha256 cannot be empty"
        );
    }

    #[test]
    fn tag_names_are_normalized_and_deduplicated() {
        let names = vec![
            " Soccer ".to_string(),
            "beach".to_string(),
            "SOCCER".to_string(),
        ];
        assert_eq!(
            normalize_tag_names(&names).unwrap(),
            vec!["beach".to_string(), "soccer".to_string()]
        );
        assert!(normalize_tag_names(&[]).unwrap().is_empty());
        let err = normalize_tag_names(&["  ".to_string()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntity);
    }
}

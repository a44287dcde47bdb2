use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use super::tag::Tag;

/// Media type, derived once from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a MIME type by its lower-cased prefix.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let lower = mime_type.to_lowercase();
        if lower.starts_with("image/") {
            Some(MediaType::Image)
        } else if lower.starts_with("video/") {
            Some(MediaType::Video)
        } else {
            None
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// Upload lifecycle. `Reserved` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    Reserved,
    Finalized,
    Failed,
}

impl MediaStatus {
    /// Legal transitions are `reserved -> finalized` and `reserved -> failed`.
    pub fn can_transition_to(self, next: MediaStatus) -> bool {
        matches!(
            (self, next),
            (MediaStatus::Reserved, MediaStatus::Finalized)
                | (MediaStatus::Reserved, MediaStatus::Failed)
        )
    }
}

impl Display for MediaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaStatus::Reserved => write!(f, "reserved"),
            MediaStatus::Finalized => write!(f, "finalized"),
            MediaStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Whether a create call inserted a new record or handed back an existing reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaOperation {
    Create,
    Update,
}

/// Key material for the object backing a media record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    pub sha256: &'a str,
    pub filename: &'a str,
}

/// A catalogued media file.
///
/// `url` and `operation` are transient: workflows fill them per request and they are never
/// written to the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Media {
    pub id: Uuid,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: MediaStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    #[serde(skip)]
    pub operation: Option<MediaOperation>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Media {
    pub fn object_ref(&self) -> ObjectRef<'_> {
        ObjectRef {
            sha256: &self.sha256,
            filename: &self.filename,
        }
    }

    /// Tag names of this record, sorted.
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tags.iter().map(|t| t.name.clone()).collect();
        names.sort();
        names
    }
}

/// Candidate media as submitted by a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMedia {
    pub filename: String,
    pub description: Option<String>,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
}

/// Validated media ready for insertion. `media_type` is fixed here and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDraft {
    pub filename: String,
    pub description: Option<String>,
    pub mime_type: String,
    pub media_type: MediaType,
    pub size: i64,
    pub sha256: String,
    pub status: MediaStatus,
}

impl MediaDraft {
    pub fn object_ref(&self) -> ObjectRef<'_> {
        ObjectRef {
            sha256: &self.sha256,
            filename: &self.filename,
        }
    }
}

/// Row shape of the `media` table.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct MediaRow {
    pub id: Uuid,
    pub filename: String,
    pub description: Option<String>,
    pub status: MediaStatus,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub media_type: MediaType,
    pub mime_type: String,
    pub size: i64,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaRow {
    pub fn into_media(self, tags: Vec<Tag>) -> Media {
        Media {
            id: self.id,
            filename: self.filename,
            description: self.description,
            status: self.status,
            url: None,
            media_type: self.media_type,
            mime_type: self.mime_type,
            size: self.size,
            sha256: self.sha256,
            operation: None,
            tags,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_mime_is_case_insensitive() {
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Image));
        assert_eq!(MediaType::from_mime("VIDEO/MP4"), Some(MediaType::Video));
        assert_eq!(MediaType::from_mime("application/pdf"), None);
        assert_eq!(MediaType::from_mime("imagepng"), None);
    }

    #[test]
    fn status_transitions_only_leave_reserved() {
        use MediaStatus::*;
        assert!(Reserved.can_transition_to(Finalized));
        assert!(Reserved.can_transition_to(Failed));
        assert!(!Reserved.can_transition_to(Reserved));
        for terminal in [Finalized, Failed] {
            for next in [Reserved, Finalized, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn media_serializes_type_and_hides_operation() {
        let now = Utc::now();
        let media = Media {
            id: Uuid::new_v4(),
            filename: "clip.mp4".to_string(),
            description: None,
            status: MediaStatus::Reserved,
            url: Some("https://example.test/upload".to_string()),
            media_type: MediaType::Video,
            mime_type: "video/mp4".to_string(),
            size: 500,
            sha256: "abc123".to_string(),
            operation: Some(MediaOperation::Create),
            tags: vec![],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["status"], "reserved");
        assert!(json.get("operation").is_none());
        assert!(json.get("description").is_none());
    }
}

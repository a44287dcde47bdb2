//! Workflow tests against the in-memory doubles.

use crate::test_helpers::{clip_input, stored_media, RepoOp, TestCatalog, TEST_STORAGE_BASE_URL};
use bytes::Bytes;
use medias_core::models::{MediaOperation, MediaStatus, MediaType, NewMedia, NewTag, PaginationParams};
use medias_core::ErrorKind;
use uuid::Uuid;

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// CreateMedia

#[tokio::test]
async fn fresh_create_reserves_with_upload_url() {
    let catalog = TestCatalog::new();
    catalog.tag_repo.add_tag("soccer");
    catalog.tag_repo.add_tag("beach");

    let media = catalog
        .media
        .create_media(clip_input(), tags(&["Soccer", " beach "]))
        .await
        .unwrap();

    assert_eq!(media.operation, Some(MediaOperation::Create));
    assert_eq!(media.status, MediaStatus::Reserved);
    assert_eq!(media.media_type, MediaType::Video);
    assert_eq!(
        media.url.as_deref(),
        Some("http://storage.test/upload/abc123/clip.mp4")
    );
    assert_eq!(media.tag_names(), tags(&["beach", "soccer"]));

    assert_eq!(catalog.media_repo.count(), 1);
    let stored = catalog.media_repo.get(media.id).unwrap();
    assert_eq!(stored.url, None);
    assert_eq!(stored.tags.len(), 2);
    assert_eq!(catalog.blobs.presign_calls(), 1);
}

#[tokio::test]
async fn repeated_create_while_reserved_renews_url() {
    let catalog = TestCatalog::new();
    catalog.tag_repo.add_tag("soccer");

    let first = catalog
        .media
        .create_media(clip_input(), tags(&["soccer"]))
        .await
        .unwrap();
    let second = catalog
        .media
        .create_media(clip_input(), tags(&["SOCCER", "soccer"]))
        .await
        .unwrap();

    assert_eq!(second.operation, Some(MediaOperation::Update));
    assert_eq!(second.id, first.id);
    assert!(second.url.as_deref().is_some_and(|u| !u.is_empty()));
    assert_eq!(catalog.media_repo.count(), 1);
    assert_eq!(catalog.media_repo.writes(), 1);
    assert_eq!(catalog.blobs.presign_calls(), 2);
}

#[tokio::test]
async fn repeated_create_with_different_tags_conflicts() {
    let catalog = TestCatalog::new();
    catalog.tag_repo.add_tag("soccer");
    catalog.tag_repo.add_tag("beach");

    catalog
        .media
        .create_media(clip_input(), tags(&["soccer"]))
        .await
        .unwrap();

    for requested in [tags(&[]), tags(&["beach"]), tags(&["soccer", "beach"])] {
        let err = catalog
            .media
            .create_media(clip_input(), requested)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "different tags");
    }
    assert_eq!(catalog.blobs.presign_calls(), 1);
}

#[tokio::test]
async fn create_against_terminal_media_conflicts_without_mutation() {
    let cases = [
        (MediaStatus::Finalized, "media already exists"),
        (MediaStatus::Failed, "media upload previously failed"),
    ];
    for (status, message) in cases {
        let catalog = TestCatalog::new();
        let existing = stored_media("clip.mp4", "abc123", status);
        catalog.media_repo.add_media(existing.clone());

        let err = catalog
            .media
            .create_media(clip_input(), vec![])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), message);
        assert_eq!(catalog.media_repo.get(existing.id).unwrap(), existing);
        assert_eq!(catalog.media_repo.writes(), 0);
        assert_eq!(catalog.blobs.presign_calls(), 0);
    }
}

#[tokio::test]
async fn invalid_input_has_no_side_effects() {
    let catalog = TestCatalog::new();
    let inputs = [
        NewMedia {
            filename: " ".to_string(),
            ..clip_input()
        },
        NewMedia {
            mime_type: "application/pdf".to_string(),
            ..clip_input()
        },
        NewMedia {
            size: 0,
            ..clip_input()
        },
        NewMedia {
            sha256: String::new(),
            ..clip_input()
        },
    ];
    for input in inputs {
        let err = catalog.media.create_media(input, vec![]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEntity);
    }

    let err = catalog
        .media
        .create_media(clip_input(), tags(&["  "]))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "invalid tags");

    assert_eq!(catalog.media_repo.count(), 0);
    assert_eq!(catalog.blobs.presign_calls(), 0);
}

#[tokio::test]
async fn unknown_tag_rejects_whole_creation() {
    let catalog = TestCatalog::new();
    catalog.tag_repo.add_tag("soccer");

    let err = catalog
        .media
        .create_media(clip_input(), tags(&["soccer", "missing"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidEntity);
    assert_eq!(err.message(), "some tags not found");
    assert_eq!(catalog.media_repo.count(), 0);
}

#[tokio::test]
async fn lookup_failure_is_internal() {
    let catalog = TestCatalog::new();
    catalog.media_repo.fail_on(RepoOp::Find);

    let err = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error finding media");
    assert_eq!(catalog.blobs.presign_calls(), 0);
}

#[tokio::test]
async fn presign_failure_is_internal_and_writes_nothing() {
    let catalog = TestCatalog::new();
    catalog.blobs.set_unavailable(true);

    let err = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error generating upload URL");
    assert_eq!(catalog.media_repo.count(), 0);
}

#[tokio::test]
async fn lost_insert_race_resumes_existing_reservation() {
    let catalog = TestCatalog::new();
    let winner = stored_media("clip.mp4", "abc123", MediaStatus::Reserved);
    catalog.media_repo.insert_before_next_create(winner.clone());

    let media = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap();

    assert_eq!(media.id, winner.id);
    assert_eq!(media.operation, Some(MediaOperation::Update));
    assert!(media.url.is_some());
    assert_eq!(catalog.media_repo.count(), 1);
    assert_eq!(catalog.blobs.presign_calls(), 1);
}

#[tokio::test]
async fn lost_insert_race_against_finalized_conflicts() {
    let catalog = TestCatalog::new();
    catalog
        .media_repo
        .insert_before_next_create(stored_media("clip.mp4", "abc123", MediaStatus::Finalized));

    let err = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "media already exists");
}

// FinalizeMedia

#[tokio::test]
async fn finalize_with_uploaded_object_finalizes() {
    let catalog = TestCatalog::new();
    let media = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap();
    catalog
        .blobs
        .put_object(media.object_ref(), Bytes::from_static(b"video"))
        .unwrap();

    let outcome = catalog.media.finalize_media(media.id).await;

    assert!(outcome.error.is_none());
    let finalized = outcome.media.unwrap();
    assert_eq!(finalized.status, MediaStatus::Finalized);
    assert_eq!(
        catalog.media_repo.get(media.id).unwrap().status,
        MediaStatus::Finalized
    );
}

#[tokio::test]
async fn finalize_without_object_marks_failed_and_reports_both() {
    let catalog = TestCatalog::new();
    let media = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap();

    let outcome = catalog.media.finalize_media(media.id).await;

    let failed = outcome.media.expect("failed media returned alongside the error");
    assert_eq!(failed.status, MediaStatus::Failed);
    let err = outcome.error.unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidEntity);
    assert_eq!(err.message(), "media file not found in file storage");
    assert_eq!(
        err.details(),
        Some("upload was not completed or file was deleted")
    );
    assert_eq!(
        catalog.media_repo.get(media.id).unwrap().status,
        MediaStatus::Failed
    );
}

#[tokio::test]
async fn finalize_on_terminal_media_conflicts_without_write() {
    let cases = [
        (MediaStatus::Finalized, "media already finalized"),
        (MediaStatus::Failed, "media upload failed"),
    ];
    for (status, message) in cases {
        let catalog = TestCatalog::new();
        let media = stored_media("photo.png", "def456", status);
        catalog.media_repo.add_media(media.clone());

        let outcome = catalog.media.finalize_media(media.id).await;

        assert!(outcome.media.is_none());
        let err = outcome.error.unwrap();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), message);
        assert_eq!(catalog.media_repo.writes(), 0);
    }
}

#[tokio::test]
async fn finalize_unknown_id_is_not_found() {
    let catalog = TestCatalog::new();
    let err = catalog
        .media
        .finalize_media(Uuid::new_v4())
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.details(), None);
}

#[tokio::test]
async fn finalize_existence_check_failure_keeps_status() {
    let catalog = TestCatalog::new();
    let media = stored_media("photo.png", "def456", MediaStatus::Reserved);
    catalog.media_repo.add_media(media.clone());
    catalog.blobs.set_unavailable(true);

    let outcome = catalog.media.finalize_media(media.id).await;

    assert!(outcome.media.is_none());
    let err = outcome.error.unwrap();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error checking media existence in storage");
    assert_eq!(
        catalog.media_repo.get(media.id).unwrap().status,
        MediaStatus::Reserved
    );
}

#[tokio::test]
async fn finalize_update_failure_returns_error_only() {
    let catalog = TestCatalog::new();
    let media = stored_media("photo.png", "def456", MediaStatus::Reserved);
    catalog.media_repo.add_media(media.clone());
    catalog.media_repo.fail_on(RepoOp::UpdateStatus);

    let outcome = catalog.media.finalize_media(media.id).await;

    assert!(outcome.media.is_none());
    let err = outcome.error.unwrap();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error marking media as failed");
}

#[tokio::test]
async fn finalize_update_failure_after_upload_returns_error_only() {
    let catalog = TestCatalog::new();
    let media = stored_media("photo.png", "def456", MediaStatus::Reserved);
    catalog.media_repo.add_media(media.clone());
    catalog
        .blobs
        .put_object(media.object_ref(), Bytes::from_static(b"image"))
        .unwrap();
    catalog.media_repo.fail_on(RepoOp::UpdateStatus);

    let outcome = catalog.media.finalize_media(media.id).await;

    assert!(outcome.media.is_none());
    let err = outcome.error.unwrap();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error marking media as finalized");
    assert_eq!(
        catalog.media_repo.get(media.id).unwrap().status,
        MediaStatus::Reserved
    );
}

// GetMedia

#[tokio::test]
async fn get_attaches_fresh_download_url_without_persisting_it() {
    let catalog = TestCatalog::new();
    let media = stored_media("photo.png", "def456", MediaStatus::Finalized);
    catalog.media_repo.add_media(media.clone());

    let fetched = catalog.media.get_media(media.id).await.unwrap();

    assert_eq!(
        fetched.url,
        Some(format!("{}/def456/photo.png", TEST_STORAGE_BASE_URL))
    );
    assert_eq!(fetched.operation, None);
    assert_eq!(catalog.media_repo.get(media.id).unwrap().url, None);
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let catalog = TestCatalog::new();
    let err = catalog.media.get_media(Uuid::new_v4()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_download_url_failure_is_internal() {
    let catalog = TestCatalog::new();
    let media = stored_media("photo.png", "def456", MediaStatus::Finalized);
    catalog.media_repo.add_media(media.clone());
    catalog.blobs.set_unavailable(true);

    let err = catalog.media.get_media(media.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error generating download URL");
}

// Tags

#[tokio::test]
async fn create_tag_normalizes_and_rejects_duplicates() {
    let catalog = TestCatalog::new();

    let tag = catalog
        .tags
        .create_tag(NewTag {
            name: "  Soccer ".to_string(),
            description: Some("ball games".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(tag.name, "soccer");

    let err = catalog
        .tags
        .create_tag(NewTag {
            name: "SOCCER".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "tag name already exists");
    assert_eq!(catalog.tag_repo.count(), 1);
}

#[tokio::test]
async fn create_tag_validation() {
    let catalog = TestCatalog::new();
    let err = catalog
        .tags
        .create_tag(NewTag {
            name: "x".repeat(101),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.message(), "invalid name");
    assert_eq!(catalog.tag_repo.count(), 0);
}

#[tokio::test]
async fn list_tags_paginates_with_stable_total() {
    let catalog = TestCatalog::new();
    for name in ["echo", "alpha", "delta", "charlie", "bravo"] {
        catalog.tag_repo.add_tag(name);
    }

    let first = catalog
        .tags
        .list_tags(PaginationParams::new(2, 0))
        .await
        .unwrap();
    let names: Vec<_> = first.items.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["alpha", "bravo"]);
    assert_eq!((first.total, first.limit, first.offset), (5, 2, 0));

    let last = catalog
        .tags
        .list_tags(PaginationParams::new(2, 4))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.total, 5);

    let defaulted = catalog
        .tags
        .list_tags(PaginationParams::new(0, 0))
        .await
        .unwrap();
    assert_eq!(defaulted.limit, 50);
    assert_eq!(defaulted.items.len(), 5);

    let err = catalog
        .tags
        .list_tags(PaginationParams::new(101, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidEntity);
}

#[tokio::test]
async fn list_tags_repository_failure_is_internal() {
    let catalog = TestCatalog::new();
    catalog.tag_repo.fail_on(RepoOp::ListTags);
    let err = catalog
        .tags
        .list_tags(PaginationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.message(), "error listing tags");
}

// End to end

#[tokio::test]
async fn clip_upload_never_completed() {
    let catalog = TestCatalog::new();

    let reserved = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap();
    assert_eq!(reserved.status, MediaStatus::Reserved);
    assert_eq!(reserved.operation, Some(MediaOperation::Create));

    let outcome = catalog.media.finalize_media(reserved.id).await;
    assert_eq!(outcome.media.as_ref().unwrap().status, MediaStatus::Failed);
    assert_eq!(outcome.error.unwrap().kind(), ErrorKind::InvalidEntity);

    let err = catalog
        .media
        .finalize_media(reserved.id)
        .await
        .into_result()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "media upload failed");

    let err = catalog
        .media
        .create_media(clip_input(), vec![])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.message(), "media upload previously failed");
}

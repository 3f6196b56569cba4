//! Integration tests for folder listing and the recent feed

use pawtrail_core::domain::{Bucket, RemoteError, RenderSource};
use pawtrail_core::ports::IFolderStore;
use pawtrail_core::usecases::{recent_images, GalleryState, GalleryViewModel};
use std::sync::Arc;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::common::{self, FOUND_FOLDER, LOST_FOLDER};

#[tokio::test]
async fn test_list_images_builds_five_candidates_in_order() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_listing(
        &server,
        LOST_FOLDER,
        serde_json::json!([common::file_json("img-001", "rex.jpg", "2026-01-15T10:00:00.000Z")]),
    )
    .await;

    let images = store.list_images(Bucket::Lost).await.expect("listing failed");

    assert_eq!(images.len(), 1);
    let image = &images[0];
    assert_eq!(image.id().as_str(), "img-001");
    assert_eq!(image.name(), "rex.jpg");
    assert_eq!(image.size(), Some(2048));
    assert_eq!(
        image.url_candidates(),
        &[
            "https://drive.google.com/uc?id=img-001".to_string(),
            "https://drive.google.com/uc?export=view&id=img-001".to_string(),
            "https://drive.google.com/thumbnail?id=img-001&sz=w800".to_string(),
            format!("{}/drive/v3/files/img-001?alt=media&key=test-api-key", server.uri()),
            "https://lh3.googleusercontent.com/d/img-001".to_string(),
        ]
    );
    assert_eq!(
        image.thumbnail_link(),
        Some("https://lh3.googleusercontent.com/drive-thumb/img-001")
    );

    // Five render failures exhaust the chain
    let mut cursor = image.fallback();
    for _ in 0..4 {
        assert!(matches!(cursor.advance(), RenderSource::Url(_)));
    }
    assert_eq!(cursor.advance(), RenderSource::Placeholder);
}

#[tokio::test]
async fn test_list_images_sends_fields_and_keeps_provider_order() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", common::folder_query(FOUND_FOLDER).as_str()))
        .and(query_param(
            "fields",
            "files(id,name,thumbnailLink,webViewLink,createdTime,size)",
        ))
        .and(query_param("key", common::API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                common::file_json("b", "b.png", "2026-01-01T00:00:00Z"),
                common::file_json("a", "a.png", "2026-02-01T00:00:00Z"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let images = store.list_images(Bucket::Found).await.unwrap();
    let ids: Vec<&str> = images.iter().map(|i| i.id().as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn test_list_images_error_status_is_not_retried() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "The request is missing a valid API key."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = store.list_images(Bucket::Lost).await.unwrap_err();
    match err {
        RemoteError::List { status, message } => {
            assert_eq!(status, Some(403));
            assert_eq!(message, "The request is missing a valid API key.");
        }
        other => panic!("expected List error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_images_error_without_body_uses_reason_phrase() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = store.list_images(Bucket::Lost).await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::List {
            status: Some(500),
            message: "Internal Server Error".into()
        }
    );
}

#[tokio::test]
async fn test_list_images_rejects_malformed_response() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "drive#fileList"
        })))
        .mount(&server)
        .await;

    let err = store.list_images(Bucket::Found).await.unwrap_err();
    assert!(matches!(err, RemoteError::List { status: None, ref message } if message.contains("malformed")));
}

#[tokio::test]
async fn test_list_images_rejects_bad_created_time() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_listing(
        &server,
        LOST_FOLDER,
        serde_json::json!([{"id": "x1", "name": "x.jpg", "createdTime": "not-a-date"}]),
    )
    .await;

    assert!(store.list_images(Bucket::Lost).await.is_err());
}

#[tokio::test]
async fn test_empty_folder_lists_nothing() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_listing(&server, LOST_FOLDER, serde_json::json!([])).await;

    assert!(store.list_images(Bucket::Lost).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_gallery_over_drive_store() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    let files: Vec<serde_json::Value> = (0..30)
        .map(|i| {
            common::file_json(
                &format!("img{i:02}"),
                &format!("pet{i}.jpg"),
                "2026-01-15T10:00:00Z",
            )
        })
        .collect();
    common::mount_listing(&server, FOUND_FOLDER, serde_json::Value::Array(files)).await;

    let mut gallery = GalleryViewModel::new(Arc::new(store), Bucket::Found);
    gallery.load().await.unwrap();

    assert_eq!(gallery.state(), &GalleryState::Ready);
    assert_eq!(gallery.total_pages(), 3);
    gallery.go_to_page(3);
    let last: Vec<&str> = gallery.page_images().iter().map(|i| i.id().as_str()).collect();
    assert_eq!(last, vec!["img24", "img25", "img26", "img27", "img28", "img29"]);
}

#[tokio::test]
async fn test_recent_feed_survives_failing_bucket() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_listing_error(&server, LOST_FOLDER, 500).await;
    common::mount_listing(
        &server,
        FOUND_FOLDER,
        serde_json::json!([
            common::file_json("f1", "1.jpg", "2026-01-01T08:00:00Z"),
            common::file_json("f2", "2.jpg", "2026-01-03T08:00:00Z"),
            common::file_json("f3", "3.jpg", "2026-01-02T08:00:00Z"),
            common::file_json("f4", "4.jpg", "2026-01-05T08:00:00Z"),
            common::file_json("f5", "5.jpg", "2026-01-04T08:00:00Z"),
        ]),
    )
    .await;

    let feed = recent_images(&store, 5).await;

    let ids: Vec<&str> = feed.iter().map(|t| t.image.id().as_str()).collect();
    assert_eq!(ids, vec!["f4", "f5", "f2", "f3", "f1"]);
    assert!(feed.iter().all(|t| t.bucket == Bucket::Found));
}

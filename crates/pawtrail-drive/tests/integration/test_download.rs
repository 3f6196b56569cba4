//! Integration tests for media downloads

use pawtrail_core::domain::{RemoteError, RemoteId};
use pawtrail_core::ports::IFolderStore;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::common;

fn id(s: &str) -> RemoteId {
    RemoteId::new(s.to_string()).unwrap()
}

#[tokio::test]
async fn test_download_returns_bytes() {
    let (server, store, auth) = common::setup_drive_mock().await;
    let content = b"\x89PNG fake image payload";
    common::mount_download(&server, "img-1", content).await;

    let bytes = store.download_image(&id("img-1")).await.unwrap();

    assert_eq!(bytes, content.to_vec());
    assert_eq!(
        auth.sign_ins.load(std::sync::atomic::Ordering::SeqCst),
        0,
        "downloads must not sign in"
    );
}

#[tokio::test]
async fn test_download_to_directory_uses_sanitized_name() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_download(&server, "img-2", b"pixels").await;
    let dir = tempfile::tempdir().unwrap();

    let written = store
        .download_image_to(&id("img-2"), "../rex/at park.jpg", dir.path())
        .await
        .unwrap();

    assert_eq!(written, dir.path().join("_rex_at park.jpg"));
    assert_eq!(std::fs::read(&written).unwrap(), b"pixels");
}

#[tokio::test]
async fn test_download_to_directory_falls_back_to_id() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    common::mount_download(&server, "img-3", b"pixels").await;
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("pets");

    let written = store
        .download_image_to(&id("img-3"), "", &nested)
        .await
        .unwrap();

    assert_eq!(written, nested.join("img-3"));
    assert!(written.exists());
}

#[tokio::test]
async fn test_download_not_found() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: missing."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = store.download_image(&id("missing")).await.unwrap_err();
    assert_eq!(
        err,
        RemoteError::Download {
            status: Some(404),
            message: "File not found: missing.".into()
        }
    );
}

#[tokio::test]
async fn test_failed_download_writes_nothing() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let result = store.download_image_to(&id("gone"), "gone.jpg", dir.path()).await;

    assert!(matches!(
        result,
        Err(RemoteError::Download { status: Some(500), .. })
    ));
    assert!(!dir.path().join("gone.jpg").exists());
}

//! Integration tests for uploads and the public permission grant

use std::sync::atomic::Ordering;

use pawtrail_core::domain::{Bucket, RemoteError, UploadFile};
use pawtrail_core::ports::IFolderStore;
use pawtrail_core::usecases::{upload_batch, upload_paths};
use wiremock::{
    matchers::{bearer_token, body_json, body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::{self, ACCESS_TOKEN, LOST_FOLDER};

fn jpeg(name: &str) -> UploadFile {
    UploadFile::new(name, "image/jpeg", b"jpeg-bytes".to_vec())
}

async fn mount_upload(server: &MockServer, new_id: &str, name: &str) {
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(query_param("uploadType", "multipart"))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_string_contains(name))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "drive#file",
            "id": new_id,
            "name": name,
            "mimeType": "image/jpeg"
        })))
        .mount(server)
        .await;
}

async fn mount_permission(server: &MockServer, file_id: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(format!("/drive/v3/files/{file_id}/permissions")))
        .and(bearer_token(ACCESS_TOKEN))
        .and(body_json(serde_json::json!({"role": "reader", "type": "anyone"})))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "kind": "drive#permission",
            "id": "anyoneWithLink",
            "type": "anyone",
            "role": "reader"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_then_grant_public_read() {
    let (server, store, auth) = common::setup_drive_mock().await;
    mount_upload(&server, "new-001", "rex.jpg").await;
    mount_permission(&server, "new-001", 200).await;

    let outcome = store
        .upload_image(&jpeg("rex.jpg"), Bucket::Lost, "Photo of a lost pet - 2026-01-15")
        .await
        .expect("upload failed");

    assert_eq!(outcome.file_id.as_str(), "new-001");
    assert_eq!(outcome.file_name, "rex.jpg");
    assert_eq!(outcome.public_url, "https://drive.google.com/uc?id=new-001");
    assert!(outcome.public_access_granted);
    assert_eq!(auth.sign_ins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upload_multipart_body_carries_metadata_and_bytes() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(body_string_contains(format!(r#""parents":["{LOST_FOLDER}"]"#)))
        .and(body_string_contains(r#""description":"Photo of a lost pet - 2026-01-15""#))
        .and(body_string_contains("name=\"metadata\""))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("jpeg-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "new-002",
            "name": "luna.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_permission(&server, "new-002", 200).await;

    let outcome = store
        .upload_image(&jpeg("luna.jpg"), Bucket::Lost, "Photo of a lost pet - 2026-01-15")
        .await
        .unwrap();
    assert_eq!(outcome.file_id.as_str(), "new-002");
}

#[tokio::test]
async fn test_empty_description_gets_bucket_default() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(body_string_contains("Image uploaded to found folder"))
        .and(body_string_contains(r#""parents":["foundFolder"]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "new-003",
            "name": "cat.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_permission(&server, "new-003", 200).await;

    store
        .upload_image(&jpeg("cat.jpg"), Bucket::Found, "")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_permission_failure_still_counts_as_success() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    mount_upload(&server, "new-004", "max.jpg").await;
    mount_permission(&server, "new-004", 403).await;

    let outcome = store
        .upload_image(&jpeg("max.jpg"), Bucket::Lost, "desc")
        .await
        .expect("permission failure must not fail the upload");

    assert_eq!(outcome.file_id.as_str(), "new-004");
    assert!(!outcome.public_access_granted);
}

#[tokio::test]
async fn test_upload_failure_skips_permission_grant() {
    let (server, store, _auth) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": 401, "message": "Invalid Credentials"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/drive/v3/files/anything/permissions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = store
        .upload_image(&jpeg("rex.jpg"), Bucket::Lost, "desc")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RemoteError::Upload {
            status: Some(401),
            message: "Invalid Credentials".into()
        }
    );
    assert!(err.is_unauthorized());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_uploads_share_one_sign_in() {
    let (server, store, auth) = common::setup_drive_mock().await;
    mount_upload(&server, "new-005", "one.jpg").await;
    mount_upload(&server, "new-006", "two.jpg").await;
    mount_permission(&server, "new-005", 200).await;
    mount_permission(&server, "new-006", 200).await;

    store.upload_image(&jpeg("one.jpg"), Bucket::Lost, "d").await.unwrap();
    store.upload_image(&jpeg("two.jpg"), Bucket::Lost, "d").await.unwrap();

    assert_eq!(auth.sign_ins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_batch_upload_continues_after_failure() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    mount_upload(&server, "new-a", "a.jpg").await;
    mount_upload(&server, "new-c", "c.jpg").await;
    Mock::given(method("POST"))
        .and(path("/upload/drive/v3/files"))
        .and(body_string_contains("b.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_permission(&server, "new-a", 200).await;
    mount_permission(&server, "new-c", 200).await;

    let files = vec![jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")];
    let report = upload_batch(&store, &files, Bucket::Lost, "d", |_, _| {}).await;

    let uploaded: Vec<&str> = report.succeeded.iter().map(|o| o.file_id.as_str()).collect();
    assert_eq!(uploaded, vec!["new-a", "new-c"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_name, "b.jpg");
}

#[tokio::test]
async fn test_unreadable_file_in_selection_does_not_block_others() {
    let (server, store, _auth) = common::setup_drive_mock().await;
    mount_upload(&server, "new-a", "a.jpg").await;
    mount_upload(&server, "new-c", "c.jpg").await;
    mount_permission(&server, "new-a", 200).await;
    mount_permission(&server, "new-c", 200).await;

    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.jpg");
    let c = dir.path().join("c.jpg");
    std::fs::write(&a, b"jpeg-bytes").unwrap();
    std::fs::write(&c, b"jpeg-bytes").unwrap();
    let paths = vec![a, dir.path().join("missing.jpg"), c];

    let report = upload_paths(&store, &paths, Bucket::Lost, "d", |_, _| {}).await;

    let uploaded: Vec<&str> = report.succeeded.iter().map(|o| o.file_id.as_str()).collect();
    assert_eq!(uploaded, vec!["new-a", "new-c"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_name, "missing.jpg");
}

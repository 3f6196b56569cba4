//! Shared test helpers for Drive API integration tests
//!
//! Provides wiremock-based mock server setup for the Drive v3 endpoints.
//! Each helper mounts the necessary mock endpoints; [`setup_drive_mock`]
//! returns a `DriveFolderStore` pointing at the mock server with a
//! non-interactive authenticator behind its session manager.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pawtrail_core::domain::{BucketFolders, FolderId, RemoteError, UploadSession};
use pawtrail_core::ports::IAuthenticator;
use pawtrail_core::usecases::SessionManager;
use pawtrail_drive::client::DriveClient;
use pawtrail_drive::DriveFolderStore;

pub const API_KEY: &str = "test-api-key";
pub const ACCESS_TOKEN: &str = "test-access-token";
pub const LOST_FOLDER: &str = "lostFolder";
pub const FOUND_FOLDER: &str = "foundFolder";

/// Authenticator that signs in instantly and counts sign-ins
#[derive(Default)]
pub struct StaticAuthenticator {
    pub sign_ins: AtomicUsize,
}

#[async_trait::async_trait]
impl IAuthenticator for StaticAuthenticator {
    async fn initialize(&self) -> Result<(), RemoteError> {
        Ok(())
    }

    async fn sign_in(&self) -> Result<UploadSession, RemoteError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        Ok(UploadSession::expiring_in(ACCESS_TOKEN, Duration::hours(1)))
    }
}

/// A DriveClient pointing at the mock server
pub fn mock_client(server: &MockServer) -> DriveClient {
    DriveClient::with_base_urls(
        API_KEY,
        format!("{}/drive/v3", server.uri()),
        format!("{}/upload/drive/v3", server.uri()),
    )
}

/// Starts a mock server and returns it with a store and its authenticator
pub async fn setup_drive_mock() -> (MockServer, DriveFolderStore, Arc<StaticAuthenticator>) {
    let server = MockServer::start().await;

    let auth = Arc::new(StaticAuthenticator::default());
    let sessions = Arc::new(SessionManager::new(auth.clone()));
    let folders = BucketFolders::new(
        FolderId::new(LOST_FOLDER.to_string()).unwrap(),
        FolderId::new(FOUND_FOLDER.to_string()).unwrap(),
    );
    let store = DriveFolderStore::new(mock_client(&server), folders, sessions);

    (server, store, auth)
}

/// Listing query for a folder
pub fn folder_query(folder: &str) -> String {
    format!("'{folder}' in parents and mimeType contains 'image'")
}

/// A file entry as Drive returns it
pub fn file_json(id: &str, name: &str, created: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "thumbnailLink": format!("https://lh3.googleusercontent.com/drive-thumb/{id}"),
        "webViewLink": format!("https://drive.google.com/file/d/{id}/view"),
        "createdTime": created,
        "size": "2048"
    })
}

/// Mounts a listing endpoint for one folder
pub async fn mount_listing(server: &MockServer, folder: &str, files: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", folder_query(folder).as_str()))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": files
        })))
        .mount(server)
        .await;
}

/// Mounts a listing endpoint for one folder that fails with `status`
pub async fn mount_listing_error(server: &MockServer, folder: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", folder_query(folder).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "error": {
                "code": status,
                "message": format!("Simulated failure {status}")
            }
        })))
        .mount(server)
        .await;
}

/// Mounts a media download endpoint for a specific file ID.
pub async fn mount_download(server: &MockServer, file_id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/drive/v3/files/{file_id}")))
        .and(query_param("alt", "media"))
        .and(query_param("key", API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "image/jpeg"),
        )
        .mount(server)
        .await;
}

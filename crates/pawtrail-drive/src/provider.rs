//! DriveFolderStore - IFolderStore implementation for Google Drive
//!
//! Wraps the [`DriveClient`] and the bucket folder mapping, and delegates to
//! the listing, upload and client modules to fulfil the [`IFolderStore`] port
//! contract.
//!
//! ## Design Notes
//!
//! - Reads (listing, download) use the API key only and never touch the
//!   session.
//! - Uploads obtain a bearer token from the shared [`SessionManager`] first.
//!   The manager signs in at most once; an expired token surfaces as a
//!   [`RemoteError::Upload`] and is not retried here.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pawtrail_core::domain::{
    Bucket, BucketFolders, RemoteError, RemoteId, RemoteImage, UploadFile, UploadOutcome,
};
use pawtrail_core::ports::IFolderStore;
use pawtrail_core::usecases::SessionManager;
use tracing::debug;

use crate::client::DriveClient;

/// Description used when the caller leaves it empty
pub fn fallback_description(bucket: Bucket) -> String {
    format!("Image uploaded to {} folder", bucket.as_str())
}

/// Folder store backed by two Google Drive folders
pub struct DriveFolderStore {
    client: DriveClient,
    folders: BucketFolders,
    sessions: Arc<SessionManager>,
}

impl DriveFolderStore {
    /// Creates a new `DriveFolderStore`
    pub fn new(client: DriveClient, folders: BucketFolders, sessions: Arc<SessionManager>) -> Self {
        Self {
            client,
            folders,
            sessions,
        }
    }

    /// Returns the underlying HTTP client
    pub fn client(&self) -> &DriveClient {
        &self.client
    }

    /// Returns the bucket folder mapping
    pub fn folders(&self) -> &BucketFolders {
        &self.folders
    }

    /// Returns the shared session manager
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Downloads an image into `dir`; see [`DriveClient::download_image_to`]
    pub async fn download_image_to(
        &self,
        id: &RemoteId,
        display_name: &str,
        dir: &Path,
    ) -> Result<PathBuf, RemoteError> {
        self.client.download_image_to(id, display_name, dir).await
    }
}

#[async_trait::async_trait]
impl IFolderStore for DriveFolderStore {
    /// Lists a bucket's images
    ///
    /// Delegates to [`DriveClient::list_folder`].
    async fn list_images(&self, bucket: Bucket) -> Result<Vec<RemoteImage>, RemoteError> {
        debug!(bucket = %bucket, "DriveFolderStore::list_images");
        self.client.list_folder(self.folders.folder_id(bucket)).await
    }

    /// Uploads an image into a bucket and makes it public
    ///
    /// Delegates to [`DriveClient::upload_image`] after obtaining a session.
    async fn upload_image(
        &self,
        file: &UploadFile,
        bucket: Bucket,
        description: &str,
    ) -> Result<UploadOutcome, RemoteError> {
        let session = self.sessions.ensure_session().await?;

        let description = if description.trim().is_empty() {
            fallback_description(bucket)
        } else {
            description.to_string()
        };

        debug!(
            bucket = %bucket,
            file = %file.name(),
            size = file.len(),
            "DriveFolderStore::upload_image"
        );
        self.client
            .upload_image(
                session.access_token(),
                file,
                self.folders.folder_id(bucket),
                &description,
            )
            .await
    }

    /// Downloads an object's bytes
    ///
    /// Delegates to [`DriveClient::download_file`].
    async fn download_image(&self, id: &RemoteId) -> Result<Vec<u8>, RemoteError> {
        debug!(id = %id, "DriveFolderStore::download_image");
        self.client.download_file(id).await
    }
}

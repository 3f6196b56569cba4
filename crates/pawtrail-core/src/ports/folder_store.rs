//! Folder store port (driven/secondary port)
//!
//! The interface the use cases need from a storage provider: list a bucket,
//! upload into a bucket, download an object. The Google Drive adapter lives
//! in `pawtrail-drive`.
//!
//! ## Design Notes
//!
//! - Errors are the typed [`RemoteError`], one variant per operation.
//! - Implementations never retry. Retrying is a user decision.

use crate::domain::{Bucket, RemoteError, RemoteId, RemoteImage, UploadFile, UploadOutcome};

/// Port trait for bucket-level storage operations
#[async_trait::async_trait]
pub trait IFolderStore: Send + Sync {
    /// Lists the images of one bucket, in provider order
    async fn list_images(&self, bucket: Bucket) -> Result<Vec<RemoteImage>, RemoteError>;

    /// Uploads one image into a bucket
    ///
    /// Requires an upload session; implementations obtain it themselves.
    /// A failed public-permission grant is reported through
    /// [`UploadOutcome::public_access_granted`], not as an error.
    async fn upload_image(
        &self,
        file: &UploadFile,
        bucket: Bucket,
        description: &str,
    ) -> Result<UploadOutcome, RemoteError>;

    /// Downloads the raw bytes of an object
    async fn download_image(&self, id: &RemoteId) -> Result<Vec<u8>, RemoteError>;
}

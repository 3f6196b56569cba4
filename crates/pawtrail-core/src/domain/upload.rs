//! Upload request and result types

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::bucket::Bucket;
use super::errors::DomainError;
use super::newtypes::RemoteId;

/// A local file ready to be uploaded
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidFile`] if the path has no file name or
    /// cannot be read
    pub async fn from_path(path: &Path) -> Result<Self, DomainError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DomainError::InvalidFile(format!("no file name: {}", path.display())))?
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::InvalidFile(format!("{}: {e}", path.display())))?;

        Ok(Self::new(name, guess_mime_type(path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Only `image/*` files may be uploaded to a bucket
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Guesses a MIME type from a file extension
pub fn guess_mime_type(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Description attached to uploads when the caller gives none
pub fn default_description(bucket: Bucket, date: NaiveDate) -> String {
    format!(
        "Photo of a {} pet - {}",
        bucket.adjective(),
        date.format("%Y-%m-%d")
    )
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub file_id: RemoteId,
    pub file_name: String,
    pub public_url: String,
    /// Whether the "anyone with the link" grant succeeded. The upload counts
    /// as successful either way.
    pub public_access_granted: bool,
}

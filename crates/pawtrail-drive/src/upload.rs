//! Upload operations for Google Drive
//!
//! Provides the two requests behind an image upload:
//! - [`DriveClient::upload_multipart`] - Single multipart request carrying
//!   the metadata JSON and the file bytes
//! - [`DriveClient::grant_public_read`] - "Anyone with the link can view"
//!   permission on the new file
//!
//! [`DriveClient::upload_image`] runs both. Only the upload itself can fail
//! the operation; a rejected permission grant is logged and reported through
//! [`UploadOutcome::public_access_granted`].
//!
//! ## Drive API References
//!
//! - [Multipart upload](https://developers.google.com/drive/api/guides/manage-uploads#multipart)
//! - [Create permission](https://developers.google.com/drive/api/reference/rest/v3/permissions/create)

use pawtrail_core::domain::{FolderId, RemoteError, RemoteId, UploadFile, UploadOutcome};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{failure_parts, DriveClient};

// ============================================================================
// Request and response types
// ============================================================================

/// Metadata part of a multipart upload
#[derive(Debug, Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    parents: [&'a str; 1],
    description: &'a str,
}

/// Body of a permission grant
#[derive(Debug, Serialize)]
struct PermissionRequest {
    role: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
}

const PUBLIC_READ: PermissionRequest = PermissionRequest {
    role: "reader",
    kind: "anyone",
};

/// File resource returned by a successful upload
#[derive(Debug, Deserialize)]
struct UploadedFile {
    id: String,
    name: Option<String>,
}

/// Public URL of an uploaded file
pub fn public_url(id: &RemoteId) -> String {
    format!("https://drive.google.com/uc?id={}", id.as_str())
}

fn upload_error(message: impl Into<String>) -> RemoteError {
    RemoteError::Upload {
        status: None,
        message: message.into(),
    }
}

impl DriveClient {
    /// Uploads `file` into `folder` in one multipart request
    ///
    /// Posts to `<upload base>/files?uploadType=multipart` with a `metadata`
    /// part (`{name, parents, description}`) and a `file` part holding the
    /// bytes with the file's MIME type.
    ///
    /// # Returns
    /// The new file's ID and name as reported by Drive
    pub async fn upload_multipart(
        &self,
        access_token: &str,
        file: &UploadFile,
        folder: &FolderId,
        description: &str,
    ) -> Result<(RemoteId, String), RemoteError> {
        let metadata = FileMetadata {
            name: file.name(),
            parents: [folder.as_str()],
            description,
        };
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| upload_error(format!("Failed to encode metadata: {e}")))?;

        let metadata_part = Part::text(metadata_json)
            .mime_str("application/json")
            .map_err(|e| upload_error(format!("Invalid metadata MIME type: {e}")))?;
        let file_part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|e| upload_error(format!("Invalid MIME type '{}': {e}", file.mime_type())))?;
        let form = Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        debug!(
            file = %file.name(),
            bytes = file.len(),
            folder = %folder,
            "Uploading file"
        );

        let response = self
            .upload_request(Method::POST, "/files")
            .query(&[("uploadType", "multipart")])
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            return Err(RemoteError::Upload { status, message });
        }

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| upload_error(format!("Failed to parse upload response: {e}")))?;
        let id = RemoteId::new(uploaded.id)
            .map_err(|e| upload_error(format!("Upload response carried a bad id: {e}")))?;
        let name = uploaded.name.unwrap_or_else(|| file.name().to_string());

        Ok((id, name))
    }

    /// Grants "anyone" reader access to a file
    ///
    /// Makes `POST /files/{id}/permissions` with `{role: reader, type: anyone}`.
    pub async fn grant_public_read(
        &self,
        access_token: &str,
        id: &RemoteId,
    ) -> Result<(), RemoteError> {
        let response = self
            .request(Method::POST, &format!("/files/{}/permissions", id.as_str()))
            .bearer_auth(access_token)
            .json(&PUBLIC_READ)
            .send()
            .await
            .map_err(|e| upload_error(e.to_string()))?;

        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            return Err(RemoteError::Upload { status, message });
        }

        debug!(id = %id, "Public read permission granted");
        Ok(())
    }

    /// Uploads an image and makes it publicly readable
    ///
    /// A failed permission grant downgrades to a warning; the upload still
    /// succeeds with `public_access_granted = false`.
    pub async fn upload_image(
        &self,
        access_token: &str,
        file: &UploadFile,
        folder: &FolderId,
        description: &str,
    ) -> Result<UploadOutcome, RemoteError> {
        let (file_id, file_name) = self
            .upload_multipart(access_token, file, folder, description)
            .await?;

        let public_access_granted = match self.grant_public_read(access_token, &file_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(id = %file_id, error = %e, "Uploaded file could not be made public");
                false
            }
        };

        info!(
            id = %file_id,
            name = %file_name,
            public = public_access_granted,
            "Upload complete"
        );

        Ok(UploadOutcome {
            public_url: public_url(&file_id),
            file_id,
            file_name,
            public_access_granted,
        })
    }
}

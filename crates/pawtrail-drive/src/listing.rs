//! Folder listing for Google Drive
//!
//! One `GET /files` per call, filtered to images whose parent is the bucket's
//! folder. The response is parsed into typed structs and validated before
//! any [`RemoteImage`] is built: a response without a `files` array, a file
//! without a usable `id`, or an unparseable `createdTime` is rejected as a
//! malformed response rather than silently skipped.
//!
//! Each image carries five URL candidates in a fixed order. Consumers try
//! them in turn when rendering (see [`RemoteImage::fallback`]).

use chrono::{DateTime, Utc};
use pawtrail_core::domain::{FolderId, RemoteError, RemoteId, RemoteImage};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;

use crate::client::{failure_parts, DriveClient};

/// Fields requested for every listed file
pub const LIST_FIELDS: &str = "files(id,name,thumbnailLink,webViewLink,createdTime,size)";

// ============================================================================
// Drive API response types
// ============================================================================

/// Response from `GET /files`
#[derive(Debug, Deserialize)]
struct FilesResponse {
    files: Vec<DriveFile>,
}

/// A file entry in a listing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    thumbnail_link: Option<String>,
    web_view_link: Option<String>,
    created_time: String,
    size: Option<SizeValue>,
}

/// Drive encodes `size` as a decimal string; plain numbers are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Number(u64),
    Text(String),
}

impl SizeValue {
    fn bytes(&self) -> Option<u64> {
        match self {
            SizeValue::Number(n) => Some(*n),
            SizeValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

// ============================================================================
// URL candidates
// ============================================================================

/// Builds the five URL candidates for an image, in preference order
///
/// 1. direct view
/// 2. public view
/// 3. thumbnail bounded to 800px width
/// 4. media endpoint authenticated with the API key
/// 5. provider content host
pub fn url_candidates(client: &DriveClient, id: &RemoteId) -> Vec<String> {
    let id_str = id.as_str();
    vec![
        format!("https://drive.google.com/uc?id={id_str}"),
        format!("https://drive.google.com/uc?export=view&id={id_str}"),
        format!("https://drive.google.com/thumbnail?id={id_str}&sz=w800"),
        client.media_url(id),
        format!("https://lh3.googleusercontent.com/d/{id_str}"),
    ]
}

fn malformed(detail: impl std::fmt::Display) -> RemoteError {
    RemoteError::List {
        status: None,
        message: format!("malformed response: {detail}"),
    }
}

fn to_remote_image(client: &DriveClient, file: DriveFile) -> Result<RemoteImage, RemoteError> {
    let id = RemoteId::new(file.id).map_err(malformed)?;

    let created_time = DateTime::parse_from_rfc3339(&file.created_time)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| malformed(format!("createdTime '{}' for {id}: {e}", file.created_time)))?;

    let size = file.size.as_ref().and_then(SizeValue::bytes);
    let candidates = url_candidates(client, &id);

    let image = RemoteImage::new(id, file.name, created_time, size, candidates)
        .map_err(malformed)?
        .with_provider_links(file.thumbnail_link, file.web_view_link);
    Ok(image)
}

impl DriveClient {
    /// Lists the images whose parent is `folder`, in provider order
    ///
    /// Makes `GET /files?q='<folder>' in parents and mimeType contains 'image'`
    /// with the API key. No retry.
    pub async fn list_folder(&self, folder: &FolderId) -> Result<Vec<RemoteImage>, RemoteError> {
        let q = format!("'{}' in parents and mimeType contains 'image'", folder.as_str());
        debug!(folder = %folder, "Listing folder");

        let response = self
            .request(Method::GET, "/files")
            .query(&[
                ("q", q.as_str()),
                ("fields", LIST_FIELDS),
                ("key", self.api_key()),
            ])
            .send()
            .await
            .map_err(|e| RemoteError::List {
                status: None,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            return Err(RemoteError::List { status, message });
        }

        let body = response.text().await.map_err(|e| RemoteError::List {
            status: None,
            message: format!("Failed to read listing response body: {e}"),
        })?;
        let parsed: FilesResponse = serde_json::from_str(&body).map_err(malformed)?;

        let images = parsed
            .files
            .into_iter()
            .map(|file| to_remote_image(self, file))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(folder = %folder, count = images.len(), "Folder listed");
        Ok(images)
    }
}

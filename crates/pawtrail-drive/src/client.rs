//! Google Drive v3 HTTP client
//!
//! Provides a typed HTTP client for the Drive v3 REST API. Handles endpoint
//! construction, API-key and bearer authentication, and turns non-success
//! responses into [`RemoteError`] values carrying the provider's status.
//!
//! Listing lives in [`crate::listing`] and uploads in [`crate::upload`]; both
//! extend [`DriveClient`] with further `impl` blocks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pawtrail_core::domain::RemoteId;
//! use pawtrail_drive::client::DriveClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DriveClient::new("api-key-here");
//! let id = RemoteId::new("1AbCdEf".to_string())?;
//! let bytes = client.download_file(&id).await?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use pawtrail_core::config::{DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL};
use pawtrail_core::domain::{RemoteError, RemoteId};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

// ============================================================================
// Drive API error body
// ============================================================================

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: Option<String>,
}

/// Extracts the status code and a readable message from a failed response
///
/// Prefers the `error.message` of a Google error body, then the canonical
/// reason phrase of the status code.
pub(crate) async fn failure_parts(response: Response) -> (Option<u16>, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GoogleErrorBody>(&body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    (Some(status.as_u16()), message)
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Google Drive v3 calls
///
/// Wraps `reqwest::Client` with the API key and base URL construction for the
/// metadata and upload endpoints. Reads use the API key; writes take a
/// bearer token per call, so one client serves both anonymous and signed-in
/// operations.
#[derive(Debug, Clone)]
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata requests
    api_base_url: String,
    /// Base URL for upload requests
    upload_base_url: String,
    /// Browser API key
    api_key: String,
}

impl DriveClient {
    /// Creates a new DriveClient against the public Google endpoints
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_urls(api_key, DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL)
    }

    /// Creates a new DriveClient with custom base URLs (useful for testing)
    pub fn with_base_urls(
        api_key: impl Into<String>,
        api_base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base_url: trim_slash(api_base_url.into()),
            upload_base_url: trim_slash(upload_base_url.into()),
            api_key: api_key.into(),
        }
    }

    /// Creates a request builder for a metadata API path
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g. "/files")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_base_url, path);
        self.client.request(method, &url)
    }

    /// Creates a request builder for an upload API path
    pub fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client.request(method, &url)
    }

    /// Returns the base URL for metadata requests
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the base URL for upload requests
    pub fn upload_base_url(&self) -> &str {
        &self.upload_base_url
    }

    /// Returns the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Media URL of an object, authenticated with the API key
    pub fn media_url(&self, id: &RemoteId) -> String {
        format!(
            "{}/files/{}?alt=media&key={}",
            self.api_base_url,
            id.as_str(),
            self.api_key
        )
    }

    /// Downloads a file's content by its remote ID
    ///
    /// Makes `GET /files/{id}?alt=media&key=...` which returns the raw bytes.
    pub async fn download_file(&self, id: &RemoteId) -> Result<Vec<u8>, RemoteError> {
        debug!(id = %id, "Downloading file");

        let response = self
            .request(Method::GET, &format!("/files/{}", id.as_str()))
            .query(&[("alt", "media"), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::Download {
                status: None,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (status, message) = failure_parts(response).await;
            return Err(RemoteError::Download { status, message });
        }

        let bytes = response.bytes().await.map_err(|e| RemoteError::Download {
            status: None,
            message: format!("Failed to read download response body: {e}"),
        })?;

        debug!(id = %id, bytes = bytes.len(), "Downloaded file");
        Ok(bytes.to_vec())
    }

    /// Downloads a file and saves it into `dir` under its display name
    ///
    /// The name is sanitized with [`sanitize_file_name`]; an empty name falls
    /// back to the ID. Returns the written path.
    pub async fn download_image_to(
        &self,
        id: &RemoteId,
        display_name: &str,
        dir: &Path,
    ) -> Result<PathBuf, RemoteError> {
        let bytes = self.download_file(id).await?;

        let target = dir.join(sanitize_file_name(display_name, id));
        let write_error = |e: std::io::Error| RemoteError::Download {
            status: None,
            message: format!("Failed to write {}: {e}", target.display()),
        };

        tokio::fs::create_dir_all(dir).await.map_err(write_error)?;
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(write_error)?;

        debug!(id = %id, path = %target.display(), "Saved download");
        Ok(target)
    }
}

/// Makes a display name safe to use as a single path component
///
/// Path separators and other reserved characters become `_`, leading dots
/// are stripped, and an empty result falls back to `id`.
pub fn sanitize_file_name(display_name: &str, id: &RemoteId) -> String {
    let cleaned: String = display_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        id.as_str().to_string()
    } else {
        cleaned
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

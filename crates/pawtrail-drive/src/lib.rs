//! Pawtrail Drive - Google Drive adapter
//!
//! Provides async access to the two Drive folders behind the lost and found
//! buckets:
//! - Folder listing with a five-step URL fallback per image
//! - Multipart uploads followed by a best-effort public-read grant
//! - Media downloads, to memory or to a local directory
//! - OAuth2 Authorization Code with PKCE for the upload session
//!
//! ## Modules
//!
//! - [`auth`] - OAuth2 PKCE sign-in components
//! - [`client`] - Drive v3 HTTP client and downloads
//! - [`listing`] - Folder listing and URL candidates
//! - [`upload`] - Multipart upload and permission grant
//! - [`provider`] - [`IFolderStore`](pawtrail_core::ports::IFolderStore) implementation
//!
//! [`connect`] is the entry point: it checks the configuration and either
//! builds a ready [`DriveFolderStore`] or reports what setup is missing,
//! without any network traffic.

pub mod auth;
pub mod client;
pub mod listing;
pub mod provider;
pub mod upload;

use std::sync::Arc;

use pawtrail_core::config::DriveConfig;
use pawtrail_core::domain::DomainError;
use pawtrail_core::usecases::SessionManager;
use tracing::{debug, warn};

use crate::auth::{GoogleAuthAdapter, OAuth2Config};
use crate::client::DriveClient;
pub use crate::provider::DriveFolderStore;

/// Outcome of [`connect`]
pub enum DriveAvailability {
    /// All credentials are present; the store is ready to use
    Configured(DriveFolderStore),
    /// Required settings are missing; nothing was contacted
    SetupRequired {
        /// Dotted config paths of the missing settings
        missing: Vec<&'static str>,
        /// Human-readable setup steps
        instructions: String,
    },
}

/// Builds a Drive-backed folder store from configuration
///
/// Returns [`DriveAvailability::SetupRequired`] if the API key, client ID or
/// either folder ID is unset or empty. No request is made in either case;
/// the upload session is established lazily on the first upload.
///
/// # Errors
/// Returns [`DomainError::InvalidFolderId`] if a folder ID is present but
/// malformed
pub fn connect(config: &DriveConfig) -> Result<DriveAvailability, DomainError> {
    let missing = config.missing_credentials();
    if !missing.is_empty() {
        warn!(missing = ?missing, "Google Drive is not configured");
        return Ok(DriveAvailability::SetupRequired {
            instructions: setup_instructions(&missing),
            missing,
        });
    }

    let folders = config.bucket_folders()?;
    let api_key = config.api_key().unwrap_or_default();
    let client_id = config.client_id().unwrap_or_default();

    let client = DriveClient::with_base_urls(
        api_key,
        config.api_base_url.as_str(),
        config.upload_base_url.as_str(),
    );

    let oauth = OAuth2Config::new(client_id)
        .with_client_secret(config.client_secret().map(str::to_string))
        .with_redirect_uri(config.redirect_uri.as_str());
    let sessions = Arc::new(SessionManager::new(Arc::new(GoogleAuthAdapter::new(oauth))));

    debug!("Google Drive adapter configured");
    Ok(DriveAvailability::Configured(DriveFolderStore::new(
        client, folders, sessions,
    )))
}

/// Setup steps shown when credentials are missing
pub fn setup_instructions(missing: &[&str]) -> String {
    let mut out = String::from("Google Drive is not configured. Missing settings:\n");
    for field in missing {
        out.push_str(&format!("  - {field}\n"));
    }
    out.push_str(
        "\nTo set up:\n\
         1. Create a project in the Google Cloud console and enable the Drive API.\n\
         2. Create an API key (drive.api_key).\n\
         3. Create an OAuth client ID of type \"Desktop app\" (drive.client_id, and\n\
         \x20  drive.client_secret if one was issued). Add http://127.0.0.1:8400/callback\n\
         \x20  as an authorized redirect URI.\n\
         4. Create two folders in Drive, share them as \"Anyone with the link can view\",\n\
         \x20  and copy their IDs from the folder URLs (drive.lost_folder_id,\n\
         \x20  drive.found_folder_id).\n\
         5. Put the values in the config file or export PAWTRAIL_DRIVE_API_KEY,\n\
         \x20  PAWTRAIL_CLIENT_ID, PAWTRAIL_CLIENT_SECRET, PAWTRAIL_LOST_FOLDER_ID and\n\
         \x20  PAWTRAIL_FOUND_FOLDER_ID.\n",
    );
    out
}

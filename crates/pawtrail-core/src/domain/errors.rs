//! Domain error types
//!
//! Two families live here:
//! - [`DomainError`] for validation failures on domain values
//! - [`RemoteError`] for failures reported by the storage provider or the
//!   auth flow. Each variant wraps the provider's raw status and message
//!   without finer classification.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown bucket label
    #[error("Invalid bucket: {0} (expected 'lost' or 'found')")]
    InvalidBucket(String),

    /// Invalid remote ID format
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Invalid folder ID format
    #[error("Invalid folder ID: {0}")]
    InvalidFolderId(String),

    /// A local file cannot be turned into an upload
    #[error("Invalid file: {0}")]
    InvalidFile(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors raised while talking to the storage provider
///
/// `status` carries the HTTP status code when the provider answered at all;
/// it is `None` for transport failures and malformed responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Listing a bucket failed
    #[error("Failed to list images: {message}")]
    List {
        status: Option<u16>,
        message: String,
    },

    /// The primary upload request failed
    #[error("Upload failed: {message}")]
    Upload {
        status: Option<u16>,
        message: String,
    },

    /// Downloading an object failed
    #[error("Failed to download image: {message}")]
    Download {
        status: Option<u16>,
        message: String,
    },

    /// The auth client could not be initialized or sign-in failed
    #[error("Auth initialization failed: {0}")]
    AuthInit(String),
}

impl RemoteError {
    /// Returns the provider's HTTP status, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::List { status, .. }
            | RemoteError::Upload { status, .. }
            | RemoteError::Download { status, .. } => *status,
            RemoteError::AuthInit(_) => None,
        }
    }

    /// Returns true when the provider rejected the credentials (HTTP 401)
    ///
    /// Callers may use this to invalidate a cached session; nothing in the
    /// crate does so automatically.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

//! Domain entities and business logic
//!
//! This module contains the core domain types for Pawtrail:
//! - Newtypes for provider identifiers
//! - Buckets and their folder mapping
//! - Remote images and their URL fallback chain
//! - Upload requests, results and share links
//! - Session types and the error taxonomy

pub mod bucket;
pub mod errors;
pub mod image;
pub mod newtypes;
pub mod session;
pub mod share;
pub mod upload;

// Re-export commonly used types
pub use bucket::{Bucket, BucketFolders};
pub use errors::{DomainError, RemoteError};
pub use image::{format_file_size, FallbackCursor, RemoteImage, RenderSource};
pub use newtypes::{FolderId, RemoteId};
pub use session::{SessionPhase, UploadSession};
pub use share::{shareable_link, ShareLinks};
pub use upload::{default_description, guess_mime_type, UploadFile, UploadOutcome};

//! Batch upload use case
//!
//! Uploads a selection of files into one bucket, one at a time. Non-image
//! files are rejected before anything is sent. A failed file is recorded and
//! the next one is still attempted. [`upload_paths`] applies the same rule
//! to reading: an unreadable path is recorded as a failure and the rest of
//! the selection is still uploaded.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Bucket, UploadFile, UploadOutcome};
use crate::ports::IFolderStore;

/// A file that could not be uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub error: String,
}

/// Result of a batch upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Uploaded files, in submission order
    pub succeeded: Vec<UploadOutcome>,
    /// Files whose upload request failed
    pub failed: Vec<FailedUpload>,
    /// Files skipped because they are not images
    pub rejected: Vec<String>,
}

impl BatchReport {
    /// True when every submitted file was uploaded
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }

    /// Uploads that went through but could not be made public
    pub fn private_uploads(&self) -> impl Iterator<Item = &UploadOutcome> {
        self.succeeded.iter().filter(|o| !o.public_access_granted)
    }
}

/// Uploads `files` into `bucket` sequentially
///
/// `on_progress` is called with `(done, total)` after every attempt, where
/// `total` counts only the image files.
pub async fn upload_batch<F>(
    store: &dyn IFolderStore,
    files: &[UploadFile],
    bucket: Bucket,
    description: &str,
    mut on_progress: F,
) -> BatchReport
where
    F: FnMut(usize, usize),
{
    let mut report = BatchReport::default();

    let (images, others): (Vec<&UploadFile>, Vec<&UploadFile>) =
        files.iter().partition(|f| f.is_image());

    for file in others {
        warn!(file = %file.name(), mime = %file.mime_type(), "Rejecting non-image file");
        report.rejected.push(file.name().to_string());
    }

    let total = images.len();
    for (idx, file) in images.into_iter().enumerate() {
        match store.upload_image(file, bucket, description).await {
            Ok(outcome) => {
                info!(
                    file = %file.name(),
                    id = %outcome.file_id,
                    bucket = %bucket,
                    "Uploaded image"
                );
                report.succeeded.push(outcome);
            }
            Err(e) => {
                warn!(file = %file.name(), error = %e, "Upload failed, continuing with next file");
                report.failed.push(FailedUpload {
                    file_name: file.name().to_string(),
                    error: e.to_string(),
                });
            }
        }
        on_progress(idx + 1, total);
    }

    report
}

/// Reads `paths` from disk and uploads them with [`upload_batch`]
///
/// A path that cannot be read is reported in [`BatchReport::failed`] ahead of
/// the upload failures.
pub async fn upload_paths<F>(
    store: &dyn IFolderStore,
    paths: &[PathBuf],
    bucket: Bucket,
    description: &str,
    on_progress: F,
) -> BatchReport
where
    F: FnMut(usize, usize),
{
    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();

    for path in paths {
        match UploadFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                unreadable.push(FailedUpload {
                    file_name,
                    error: e.to_string(),
                });
            }
        }
    }

    let mut report = upload_batch(store, &files, bucket, description, on_progress).await;
    unreadable.append(&mut report.failed);
    report.failed = unreadable;
    report
}

//! Upload command - Add photos to a bucket
//!
//! Provides the `pawtrail upload` CLI command which:
//! 1. Reads every given file and guesses its MIME type from the extension
//! 2. Signs in on the first upload (browser consent, once per run)
//! 3. Uploads the images one by one, skipping non-images
//! 4. Reports each public URL, plus any failures
//!
//! An unreadable file is reported like a failed upload; the rest of the
//! selection is still sent.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use pawtrail_core::domain::{default_description, Bucket};
use pawtrail_core::usecases::{upload_paths, BatchReport};
use tracing::info;

use super::Session;
use crate::output::OutputFormatter;

#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Bucket to upload into (lost or found)
    pub bucket: Bucket,

    /// Image files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Description stored with every uploaded file
    #[arg(long)]
    pub description: Option<String>,
}

impl UploadCommand {
    pub async fn execute(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let Some(store) = session.open_store(&*formatter)? else {
            return Ok(());
        };

        let description = match self.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => default_description(self.bucket, chrono::Local::now().date_naive()),
        };

        info!(
            bucket = %self.bucket,
            files = self.files.len(),
            "Starting upload"
        );

        let report = upload_paths(&store, &self.files, self.bucket, &description, |done, total| {
            formatter.info(&format!("Uploaded {done}/{total}"));
        })
        .await;

        if session.is_json() {
            formatter.print_json(&report_json(self.bucket, &report));
        } else {
            print_report(&*formatter, self.bucket, &report);
        }

        if !report.failed.is_empty() {
            bail!(
                "{} of {} uploads failed",
                report.failed.len(),
                report.failed.len() + report.succeeded.len()
            );
        }
        Ok(())
    }
}

fn report_json(bucket: Bucket, report: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "success": report.is_complete_success(),
        "bucket": bucket,
        "uploaded": report.succeeded,
        "failed": report.failed,
        "rejected": report.rejected,
    })
}

fn print_report(formatter: &dyn OutputFormatter, bucket: Bucket, report: &BatchReport) {
    for name in &report.rejected {
        formatter.warn(&format!("Skipped {name}: not an image"));
    }

    if !report.succeeded.is_empty() {
        formatter.success(&format!(
            "Uploaded {} image(s) to the {} folder",
            report.succeeded.len(),
            bucket
        ));
        for outcome in &report.succeeded {
            formatter.info(&format!("{}  {}", outcome.file_name, outcome.public_url));
        }
    }

    for outcome in report.private_uploads() {
        formatter.warn(&format!(
            "{} was uploaded but could not be made public",
            outcome.file_name
        ));
    }

    for failure in &report.failed {
        formatter.error(&format!("{}: {}", failure.file_name, failure.error));
    }
}

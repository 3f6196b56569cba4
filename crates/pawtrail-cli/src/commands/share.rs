//! Share command - Print share links for a photo
//!
//! Purely local: builds the public view link and the social intent URLs
//! without contacting Drive.

use anyhow::{Context, Result};
use clap::Args;
use pawtrail_core::domain::{Bucket, RemoteId, ShareLinks};

use super::Session;

#[derive(Debug, Args)]
pub struct ShareCommand {
    /// ID of the photo to share
    pub id: RemoteId,

    /// Bucket the photo belongs to (lost or found)
    pub bucket: Bucket,
}

impl ShareCommand {
    pub async fn execute(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let links = ShareLinks::new(&self.id, self.bucket);

        if session.is_json() {
            let json = serde_json::to_value(&links).context("Failed to serialize share links")?;
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.heading(&links.title);
        formatter.info(&links.text);
        formatter.info("");
        formatter.info(&format!("Link:      {}", links.link));
        formatter.info(&format!("Facebook:  {}", links.facebook));
        formatter.info(&format!("Twitter:   {}", links.twitter));
        formatter.info(&format!("WhatsApp:  {}", links.whatsapp));

        Ok(())
    }
}

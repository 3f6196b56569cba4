//! Recent command - Newest photos from both buckets
//!
//! A bucket whose listing fails is left out with a warning in the log; the
//! command still prints what the other bucket returned.

use anyhow::Result;
use clap::Args;
use pawtrail_core::usecases::recent_images;

use super::gallery::print_image;
use super::Session;

#[derive(Debug, Args)]
pub struct RecentCommand {
    /// Number of photos to show (defaults to gallery.recent_limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

impl RecentCommand {
    pub async fn execute(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let Some(store) = session.open_store(&*formatter)? else {
            return Ok(());
        };

        let limit = self.limit.unwrap_or(session.config.gallery.recent_limit);
        let recent = recent_images(&store, limit).await;

        if session.is_json() {
            formatter.print_json(&serde_json::json!({
                "limit": limit,
                "images": recent,
            }));
            return Ok(());
        }

        formatter.heading("Recent photos");
        if recent.is_empty() {
            formatter.info("No images yet.");
            return Ok(());
        }

        for tagged in &recent {
            formatter.info(&format!("[{}]", tagged.bucket.title()));
            print_image(&*formatter, &tagged.image);
        }

        Ok(())
    }
}

//! Download command - Save a photo locally
//!
//! The file is written into `--dir` (default `download.dir`) under `--name`,
//! or under its ID when no name is given. Reserved characters in the name
//! are replaced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pawtrail_core::domain::RemoteId;
use tracing::info;

use super::Session;

#[derive(Debug, Args)]
pub struct DownloadCommand {
    /// ID of the photo to download
    pub id: RemoteId,

    /// File name to save as
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to save into (defaults to download.dir)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl DownloadCommand {
    pub async fn execute(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let Some(store) = session.open_store(&*formatter)? else {
            return Ok(());
        };

        let dir = self
            .dir
            .clone()
            .unwrap_or_else(|| session.config.download.dir.clone());
        let name = self.name.as_deref().unwrap_or(self.id.as_str());

        info!(id = %self.id, dir = %dir.display(), "Downloading image");

        let path = store
            .download_image_to(&self.id, name, &dir)
            .await
            .with_context(|| format!("Failed to download {}", self.id))?;

        if session.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "id": self.id,
                "path": path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Saved {}", path.display()));
        }

        Ok(())
    }
}

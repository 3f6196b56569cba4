//! Gallery command - Browse one bucket page by page
//!
//! Lists the bucket's folder once, then prints the requested page through a
//! [`GalleryViewModel`]. Pages are 1-based; a page past the end is clamped
//! to the last page.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use pawtrail_core::domain::{Bucket, RemoteImage};
use pawtrail_core::usecases::{GalleryState, GalleryViewModel};
use tracing::info;

use super::Session;
use crate::output::OutputFormatter;

#[derive(Debug, Args)]
pub struct GalleryCommand {
    /// Bucket to show (lost or found)
    pub bucket: Bucket,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Images per page (defaults to gallery.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl GalleryCommand {
    pub async fn execute(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let Some(store) = session.open_store(&*formatter)? else {
            return Ok(());
        };

        let page_size = self.page_size.unwrap_or(session.config.gallery.page_size);
        let mut gallery = GalleryViewModel::with_page_size(Arc::new(store), self.bucket, page_size);

        info!(bucket = %self.bucket, page = self.page, page_size, "Loading gallery");

        let loaded = gallery.load().await.map(|_| ());
        if let Err(e) = loaded {
            if let GalleryState::Error(message) = gallery.state() {
                formatter.error(message);
            }
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to list the {} folder", self.bucket)));
        }

        let page = gallery.go_to_page(self.page);
        let images = gallery.page_images();

        if session.is_json() {
            formatter.print_json(&serde_json::json!({
                "bucket": self.bucket,
                "page": page,
                "page_size": gallery.page_size(),
                "total_pages": gallery.total_pages(),
                "total_images": gallery.images().len(),
                "images": images,
            }));
            return Ok(());
        }

        formatter.heading(&format!(
            "{} - page {} of {} ({} images)",
            self.bucket.title(),
            page,
            gallery.total_pages(),
            gallery.images().len()
        ));

        if images.is_empty() {
            formatter.info("No images yet.");
            return Ok(());
        }

        for image in images {
            print_image(&*formatter, image);
        }

        if page < gallery.total_pages() {
            formatter.info("");
            formatter.info(&format!(
                "Next: pawtrail gallery {} --page {}",
                self.bucket,
                page + 1
            ));
        }

        Ok(())
    }
}

pub(crate) fn print_image(formatter: &dyn OutputFormatter, image: &RemoteImage) {
    let name = if image.name().is_empty() {
        image.id().as_str()
    } else {
        image.name()
    };
    formatter.info(&format!(
        "{}  [{}]  {}  {}",
        name,
        image.id(),
        image.created_time().format("%Y-%m-%d %H:%M"),
        image.human_size()
    ));
    formatter.info(&format!("    {}", image.primary_url()));
}

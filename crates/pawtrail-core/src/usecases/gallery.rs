//! Gallery view model
//!
//! Drives one bucket's listing, page cursor and manual refresh. Each
//! instance owns its image sequence exclusively; nothing is shared between
//! buckets or cached beyond the instance.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Bucket, RemoteError, RemoteImage};
use crate::ports::IFolderStore;

/// Images per page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Returns page `page_number` (1-based) of `images`
///
/// Pure slicing. A page past the end yields an empty slice, and so does page
/// 0 or a page size of 0. Callers clamp with [`total_pages`].
pub fn paginate(images: &[RemoteImage], page_size: usize, page_number: usize) -> &[RemoteImage] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= images.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(images.len());
    &images[start..end]
}

/// `ceil(count / page_size)`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Display state of a gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryState {
    /// Not loaded yet
    Idle,
    /// A listing request is in flight
    Loading,
    /// Images are available
    Ready,
    /// The last load failed; the user may retry
    Error(String),
}

/// View model for one bucket's gallery
pub struct GalleryViewModel {
    store: Arc<dyn IFolderStore>,
    bucket: Bucket,
    page_size: usize,
    images: Vec<RemoteImage>,
    current_page: usize,
    state: GalleryState,
}

impl GalleryViewModel {
    pub fn new(store: Arc<dyn IFolderStore>, bucket: Bucket) -> Self {
        Self::with_page_size(store, bucket, DEFAULT_PAGE_SIZE)
    }

    /// A page size of 0 is treated as 1
    pub fn with_page_size(store: Arc<dyn IFolderStore>, bucket: Bucket, page_size: usize) -> Self {
        Self {
            store,
            bucket,
            page_size: page_size.max(1),
            images: Vec::new(),
            current_page: 1,
            state: GalleryState::Idle,
        }
    }

    /// Fetches the bucket listing
    ///
    /// On success the images replace the previous listing and the cursor
    /// returns to page 1. On failure the previous images are kept, the state
    /// becomes [`GalleryState::Error`] and the error is returned. There is no
    /// automatic retry.
    pub async fn load(&mut self) -> Result<&[RemoteImage], RemoteError> {
        self.state = GalleryState::Loading;
        debug!(bucket = %self.bucket, "Loading gallery");

        match self.store.list_images(self.bucket).await {
            Ok(images) => {
                debug!(bucket = %self.bucket, count = images.len(), "Gallery loaded");
                self.images = images;
                self.current_page = 1;
                self.state = GalleryState::Ready;
                Ok(&self.images)
            }
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "Gallery load failed");
                self.state = GalleryState::Error(
                    "Error loading images. Please try again later.".to_string(),
                );
                Err(e)
            }
        }
    }

    /// Manual retry/refresh; same as [`load`](Self::load)
    pub async fn refresh(&mut self) -> Result<&[RemoteImage], RemoteError> {
        self.load().await
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn images(&self) -> &[RemoteImage] {
        &self.images
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.images.len(), self.page_size)
    }

    /// Images on the current page
    pub fn page_images(&self) -> &[RemoteImage] {
        paginate(&self.images, self.page_size, self.current_page)
    }

    /// Moves to the next page; no-op on the last page
    pub fn next_page(&mut self) -> usize {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
        self.current_page
    }

    /// Moves to the previous page; no-op on the first page
    pub fn prev_page(&mut self) -> usize {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
        self.current_page
    }

    /// Jumps to `page`, clamped to `1..=total_pages`
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let last = self.total_pages().max(1);
        self.current_page = page.clamp(1, last);
        self.current_page
    }
}

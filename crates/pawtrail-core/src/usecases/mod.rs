//! Use cases (interactors) for Pawtrail
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`SessionManager`] - Lazy, memoized OAuth session for uploads
//! - [`GalleryViewModel`] - One bucket's listing, pagination and refresh
//! - [`recent_images`] - Newest images across both buckets
//! - [`upload_batch`] - Sequential multi-file upload with per-file results
//! - [`upload_paths`] - Same, reading the files from disk first

pub mod batch_upload;
pub mod gallery;
pub mod recent;
pub mod session;

pub use batch_upload::{upload_batch, upload_paths, BatchReport, FailedUpload};
pub use gallery::{paginate, total_pages, GalleryState, GalleryViewModel, DEFAULT_PAGE_SIZE};
pub use recent::{recent_images, TaggedImage, DEFAULT_RECENT_LIMIT};
pub use session::SessionManager;

//! Integration tests for pawtrail-drive
//!
//! Uses wiremock to simulate the Google Drive v3 API and verifies
//! end-to-end behavior of listing, uploads, permission grants,
//! downloads and the configuration gate.

mod common;

mod test_download;
mod test_listing;
mod test_setup;
mod test_upload;

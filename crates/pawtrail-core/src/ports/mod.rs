//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IFolderStore`] - Bucket listing, upload and download
//! - [`IAuthenticator`] - Provider OAuth initialization and sign-in

pub mod authenticator;
pub mod folder_store;

pub use authenticator::IAuthenticator;
pub use folder_store::IFolderStore;

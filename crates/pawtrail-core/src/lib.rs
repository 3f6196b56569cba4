//! Pawtrail Core - Domain logic for the lost and found pet photo board
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Bucket`, `RemoteImage`, `UploadFile`, `UploadSession`, `ShareLinks`
//! - **Use cases** - `SessionManager`, `GalleryViewModel`, `recent_images`, `upload_batch`
//! - **Port definitions** - Traits for adapters: `IFolderStore`, `IAuthenticator`
//! - **Configuration** - YAML config with environment overrides
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;

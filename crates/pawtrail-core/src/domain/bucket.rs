//! Buckets: the two logical image groupings
//!
//! Every image lives in exactly one of two provider folders, one for pets
//! reported lost and one for pets reported found. [`BucketFolders`] is the
//! only place that knows which folder backs which bucket.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::FolderId;

/// Logical image grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Photos of pets that have gone missing
    Lost,
    /// Photos of pets that were found
    Found,
}

impl Bucket {
    /// Both buckets, lost first
    pub const ALL: [Bucket; 2] = [Bucket::Lost, Bucket::Found];

    /// Machine label used in config keys and CLI arguments
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Lost => "lost",
            Bucket::Found => "found",
        }
    }

    /// Human title for gallery headers
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Lost => "Lost pets",
            Bucket::Found => "Found pets",
        }
    }

    /// Adjective used in generated descriptions and share text
    pub fn adjective(&self) -> &'static str {
        match self {
            Bucket::Lost => "lost",
            Bucket::Found => "found",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = DomainError;

    /// Accepts `lost`/`found` and the legacy `perdidos`/`encontrados` labels,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" | "perdidos" => Ok(Bucket::Lost),
            "found" | "encontrados" => Ok(Bucket::Found),
            _ => Err(DomainError::InvalidBucket(s.to_string())),
        }
    }
}

/// Fixed mapping from bucket to provider folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketFolders {
    lost: FolderId,
    found: FolderId,
}

impl BucketFolders {
    pub fn new(lost: FolderId, found: FolderId) -> Self {
        Self { lost, found }
    }

    /// Returns the folder backing `bucket`
    pub fn folder_id(&self, bucket: Bucket) -> &FolderId {
        match bucket {
            Bucket::Lost => &self.lost,
            Bucket::Found => &self.found,
        }
    }
}

//! RemoteImage domain entity
//!
//! A `RemoteImage` is built fresh from every listing response and never
//! persisted. Only its [`RemoteId`] is stable across listings.
//!
//! Each image carries an ordered list of candidate URLs. None of them is
//! guaranteed to be embeddable everywhere, so consumers walk the list with a
//! [`FallbackCursor`] and fall back to a placeholder once it is exhausted.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::errors::DomainError;
use super::newtypes::RemoteId;

/// One stored photo object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteImage {
    id: RemoteId,
    name: String,
    created_time: DateTime<Utc>,
    size: Option<u64>,
    url_candidates: Vec<String>,
    thumbnail_link: Option<String>,
    web_view_link: Option<String>,
}

impl RemoteImage {
    /// Creates a new RemoteImage
    ///
    /// # Errors
    /// Returns [`DomainError::ValidationFailed`] if `url_candidates` is empty
    pub fn new(
        id: RemoteId,
        name: impl Into<String>,
        created_time: DateTime<Utc>,
        size: Option<u64>,
        url_candidates: Vec<String>,
    ) -> Result<Self, DomainError> {
        if url_candidates.is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "image {id} has no URL candidates"
            )));
        }

        Ok(Self {
            id,
            name: name.into(),
            created_time,
            size,
            url_candidates,
            thumbnail_link: None,
            web_view_link: None,
        })
    }

    /// Attaches the provider-reported thumbnail and web-view links
    pub fn with_provider_links(
        mut self,
        thumbnail_link: Option<String>,
        web_view_link: Option<String>,
    ) -> Self {
        self.thumbnail_link = thumbnail_link;
        self.web_view_link = web_view_link;
        self
    }

    pub fn id(&self) -> &RemoteId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_time(&self) -> DateTime<Utc> {
        self.created_time
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Candidate URLs, most preferred first. Never empty.
    pub fn url_candidates(&self) -> &[String] {
        &self.url_candidates
    }

    /// The most preferred URL
    pub fn primary_url(&self) -> &str {
        // Non-empty by construction
        &self.url_candidates[0]
    }

    pub fn thumbnail_link(&self) -> Option<&str> {
        self.thumbnail_link.as_deref()
    }

    pub fn web_view_link(&self) -> Option<&str> {
        self.web_view_link.as_deref()
    }

    /// Starts a fallback walk over the URL candidates
    pub fn fallback(&self) -> FallbackCursor<'_> {
        FallbackCursor {
            candidates: &self.url_candidates,
            index: 0,
        }
    }

    /// Size rendered for humans, e.g. `1.5 MB`
    pub fn human_size(&self) -> String {
        match self.size {
            Some(bytes) => format_file_size(bytes),
            None => "unknown size".to_string(),
        }
    }
}

// ============================================================================
// Fallback cursor
// ============================================================================

/// What a consumer should render for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource<'a> {
    /// Try this URL
    Url(&'a str),
    /// Every candidate failed; show a placeholder instead of a broken image
    Placeholder,
}

/// Walks an image's URL candidates in preference order
#[derive(Debug, Clone)]
pub struct FallbackCursor<'a> {
    candidates: &'a [String],
    index: usize,
}

impl<'a> FallbackCursor<'a> {
    /// The source to render right now
    pub fn current(&self) -> RenderSource<'a> {
        match self.candidates.get(self.index) {
            Some(url) => RenderSource::Url(url.as_str()),
            None => RenderSource::Placeholder,
        }
    }

    /// Records a render failure for the current URL and moves to the next one
    pub fn advance(&mut self) -> RenderSource<'a> {
        if self.index < self.candidates.len() {
            self.index += 1;
        }
        self.current()
    }

    /// True once every candidate has failed
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.candidates.len()
    }
}

// ============================================================================
// Size formatting
// ============================================================================

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count with binary units, rounded to two decimals
pub fn format_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

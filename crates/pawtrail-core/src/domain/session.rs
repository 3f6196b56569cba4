//! Upload session domain types
//!
//! An [`UploadSession`] holds the provider-issued access token used for
//! authenticated writes. It lives only in memory for the life of the
//! process; see [`crate::usecases::SessionManager`] for its lifecycle.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Lifecycle phase of the session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing has been attempted yet
    Uninitialized,
    /// Initialization or sign-in is in flight
    Loading,
    /// A session is cached and will be reused
    Ready,
    /// The last attempt failed; the next call starts over
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Uninitialized => write!(f, "uninitialized"),
            SessionPhase::Loading => write!(f, "loading"),
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Ephemeral auth state for uploads
#[derive(Clone, PartialEq, Eq)]
pub struct UploadSession {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl UploadSession {
    /// Creates a session from a bearer token and its expiry
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Creates a session that expires `lifetime` from now
    pub fn expiring_in(access_token: impl Into<String>, lifetime: Duration) -> Self {
        Self::new(access_token, Utc::now() + lifetime)
    }

    /// Bearer token for the `Authorization` header
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token's validity window has passed
    ///
    /// Informational only: the session manager never checks expiry, an
    /// expired token surfaces as a provider rejection.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl fmt::Debug for UploadSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadSession")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let live = UploadSession::expiring_in("tok", Duration::hours(1));
        assert!(!live.is_expired());

        let dead = UploadSession::new("tok", Utc::now() - Duration::seconds(1));
        assert!(dead.is_expired());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = UploadSession::expiring_in("super-secret", Duration::hours(1));
        let printed = format!("{session:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SessionPhase::Uninitialized.to_string(), "uninitialized");
        assert_eq!(SessionPhase::Ready.to_string(), "ready");
        assert_eq!(SessionPhase::Failed.to_string(), "failed");
    }
}

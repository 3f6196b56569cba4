//! Upload session manager
//!
//! Lazily establishes one OAuth session and memoizes it for the life of the
//! process. The manager is an explicitly owned object: adapters receive it as
//! an `Arc<SessionManager>` and call [`SessionManager::ensure_session`]
//! before every authenticated write.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --ensure_session--> Loading --ok--> Ready (reused indefinitely)
//!                                          \--err--> Failed (next call starts over)
//! ```
//!
//! Client initialization sits in a [`OnceCell`], so concurrent callers await
//! the same in-flight initialization. Sign-in runs under the session lock,
//! so two concurrent callers trigger at most one interactive prompt.
//!
//! There is no expiry check. An expired token surfaces as an upload error;
//! callers that want to force re-consent call [`SessionManager::invalidate`].

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::domain::{RemoteError, SessionPhase, UploadSession};
use crate::ports::IAuthenticator;

/// Owner of the process-wide upload session
pub struct SessionManager {
    authenticator: Arc<dyn IAuthenticator>,
    initialized: OnceCell<()>,
    session: Mutex<Option<UploadSession>>,
    phase: StdMutex<SessionPhase>,
}

impl SessionManager {
    /// Creates a manager that will authenticate through `authenticator`
    pub fn new(authenticator: Arc<dyn IAuthenticator>) -> Self {
        Self {
            authenticator,
            initialized: OnceCell::new(),
            session: Mutex::new(None),
            phase: StdMutex::new(SessionPhase::Uninitialized),
        }
    }

    /// Returns the current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: SessionPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Returns the cached session, initializing and signing in on first use
    ///
    /// # Errors
    /// Returns [`RemoteError::AuthInit`] if the auth client cannot be
    /// initialized or the user does not complete sign-in
    pub async fn ensure_session(&self) -> Result<UploadSession, RemoteError> {
        let mut cached = self.session.lock().await;
        if let Some(session) = cached.as_ref() {
            debug!("Reusing cached upload session");
            return Ok(session.clone());
        }

        self.set_phase(SessionPhase::Loading);

        match self.acquire().await {
            Ok(session) => {
                *cached = Some(session.clone());
                self.set_phase(SessionPhase::Ready);
                info!("Upload session established");
                Ok(session)
            }
            Err(e) => {
                self.set_phase(SessionPhase::Failed);
                warn!(error = %e, "Failed to establish upload session");
                Err(e)
            }
        }
    }

    async fn acquire(&self) -> Result<UploadSession, RemoteError> {
        self.initialized
            .get_or_try_init(|| self.authenticator.initialize())
            .await
            .map_err(into_auth_init)?;

        debug!("Auth client ready, starting interactive sign-in");
        self.authenticator.sign_in().await.map_err(into_auth_init)
    }

    /// Drops the cached session so the next call signs in again
    pub async fn invalidate(&self) {
        let mut cached = self.session.lock().await;
        if cached.take().is_some() {
            info!("Upload session invalidated");
            self.set_phase(SessionPhase::Uninitialized);
        }
    }

    /// True if a session is cached
    pub async fn is_signed_in(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

fn into_auth_init(err: RemoteError) -> RemoteError {
    match err {
        RemoteError::AuthInit(_) => err,
        other => RemoteError::AuthInit(other.to_string()),
    }
}

//! Authenticator port (driven/secondary port)
//!
//! Abstracts the provider's OAuth machinery so the session lifecycle in
//! [`crate::usecases::SessionManager`] can be tested without a browser.

use crate::domain::{RemoteError, UploadSession};

/// Port trait for the provider's auth flow
#[async_trait::async_trait]
pub trait IAuthenticator: Send + Sync {
    /// Prepares the auth client (endpoints, client id, scope)
    ///
    /// Called at most once per successful initialization. Failures are
    /// reported as [`RemoteError::AuthInit`].
    async fn initialize(&self) -> Result<(), RemoteError>;

    /// Runs the interactive consent flow and returns a fresh session
    async fn sign_in(&self) -> Result<UploadSession, RemoteError>;
}

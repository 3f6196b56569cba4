//! OAuth2 PKCE authentication flow for Google Drive uploads
//!
//! Implements the Authorization Code flow with PKCE (RFC 7636) for a native
//! desktop client registered with Google. Listing and downloading only need
//! the API key; this flow exists to obtain the bearer token uploads require.
//!
//! ## Components
//!
//! - [`OAuth2Config`] - Configuration for the OAuth2 flow
//! - [`PKCEFlow`] - OAuth2 PKCE challenge/exchange logic
//! - [`LocalCallbackServer`] - Minimal HTTP server for the OAuth redirect
//! - [`GoogleAuthAdapter`] - [`IAuthenticator`] implementation driving the
//!   full interactive flow
//!
//! Tokens are kept in memory only, by the session manager. Nothing is written
//! to disk or to a keyring.

use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use pawtrail_core::config::DEFAULT_REDIRECT_URI;
use pawtrail_core::domain::{RemoteError, UploadSession};
use pawtrail_core::ports::IAuthenticator;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Google OAuth2 authorization endpoint
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Per-file Drive access: only files created by this app
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

// ============================================================================
// OAuth2Config
// ============================================================================

/// Configuration for the OAuth2 PKCE authentication flow
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    /// OAuth client ID from the Google Cloud console
    pub client_id: String,
    /// Client secret; Google issues one even for desktop clients
    pub client_secret: Option<String>,
    /// Redirect URI for receiving the authorization code
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl OAuth2Config {
    /// Creates a new OAuth2Config with the given client ID and default settings
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: vec![DRIVE_FILE_SCOPE.to_string()],
        }
    }

    /// Sets the client secret
    pub fn with_client_secret(mut self, secret: Option<String>) -> Self {
        self.client_secret = secret.filter(|s| !s.is_empty());
        self
    }

    /// Creates a config with a custom redirect URI
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }
}

// ============================================================================
// PKCEFlow
// ============================================================================

type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// OAuth2 PKCE flow implementation using the `oauth2` crate
///
/// Handles generating authorization URLs with PKCE challenges and
/// exchanging authorization codes for an [`UploadSession`].
pub struct PKCEFlow {
    client: GoogleClient,
    scopes: Vec<String>,
    http: reqwest::Client,
}

impl PKCEFlow {
    /// Creates a new PKCEFlow with the given configuration
    pub fn new(config: &OAuth2Config) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            return Err(anyhow!("OAuth client ID is empty"));
        }

        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).context("Invalid authorization URL")?)
            .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).context("Invalid token URL")?)
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone()).context("Invalid redirect URI")?,
            );
        if let Some(secret) = &config.client_secret {
            client = client.set_client_secret(ClientSecret::new(secret.clone()));
        }

        // The token endpoint must not be followed through redirects
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build token HTTP client")?;

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
            http,
        })
    }

    /// Generates an authorization URL with a PKCE challenge
    ///
    /// # Returns
    /// A tuple of `(authorization_url, csrf_token, pkce_verifier)`.
    /// The `pkce_verifier` must be kept until the code exchange step.
    pub fn generate_auth_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.set_pkce_challenge(pkce_challenge).url();

        debug!("Generated authorization URL");
        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    /// Exchanges an authorization code for an upload session
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<UploadSession> {
        info!("Exchanging authorization code for tokens");

        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&self.http)
            .await
            .context("Failed to exchange authorization code")?;

        let lifetime = token_result
            .expires_in()
            .map(|d| Duration::seconds(d.as_secs() as i64))
            .unwrap_or_else(|| Duration::hours(1));

        Ok(UploadSession::expiring_in(
            token_result.access_token().secret().to_string(),
            lifetime,
        ))
    }
}

// ============================================================================
// LocalCallbackServer
// ============================================================================

/// Minimal HTTP server that listens on loopback for the OAuth2 redirect.
///
/// Binds before the browser is opened so the redirect can never arrive
/// ahead of the listener. Answers the first request with a result page and
/// hands the extracted parameters back to the caller.
pub struct LocalCallbackServer {
    listener: TcpListener,
    callback_path: String,
}

/// Parameters extracted from the OAuth2 callback
#[derive(Debug, PartialEq, Eq)]
pub struct CallbackParams {
    /// The authorization code
    pub code: String,
    /// The CSRF state parameter
    pub state: String,
}

impl LocalCallbackServer {
    /// Binds the listener on the host and port of `redirect_uri`
    pub async fn bind(redirect_uri: &str) -> Result<Self> {
        let addr = callback_addr(redirect_uri)?;
        let callback_path = url::Url::parse(redirect_uri)
            .context("Invalid redirect URI")?
            .path()
            .to_string();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind callback server to {addr}"))?;
        info!(addr = %addr, path = %callback_path, "OAuth callback server listening");
        Ok(Self {
            listener,
            callback_path,
        })
    }

    /// Waits for the OAuth redirect and returns its parameters
    ///
    /// Keeps accepting connections until a request for the redirect path
    /// arrives. Other requests (favicon, preconnects) get a 404 and are
    /// otherwise ignored. Fails if the provider redirected with an `error`
    /// (for example the user declined consent) or without a code.
    pub async fn wait(self) -> Result<CallbackParams> {
        use http_body_util::Full;
        use hyper::body::Bytes;
        use hyper::server::conn::http1;
        use hyper::service::service_fn;
        use hyper::{Request, StatusCode};
        use hyper_util::rt::TokioIo;
        use std::sync::Arc;
        use tokio::sync::{oneshot, Mutex};

        let (tx, mut rx) = oneshot::channel::<Result<CallbackParams, String>>();
        let tx = Arc::new(Mutex::new(Some(tx)));

        loop {
            tokio::select! {
                received = &mut rx => {
                    let params = received
                        .context("Callback server channel closed without receiving parameters")?
                        .map_err(|e| anyhow!("Authorization was not granted: {e}"))?;
                    info!("Received OAuth callback with authorization code");
                    return Ok(params);
                }
                accepted = self.listener.accept() => {
                    let (stream, _addr) =
                        accepted.context("Failed to accept connection on callback server")?;
                    let io = TokioIo::new(stream);
                    let tx = tx.clone();
                    let callback_path = self.callback_path.clone();

                    let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                        let tx = tx.clone();
                        let callback_path = callback_path.clone();
                        async move {
                            if req.uri().path() != callback_path {
                                debug!(path = %req.uri().path(), "Ignoring request outside the callback path");
                                let response = html_response(StatusCode::NOT_FOUND, String::new());
                                return Ok::<_, hyper::Error>(response.map(Full::<Bytes>::new));
                            }

                            let uri = req.uri().to_string();
                            debug!("Callback server received request: {}", uri);
                            let parsed = parse_callback(&uri);
                            let response = match &parsed {
                                Ok(_) => html_response(StatusCode::OK, success_html()),
                                Err(message) => {
                                    html_response(StatusCode::BAD_REQUEST, error_html(message))
                                }
                            };

                            if let Some(sender) = tx.lock().await.take() {
                                let _ = sender.send(parsed);
                            }
                            Ok::<_, hyper::Error>(response.map(Full::<Bytes>::new))
                        }
                    });

                    tokio::spawn(async move {
                        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                            warn!("Callback server connection error: {}", e);
                        }
                    });
                }
            }
        }
    }
}

/// Host and port to listen on, taken from the redirect URI
fn callback_addr(redirect_uri: &str) -> Result<String> {
    let url = url::Url::parse(redirect_uri).context("Invalid redirect URI")?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("Redirect URI has no host: {redirect_uri}"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| anyhow!("Redirect URI has no port: {redirect_uri}"))?;
    Ok(format!("{host}:{port}"))
}

fn html_response(status: hyper::StatusCode, html: String) -> hyper::Response<hyper::body::Bytes> {
    let mut response = hyper::Response::new(hyper::body::Bytes::from(html));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

/// Parses the callback URI
///
/// Returns the code and state, or the provider's error description.
fn parse_callback(uri: &str) -> std::result::Result<CallbackParams, String> {
    let url = url::Url::parse(&format!("http://localhost{}", uri))
        .map_err(|e| format!("Unreadable callback URL: {e}"))?;
    let mut code = None;
    let mut state = None;
    let mut error = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            "error" => error = Some(value.to_string()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(error);
    }

    Ok(CallbackParams {
        code: code.ok_or_else(|| "Missing authorization code in callback".to_string())?,
        state: state.unwrap_or_default(),
    })
}

/// Returns the HTML for a successful authentication page
fn success_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Pawtrail - Sign-in Successful</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Sign-in Successful</h1>
    <p>Pawtrail can now upload photos to Google Drive.</p>
    <p>You can close this window and return to Pawtrail.</p>
    <script>setTimeout(function() { window.close(); }, 3000);</script>
</body>
</html>"#
        .to_string()
}

/// Returns the HTML for an authentication error page
fn error_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Pawtrail - Sign-in Error</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Sign-in Error</h1>
    <p>{}</p>
    <p>Please close this window and try again.</p>
</body>
</html>"#,
        message
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    )
}

// ============================================================================
// GoogleAuthAdapter
// ============================================================================

/// Interactive Google sign-in behind the [`IAuthenticator`] port
///
/// `initialize` builds the [`PKCEFlow`] from the client configuration.
/// `sign_in` then:
///
/// 1. Binds the local callback server
/// 2. Opens the user's browser to the Google consent page
/// 3. Waits for the redirect and checks the CSRF state
/// 4. Exchanges the authorization code for an access token
pub struct GoogleAuthAdapter {
    config: OAuth2Config,
    flow: OnceLock<PKCEFlow>,
}

impl GoogleAuthAdapter {
    /// Creates a new GoogleAuthAdapter with the given configuration
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            config,
            flow: OnceLock::new(),
        }
    }

    /// Returns a reference to the current configuration
    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    async fn run_sign_in(&self, flow: &PKCEFlow) -> Result<UploadSession> {
        info!("Starting OAuth2 PKCE sign-in");

        let (auth_url, csrf_token, pkce_verifier) = flow.generate_auth_url();
        let server = LocalCallbackServer::bind(&self.config.redirect_uri).await?;

        info!("Opening browser for authentication");
        if let Err(e) = webbrowser::open(&auth_url) {
            warn!(error = %e, url = %auth_url, "Could not open a browser; open the URL manually");
        }

        let callback = server.wait().await?;
        if callback.state != *csrf_token.secret() {
            return Err(anyhow!("OAuth state mismatch; the callback was not for this sign-in"));
        }

        let session = flow.exchange_code(callback.code, pkce_verifier).await?;
        info!("OAuth2 PKCE sign-in completed");
        Ok(session)
    }
}

#[async_trait::async_trait]
impl IAuthenticator for GoogleAuthAdapter {
    async fn initialize(&self) -> std::result::Result<(), RemoteError> {
        if self.flow.get().is_some() {
            return Ok(());
        }
        let flow = PKCEFlow::new(&self.config).map_err(|e| RemoteError::AuthInit(format!("{e:#}")))?;
        let _ = self.flow.set(flow);
        debug!("Google auth client initialized");
        Ok(())
    }

    async fn sign_in(&self) -> std::result::Result<UploadSession, RemoteError> {
        let flow = self
            .flow
            .get()
            .ok_or_else(|| RemoteError::AuthInit("auth client not initialized".to_string()))?;
        self.run_sign_in(flow)
            .await
            .map_err(|e| RemoteError::AuthInit(format!("{e:#}")))
    }
}

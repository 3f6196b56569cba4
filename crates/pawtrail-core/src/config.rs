//! Configuration module for Pawtrail.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, environment overrides, validation, defaults, and a builder
//! pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{BucketFolders, DomainError, FolderId};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Pawtrail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub drive: DriveConfig,
    pub gallery: GalleryConfig,
    pub download: DownloadConfig,
    pub logging: LoggingConfig,
}

/// Google Drive credentials, folders and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Browser API key used for unauthenticated listing and downloads.
    pub api_key: Option<String>,
    /// OAuth client ID for the upload consent flow.
    pub client_id: Option<String>,
    /// OAuth client secret. Only needed for "web application" clients.
    pub client_secret: Option<String>,
    /// Folder backing the `lost` bucket.
    pub lost_folder_id: Option<String>,
    /// Folder backing the `found` bucket.
    pub found_folder_id: Option<String>,
    /// Drive v3 metadata endpoint.
    pub api_base_url: String,
    /// Drive v3 upload endpoint.
    pub upload_base_url: String,
    /// Loopback address the OAuth callback listens on.
    pub redirect_uri: String,
}

/// Gallery display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Images per gallery page.
    pub page_size: usize,
    /// Images in the recent feed.
    pub recent_limit: usize,
}

/// Download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Directory downloaded images are written to.
    pub dir: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/pawtrail/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("pawtrail")
            .join("config.yaml")
    }

    /// Write the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Environment overrides
// ---------------------------------------------------------------------------

/// Environment variable names and the credential each one overrides.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PAWTRAIL_DRIVE_API_KEY", "drive.api_key"),
    ("PAWTRAIL_CLIENT_ID", "drive.client_id"),
    ("PAWTRAIL_CLIENT_SECRET", "drive.client_secret"),
    ("PAWTRAIL_LOST_FOLDER_ID", "drive.lost_folder_id"),
    ("PAWTRAIL_FOUND_FOLDER_ID", "drive.found_folder_id"),
];

impl Config {
    /// Apply `PAWTRAIL_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary lookup. Unset or empty values leave
    /// the loaded setting untouched.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, field) in ENV_OVERRIDES {
            let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let slot = match *field {
                "drive.api_key" => &mut self.drive.api_key,
                "drive.client_id" => &mut self.drive.client_id,
                "drive.client_secret" => &mut self.drive.client_secret,
                "drive.lost_folder_id" => &mut self.drive.lost_folder_id,
                "drive.found_folder_id" => &mut self.drive.found_folder_id,
                _ => continue,
            };
            tracing::debug!(field = %field, "Config value overridden from environment");
            *slot = Some(value);
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8400/callback";

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            client_id: None,
            client_secret: None,
            lost_folder_id: None,
            found_folder_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            recent_limit: 5,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        let dir = dirs::download_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join("Downloads")
        });
        Self { dir }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Drive credential helpers
// ---------------------------------------------------------------------------

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DriveConfig {
    /// Required credentials that are unset or empty, as dotted field paths.
    ///
    /// `client_secret` is optional and never reported.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let required = [
            ("drive.api_key", &self.api_key),
            ("drive.client_id", &self.client_id),
            ("drive.lost_folder_id", &self.lost_folder_id),
            ("drive.found_folder_id", &self.found_folder_id),
        ];
        required
            .into_iter()
            .filter(|(_, value)| present(value).is_none())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn api_key(&self) -> Option<&str> {
        present(&self.api_key)
    }

    pub fn client_id(&self) -> Option<&str> {
        present(&self.client_id)
    }

    pub fn client_secret(&self) -> Option<&str> {
        present(&self.client_secret)
    }

    /// Resolves the bucket-to-folder mapping.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidFolderId`] if either folder is unset or malformed
    pub fn bucket_folders(&self) -> Result<BucketFolders, DomainError> {
        let lost = FolderId::new(self.lost_folder_id.clone().unwrap_or_default())?;
        let found = FolderId::new(self.found_folder_id.clone().unwrap_or_default())?;
        Ok(BucketFolders::new(lost, found))
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"gallery.page_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn check_http_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(ValidationError {
            field: field.into(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: field.into(),
            message: format!("invalid URL '{value}': {e}"),
        }),
    }
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. Missing credentials
    /// are not validation errors; see [`DriveConfig::missing_credentials`].
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- drive ---
        check_http_url("drive.api_base_url", &self.drive.api_base_url, &mut errors);
        check_http_url(
            "drive.upload_base_url",
            &self.drive.upload_base_url,
            &mut errors,
        );
        check_http_url("drive.redirect_uri", &self.drive.redirect_uri, &mut errors);

        for (field, value) in [
            ("drive.lost_folder_id", &self.drive.lost_folder_id),
            ("drive.found_folder_id", &self.drive.found_folder_id),
        ] {
            if let Some(id) = present(value) {
                if let Err(e) = FolderId::new(id.to_string()) {
                    errors.push(ValidationError {
                        field: field.into(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let (Some(lost), Some(found)) = (
            present(&self.drive.lost_folder_id),
            present(&self.drive.found_folder_id),
        ) {
            if lost == found {
                errors.push(ValidationError {
                    field: "drive.found_folder_id".into(),
                    message: "must differ from drive.lost_folder_id".into(),
                });
            }
        }

        // --- gallery ---
        if self.gallery.page_size == 0 {
            errors.push(ValidationError {
                field: "gallery.page_size".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.gallery.recent_limit == 0 {
            errors.push(ValidationError {
                field: "gallery.recent_limit".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use pawtrail_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .drive_api_key("AIza-example")
///     .drive_client_id("1234.apps.googleusercontent.com")
///     .drive_lost_folder_id("lostFolder")
///     .drive_found_folder_id("foundFolder")
///     .gallery_page_size(24)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- drive ---

    pub fn drive_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.drive.api_key = Some(key.into());
        self
    }

    pub fn drive_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.drive.client_id = Some(client_id.into());
        self
    }

    pub fn drive_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.drive.client_secret = Some(secret.into());
        self
    }

    pub fn drive_lost_folder_id(mut self, id: impl Into<String>) -> Self {
        self.config.drive.lost_folder_id = Some(id.into());
        self
    }

    pub fn drive_found_folder_id(mut self, id: impl Into<String>) -> Self {
        self.config.drive.found_folder_id = Some(id.into());
        self
    }

    pub fn drive_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.api_base_url = url.into();
        self
    }

    pub fn drive_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.upload_base_url = url.into();
        self
    }

    pub fn drive_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.drive.redirect_uri = uri.into();
        self
    }

    // --- gallery ---

    pub fn gallery_page_size(mut self, n: usize) -> Self {
        self.config.gallery.page_size = n;
        self
    }

    pub fn gallery_recent_limit(mut self, n: usize) -> Self {
        self.config.gallery.recent_limit = n;
        self
    }

    // --- download ---

    pub fn download_dir(mut self, dir: PathBuf) -> Self {
        self.config.download.dir = dir;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

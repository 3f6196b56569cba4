//! Config command - View and manage Pawtrail configuration
//!
//! Provides the `pawtrail config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON), secrets masked
//! 2. Validates the configuration file and reports errors
//! 3. Sets individual configuration values via dot-notation keys
//! 4. Walks through the Drive setup, saving any credentials given as flags

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use pawtrail_core::config::Config;
use tracing::info;

use super::Session;

const MASK: &str = "********";

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "gallery.page_size")
        key: String,
        /// New value
        value: String,
    },
    /// Save Drive credentials and show what is still missing
    Setup {
        /// Browser API key
        #[arg(long)]
        api_key: Option<String>,
        /// OAuth client ID
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret
        #[arg(long)]
        client_secret: Option<String>,
        /// Drive folder ID for the lost bucket
        #[arg(long)]
        lost_folder_id: Option<String>,
        /// Drive folder ID for the found bucket
        #[arg(long)]
        found_folder_id: Option<String>,
    },
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, session: &Session) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(session),
            ConfigCommand::Validate => self.execute_validate(session),
            ConfigCommand::Set { key, value } => self.execute_set(session, key, value),
            ConfigCommand::Setup {
                api_key,
                client_id,
                client_secret,
                lost_folder_id,
                found_folder_id,
            } => {
                let values = [
                    ("drive.api_key", api_key),
                    ("drive.client_id", client_id),
                    ("drive.client_secret", client_secret),
                    ("drive.lost_folder_id", lost_folder_id),
                    ("drive.found_folder_id", found_folder_id),
                ];
                self.execute_setup(session, &values)
            }
        }
    }

    /// Show the effective configuration, environment overrides included
    fn execute_show(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let config = masked(&session.config);

        info!(config_path = %session.config_path.display(), "Showing configuration");

        if session.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!(
                "Configuration ({})",
                session.config_path.display()
            ));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    /// Validate the configuration file on disk
    fn execute_validate(&self, session: &Session) -> Result<()> {
        let formatter = session.formatter();
        let config_path = &session.config_path;

        // Load explicitly so parse errors are reported instead of defaulted
        let mut config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                let message = if config_path.exists() {
                    format!("Failed to parse configuration: {e}")
                } else {
                    "Configuration file not found".to_string()
                };

                if session.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [message],
                    }));
                } else {
                    formatter.error(&message);
                    formatter.info(&format!("File: {}", config_path.display()));
                    formatter.info("Run 'pawtrail config setup' to create one.");
                }
                return Ok(());
            }
        };
        config.apply_env_overrides();

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();
        let missing = config.drive.missing_credentials();

        if session.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
                "missing": missing,
            }));
            return Ok(());
        }

        if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if !missing.is_empty() {
            formatter.warn(&format!(
                "Drive is not fully configured, missing: {}",
                missing.join(", ")
            ));
        }

        Ok(())
    }

    /// Set one value using dot-notation and save the file
    fn execute_set(&self, session: &Session, key: &str, value: &str) -> Result<()> {
        let formatter = session.formatter();
        let config_path = &session.config_path;
        let mut config = load_for_edit(config_path)?;

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if session.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (key, help) in SUPPORTED_KEYS {
                    formatter.info(&format!("  {key:<24} - {help}"));
                }
            }
            return Ok(());
        }

        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            if session.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "errors": messages,
                }));
            } else {
                formatter.error(&format!(
                    "Invalid value for '{}': {}",
                    key,
                    messages.join("; ")
                ));
            }
            return Ok(());
        }

        config
            .save(config_path)
            .context("Failed to write configuration file")?;

        if session.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Set {}", key));
            formatter.info(&format!("Saved to {}", config_path.display()));
        }

        Ok(())
    }

    /// Save the given credentials, then report what is still missing
    fn execute_setup(&self, session: &Session, values: &[(&str, &Option<String>)]) -> Result<()> {
        let formatter = session.formatter();
        let config_path = &session.config_path;
        let mut config = load_for_edit(config_path)?;

        let mut changed = !config_path.exists();
        for (key, value) in values {
            if let Some(value) = value {
                apply_config_value(&mut config, key, value)?;
                changed = true;
            }
        }

        if changed {
            config
                .save(config_path)
                .context("Failed to write configuration file")?;
            info!(config_path = %config_path.display(), "Configuration saved");
        }

        // Environment variables count towards what is already set up
        config.apply_env_overrides();
        let missing = config.drive.missing_credentials();

        if session.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": missing.is_empty(),
                "config_path": config_path.display().to_string(),
                "saved": changed,
                "missing": missing,
            }));
            return Ok(());
        }

        if changed {
            formatter.success(&format!("Saved {}", config_path.display()));
        }

        if missing.is_empty() {
            formatter.success("Google Drive is configured");
            formatter.info("Try 'pawtrail gallery lost'.");
        } else {
            for line in pawtrail_drive::setup_instructions(&missing).lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }
}

const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("drive.api_key", "Browser API key"),
    ("drive.client_id", "OAuth client ID"),
    ("drive.client_secret", "OAuth client secret"),
    ("drive.lost_folder_id", "Folder ID for lost pets"),
    ("drive.found_folder_id", "Folder ID for found pets"),
    ("drive.api_base_url", "Drive v3 API endpoint"),
    ("drive.upload_base_url", "Drive v3 upload endpoint"),
    ("drive.redirect_uri", "OAuth loopback callback"),
    ("gallery.page_size", "Images per gallery page"),
    ("gallery.recent_limit", "Images in the recent feed"),
    ("download.dir", "Default download directory"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Apply a dot-notation key/value pair to a Config struct
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let optional = || {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    };

    match key {
        // --- drive ---
        "drive.api_key" => config.drive.api_key = optional(),
        "drive.client_id" => config.drive.client_id = optional(),
        "drive.client_secret" => config.drive.client_secret = optional(),
        "drive.lost_folder_id" => config.drive.lost_folder_id = optional(),
        "drive.found_folder_id" => config.drive.found_folder_id = optional(),
        "drive.api_base_url" => config.drive.api_base_url = value.to_string(),
        "drive.upload_base_url" => config.drive.upload_base_url = value.to_string(),
        "drive.redirect_uri" => config.drive.redirect_uri = value.to_string(),

        // --- gallery ---
        "gallery.page_size" => {
            config.gallery.page_size = value
                .parse::<usize>()
                .context("Expected a positive integer for gallery.page_size")?;
        }
        "gallery.recent_limit" => {
            config.gallery.recent_limit = value
                .parse::<usize>()
                .context("Expected a positive integer for gallery.recent_limit")?;
        }

        // --- download ---
        "download.dir" => config.download.dir = PathBuf::from(value),

        // --- logging ---
        "logging.level" => config.logging.level = value.to_string(),

        _ => bail!("Unknown configuration key: {}", key),
    }

    Ok(())
}

/// Loads the file that `set` and `setup` are about to rewrite
///
/// A missing file starts from defaults. A file that exists but does not
/// parse is an error, so it is never overwritten.
fn load_for_edit(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }
    Config::load(config_path).with_context(|| {
        format!(
            "Failed to parse configuration at {}; fix it or run 'pawtrail config validate'. The file was not modified",
            config_path.display()
        )
    })
}

/// Copy of `config` with secrets replaced for display
fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    for secret in [&mut shown.drive.api_key, &mut shown.drive.client_secret] {
        if secret.is_some() {
            *secret = Some(MASK.to_string());
        }
    }
    shown
}

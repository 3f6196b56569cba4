//! CLI subcommands
//!
//! Every subcommand receives the shared [`Session`]: the resolved config
//! file path, the loaded configuration with environment overrides applied,
//! and the output format.

pub mod config;
pub mod download;
pub mod gallery;
pub mod recent;
pub mod share;
pub mod upload;

use std::path::PathBuf;

use anyhow::Result;
use pawtrail_core::config::Config;
use pawtrail_drive::{DriveAvailability, DriveFolderStore};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// State shared by all subcommands for one invocation
pub struct Session {
    pub config_path: PathBuf,
    pub config: Config,
    pub format: OutputFormat,
}

impl Session {
    /// Loads the config file (or defaults) and applies `PAWTRAIL_*` overrides
    pub fn load(custom_path: Option<PathBuf>, format: OutputFormat) -> Self {
        let config_path = custom_path.unwrap_or_else(Config::default_path);
        let mut config = Config::load_or_default(&config_path);
        config.apply_env_overrides();
        Self {
            config_path,
            config,
            format,
        }
    }

    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Connects to Drive, or prints setup instructions and returns `None`
    ///
    /// Never makes a network request.
    pub fn open_store(&self, formatter: &dyn OutputFormatter) -> Result<Option<DriveFolderStore>> {
        match pawtrail_drive::connect(&self.config.drive)? {
            DriveAvailability::Configured(store) => Ok(Some(store)),
            DriveAvailability::SetupRequired {
                missing,
                instructions,
            } => {
                if self.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "success": false,
                        "setup_required": true,
                        "missing": missing,
                        "config_path": self.config_path.display().to_string(),
                        "instructions": instructions,
                    }));
                } else {
                    formatter.error("Google Drive is not configured");
                    formatter.info("");
                    for line in instructions.lines() {
                        formatter.info(line);
                    }
                    formatter.info("");
                    formatter.info(&format!(
                        "Config file: {} (run 'pawtrail config setup')",
                        self.config_path.display()
                    ));
                }
                Ok(None)
            }
        }
    }
}

//! Pawtrail CLI - Command-line interface for Pawtrail
//!
//! Provides commands for:
//! - Browsing the lost and found galleries page by page
//! - Uploading photos into a bucket
//! - Downloading a photo by its ID
//! - Showing the most recent photos across both buckets
//! - Building share links
//! - Viewing and setting up configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    config::ConfigCommand, download::DownloadCommand, gallery::GalleryCommand,
    recent::RecentCommand, share::ShareCommand, upload::UploadCommand, Session,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "pawtrail",
    version,
    about = "Share and browse photos of lost and found pets"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of a bucket's gallery
    Gallery(GalleryCommand),
    /// Upload photos into a bucket
    Upload(UploadCommand),
    /// Download a photo by its ID
    Download(DownloadCommand),
    /// Show the newest photos across both buckets
    Recent(RecentCommand),
    /// Print share links for a photo
    Share(ShareCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let session = Session::load(cli.config, format);

    // Setup tracing
    let filter = match cli.verbose {
        0 => session.config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Gallery(cmd) => cmd.execute(&session).await,
        Commands::Upload(cmd) => cmd.execute(&session).await,
        Commands::Download(cmd) => cmd.execute(&session).await,
        Commands::Recent(cmd) => cmd.execute(&session).await,
        Commands::Share(cmd) => cmd.execute(&session).await,
        Commands::Config(cmd) => cmd.execute(&session).await,
    }
}

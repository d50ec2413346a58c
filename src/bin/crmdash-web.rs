//! CrmDash Web Server Binary
//!
//! This binary starts the CrmDash web server that provides a REST API
//! over the dashboard layout and global search.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3001, layout and data from config)
//! crmdash-web
//!
//! # Specify port and data file
//! crmdash-web --port 8080 --data ~/crm.json
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crmdash::config::Config;
use crmdash::services::{FileLayoutPersistence, RecordSet};
use crmdash::web;

/// CrmDash Web Server - REST API for the dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// CRM record data file (JSON). Defaults to the configured data file.
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Saved dashboard layout file. Defaults to the platform config directory:
    /// - Linux: ~/.config/CrmDash/layout.json
    /// - macOS: ~/Library/Application Support/CrmDash/layout.json
    /// - Windows: %APPDATA%\CrmDash\layout.json
    #[arg(long, value_name = "FILE")]
    layout_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, falling back to defaults
    let config = match Config::config_file_path() {
        Ok(path) => Config::load_from_or_default(&path),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "No config directory, using defaults");
            Config::new()
        }
    };

    let layout_file = match args.layout_file {
        Some(path) => path,
        None => config.paths.layout_file_or_default()?,
    };
    let data_file = args.data.or_else(|| config.paths.data_file.clone());
    let records = RecordSet::load_or_default(data_file.as_deref())
        .context("Failed to load CRM data")?;

    info!("Layout file: {}", layout_file.display());
    info!(records = records.total(), "Loaded CRM records");

    let state = web::AppState::new(
        Arc::new(FileLayoutPersistence::new(layout_file)),
        records,
        config.search_settings(),
    );

    // Build socket address
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    // Start the server
    web::run_server(state, addr).await
}

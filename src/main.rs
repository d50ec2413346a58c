//! CrmDash - Terminal CRM dashboard
//!
//! Launches the customizable dashboard with global search, or runs one of the
//! headless subcommands against the same layout and data files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crmdash::cli::{
    CliContext, CliError, CliResult, ConfigArgs, ExitCode, LayoutArgs, SearchArgs, WidgetsArgs,
};
use crmdash::config::Config;
use crmdash::constants::{APP_BINARY_NAME, APP_NAME};
use crmdash::services::{FileLayoutPersistence, RecordSet};
use crmdash::{logging, tui};

/// CrmDash - Terminal CRM dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// CRM record data file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    /// Saved dashboard layout file (JSON)
    #[arg(long, value_name = "FILE", global = true)]
    layout_file: Option<PathBuf>,

    /// Log file for the terminal dashboard
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the widget catalog
    Widgets(WidgetsArgs),
    /// Inspect or change the saved dashboard layout
    Layout(LayoutArgs),
    /// Search CRM records and settings pages
    Search(SearchArgs),
    /// Show or change the configuration file
    Config(ConfigArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run_command(cli: &Cli, command: &Commands, config: &Config) -> CliResult<()> {
    if let Err(e) = logging::init_stderr(cli.verbose) {
        eprintln!("Warning: {e:#}");
    }
    let context = CliContext::resolve(config, cli.data.clone(), cli.layout_file.clone())?;
    match command {
        Commands::Widgets(args) => args.execute(),
        Commands::Layout(args) => args.execute(&context),
        Commands::Search(args) => args.execute(&context),
        Commands::Config(args) => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to resolve config file: {e:#}")))?,
            };
            args.execute(config, &path)
        }
    }
}

fn run_dashboard(cli: &Cli, config: Config) -> Result<()> {
    let log_file = match &cli.log_file {
        Some(path) => path.clone(),
        None => Config::config_dir()?.join(format!("{APP_BINARY_NAME}.log")),
    };
    logging::init_file(&log_file, cli.verbose)?;
    info!("{} v{} starting", APP_NAME, env!("CARGO_PKG_VERSION"));

    let context = CliContext::resolve(&config, cli.data.clone(), cli.layout_file.clone())
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    let records = RecordSet::load_or_default(context.data_file.as_deref())?;
    info!(records = records.total(), "Loaded CRM records");
    let persistence = Arc::new(FileLayoutPersistence::new(&context.layout_file));

    let mut state = tui::AppState::new(config, Arc::new(records), persistence);

    let mut terminal = tui::setup_terminal()?;
    let result = tui::run_tui(&mut state, &mut terminal);
    tui::restore_terminal(terminal)?;

    info!("{} exiting", APP_NAME);
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(ExitCode::ValidationError.code());
        }
    };

    match &cli.command {
        Some(command) => {
            if let Err(e) = run_command(&cli, command, &config) {
                eprintln!("Error: {e}");
                std::process::exit(e.exit_code());
            }
            Ok(())
        }
        None => run_dashboard(&cli, config).context("Dashboard exited with an error"),
    }
}

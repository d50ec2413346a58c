//! Configuration management CLI commands.

use crate::cli::common::{CliError, CliResult};
use crate::config::{Config, ThemeMode};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Configuration management commands
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
}

/// Display current configuration
#[derive(Debug, Clone, Args)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Debug, Clone, Args)]
pub struct ConfigSetArgs {
    /// CRM record data file (JSON)
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Saved dashboard layout file (JSON)
    #[arg(long, value_name = "FILE")]
    layout_file: Option<PathBuf>,

    /// Characters required before search runs
    #[arg(long, value_name = "N")]
    min_query_len: Option<usize>,

    /// Maximum search results per record type
    #[arg(long, value_name = "N")]
    per_kind_limit: Option<usize>,

    /// Quiet period after typing before search runs
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Theme mode (auto, light, or dark)
    #[arg(long, value_name = "MODE")]
    theme: Option<String>,
}

impl ConfigArgs {
    /// Execute config subcommand against the config file at `path`
    pub fn execute(&self, config: &Config, path: &Path) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(config, path),
            ConfigCommand::Set(args) => args.execute(config, path),
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self, config: &Config, path: &Path) -> CliResult<()> {
        if self.json {
            let json = serde_json::to_string_pretty(config).map_err(|e| {
                CliError::io(format!("Failed to serialize configuration to JSON: {e}"))
            })?;
            println!("{json}");
        } else {
            output_human_readable(config, path);
        }
        Ok(())
    }
}

impl ConfigSetArgs {
    const fn is_empty(&self) -> bool {
        self.data_file.is_none()
            && self.layout_file.is_none()
            && self.min_query_len.is_none()
            && self.per_kind_limit.is_none()
            && self.debounce_ms.is_none()
            && self.theme.is_none()
    }

    /// Applies the given options to a copy of `config`.
    fn apply(&self, config: &Config) -> CliResult<Config> {
        let mut updated = config.clone();
        if let Some(path) = &self.data_file {
            updated.paths.data_file = Some(path.clone());
        }
        if let Some(path) = &self.layout_file {
            updated.paths.layout_file = Some(path.clone());
        }
        if let Some(value) = self.min_query_len {
            updated.search.min_query_len = value;
        }
        if let Some(value) = self.per_kind_limit {
            updated.search.per_kind_limit = value;
        }
        if let Some(value) = self.debounce_ms {
            updated.search.debounce_ms = value;
        }
        if let Some(theme) = &self.theme {
            updated.ui.theme_mode = parse_theme(theme)?;
        }
        updated
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e:#}")))?;
        Ok(updated)
    }

    /// Execute set command
    pub fn execute(&self, config: &Config, path: &Path) -> CliResult<()> {
        if self.is_empty() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --data-file, \
                 --layout-file, --min-query-len, --per-kind-limit, --debounce-ms, or --theme",
            ));
        }

        let updated = self.apply(config)?;
        updated
            .save_to(path)
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated: {}", path.display());
        Ok(())
    }
}

fn parse_theme(value: &str) -> CliResult<ThemeMode> {
    match value.to_lowercase().as_str() {
        "auto" => Ok(ThemeMode::Auto),
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        _ => Err(CliError::validation(
            "Invalid theme mode. Must be 'auto', 'light', or 'dark'",
        )),
    }
}

fn optional_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "(not configured)".to_string(), |p| p.display().to_string())
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config, path: &Path) {
    println!("CrmDash Configuration ({})", path.display());
    println!("=====================");
    println!();

    println!("Paths:");
    println!("  Data File:   {}", optional_path(config.paths.data_file.as_ref()));
    println!("  Layout File: {}", optional_path(config.paths.layout_file.as_ref()));
    println!();

    println!("Search:");
    println!("  Minimum Query Length: {}", config.search.min_query_len);
    println!("  Results Per Type:     {}", config.search.per_kind_limit);
    println!("  Debounce:             {} ms", config.search.debounce_ms);
    println!();

    let theme = format!("{:?}", config.ui.theme_mode).to_lowercase();
    println!("UI:");
    println!("  Theme Mode: {theme}");
    println!();
}

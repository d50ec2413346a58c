//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_DEBOUNCE_MS, DEFAULT_MIN_QUERY_LEN, DEFAULT_PER_KIND_LIMIT,
};
use crate::services::SearchSettings;

/// Longest accepted search quiet period, in milliseconds.
const MAX_DEBOUNCE_MS: u64 = 5000;

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// CRM record data file (JSON). Widgets show empty summaries without it.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Saved dashboard layout (JSON). Defaults to `layout.json` in the config directory.
    #[serde(default)]
    pub layout_file: Option<PathBuf>,
}

impl PathConfig {
    /// Resolves the layout file, falling back to the config directory.
    pub fn layout_file_or_default(&self) -> Result<PathBuf> {
        match &self.layout_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_dir()?.join("layout.json")),
        }
    }
}

/// Global search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Characters required before a lookup is issued
    pub min_query_len: usize,
    /// Maximum results per record type
    pub per_kind_limit: usize,
    /// Quiet period after the last keystroke, in milliseconds
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            per_kind_limit: DEFAULT_PER_KIND_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            min_query_len: config.min_query_len,
            per_kind_limit: config.per_kind_limit,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Display help on startup
    pub show_help_on_startup: bool,
    /// Theme mode preference (Auto, Dark, Light)
    pub theme_mode: ThemeMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_startup: false,
            theme_mode: ThemeMode::default(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/CrmDash/config.toml`
/// - macOS: `~/Library/Application Support/CrmDash/config.toml`
/// - Windows: `%APPDATA%\CrmDash\config.toml`
///
/// # Validation
///
/// - `search.min_query_len` must be at least 1
/// - `search.per_kind_limit` must be at least 1
/// - `search.debounce_ms` must not exceed 5000
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Search tuning
    #[serde(default)]
    pub search: SearchConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/CrmDash/`
    /// - macOS: `~/Library/Application Support/CrmDash/`
    /// - Windows: `%APPDATA%\CrmDash\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load_from`], but an unreadable or invalid file yields
    /// the defaults after logging a warning.
    #[must_use]
    pub fn load_from_or_default(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!(
                path = %config_path.display(),
                error = %format!("{e:#}"),
                "Failed to load config, using defaults"
            );
            Self::new()
        })
    }

    /// Saves configuration to an explicit path.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.search.min_query_len == 0 {
            anyhow::bail!("search.min_query_len must be at least 1");
        }
        if self.search.per_kind_limit == 0 {
            anyhow::bail!("search.per_kind_limit must be at least 1");
        }
        if self.search.debounce_ms > MAX_DEBOUNCE_MS {
            anyhow::bail!(
                "search.debounce_ms must be at most {MAX_DEBOUNCE_MS} (got {})",
                self.search.debounce_ms
            );
        }
        if let Some(data_file) = &self.paths.data_file {
            if data_file.is_dir() {
                anyhow::bail!("Data file path is a directory: {}", data_file.display());
            }
        }
        Ok(())
    }

    /// Search settings derived from this configuration.
    #[must_use]
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings::from(&self.search)
    }
}

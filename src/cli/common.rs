//! Shared CLI plumbing: error type, exit codes, and resolved paths.

use std::fmt;
use std::path::PathBuf;

use crate::config::Config;
use crate::services::{FileLayoutPersistence, RecordSet, SearchSettings};

/// Process exit codes used by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input (unknown widget key, index out of range, ...)
    ValidationError = 1,
    /// File could not be read, parsed, or written
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit status.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should terminate with
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// Input or state validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// File system or serialization failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Numeric process exit status.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Paths and settings resolved from global flags and the config file.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// CRM record data file, if any
    pub data_file: Option<PathBuf>,
    /// Saved layout file
    pub layout_file: PathBuf,
    /// Search tuning
    pub search: SearchSettings,
}

impl CliContext {
    /// Resolves paths, letting explicit flags override the config.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if no layout file is given and the config
    /// directory cannot be determined.
    pub fn resolve(
        config: &Config,
        data_file: Option<PathBuf>,
        layout_file: Option<PathBuf>,
    ) -> CliResult<Self> {
        let layout_file = match layout_file {
            Some(path) => path,
            None => config
                .paths
                .layout_file_or_default()
                .map_err(|e| CliError::io(format!("Failed to resolve layout file: {e}")))?,
        };
        Ok(Self {
            data_file: data_file.or_else(|| config.paths.data_file.clone()),
            layout_file,
            search: config.search_settings(),
        })
    }

    /// Persistence handle for the layout file.
    #[must_use]
    pub fn persistence(&self) -> FileLayoutPersistence {
        FileLayoutPersistence::new(&self.layout_file)
    }

    /// Loads the record set, or an empty one if no data file is configured.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the data file exists but cannot be loaded.
    pub fn records(&self) -> CliResult<RecordSet> {
        RecordSet::load_or_default(self.data_file.as_deref())
            .map_err(|e| CliError::io(format!("Failed to load data file: {e:#}")))
    }
}

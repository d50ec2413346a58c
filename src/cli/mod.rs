//! CLI command handlers for CrmDash.
//!
//! This module provides headless, scriptable access to the widget catalog,
//! the saved dashboard layout, global search, and the configuration file for automation and testing.

pub mod common;
pub mod config;
pub mod layout;
pub mod search;
pub mod widgets;

// Re-export types used by main.rs and tests
pub use common::{CliContext, CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use layout::LayoutArgs;
pub use search::SearchArgs;
pub use widgets::WidgetsArgs;

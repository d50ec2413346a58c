//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the dashboard grid geometry.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "CrmDash";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "crmdash";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "CrmDash";

/// Number of columns in the dashboard grid.
pub const GRID_COLUMNS: u16 = 12;

/// Tallest a single widget may be, in grid rows.
pub const MAX_WIDGET_HEIGHT: u16 = 8;

/// Default minimum number of characters before a search lookup is issued.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Default cap on results returned per record collection.
pub const DEFAULT_PER_KIND_LIMIT: usize = 5;

/// Default quiet period between the last keystroke and the lookup.
pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Longest meeting description shown as a search subtitle.
pub const MEETING_SUBTITLE_CHARS: usize = 50;

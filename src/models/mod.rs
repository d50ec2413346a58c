//! Data models for the dashboard layout, CRM records, and search results.
//!
//! This module contains the core data structures used throughout the application.
//! Models are designed to be independent of UI and business logic.

pub mod grid;
pub mod record;
pub mod search_result;
pub mod widget;

// Re-export all model types
pub use grid::GridRect;
pub use record::{Account, Contact, Deal, Lead, Meeting, Record, RecordKind, Task};
pub use search_result::SearchResult;
pub use widget::{PersistedLayout, WidgetDefinition, WidgetInstance};

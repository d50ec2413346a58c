//! Service layer for dashboard business logic.
//!
//! This module contains the layout state store and its controller, grid
//! packing, persistence, record lookup, and the global search engine. None of
//! it depends on the terminal or HTTP front ends.

pub mod grid;
pub mod layout_controller;
pub mod layout_store;
pub mod lookup_worker;
pub mod persistence;
pub mod records;
pub mod search;

// Re-export commonly used types
pub use grid::{pack, PlacedWidget};
pub use layout_controller::{LayoutController, SaveStatus};
pub use layout_store::LayoutStore;
pub use lookup_worker::LookupWorker;
pub use persistence::{FileLayoutPersistence, LayoutPersistence, MemoryLayoutPersistence};
pub use records::{RecordLookup, RecordSet};
pub use search::{
    HistoryRouter, LookupRequest, LookupResponse, ResultGroup, Router, SearchEngine, SearchKey,
    SearchOutcome, SearchSettings,
};

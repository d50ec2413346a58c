//! Reorder/toggle controller for the customization surface.
//!
//! The controller turns UI gestures into [`LayoutStore`] mutations. It owns no
//! layout state of its own beyond the save busy flag; saving hands the
//! projection back to the caller, who passes it to a
//! [`LayoutPersistence`](super::LayoutPersistence) implementation.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::LayoutStore;
use crate::models::{GridRect, PersistedLayout};

/// Save progress for the busy indicator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    /// No save has been attempted this session
    #[default]
    Idle,
    /// Save in flight
    Saving,
    /// Last save succeeded
    Saved,
    /// Last save failed with this message
    Failed(String),
}

impl std::fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Saving => write!(f, "Saving..."),
            Self::Saved => write!(f, "✓ Saved"),
            Self::Failed(error) => write!(f, "✗ Save failed: {error}"),
        }
    }
}

/// Thin orchestration layer over a [`LayoutStore`].
#[derive(Debug, Clone)]
pub struct LayoutController {
    store: LayoutStore,
    status: SaveStatus,
}

impl LayoutController {
    /// Wraps an initialized store.
    #[must_use]
    pub fn new(store: LayoutStore) -> Self {
        Self {
            store,
            status: SaveStatus::Idle,
        }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Current save status.
    #[must_use]
    pub const fn save_status(&self) -> &SaveStatus {
        &self.status
    }

    /// Returns true while a save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.status == SaveStatus::Saving
    }

    /// Flips the visibility switch of `key`.
    pub fn on_toggle(&mut self, key: &str) -> Option<bool> {
        self.store.toggle_visibility(key)
    }

    /// Completes a drag gesture.
    ///
    /// A release with no destination cancels the reorder. Returns true if the
    /// order changed.
    pub fn on_drag_end(&mut self, source: usize, destination: Option<usize>) -> bool {
        let Some(destination) = destination else {
            debug!(source, "Drag released outside any drop target");
            return false;
        };
        if source == destination {
            return false;
        }
        self.store.reorder(source, destination)
    }

    /// Applies a new grid rectangle to `key`.
    pub fn on_resize(&mut self, key: &str, rect: GridRect) -> Option<GridRect> {
        self.store.set_position(key, rect)
    }

    /// Restores catalog order with every widget visible.
    pub fn on_reset(&mut self) {
        self.store.reset_to_defaults();
    }

    /// Discards unsaved edits.
    pub fn on_cancel(&mut self) {
        self.store.restore_baseline();
        if !self.is_saving() {
            self.status = SaveStatus::Idle;
        }
    }

    /// Projects the current state for the persistence collaborator.
    ///
    /// Performs no I/O.
    #[must_use]
    pub fn on_save(&self) -> PersistedLayout {
        self.store.project()
    }

    /// Marks a save as in flight and returns the layout to write.
    ///
    /// Returns `None` if a save is already running.
    pub fn begin_save(&mut self) -> Option<PersistedLayout> {
        if self.is_saving() {
            debug!("Save already in progress");
            return None;
        }
        self.status = SaveStatus::Saving;
        Some(self.on_save())
    }

    /// Records the outcome of a save started with [`Self::begin_save`].
    ///
    /// On success `saved` becomes the new baseline. On failure the in-memory
    /// layout is left as is so the user can retry.
    pub fn finish_save(&mut self, saved: PersistedLayout, result: Result<()>) {
        match result {
            Ok(()) => {
                info!(visible = saved.visible.len(), "Dashboard layout saved");
                self.store.rebase(saved);
                self.status = SaveStatus::Saved;
            }
            Err(error) => {
                warn!("Failed to save dashboard layout: {error:#}");
                self.status = SaveStatus::Failed(format!("{error:#}"));
            }
        }
    }
}

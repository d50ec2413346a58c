//! Layout persistence collaborators.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::models::PersistedLayout;

/// Loads and stores the persisted dashboard layout.
///
/// Implementations must be shareable across threads so a save can run off
/// the UI thread.
pub trait LayoutPersistence: Send + Sync {
    /// Returns the stored layout, or an empty layout if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read or parsed.
    fn load(&self) -> Result<PersistedLayout>;

    /// Replaces the stored layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be written.
    fn save(&self, layout: &PersistedLayout) -> Result<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileLayoutPersistence {
    path: PathBuf,
}

impl FileLayoutPersistence {
    /// Creates a persistence handle for `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the layout file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutPersistence for FileLayoutPersistence {
    fn load(&self) -> Result<PersistedLayout> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No saved layout, using catalog defaults");
            return Ok(PersistedLayout::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read layout file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse layout file: {}", self.path.display()))
    }

    fn save(&self, layout: &PersistedLayout) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create layout directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp layout file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp layout file to: {}", self.path.display())
        })?;

        debug!(path = %self.path.display(), "Wrote layout file");
        Ok(())
    }
}

/// In-process store for callers that do not persist to disk.
#[derive(Debug, Default)]
pub struct MemoryLayoutPersistence {
    layout: Mutex<PersistedLayout>,
}

impl MemoryLayoutPersistence {
    /// Creates a store seeded with `layout`.
    #[must_use]
    pub fn new(layout: PersistedLayout) -> Self {
        Self {
            layout: Mutex::new(layout),
        }
    }
}

impl LayoutPersistence for MemoryLayoutPersistence {
    fn load(&self) -> Result<PersistedLayout> {
        let layout = self
            .layout
            .lock()
            .map_err(|_| anyhow::anyhow!("Layout store lock poisoned"))?;
        Ok(layout.clone())
    }

    fn save(&self, layout: &PersistedLayout) -> Result<()> {
        let mut stored = self
            .layout
            .lock()
            .map_err(|_| anyhow::anyhow!("Layout store lock poisoned"))?;
        *stored = layout.clone();
        Ok(())
    }
}

//! In-memory dashboard layout state.
//!
//! The store holds the ordered list of [`WidgetInstance`]s for one
//! customization session. It is rebuilt from a [`PersistedLayout`] every time
//! the customization surface opens and is only written back out through
//! [`LayoutStore::project`].
//!
//! All mutations address widgets by key. Positional indices are only
//! accepted at the UI boundary ([`LayoutStore::reorder`]) and are translated
//! to a key immediately, so an index computed against a stale render can
//! never shift the wrong widget.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::WidgetCatalog;
use crate::models::{GridRect, PersistedLayout, WidgetInstance};

/// Ordered widget instances for one session.
///
/// # Invariants
///
/// - Every key appears exactly once.
/// - The instance list covers exactly the catalog keys.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    catalog: Arc<WidgetCatalog>,
    instances: Vec<WidgetInstance>,
    baseline: PersistedLayout,
}

impl LayoutStore {
    /// Builds the instance list from a persisted layout.
    ///
    /// Keys from `persisted.order` that exist in the catalog come first, in
    /// persisted order, visible iff listed in `persisted.visible`. Catalog
    /// entries missing from the order are appended in catalog order with
    /// their own default visibility. Unknown and repeated keys are skipped.
    pub fn initialize(catalog: Arc<WidgetCatalog>, persisted: &PersistedLayout) -> Self {
        let instances = Self::build_instances(&catalog, persisted);
        debug!(
            widgets = instances.len(),
            persisted = persisted.order.len(),
            "Initialized dashboard layout"
        );
        Self {
            catalog,
            instances,
            baseline: persisted.clone(),
        }
    }

    fn build_instances(catalog: &WidgetCatalog, persisted: &PersistedLayout) -> Vec<WidgetInstance> {
        let visible: HashSet<&str> = persisted.visible.iter().map(String::as_str).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(catalog.len());
        let mut instances = Vec::with_capacity(catalog.len());

        for key in &persisted.order {
            let Some(definition) = catalog.get(key) else {
                continue;
            };
            if !seen.insert(definition.key.as_str()) {
                continue;
            }
            let mut instance = definition.instantiate(visible.contains(key.as_str()));
            if let Some(rect) = persisted.positions.get(key) {
                instance.position = rect.clamped();
            }
            instances.push(instance);
        }

        for definition in catalog.list_all() {
            if seen.contains(definition.key.as_str()) {
                continue;
            }
            let mut instance = definition.instantiate(definition.default_visible);
            if let Some(rect) = persisted.positions.get(&definition.key) {
                instance.position = rect.clamped();
            }
            instances.push(instance);
        }

        instances
    }

    /// The catalog this store was built against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<WidgetCatalog> {
        &self.catalog
    }

    /// Current instances in display order.
    #[must_use]
    pub fn instances(&self) -> &[WidgetInstance] {
        &self.instances
    }

    /// Visible instances in display order.
    pub fn visible_instances(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.instances.iter().filter(|instance| instance.visible)
    }

    /// The layout this store was initialized from.
    #[must_use]
    pub fn baseline(&self) -> &PersistedLayout {
        &self.baseline
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns true if the store holds no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Position of `key` in the current order.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.instances.iter().position(|instance| instance.key == key)
    }

    /// Looks up an instance by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WidgetInstance> {
        self.instances.iter().find(|instance| instance.key == key)
    }

    /// Flips the visibility of the widget with this key.
    ///
    /// Unknown keys are ignored. Returns the new visibility, if the key exists.
    pub fn toggle_visibility(&mut self, key: &str) -> Option<bool> {
        let Some(instance) = self.instances.iter_mut().find(|i| i.key == key) else {
            debug!(key, "Ignoring visibility toggle for unknown widget");
            return None;
        };
        instance.visible = !instance.visible;
        Some(instance.visible)
    }

    /// Moves the widget with `key` so that it ends up at `to_index`.
    ///
    /// Returns false (and leaves the order untouched) if the key is unknown
    /// or `to_index` is out of range.
    pub fn move_key(&mut self, key: &str, to_index: usize) -> bool {
        if to_index >= self.instances.len() {
            return false;
        }
        let Some(from_index) = self.index_of(key) else {
            return false;
        };
        if from_index != to_index {
            let instance = self.instances.remove(from_index);
            self.instances.insert(to_index, instance);
        }
        true
    }

    /// Removes the element at `from_index` and reinserts it at `to_index`.
    ///
    /// Out-of-range indices are rejected as a no-op and return false.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        let Some(key) = self.instances.get(from_index).map(|i| i.key.clone()) else {
            return false;
        };
        self.move_key(&key, to_index)
    }

    /// Sets the grid placement of a widget, clamped to the grid.
    ///
    /// Returns the stored rectangle, or `None` for unknown keys.
    pub fn set_position(&mut self, key: &str, rect: GridRect) -> Option<GridRect> {
        let instance = self.instances.iter_mut().find(|i| i.key == key)?;
        instance.position = rect.clamped();
        Some(instance.position)
    }

    /// Restores catalog order with every widget visible.
    ///
    /// Each widget's own default visibility is deliberately not consulted:
    /// reset always turns every widget on. Positions return to catalog defaults.
    pub fn reset_to_defaults(&mut self) {
        self.instances = self
            .catalog
            .list_all()
            .iter()
            .map(|definition| definition.instantiate(true))
            .collect();
    }

    /// Discards in-memory edits by rebuilding from the baseline layout.
    pub fn restore_baseline(&mut self) {
        self.instances = Self::build_instances(&self.catalog, &self.baseline);
    }

    /// Makes `layout` the new baseline (after it has been saved).
    pub fn rebase(&mut self, layout: PersistedLayout) {
        self.baseline = layout;
    }

    /// The persisted projection of the current state.
    ///
    /// `visible` lists visible keys in order, `order` lists every key in
    /// order, and `positions` holds only rectangles that differ from the
    /// catalog default.
    #[must_use]
    pub fn project(&self) -> PersistedLayout {
        let visible = self
            .visible_instances()
            .map(|instance| instance.key.clone())
            .collect();
        let order = self
            .instances
            .iter()
            .map(|instance| instance.key.clone())
            .collect();
        let positions: BTreeMap<String, GridRect> = self
            .instances
            .iter()
            .filter(|instance| {
                self.catalog
                    .get(&instance.key)
                    .is_some_and(|definition| definition.default_layout != instance.position)
            })
            .map(|instance| (instance.key.clone(), instance.position))
            .collect();

        PersistedLayout {
            visible,
            order,
            positions,
        }
    }
}

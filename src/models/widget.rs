//! Dashboard widget definitions, instances, and the persisted layout shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GridRect;

/// Catalog entry describing a widget the dashboard knows how to render.
///
/// Definitions are owned by the catalog and never change after it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    /// Stable identifier (e.g., "leads", "upcomingMeetings")
    pub key: String,
    /// Display label (e.g., "My Leads")
    pub label: String,
    /// Default placement on the grid
    pub default_layout: GridRect,
    /// Whether the widget is shown when the user has no saved preference
    pub default_visible: bool,
}

impl WidgetDefinition {
    /// Creates a new widget definition.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        default_layout: GridRect,
        default_visible: bool,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default_layout,
            default_visible,
        }
    }

    /// Builds a session instance from this definition.
    #[must_use]
    pub fn instantiate(&self, visible: bool) -> WidgetInstance {
        WidgetInstance {
            key: self.key.clone(),
            label: self.label.clone(),
            visible,
            position: self.default_layout,
        }
    }
}

/// A widget as it appears in the user's current layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInstance {
    /// Catalog key this instance refers to
    pub key: String,
    /// Display label copied from the catalog
    pub label: String,
    /// Whether the widget is shown on the dashboard
    pub visible: bool,
    /// Current grid placement (may differ from the catalog default)
    pub position: GridRect,
}

/// Layout as stored by the persistence collaborator.
///
/// `order` and `visible` are two projections of the same instance list and are
/// re-joined on load. `positions` only carries rectangles the user changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedLayout {
    /// Keys of visible widgets, in display order
    #[serde(default)]
    pub visible: Vec<String>,
    /// Every key, in display order
    #[serde(default)]
    pub order: Vec<String>,
    /// User-adjusted placements keyed by widget key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions: BTreeMap<String, GridRect>,
}

impl PersistedLayout {
    /// Creates a layout from visible and order key lists.
    pub fn new<V, O>(visible: V, order: O) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            visible: visible.into_iter().map(Into::into).collect(),
            order: order.into_iter().map(Into::into).collect(),
            positions: BTreeMap::new(),
        }
    }

    /// Returns true if nothing has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && self.order.is_empty() && self.positions.is_empty()
    }
}

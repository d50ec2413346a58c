//! Widget catalog and settings-page catalog.
//!
//! The catalog is the static, ordered set of widgets the dashboard knows how
//! to render. It is built once per process and shared read-only; user
//! ordering and visibility live in [`crate::services::LayoutStore`].

pub mod settings_pages;

use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::models::{GridRect, WidgetDefinition};

pub use settings_pages::{SettingsPage, SETTINGS_PAGES};

/// Built-in widget table: key, label, default rectangle (x, y, w, h), default visibility.
///
/// Rows are laid out on a 12-column grid. The first ten widgets form the
/// default dashboard; the rest are opt-in.
const STANDARD_WIDGETS: &[(&str, &str, [u16; 4], bool)] = &[
    // Core stat widgets, four across the top row
    ("leads", "My Leads", [0, 0, 3, 2], true),
    ("contacts", "My Contacts", [3, 0, 3, 2], true),
    ("deals", "My Deals", [6, 0, 3, 2], true),
    ("actionItems", "Action Items", [9, 0, 3, 2], true),
    // Second row
    ("quickActions", "Quick Actions", [0, 2, 4, 3], true),
    ("upcomingMeetings", "Upcoming Meetings", [4, 2, 4, 3], true),
    ("taskReminders", "Task Reminders", [8, 2, 4, 3], true),
    // Third row
    ("recentActivities", "Recent Activities", [0, 5, 4, 3], true),
    ("performance", "My Performance", [4, 5, 4, 3], true),
    ("leadStatus", "Lead Status Overview", [8, 5, 4, 3], true),
    // Sales & revenue
    ("salesTarget", "Sales Target", [0, 8, 3, 2], false),
    ("revenueChart", "Revenue Chart", [3, 8, 6, 3], false),
    ("pipelineValue", "Pipeline Value", [9, 8, 3, 2], false),
    ("conversionRate", "Conversion Rate", [0, 10, 3, 2], false),
    ("dealForecast", "Deal Forecast", [3, 11, 6, 3], false),
    // Communication
    ("emailStats", "Email Statistics", [9, 10, 3, 3], false),
    ("callLog", "Call Log", [0, 12, 3, 3], false),
    // Team & activity
    ("teamActivity", "Team Activity", [3, 14, 4, 3], false),
    ("completedTasks", "Completed Tasks", [7, 14, 3, 2], false),
    ("overdueItems", "Overdue Items", [9, 13, 3, 2], false),
    ("taskProgress", "Task Progress", [0, 15, 3, 3], false),
    // Analytics
    ("topDeals", "Top Deals", [3, 17, 4, 3], false),
    ("regionStats", "Region Statistics", [7, 16, 5, 3], false),
    ("geoDistribution", "Geo Distribution", [0, 18, 6, 3], false),
    ("leadSources", "Lead Sources", [6, 19, 4, 3], false),
    // Accounts & customers
    ("accountHealth", "Account Health", [9, 19, 3, 3], false),
    ("customerRetention", "Customer Retention", [0, 21, 3, 2], false),
    // Performance
    ("winLossRatio", "Win/Loss Ratio", [3, 22, 3, 2], false),
    ("salesVelocity", "Sales Velocity", [6, 22, 3, 2], false),
    ("growthTrend", "Growth Trend", [9, 22, 3, 3], false),
];

/// Read-only table of widget definitions in catalog (display) order.
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    definitions: Vec<WidgetDefinition>,
    lookup: HashMap<String, usize>,
}

impl WidgetCatalog {
    /// Returns the shared built-in catalog.
    ///
    /// The table is built on first access and lives for the rest of the process;
    /// every caller receives a handle to the same instance.
    pub fn standard() -> Arc<Self> {
        static CATALOG: OnceLock<Arc<WidgetCatalog>> = OnceLock::new();
        let catalog = CATALOG.get_or_init(|| {
            let definitions = STANDARD_WIDGETS
                .iter()
                .map(|(key, label, [x, y, w, h], visible)| {
                    WidgetDefinition::new(*key, *label, GridRect::new(*x, *y, *w, *h), *visible)
                })
                .collect::<Vec<_>>();
            let lookup = Self::index(&definitions);
            Arc::new(Self {
                definitions,
                lookup,
            })
        });
        Arc::clone(catalog)
    }

    /// Builds a catalog from explicit definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is empty or appears more than once.
    pub fn from_definitions(definitions: Vec<WidgetDefinition>) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(definitions.len());
        for (idx, definition) in definitions.iter().enumerate() {
            if definition.key.is_empty() {
                anyhow::bail!("Widget key cannot be empty (entry {idx})");
            }
            if lookup.insert(definition.key.clone(), idx).is_some() {
                anyhow::bail!("Duplicate widget key in catalog: '{}'", definition.key);
            }
        }
        Ok(Self {
            definitions,
            lookup,
        })
    }

    fn index(definitions: &[WidgetDefinition]) -> HashMap<String, usize> {
        definitions
            .iter()
            .enumerate()
            .map(|(idx, definition)| (definition.key.clone(), idx))
            .collect()
    }

    /// All definitions in catalog order.
    #[must_use]
    pub fn list_all(&self) -> &[WidgetDefinition] {
        &self.definitions
    }

    /// Looks up a definition by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WidgetDefinition> {
        self.lookup.get(key).and_then(|idx| self.definitions.get(*idx))
    }

    /// Returns true if the catalog has a widget with this key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    /// Number of widgets in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the catalog has no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRID_COLUMNS;

    #[test]
    fn test_standard_catalog_has_unique_keys() {
        let catalog = WidgetCatalog::standard();
        assert_eq!(catalog.len(), 30);

        let rebuilt = WidgetCatalog::from_definitions(catalog.list_all().to_vec());
        assert!(rebuilt.is_ok(), "standard catalog must not contain duplicates");
    }

    #[test]
    fn test_standard_catalog_fits_grid() {
        for definition in WidgetCatalog::standard().list_all() {
            assert!(
                definition.default_layout.right() <= GRID_COLUMNS,
                "{} overflows the grid",
                definition.key
            );
            assert!(definition.default_layout.w > 0 && definition.default_layout.h > 0);
        }
    }

    #[test]
    fn test_standard_catalog_default_visibility() {
        let catalog = WidgetCatalog::standard();
        let visible: Vec<&str> = catalog
            .list_all()
            .iter()
            .filter(|d| d.default_visible)
            .map(|d| d.key.as_str())
            .collect();
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0], "leads");
        assert!(!catalog.get("salesTarget").unwrap().default_visible);
    }

    #[test]
    fn test_from_definitions_rejects_duplicates() {
        let rect = GridRect::new(0, 0, 3, 2);
        let result = WidgetCatalog::from_definitions(vec![
            WidgetDefinition::new("a", "A", rect, true),
            WidgetDefinition::new("a", "Also A", rect, false),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = WidgetCatalog::standard();
        assert_eq!(catalog.get("deals").unwrap().label, "My Deals");
        assert!(catalog.contains("growthTrend"));
        assert!(!catalog.contains("unknown"));
    }
}

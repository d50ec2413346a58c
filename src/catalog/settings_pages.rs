//! Navigable settings pages included in global search.

use crate::models::{RecordKind, SearchResult};

/// A static settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsPage {
    /// Page identifier, also the settings tab name
    pub id: &'static str,
    /// Page title
    pub title: &'static str,
    /// Short description
    pub subtitle: &'static str,
}

/// Settings pages in display order.
pub const SETTINGS_PAGES: &[SettingsPage] = &[
    SettingsPage {
        id: "profile",
        title: "Profile Settings",
        subtitle: "Manage your profile",
    },
    SettingsPage {
        id: "display",
        title: "Display Settings",
        subtitle: "Theme and appearance",
    },
    SettingsPage {
        id: "notifications",
        title: "Notification Settings",
        subtitle: "Email and push notifications",
    },
    SettingsPage {
        id: "security",
        title: "Security Settings",
        subtitle: "Password and authentication",
    },
    SettingsPage {
        id: "integrations",
        title: "Integration Settings",
        subtitle: "Connect external services",
    },
    SettingsPage {
        id: "pipeline",
        title: "Pipeline Settings",
        subtitle: "Manage deal stages",
    },
    SettingsPage {
        id: "email-templates",
        title: "Email Templates",
        subtitle: "Manage email templates",
    },
];

impl SettingsPage {
    /// Route of this page.
    #[must_use]
    pub fn route(&self) -> String {
        format!("/settings?tab={}", self.id)
    }

    /// Returns true if the title or subtitle contains `needle`, ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.subtitle.to_lowercase().contains(&needle)
    }

    /// Converts the page into a search result.
    #[must_use]
    pub fn to_search_result(&self) -> SearchResult {
        SearchResult {
            id: self.id.to_string(),
            kind: RecordKind::Setting,
            title: self.title.to_string(),
            subtitle: Some(self.subtitle.to_string()),
            target: self.route(),
        }
    }
}

/// Settings pages whose title or subtitle matches `needle`.
#[must_use]
pub fn matching_pages(needle: &str) -> Vec<SearchResult> {
    SETTINGS_PAGES
        .iter()
        .filter(|page| page.matches(needle))
        .map(SettingsPage::to_search_result)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_pages_title() {
        let results = matching_pages("security");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target, "/settings?tab=security");
        assert_eq!(results[0].kind, RecordKind::Setting);
    }

    #[test]
    fn test_matching_pages_subtitle() {
        let results = matching_pages("THEME");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "display");
    }

    #[test]
    fn test_matching_pages_shared_word() {
        // "Email" appears in notifications (subtitle) and email templates (title)
        let ids: Vec<String> = matching_pages("email").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["notifications", "email-templates"]);
    }
}

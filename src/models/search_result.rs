//! Unified search result type.

use serde::{Deserialize, Serialize};

use super::RecordKind;

/// One entry in the merged search result list.
///
/// Results are ephemeral: recomputed for every query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier of the underlying record or page
    pub id: String,
    /// Kind of record this result points to
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Primary display text
    pub title: String,
    /// Secondary display text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Route handed to the router when the result is selected
    pub target: String,
}

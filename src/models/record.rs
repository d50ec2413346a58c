//! CRM record types served by the record-lookup collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::SearchResult;
use crate::constants::MEETING_SUBTITLE_CHARS;

/// Kinds of records that appear in search results.
///
/// Declaration order is the order in which collections are searched and
/// therefore the order of result groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Sales lead
    Lead,
    /// Contact person
    Contact,
    /// Deal in the pipeline
    Deal,
    /// Customer account
    Account,
    /// Scheduled meeting
    Meeting,
    /// Task or to-do
    Task,
    /// Settings page (static, never looked up remotely)
    Setting,
}

impl RecordKind {
    /// Record collections backed by the lookup collaborator, in search order.
    pub const COLLECTIONS: [Self; 6] = [
        Self::Lead,
        Self::Contact,
        Self::Deal,
        Self::Account,
        Self::Meeting,
        Self::Task,
    ];

    /// Singular display label (e.g., "Lead").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Contact => "Contact",
            Self::Deal => "Deal",
            Self::Account => "Account",
            Self::Meeting => "Meeting",
            Self::Task => "Task",
            Self::Setting => "Setting",
        }
    }

    /// Group header shown above results of this kind (e.g., "Leads").
    #[must_use]
    pub fn group_header(self) -> String {
        format!("{}s", self.label())
    }

    /// Name of the backing collection, also used as the route prefix.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Lead => "leads",
            Self::Contact => "contacts",
            Self::Deal => "deals",
            Self::Account => "accounts",
            Self::Meeting => "meetings",
            Self::Task => "tasks",
            Self::Setting => "settings",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sales lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Record identifier
    pub id: String,
    /// Lead name
    pub lead_name: String,
    /// Company the lead works for
    #[serde(default)]
    pub company_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Pipeline status (e.g., "New", "Qualified")
    #[serde(default)]
    pub lead_status: Option<String>,
}

/// A contact person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Record identifier
    pub id: String,
    /// Contact name
    pub contact_name: String,
    /// Company the contact works for
    #[serde(default)]
    pub company_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// A deal in the sales pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Record identifier
    pub id: String,
    /// Deal name
    pub deal_name: String,
    /// Customer the deal is with
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Project the deal belongs to
    #[serde(default)]
    pub project_name: Option<String>,
    /// Pipeline stage (e.g., "Lead", "Won")
    #[serde(default)]
    pub stage: Option<String>,
    /// Contract value
    #[serde(default)]
    pub total_contract_value: Option<f64>,
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Record identifier
    pub id: String,
    /// Company name
    pub company_name: String,
    /// Industry segment
    #[serde(default)]
    pub industry: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// A scheduled meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Record identifier
    pub id: String,
    /// Meeting subject
    pub subject: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Scheduled start
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// A task or to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Record identifier
    pub id: String,
    /// Task title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Status (e.g., "open", "completed")
    #[serde(default)]
    pub status: Option<String>,
}

/// Any record returned by a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Lead record
    Lead(Lead),
    /// Contact record
    Contact(Contact),
    /// Deal record
    Deal(Deal),
    /// Account record
    Account(Account),
    /// Meeting record
    Meeting(Meeting),
    /// Task record
    Task(Task),
}

/// Case-insensitive substring test on an optional field.
fn field_contains(field: Option<&str>, needle_lower: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle_lower))
}

/// First non-empty value among the candidates.
fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(|value| (*value).to_string())
}

impl Record {
    /// The kind of this record.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Lead(_) => RecordKind::Lead,
            Self::Contact(_) => RecordKind::Contact,
            Self::Deal(_) => RecordKind::Deal,
            Self::Account(_) => RecordKind::Account,
            Self::Meeting(_) => RecordKind::Meeting,
            Self::Task(_) => RecordKind::Task,
        }
    }

    /// Record identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Lead(r) => &r.id,
            Self::Contact(r) => &r.id,
            Self::Deal(r) => &r.id,
            Self::Account(r) => &r.id,
            Self::Meeting(r) => &r.id,
            Self::Task(r) => &r.id,
        }
    }

    /// Values of the searchable fields: the record name first, then the
    /// company, contact, or description fields shown beside it.
    #[must_use]
    pub fn search_values(&self) -> Vec<Option<&str>> {
        match self {
            Self::Lead(r) => vec![
                Some(r.lead_name.as_str()),
                r.company_name.as_deref(),
                r.email.as_deref(),
            ],
            Self::Contact(r) => vec![
                Some(r.contact_name.as_str()),
                r.company_name.as_deref(),
                r.email.as_deref(),
            ],
            Self::Deal(r) => vec![
                Some(r.deal_name.as_str()),
                r.customer_name.as_deref(),
                r.project_name.as_deref(),
            ],
            Self::Account(r) => vec![
                Some(r.company_name.as_str()),
                r.industry.as_deref(),
                r.email.as_deref(),
            ],
            Self::Meeting(r) => vec![Some(r.subject.as_str()), r.description.as_deref()],
            Self::Task(r) => vec![Some(r.title.as_str()), r.description.as_deref()],
        }
    }

    /// Returns true if any searchable field contains `needle`, ignoring case.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle_lower = needle.to_lowercase();
        self.search_values()
            .into_iter()
            .any(|value| field_contains(value, &needle_lower))
    }

    /// Converts the record into a search result.
    #[must_use]
    pub fn to_search_result(&self) -> SearchResult {
        let kind = self.kind();
        let (title, subtitle) = match self {
            Self::Lead(r) => (
                r.lead_name.clone(),
                first_present(&[r.company_name.as_deref(), r.email.as_deref()]),
            ),
            Self::Contact(r) => (
                r.contact_name.clone(),
                first_present(&[r.company_name.as_deref(), r.email.as_deref()]),
            ),
            Self::Deal(r) => (
                r.deal_name.clone(),
                first_present(&[r.customer_name.as_deref(), r.stage.as_deref()]),
            ),
            Self::Account(r) => (
                r.company_name.clone(),
                first_present(&[r.industry.as_deref(), r.email.as_deref()]),
            ),
            Self::Meeting(r) => {
                let description = r
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .map(|d| d.chars().take(MEETING_SUBTITLE_CHARS).collect::<String>());
                let date = r
                    .start_time
                    .map(|start| start.format("%Y-%m-%d").to_string());
                (r.subject.clone(), description.or(date))
            }
            Self::Task(r) => (
                r.title.clone(),
                first_present(&[r.status.as_deref()]),
            ),
        };

        SearchResult {
            id: self.id().to_string(),
            kind,
            title,
            subtitle,
            target: format!("/{}?highlight={}", kind.collection(), self.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lead(name: &str, company: Option<&str>, email: Option<&str>) -> Record {
        Record::Lead(Lead {
            id: "l1".to_string(),
            lead_name: name.to_string(),
            company_name: company.map(str::to_string),
            email: email.map(str::to_string),
            lead_status: None,
        })
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let record = lead("Acme Corp", None, None);
        assert!(record.matches("acme"));
        assert!(record.matches("CORP"));
        assert!(!record.matches("xyz"));
    }

    #[test]
    fn test_matches_secondary_fields() {
        let record = lead("Jane", Some("Globex"), Some("jane@initech.io"));
        assert!(record.matches("glob"));
        assert!(record.matches("initech"));
    }

    #[test]
    fn test_lead_subtitle_prefers_company() {
        let result = lead("Jane", Some("Globex"), Some("jane@globex.io")).to_search_result();
        assert_eq!(result.subtitle.as_deref(), Some("Globex"));
        assert_eq!(result.target, "/leads?highlight=l1");

        let result = lead("Jane", None, Some("jane@globex.io")).to_search_result();
        assert_eq!(result.subtitle.as_deref(), Some("jane@globex.io"));

        let result = lead("Jane", Some(""), None).to_search_result();
        assert_eq!(result.subtitle, None);
    }

    #[test]
    fn test_meeting_subtitle_truncates_description() {
        let long = "x".repeat(80);
        let record = Record::Meeting(Meeting {
            id: "m1".to_string(),
            subject: "Kickoff".to_string(),
            description: Some(long),
            start_time: None,
        });
        let subtitle = record.to_search_result().subtitle.unwrap();
        assert_eq!(subtitle.chars().count(), MEETING_SUBTITLE_CHARS);
    }

    #[test]
    fn test_meeting_subtitle_falls_back_to_date() {
        let record = Record::Meeting(Meeting {
            id: "m1".to_string(),
            subject: "Kickoff".to_string(),
            description: None,
            start_time: Some(Utc.with_ymd_and_hms(2025, 3, 4, 9, 30, 0).unwrap()),
        });
        assert_eq!(
            record.to_search_result().subtitle.as_deref(),
            Some("2025-03-04")
        );
    }

    #[test]
    fn test_group_header() {
        assert_eq!(RecordKind::Lead.group_header(), "Leads");
        assert_eq!(RecordKind::Setting.group_header(), "Settings");
    }
}

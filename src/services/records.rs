//! Record data file and the record-lookup collaborator.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::models::{Account, Contact, Deal, Lead, Meeting, Record, RecordKind, Task};

/// Finds records of one kind whose searchable fields contain a substring.
///
/// Implementations must be thread-safe; lookups run on a worker thread.
pub trait RecordLookup: Send + Sync {
    /// Returns at most `limit` records of `kind` matching `needle`
    /// case-insensitively, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be queried.
    fn find(&self, kind: RecordKind, needle: &str, limit: usize) -> Result<Vec<Record>>;
}

/// All CRM records, as stored in the JSON data file.
///
/// Every collection is optional in the file; missing ones load as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    /// Leads
    pub leads: Vec<Lead>,
    /// Contacts
    pub contacts: Vec<Contact>,
    /// Deals
    pub deals: Vec<Deal>,
    /// Accounts
    pub accounts: Vec<Account>,
    /// Meetings
    pub meetings: Vec<Meeting>,
    /// Tasks
    pub tasks: Vec<Task>,
}

impl RecordSet {
    /// Loads a record set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file: {}", path.display()))?;
        let records: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse data file: {}", path.display()))?;
        debug!(path = %path.display(), total = records.total(), "Loaded record set");
        Ok(records)
    }

    /// Loads `path` if given and present, otherwise returns an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Number of records of one kind.
    #[must_use]
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Lead => self.leads.len(),
            RecordKind::Contact => self.contacts.len(),
            RecordKind::Deal => self.deals.len(),
            RecordKind::Account => self.accounts.len(),
            RecordKind::Meeting => self.meetings.len(),
            RecordKind::Task => self.tasks.len(),
            RecordKind::Setting => 0,
        }
    }

    /// Number of records across all collections.
    #[must_use]
    pub fn total(&self) -> usize {
        RecordKind::COLLECTIONS.iter().map(|kind| self.count(*kind)).sum()
    }

    /// All records of one kind, wrapped as [`Record`]s.
    #[must_use]
    pub fn records(&self, kind: RecordKind) -> Vec<Record> {
        match kind {
            RecordKind::Lead => self.leads.iter().cloned().map(Record::Lead).collect(),
            RecordKind::Contact => self.contacts.iter().cloned().map(Record::Contact).collect(),
            RecordKind::Deal => self.deals.iter().cloned().map(Record::Deal).collect(),
            RecordKind::Account => self.accounts.iter().cloned().map(Record::Account).collect(),
            RecordKind::Meeting => self.meetings.iter().cloned().map(Record::Meeting).collect(),
            RecordKind::Task => self.tasks.iter().cloned().map(Record::Task).collect(),
            RecordKind::Setting => Vec::new(),
        }
    }
}

impl RecordLookup for RecordSet {
    fn find(&self, kind: RecordKind, needle: &str, limit: usize) -> Result<Vec<Record>> {
        if kind == RecordKind::Setting {
            anyhow::bail!("Settings pages are not a record collection");
        }
        Ok(self
            .records(kind)
            .into_iter()
            .filter(|record| record.matches(needle))
            .take(limit)
            .collect())
    }
}

//! Shared test fixtures for integration and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use chrono::{TimeZone, Utc};
use crmdash::catalog::WidgetCatalog;
use crmdash::models::{
    Account, Contact, Deal, GridRect, Lead, Meeting, PersistedLayout, Task, WidgetDefinition,
};
use crmdash::services::RecordSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Catalog of three widgets: A visible by default, B and C hidden.
pub fn abc_catalog() -> Arc<WidgetCatalog> {
    let definition = |key: &str, x: u16, visible: bool| WidgetDefinition {
        key: key.to_string(),
        label: format!("Widget {key}"),
        default_layout: GridRect::new(x, 0, 4, 2),
        default_visible: visible,
    };
    Arc::new(
        WidgetCatalog::from_definitions(vec![
            definition("A", 0, true),
            definition("B", 4, false),
            definition("C", 8, false),
        ])
        .expect("ABC catalog is valid"),
    )
}

/// Persisted layout with the given order and visible keys.
pub fn persisted(order: &[&str], visible: &[&str]) -> PersistedLayout {
    PersistedLayout {
        order: order.iter().map(|k| (*k).to_string()).collect(),
        visible: visible.iter().map(|k| (*k).to_string()).collect(),
        ..PersistedLayout::default()
    }
}

fn lead(id: &str, name: &str, company: Option<&str>, status: &str) -> Lead {
    Lead {
        id: id.to_string(),
        lead_name: name.to_string(),
        company_name: company.map(str::to_string),
        email: None,
        lead_status: Some(status.to_string()),
    }
}

/// A small CRM record set where "acme" matches several collections.
pub fn sample_records() -> RecordSet {
    RecordSet {
        leads: vec![
            lead("l1", "Acme Corp", None, "New"),
            lead("l2", "Jane Smith", Some("Acme Industries"), "Qualified"),
            lead("l3", "Bob Jones", Some("Globex"), "New"),
        ],
        contacts: vec![Contact {
            id: "c1".to_string(),
            contact_name: "Wile E. Coyote".to_string(),
            company_name: Some("Acme".to_string()),
            email: Some("wile@acme.test".to_string()),
        }],
        deals: vec![
            Deal {
                id: "d1".to_string(),
                deal_name: "Rocket Skates".to_string(),
                customer_name: Some("Acme".to_string()),
                project_name: None,
                stage: Some("Qualified".to_string()),
                total_contract_value: Some(12_500.0),
            },
            Deal {
                id: "d2".to_string(),
                deal_name: "Portable Holes".to_string(),
                customer_name: Some("Initech".to_string()),
                project_name: None,
                stage: Some("Won".to_string()),
                total_contract_value: Some(3_000.0),
            },
        ],
        accounts: vec![Account {
            id: "a1".to_string(),
            company_name: "Initech".to_string(),
            industry: Some("Software".to_string()),
            email: None,
        }],
        meetings: vec![Meeting {
            id: "m1".to_string(),
            subject: "Quarterly review".to_string(),
            description: None,
            start_time: Some(Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap()),
        }],
        tasks: vec![Task {
            id: "t1".to_string(),
            title: "Call Acme about renewal".to_string(),
            description: None,
            status: Some("open".to_string()),
        }],
    }
}

/// `count` leads all matching "acme".
pub fn many_acme_leads(count: usize) -> RecordSet {
    RecordSet {
        leads: (0..count)
            .map(|i| lead(&format!("l{i}"), &format!("Acme {i}"), None, "New"))
            .collect(),
        ..RecordSet::default()
    }
}

/// Writes `records` to a temp data file.
pub fn create_temp_data_file(records: &RecordSet) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("crm.json");
    let json = serde_json::to_string_pretty(records).expect("Failed to serialize records");
    fs::write(&path, json).expect("Failed to write data file");
    (path, temp_dir)
}

/// Temp directory with paths for a layout file and a config file that do not
/// exist yet.
pub fn create_temp_workspace() -> (PathBuf, PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let layout = temp_dir.path().join("layout.json");
    let config = temp_dir.path().join("config.toml");
    (layout, config, temp_dir)
}

/// Writes a persisted layout as JSON.
pub fn write_layout_file(path: &std::path::Path, layout: &PersistedLayout) {
    let json = serde_json::to_string_pretty(layout).expect("Failed to serialize layout");
    fs::write(path, json).expect("Failed to write layout file");
}

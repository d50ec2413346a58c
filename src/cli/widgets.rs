//! `widgets` command: lists the widget catalog.

use crate::catalog::WidgetCatalog;
use crate::cli::common::{CliError, CliResult};
use crate::models::GridRect;
use clap::Args;
use serde::Serialize;

/// List every widget in the catalog
#[derive(Debug, Clone, Args)]
pub struct WidgetsArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Only list widgets shown by default
    #[arg(long)]
    pub default_only: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
struct WidgetItem {
    key: String,
    label: String,
    default_visible: bool,
    default_layout: GridRect,
}

#[derive(Debug, Serialize)]
struct ListWidgetsResponse {
    widgets: Vec<WidgetItem>,
    count: usize,
}

impl WidgetsArgs {
    /// Execute the widgets command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = WidgetCatalog::standard();
        let widgets: Vec<WidgetItem> = catalog
            .list_all()
            .iter()
            .filter(|definition| !self.default_only || definition.default_visible)
            .map(|definition| WidgetItem {
                key: definition.key.clone(),
                label: definition.label.clone(),
                default_visible: definition.default_visible,
                default_layout: definition.default_layout,
            })
            .collect();

        let response = ListWidgetsResponse {
            count: widgets.len(),
            widgets,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string(&response)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!("Widgets ({}):", response.count);
            println!();
            for widget in response.widgets {
                let marker = if widget.default_visible { "●" } else { "○" };
                let rect = widget.default_layout;
                println!(
                    "  {marker} {:<20} {:<24} {}x{} at ({}, {})",
                    widget.key, widget.label, rect.w, rect.h, rect.x, rect.y
                );
            }
        }

        Ok(())
    }
}

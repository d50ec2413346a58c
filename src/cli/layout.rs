//! Layout commands: show and edit the saved dashboard layout.
//!
//! Every editing command loads the layout file, applies one controller
//! action, and saves the projection back.

use crate::catalog::WidgetCatalog;
use crate::cli::common::{CliContext, CliError, CliResult};
use crate::models::{PersistedLayout, WidgetInstance};
use crate::services::{LayoutController, LayoutPersistence, LayoutStore};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Show or edit the saved dashboard layout
#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Layout subcommand
    #[command(subcommand)]
    pub command: LayoutCommand,
}

/// Layout subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum LayoutCommand {
    /// Show widgets in their saved order
    Show(ShowLayoutArgs),
    /// Restore catalog order with every widget visible, and save
    Reset(ResetLayoutArgs),
    /// Flip a widget's visibility, and save
    Toggle(ToggleWidgetArgs),
    /// Move a widget to a new position in the order, and save
    Move(MoveWidgetArgs),
}

/// Show widgets in their saved order
#[derive(Debug, Clone, Args)]
pub struct ShowLayoutArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Only list visible widgets
    #[arg(long)]
    pub visible_only: bool,
}

/// Restore the default layout
#[derive(Debug, Clone, Args)]
pub struct ResetLayoutArgs {
    /// Output the resulting layout as JSON
    #[arg(long)]
    pub json: bool,
}

/// Flip a widget's visibility
#[derive(Debug, Clone, Args)]
pub struct ToggleWidgetArgs {
    /// Widget key (see `widgets`)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Output the resulting layout as JSON
    #[arg(long)]
    pub json: bool,
}

/// Move a widget in the order
#[derive(Debug, Clone, Args)]
pub struct MoveWidgetArgs {
    /// Widget key (see `widgets`)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Zero-based destination index
    #[arg(value_name = "INDEX")]
    pub index: usize,

    /// Output the resulting layout as JSON
    #[arg(long)]
    pub json: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
struct LayoutResponse<'a> {
    widgets: Vec<&'a WidgetInstance>,
    layout: PersistedLayout,
    visible_count: usize,
}

impl LayoutArgs {
    /// Execute the layout command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        match &self.command {
            LayoutCommand::Show(args) => args.execute(context),
            LayoutCommand::Reset(args) => args.execute(context),
            LayoutCommand::Toggle(args) => args.execute(context),
            LayoutCommand::Move(args) => args.execute(context),
        }
    }
}

fn load_controller(context: &CliContext) -> CliResult<LayoutController> {
    let persisted = context
        .persistence()
        .load()
        .map_err(|e| CliError::io(format!("Failed to load layout: {e:#}")))?;
    Ok(LayoutController::new(LayoutStore::initialize(
        WidgetCatalog::standard(),
        &persisted,
    )))
}

fn save_controller(context: &CliContext, controller: &mut LayoutController) -> CliResult<()> {
    let Some(pending) = controller.begin_save() else {
        return Err(CliError::io("A save is already in progress"));
    };
    let result = context.persistence().save(&pending);
    let failure = result.as_ref().err().map(|e| format!("Failed to save layout: {e:#}"));
    controller.finish_save(pending, result);
    match failure {
        Some(message) => Err(CliError::io(message)),
        None => Ok(()),
    }
}

fn print_layout(store: &LayoutStore, json: bool, visible_only: bool) -> CliResult<()> {
    let widgets: Vec<&WidgetInstance> = store
        .instances()
        .iter()
        .filter(|instance| !visible_only || instance.visible)
        .collect();
    let response = LayoutResponse {
        visible_count: store.visible_instances().count(),
        layout: store.project(),
        widgets,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string(&response)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
        );
        return Ok(());
    }

    println!(
        "Dashboard layout ({} of {} visible):",
        response.visible_count,
        store.len()
    );
    println!();
    for (index, widget) in response.widgets.iter().enumerate() {
        let marker = if widget.visible { "●" } else { "○" };
        println!("  {index:>2}. {marker} {:<20} {}", widget.key, widget.label);
    }
    Ok(())
}

impl ShowLayoutArgs {
    /// Execute the show command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        let controller = load_controller(context)?;
        print_layout(controller.store(), self.json, self.visible_only)
    }
}

impl ResetLayoutArgs {
    /// Execute the reset command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        let mut controller = load_controller(context)?;
        controller.on_reset();
        save_controller(context, &mut controller)?;

        if self.json {
            print_layout(controller.store(), true, false)
        } else {
            println!("Layout reset: {} widgets visible.", controller.store().len());
            Ok(())
        }
    }
}

impl ToggleWidgetArgs {
    /// Execute the toggle command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        let mut controller = load_controller(context)?;
        let Some(visible) = controller.on_toggle(&self.key) else {
            return Err(CliError::validation(format!(
                "Unknown widget '{}'. Run 'widgets' to list valid keys.",
                self.key
            )));
        };
        save_controller(context, &mut controller)?;

        if self.json {
            print_layout(controller.store(), true, false)
        } else {
            let state = if visible { "shown" } else { "hidden" };
            println!("Widget '{}' is now {state}.", self.key);
            Ok(())
        }
    }
}

impl MoveWidgetArgs {
    /// Execute the move command
    pub fn execute(&self, context: &CliContext) -> CliResult<()> {
        let mut controller = load_controller(context)?;
        let store = controller.store();

        let Some(from) = store.index_of(&self.key) else {
            return Err(CliError::validation(format!(
                "Unknown widget '{}'. Run 'widgets' to list valid keys.",
                self.key
            )));
        };
        if self.index >= store.len() {
            return Err(CliError::validation(format!(
                "Index {} is out of range (0..{})",
                self.index,
                store.len()
            )));
        }

        controller.on_drag_end(from, Some(self.index));
        save_controller(context, &mut controller)?;

        if self.json {
            print_layout(controller.store(), true, false)
        } else {
            println!("Moved '{}' to position {}.", self.key, self.index);
            Ok(())
        }
    }
}

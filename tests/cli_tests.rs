//! End-to-end tests for the `crmdash` headless subcommands.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

mod fixtures;
use fixtures::*;

/// Path to the crmdash binary
fn crmdash_bin() -> &'static str {
    env!("CARGO_BIN_EXE_crmdash")
}

/// Runs crmdash against an isolated config and layout file.
fn run(config: &Path, layout: &Path, args: &[&str]) -> Output {
    Command::new(crmdash_bin())
        .arg("--config")
        .arg(config)
        .arg("--layout-file")
        .arg(layout)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

fn keys(value: &Value, field: &str) -> Vec<String> {
    value["layout"][field]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

#[test]
fn test_widgets_json_lists_catalog() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["widgets", "--json"]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["count"], 30);
    assert_eq!(result["widgets"][0]["key"], "leads");
    assert_eq!(result["widgets"][0]["default_visible"], true);
}

#[test]
fn test_widgets_default_only() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["widgets", "--json", "--default-only"]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["count"], 10);
}

#[test]
fn test_layout_show_without_saved_file() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["layout", "show", "--json"]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["visible_count"], 10);
    assert_eq!(result["widgets"].as_array().expect("widgets").len(), 30);
    assert!(!layout.exists(), "show must not write the layout");
}

#[test]
fn test_layout_toggle_persists() {
    let (layout, config, _temp) = create_temp_workspace();

    let output = run(&config, &layout, &["layout", "toggle", "leads"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("hidden"));

    let output = run(&config, &layout, &["layout", "show", "--json"]);
    let result = stdout_json(&output);
    assert_eq!(result["visible_count"], 9);
    assert!(!keys(&result, "visible").contains(&"leads".to_string()));
    assert_eq!(keys(&result, "order")[0], "leads");
}

#[test]
fn test_layout_toggle_unknown_widget() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["layout", "toggle", "nonexistent"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown widget"));
    assert!(!layout.exists());
}

#[test]
fn test_layout_move() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["layout", "move", "tasks", "0", "--json"]);

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(keys(&result, "order")[0], "tasks");
}

#[test]
fn test_layout_move_out_of_range() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["layout", "move", "leads", "30"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[test]
fn test_layout_reset_shows_everything() {
    let (layout, config, _temp) = create_temp_workspace();
    write_layout_file(&layout, &persisted(&["tasks", "leads"], &["tasks"]));

    let output = run(&config, &layout, &["layout", "reset", "--json"]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["visible_count"], 30);
    assert_eq!(keys(&result, "order")[0], "leads");
}

#[test]
fn test_layout_corrupt_file_is_io_error() {
    let (layout, config, _temp) = create_temp_workspace();
    std::fs::write(&layout, "{ not json").expect("write");

    let output = run(&config, &layout, &["layout", "show"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_search_json() {
    let (layout, config, _temp) = create_temp_workspace();
    let (data, _data_temp) = create_temp_data_file(&sample_records());
    let output = run(
        &config,
        &layout,
        &["search", "acme", "--json", "--data", data.to_str().expect("utf8 path")],
    );

    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["count"], 5);
    assert_eq!(result["groups"][0]["header"], "Leads");
    assert_eq!(result["groups"][0]["results"][0]["title"], "Acme Corp");
}

#[test]
fn test_search_query_too_short() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["search", "a"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 2"));
}

#[test]
fn test_search_no_results() {
    let (layout, config, _temp) = create_temp_workspace();
    let (data, _data_temp) = create_temp_data_file(&sample_records());
    let output = run(
        &config,
        &layout,
        &["search", "zzzz", "--data", data.to_str().expect("utf8 path")],
    );

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No results"));
}

#[test]
fn test_config_set_then_show() {
    let (layout, config, _temp) = create_temp_workspace();

    let output = run(
        &config,
        &layout,
        &["config", "set", "--theme", "dark", "--per-kind-limit", "3"],
    );
    assert!(output.status.success());
    assert!(config.exists());

    let output = run(&config, &layout, &["config", "show", "--json"]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["ui"]["theme_mode"], "Dark");
    assert_eq!(result["search"]["per_kind_limit"], 3);
}

#[test]
fn test_config_set_invalid_theme() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["config", "set", "--theme", "sepia"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid theme mode"));
    assert!(!config.exists());
}

#[test]
fn test_config_set_requires_an_option() {
    let (layout, config, _temp) = create_temp_workspace();
    let output = run(&config, &layout, &["config", "set"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!config.exists());
}

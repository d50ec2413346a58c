//! Integration tests for the CrmDash Web API.
//!
//! These tests require the `web` feature to be enabled:
//! ```bash
//! cargo test --features web web_api
//! ```

#![cfg(feature = "web")]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crmdash::models::PersistedLayout;
use crmdash::services::{
    FileLayoutPersistence, LayoutPersistence, MemoryLayoutPersistence, SearchSettings,
};
use crmdash::web::{create_router, AppState};

mod fixtures;
use fixtures::*;

/// Persistence that can neither load nor save.
struct BrokenPersistence;

impl LayoutPersistence for BrokenPersistence {
    fn load(&self) -> anyhow::Result<PersistedLayout> {
        anyhow::bail!("storage offline")
    }

    fn save(&self, _layout: &PersistedLayout) -> anyhow::Result<()> {
        anyhow::bail!("storage offline")
    }
}

/// Creates a test AppState over in-memory persistence and sample records.
fn create_test_state() -> (AppState, Arc<MemoryLayoutPersistence>) {
    let persistence = Arc::new(MemoryLayoutPersistence::default());
    let state = AppState::new(
        Arc::clone(&persistence) as Arc<dyn LayoutPersistence>,
        sample_records(),
        SearchSettings::default(),
    );
    (state, persistence)
}

/// Helper to make a GET request and get the response body as JSON.
async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    request_json(app, "GET", uri).await
}

/// Helper to make a bodyless request and get the response body as JSON.
async fn request_json(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a PUT request with JSON body.
async fn put_json(app: &axum::Router, uri: &str, body: Value) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    response.status()
}

fn strings(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

// ============================================================================
// Catalog Tests
// ============================================================================

#[tokio::test]
async fn test_list_widgets() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/widgets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 30);
    assert_eq!(json["widgets"][0]["key"], "leads");
    assert_eq!(json["widgets"][0]["default_visible"], true);
}

#[tokio::test]
async fn test_list_widgets_custom_catalog() {
    let (state, _) = create_test_state();
    let app = create_router(state.with_catalog(abc_catalog()));

    let (_, json) = get_json(&app, "/api/widgets").await;
    assert_eq!(json["count"], 3);
}

// ============================================================================
// Layout Tests
// ============================================================================

#[tokio::test]
async fn test_get_layout_defaults() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/dashboard/layout").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["visible_count"], 10);
    assert_eq!(json["widgets"].as_array().unwrap().len(), 30);
    assert_eq!(json["placements"].as_array().unwrap().len(), 10);
    assert_eq!(json["layout"]["order"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_save_layout_normalizes() {
    let (state, persistence) = create_test_state();
    let app = create_router(state.with_catalog(abc_catalog()));

    let status = put_json(
        &app,
        "/api/dashboard/layout",
        json!({ "order": ["C", "bogus", "C"], "visible": ["C", "bogus"] }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let saved = persistence.load().unwrap();
    assert_eq!(saved.order, vec!["C", "A", "B"]);
    assert_eq!(saved.visible, vec!["C", "A"]);

    let (_, json) = get_json(&app, "/api/dashboard/layout").await;
    assert_eq!(strings(&json["layout"]["visible"]), vec!["C", "A"]);
    assert_eq!(json["visible_count"], 2);
}

#[tokio::test]
async fn test_save_layout_rejects_malformed_body() {
    let (state, persistence) = create_test_state();
    let app = create_router(state);

    let status = put_json(&app, "/api/dashboard/layout", json!({ "order": 42 })).await;

    assert!(status.is_client_error());
    assert_eq!(persistence.load().unwrap(), PersistedLayout::default());
}

#[tokio::test]
async fn test_reset_layout_is_not_saved() {
    let (state, persistence) = create_test_state();
    let app = create_router(state);

    let status = put_json(
        &app,
        "/api/dashboard/layout",
        json!({ "order": ["tasks"], "visible": ["tasks"] }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let before = persistence.load().unwrap();

    let (status, json) = request_json(&app, "POST", "/api/dashboard/layout/reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["visible_count"], 30);
    assert_eq!(json["layout"]["order"][0], "leads");
    assert_eq!(persistence.load().unwrap(), before);
}

#[tokio::test]
async fn test_layout_file_round_trip() {
    let (layout_path, _, _temp) = create_temp_workspace();
    write_layout_file(&layout_path, &persisted(&["deals", "leads"], &["deals"]));

    let persistence = Arc::new(FileLayoutPersistence::new(&layout_path));
    let app = create_router(AppState::new(
        persistence,
        sample_records(),
        SearchSettings::default(),
    ));

    let (status, json) = get_json(&app, "/api/dashboard/layout").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["layout"]["order"][0], "deals");
    assert_eq!(json["layout"]["order"][1], "leads");
    // Widgets missing from the file keep their default visibility
    assert_eq!(json["layout"]["visible"][0], "deals");
    assert!(strings(&json["layout"]["visible"]).contains(&"contacts"));
    assert!(!strings(&json["layout"]["visible"]).contains(&"leads"));
}

#[tokio::test]
async fn test_layout_storage_failures() {
    let state = AppState::new(
        Arc::new(BrokenPersistence),
        sample_records(),
        SearchSettings::default(),
    );
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/dashboard/layout").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to load layout");
    assert!(json["details"].as_str().unwrap().contains("storage offline"));

    let status = put_json(&app, "/api/dashboard/layout", json!({ "order": [], "visible": [] })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_groups_results() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    let (status, json) = get_json(&app, "/api/search?q=acme").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "acme");
    assert_eq!(json["count"], 5);
    let headers: Vec<&str> = json["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["header"].as_str().unwrap())
        .collect();
    assert_eq!(headers, vec!["Leads", "Contacts", "Deals", "Tasks"]);
    assert_eq!(json["groups"][0]["results"][0]["target"], "/leads?highlight=l1");
}

#[tokio::test]
async fn test_search_below_threshold_is_empty() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    for uri in ["/api/search?q=a", "/api/search"] {
        let (status, json) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 0);
        assert!(json["groups"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_search_settings_pages() {
    let (state, _) = create_test_state();
    let app = create_router(state);

    let (_, json) = get_json(&app, "/api/search?q=security").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["groups"][0]["results"][0]["target"], "/settings?tab=security");
}

//! Web API module for CrmDash.
//!
//! This module provides a REST API over the widget catalog, the saved
//! dashboard layout, and global search, for a browser front end.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/widgets` - Widget catalog
//! - `GET /api/dashboard/layout` - Current layout, normalized against the catalog
//! - `PUT /api/dashboard/layout` - Normalize and save a layout
//! - `POST /api/dashboard/layout/reset` - Default layout (not saved)
//! - `GET /api/search?q=` - Grouped search results

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::WidgetCatalog;
use crate::models::{PersistedLayout, SearchResult, WidgetDefinition, WidgetInstance};
use crate::services::{
    pack, LayoutPersistence, LayoutStore, PlacedWidget, RecordSet, SearchEngine, SearchSettings,
};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Widget catalog (immutable)
    catalog: Arc<WidgetCatalog>,
    /// Where the dashboard layout lives
    persistence: Arc<dyn LayoutPersistence>,
    /// Records searched by `/api/search`
    records: Arc<RecordSet>,
    /// Search tuning
    search: SearchSettings,
}

impl AppState {
    /// Creates a new application state over the standard catalog.
    pub fn new(
        persistence: Arc<dyn LayoutPersistence>,
        records: RecordSet,
        search: SearchSettings,
    ) -> Self {
        Self {
            catalog: WidgetCatalog::standard(),
            persistence,
            records: Arc::new(records),
            search,
        }
    }

    /// Replaces the widget catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<WidgetCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    fn load_store(&self) -> Result<LayoutStore, (StatusCode, Json<ApiError>)> {
        let persisted = self.persistence.load().map_err(|e| {
            warn!(error = %e, "Failed to load layout");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::with_details("Failed to load layout", format!("{e:#}"))),
            )
        })?;
        Ok(LayoutStore::initialize(Arc::clone(&self.catalog), &persisted))
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Widget catalog response.
#[derive(Debug, Serialize)]
pub struct WidgetListResponse {
    /// Catalog entries in catalog order.
    pub widgets: Vec<WidgetDefinition>,
    /// Number of entries.
    pub count: usize,
}

/// Dashboard layout response.
#[derive(Debug, Serialize)]
pub struct LayoutResponse {
    /// Every catalog widget in display order.
    pub widgets: Vec<WidgetInstance>,
    /// Visible widgets packed onto the grid.
    pub placements: Vec<PlacedWidget>,
    /// Persistable projection of the layout.
    pub layout: PersistedLayout,
    /// Number of visible widgets.
    pub visible_count: usize,
}

impl From<&LayoutStore> for LayoutResponse {
    fn from(store: &LayoutStore) -> Self {
        Self {
            widgets: store.instances().to_vec(),
            placements: pack(store.instances()),
            layout: store.project(),
            visible_count: store.visible_instances().count(),
        }
    }
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Text to search for.
    #[serde(default)]
    pub q: String,
}

/// Results of one kind under a group header.
#[derive(Debug, Serialize)]
pub struct SearchGroupResponse {
    /// Header text (e.g., "Leads").
    pub header: String,
    /// Results in display order.
    pub results: Vec<SearchResult>,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The query as received.
    pub query: String,
    /// Total number of results.
    pub count: usize,
    /// Results grouped by kind.
    pub groups: Vec<SearchGroupResponse>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/widgets - Widget catalog.
async fn list_widgets(State(state): State<AppState>) -> Json<WidgetListResponse> {
    Json(WidgetListResponse {
        widgets: state.catalog.list_all().to_vec(),
        count: state.catalog.len(),
    })
}

/// GET /api/dashboard/layout - Current layout.
async fn get_layout(
    State(state): State<AppState>,
) -> Result<Json<LayoutResponse>, (StatusCode, Json<ApiError>)> {
    let store = state.load_store()?;
    Ok(Json(LayoutResponse::from(&store)))
}

/// PUT /api/dashboard/layout - Normalize and save a layout.
///
/// Unknown keys and duplicates are dropped and missing widgets appended, so
/// the stored layout always covers the whole catalog exactly once.
async fn save_layout(
    State(state): State<AppState>,
    Json(layout): Json<PersistedLayout>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let normalized = LayoutStore::initialize(Arc::clone(&state.catalog), &layout).project();

    state.persistence.save(&normalized).map_err(|e| {
        warn!(error = %e, "Failed to save layout");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::with_details("Failed to save layout", format!("{e:#}"))),
        )
    })?;

    info!(visible = normalized.visible.len(), "Dashboard layout saved");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/dashboard/layout/reset - Default layout, not persisted.
async fn reset_layout(
    State(state): State<AppState>,
) -> Result<Json<LayoutResponse>, (StatusCode, Json<ApiError>)> {
    let mut store = state.load_store()?;
    store.reset_to_defaults();
    Ok(Json(LayoutResponse::from(&store)))
}

/// GET /api/search?q= - Grouped search results.
///
/// Queries below the minimum length return an empty result set.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let mut engine = SearchEngine::new(state.search.clone());
    engine.set_query(params.q.clone(), Instant::now());
    engine.search_now(state.records.as_ref());

    let groups: Vec<SearchGroupResponse> = engine
        .grouped()
        .into_iter()
        .map(|group| SearchGroupResponse {
            header: group.header,
            results: group
                .entries
                .into_iter()
                .map(|(_, result)| result.clone())
                .collect(),
        })
        .collect();

    Json(SearchResponse {
        query: params.q,
        count: engine.results().len(),
        groups,
    })
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: the server is meant to run locally next to its front end
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Catalog
        .route("/api/widgets", get(list_widgets))
        // Layout endpoints
        .route("/api/dashboard/layout", get(get_layout).put(save_layout))
        .route("/api/dashboard/layout/reset", post(reset_layout))
        // Search
        .route("/api/search", get(search))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting CrmDash web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

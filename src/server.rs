//! HTTP front end: the sidebar date picker and the routes it submits to.
//!
//! Each request runs the full pipeline synchronously against the shared,
//! immutable order table.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::dashboard::{Dashboard, DashboardView};
use crate::error::{DashboardError, Result};
use crate::filter::{parse_date, DateRange};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub dashboard: Dashboard,
}

/// Date picker submission. Blank values mean "use the dataset bound".
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeQuery {
    fn resolve(&self, dashboard: &Dashboard) -> Result<Option<DateRange>> {
        let start = parse_optional(self.start.as_deref())?;
        let end = parse_optional(self.end.as_deref())?;
        Ok(dashboard.selection(start, end))
    }
}

fn parse_optional(value: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

/// Handler error mapped onto an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(DashboardError),
    Internal(DashboardError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(err) => {
                tracing::debug!("rejected request: {err}");
                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!("dashboard pipeline failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/summary", get(summary_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn compute_view(state: &AppState, query: &RangeQuery) -> std::result::Result<DashboardView, ApiError> {
    let range = query
        .resolve(&state.dashboard)
        .map_err(ApiError::BadRequest)?;
    tracing::info!(range = ?range, "rendering selection");
    state.dashboard.view(range).map_err(ApiError::Internal)
}

/// The dashboard page for the submitted selection.
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> std::result::Result<Html<String>, ApiError> {
    let view = compute_view(&state, &query)?;
    Ok(Html(state.dashboard.render_view(&view)))
}

/// The same selection as JSON.
async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> std::result::Result<Json<DashboardView>, ApiError> {
    compute_view(&state, &query).map(Json)
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Serve `dashboard` until Ctrl+C.
pub async fn serve(dashboard: Dashboard, config: ServerConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| {
            DashboardError::General(format!("Invalid address: {}:{}", config.host, config.port))
        })?;

    let app = create_router(Arc::new(AppState { dashboard }));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving dashboard at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received shutdown signal");
            }
        })
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

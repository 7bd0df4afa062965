//! System endpoints: banner, API root, probes, and the 404 fallback.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub mode: String,
    pub openapi: String,
}

/// Ids reachable under `/api`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiIndex {
    pub workflows: Vec<String>,
    pub agents: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/api", get(api_index))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// GET /: Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = ServiceInfo)),
    tag = "system"
)]
pub(crate) async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: state.config.gatekeeper.mode.as_str().to_string(),
        openapi: "/openapi.json".to_string(),
    })
}

/// GET /api: Catalog ids.
#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "Workflow and agent ids", body = ApiIndex)),
    tag = "system"
)]
pub(crate) async fn api_index(State(state): State<AppState>) -> Json<ApiIndex> {
    Json(ApiIndex {
        workflows: state.catalog.workflows().iter().map(|w| w.id.clone()).collect(),
        agents: state.catalog.agents().iter().map(|a| a.id.clone()).collect(),
    })
}

/// GET /health/liveness: 200 while the process is running.
#[utoipa::path(
    get,
    path = "/health/liveness",
    responses((status = 200, description = "Process is alive", body = String)),
    tag = "system"
)]
pub(crate) async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness: 200 once an execution backend is attached.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Backend attached", body = String),
        (status = 503, description = "No backend attached", body = String),
    ),
    tag = "system"
)]
pub(crate) async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "no execution backend")
    }
}

/// Fallback for unmatched paths. Sits inside the gatekeeper layers.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

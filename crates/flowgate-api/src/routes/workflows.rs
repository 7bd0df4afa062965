//! # Workflow Endpoints
//!
//! Catalog reads plus `POST /api/workflows/:id/execute`, which validates and
//! normalises the trigger data for the named workflow before handing it to
//! the execution backend.
//!
//! Check order on execute: unknown id (404), malformed body (400), invalid
//! trigger (422), missing backend (503), backend failure (502).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use uuid::Uuid;

use super::{require_backend, ExecutionResponse};
use crate::catalog::WorkflowDefinition;
use crate::error::AppError;
use crate::extractors::json_body;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/:id", get(get_workflow))
        .route("/api/workflows/:id/execute", post(execute_workflow))
}

/// GET /api/workflows: List workflow definitions.
#[utoipa::path(
    get,
    path = "/api/workflows",
    responses(
        (status = 200, description = "Workflow definitions", body = Vec<WorkflowDefinition>),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "workflows"
)]
pub(crate) async fn list_workflows(State(state): State<AppState>) -> Json<Vec<WorkflowDefinition>> {
    Json(state.catalog.workflows().to_vec())
}

/// GET /api/workflows/:id: One workflow definition.
#[utoipa::path(
    get,
    path = "/api/workflows/{id}",
    params(("id" = String, Path, description = "Workflow id")),
    responses(
        (status = 200, description = "Workflow definition", body = WorkflowDefinition),
        (status = 404, description = "Unknown workflow", body = crate::error::ErrorBody),
    ),
    tag = "workflows"
)]
pub(crate) async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, AppError> {
    state
        .catalog
        .workflow(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("workflow '{id}'")))
}

/// POST /api/workflows/:id/execute: Run a workflow with the given trigger data.
#[utoipa::path(
    post,
    path = "/api/workflows/{id}/execute",
    params(("id" = String, Path, description = "Workflow id")),
    request_body(content = Object, description = "Trigger data for the workflow"),
    responses(
        (status = 200, description = "Run completed", body = ExecutionResponse),
        (status = 400, description = "Malformed trigger data", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown workflow", body = crate::error::ErrorBody),
        (status = 422, description = "Trigger data out of range", body = crate::error::ErrorBody),
        (status = 502, description = "Backend failed", body = crate::error::ErrorBody),
        (status = 503, description = "No backend attached", body = crate::error::ErrorBody),
    ),
    tag = "workflows"
)]
pub(crate) async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ExecutionResponse>, AppError> {
    let workflow = state
        .catalog
        .workflow(&id)
        .ok_or_else(|| AppError::NotFound(format!("workflow '{id}'")))?;
    let trigger = workflow.prepare_trigger(json_body(body)?)?;
    let backend = require_backend(&state)?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::info!(workflow = %workflow.id, %run_id, "executing workflow");

    let result = backend.execute_workflow(&workflow.id, trigger).await?;

    Ok(Json(ExecutionResponse {
        run_id,
        target: workflow.id.clone(),
        started_at,
        result,
    }))
}

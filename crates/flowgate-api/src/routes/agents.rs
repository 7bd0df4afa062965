//! Agent catalog reads and `POST /api/agents/:id/generate`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{require_backend, ExecutionResponse};
use crate::catalog::AgentDefinition;
use crate::error::AppError;
use crate::extractors::{validated_json_body, Validate};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<String>,
}

impl Validate for GenerateRequest {
    fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must not be empty".into());
        }
        if self.messages.iter().any(|m| m.trim().is_empty()) {
            return Err("messages must not contain blank entries".into());
        }
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/agents", get(list_agents))
        .route("/api/agents/:id", get(get_agent))
        .route("/api/agents/:id/generate", post(generate))
}

/// GET /api/agents: List agent definitions.
#[utoipa::path(
    get,
    path = "/api/agents",
    responses(
        (status = 200, description = "Agent definitions", body = Vec<AgentDefinition>),
        (status = 401, description = "Missing or invalid bearer token"),
    ),
    tag = "agents"
)]
pub(crate) async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentDefinition>> {
    Json(state.catalog.agents().to_vec())
}

/// GET /api/agents/:id: One agent definition.
#[utoipa::path(
    get,
    path = "/api/agents/{id}",
    params(("id" = String, Path, description = "Agent id")),
    responses(
        (status = 200, description = "Agent definition", body = AgentDefinition),
        (status = 404, description = "Unknown agent", body = crate::error::ErrorBody),
    ),
    tag = "agents"
)]
pub(crate) async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgentDefinition>, AppError> {
    state
        .catalog
        .agent(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("agent '{id}'")))
}

/// POST /api/agents/:id/generate: Ask an agent for a response.
#[utoipa::path(
    post,
    path = "/api/agents/{id}/generate",
    params(("id" = String, Path, description = "Agent id")),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Agent responded", body = ExecutionResponse),
        (status = 400, description = "Malformed request", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown agent", body = crate::error::ErrorBody),
        (status = 422, description = "Empty conversation", body = crate::error::ErrorBody),
        (status = 502, description = "Backend failed", body = crate::error::ErrorBody),
        (status = 503, description = "No backend attached", body = crate::error::ErrorBody),
    ),
    tag = "agents"
)]
pub(crate) async fn generate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<ExecutionResponse>, AppError> {
    let agent = state
        .catalog
        .agent(&id)
        .ok_or_else(|| AppError::NotFound(format!("agent '{id}'")))?;
    let req = validated_json_body(body)?;
    let backend = require_backend(&state)?;

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::info!(agent = %agent.id, %run_id, messages = req.messages.len(), "generating");

    let result = backend.generate(&agent.id, &req.messages).await?;

    Ok(Json(ExecutionResponse {
        run_id,
        target: agent.id.clone(),
        started_at,
        result,
    }))
}

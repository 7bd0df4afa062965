//! # API Route Modules
//!
//! - `system`: service banner, API root, health probes, and the 404 fallback.
//! - `workflows`: workflow catalog and execution hand-off.
//! - `agents`: agent catalog and generation hand-off.

pub mod agents;
pub mod system;
pub mod workflows;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::ExecutionBackend;
use crate::error::AppError;
use crate::state::AppState;

/// Result of a run handed to the execution backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExecutionResponse {
    pub run_id: Uuid,
    /// Workflow or agent id the run belongs to.
    pub target: String,
    pub started_at: DateTime<Utc>,
    /// Backend output, passed through untouched.
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}

/// Extract the execution backend from `AppState` or return 503.
fn require_backend(state: &AppState) -> Result<&Arc<dyn ExecutionBackend>, AppError> {
    state.backend.as_ref().ok_or_else(|| {
        AppError::service_unavailable("no execution backend is attached to this server")
    })
}

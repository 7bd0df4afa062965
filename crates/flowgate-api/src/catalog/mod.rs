//! # Workflow & Agent Catalog
//!
//! Static metadata for the workflows and agents this server exposes, plus the
//! [`ExecutionBackend`] seam that actually runs them. The server validates
//! and normalises trigger data, then hands off; it never executes steps
//! itself.
//!
//! | Id                 | Kind     | Module                |
//! |--------------------|----------|-----------------------|
//! | `weather-workflow` | workflow | [`weather`]           |
//! | `markdown-chunk`   | workflow | [`markdown_chunk`]    |
//! | `weather-agent`    | agent    | [`weather`]           |

pub mod markdown_chunk;
pub mod weather;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::extractors::Validate;

// ── Backend seam ────────────────────────────────────────────────────────────

/// Failure reported by the execution backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend cannot take work right now.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// The run started but did not complete.
    #[error("backend run failed: {0}")]
    Failed(String),
}

/// The workflow/agent engine requests are delegated to.
#[axum::async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Run a workflow with already-validated trigger data.
    async fn execute_workflow(
        &self,
        workflow_id: &str,
        trigger: serde_json::Value,
    ) -> Result<serde_json::Value, BackendError>;

    /// Ask an agent to respond to a conversation.
    async fn generate(
        &self,
        agent_id: &str,
        messages: &[String],
    ) -> Result<serde_json::Value, BackendError>;
}

// ── Trigger validation ──────────────────────────────────────────────────────

/// Trigger data rejected before hand-off.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// Wrong shape or types.
    #[error("malformed trigger data: {0}")]
    Malformed(String),
    /// Well-formed but out of range.
    #[error("invalid trigger data: {0}")]
    Invalid(String),
    /// Validated trigger could not be turned back into JSON. A server fault.
    #[error("could not re-encode trigger data: {0}")]
    Encoding(String),
}

/// Which trigger schema a workflow accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerKind {
    Weather,
    MarkdownChunk,
}

/// Deserialize, validate, and re-serialize trigger data so defaults are
/// filled in before the backend sees it.
fn normalize<T>(raw: serde_json::Value) -> Result<serde_json::Value, TriggerError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let trigger: T =
        serde_json::from_value(raw).map_err(|e| TriggerError::Malformed(e.to_string()))?;
    trigger.validate().map_err(TriggerError::Invalid)?;
    serde_json::to_value(&trigger).map_err(|e| TriggerError::Encoding(e.to_string()))
}

// ── Definitions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StepDefinition {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkflowDefinition {
    pub id: String,
    pub description: String,
    pub steps: Vec<StepDefinition>,
    #[serde(skip)]
    trigger: TriggerKind,
}

impl WorkflowDefinition {
    /// Validate raw trigger data against this workflow's schema and return
    /// the normalised form to hand to the backend.
    pub fn prepare_trigger(
        &self,
        raw: serde_json::Value,
    ) -> Result<serde_json::Value, TriggerError> {
        match self.trigger {
            TriggerKind::Weather => normalize::<weather::WeatherTrigger>(raw),
            TriggerKind::MarkdownChunk => normalize::<markdown_chunk::MarkdownChunkTrigger>(raw),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolDefinition {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
}

/// Every workflow and agent the server knows. Built once at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    workflows: Vec<WorkflowDefinition>,
    agents: Vec<AgentDefinition>,
}

impl Catalog {
    pub fn new(workflows: Vec<WorkflowDefinition>, agents: Vec<AgentDefinition>) -> Self {
        Self { workflows, agents }
    }

    /// The weather and markdown-chunk workflows plus the weather agent.
    pub fn standard() -> Self {
        Self::new(
            vec![weather::workflow(), markdown_chunk::workflow()],
            vec![weather::agent()],
        )
    }

    pub fn workflows(&self) -> &[WorkflowDefinition] {
        &self.workflows
    }

    pub fn agents(&self) -> &[AgentDefinition] {
        &self.agents
    }

    pub fn workflow(&self, id: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.id == id)
    }

    pub fn agent(&self, id: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|a| a.id == id)
    }
}

fn step(id: &str, description: &str) -> StepDefinition {
    StepDefinition {
        id: id.to_string(),
        description: description.to_string(),
    }
}

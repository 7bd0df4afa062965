//! Weather lookup workflow and the weather agent.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{step, AgentDefinition, ToolDefinition, TriggerKind, WorkflowDefinition};
use crate::extractors::Validate;

/// Trigger data for `weather-workflow`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct WeatherTrigger {
    /// City to fetch the forecast for.
    pub city: String,
}

impl Validate for WeatherTrigger {
    fn validate(&self) -> Result<(), String> {
        if self.city.trim().is_empty() {
            return Err("city must not be empty".into());
        }
        Ok(())
    }
}

pub fn workflow() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "weather-workflow".to_string(),
        description: "Fetches the forecast for a city and suggests activities for it".to_string(),
        steps: vec![
            step("fetch-weather", "Fetches the weather forecast for the given city"),
            step("plan-activities", "Suggests activities based on the forecast"),
        ],
        trigger: TriggerKind::Weather,
    }
}

pub fn agent() -> AgentDefinition {
    AgentDefinition {
        id: "weather-agent".to_string(),
        name: "Weather Agent".to_string(),
        instructions: "Answer questions about current weather. Ask for a location when none \
                       is given and keep responses concise."
            .to_string(),
        tools: vec![ToolDefinition {
            id: "weather-tool".to_string(),
            description: "Get current weather for a location".to_string(),
        }],
    }
}

//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document, served at
//! `/openapi.json`. The path is exempt from authentication under the
//! standard exemption profile.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "flowgate",
        version = "0.1.0",
        description = "Workflow and agent execution API behind a CORS and bearer-token gatekeeper.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::system::service_info,
        crate::routes::system::api_index,
        crate::routes::system::liveness,
        crate::routes::system::readiness,
        crate::routes::workflows::list_workflows,
        crate::routes::workflows::get_workflow,
        crate::routes::workflows::execute_workflow,
        crate::routes::agents::list_agents,
        crate::routes::agents::get_agent,
        crate::routes::agents::generate,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::ExecutionResponse,
        crate::routes::system::ServiceInfo,
        crate::routes::system::ApiIndex,
        crate::routes::agents::GenerateRequest,
        crate::catalog::WorkflowDefinition,
        crate::catalog::StepDefinition,
        crate::catalog::AgentDefinition,
        crate::catalog::ToolDefinition,
        crate::catalog::weather::WeatherTrigger,
        crate::catalog::markdown_chunk::MarkdownChunkTrigger,
        crate::catalog::markdown_chunk::ChunkOptions,
        crate::catalog::markdown_chunk::ChunkStrategy,
        crate::catalog::markdown_chunk::KeepSeparator,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "system", description = "Banner, API root, and probes"),
        (name = "workflows", description = "Workflow catalog and execution"),
        (name = "agents", description = "Agent catalog and generation"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme used by `/api/agents` and
/// `/api/workflows`.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in [
            "/",
            "/api",
            "/health/liveness",
            "/health/readiness",
            "/api/workflows",
            "/api/workflows/{id}",
            "/api/workflows/{id}/execute",
            "/api/agents",
            "/api/agents/{id}",
            "/api/agents/{id}/generate",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_declares_bearer_scheme() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(spec["components"]["securitySchemes"]["bearer"].is_object());
    }
}

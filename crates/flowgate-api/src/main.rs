//! # flowgate-api: Binary Entry Point
//!
//! Loads configuration from the environment, then serves the API on
//! `0.0.0.0:PORT` (default 4111) until Ctrl-C.

use anyhow::Context;
use flowgate_api::middleware::tracing_layer::{init_subscriber, json_requested, LOG_JSON_VAR};
use flowgate_api::state::{AppConfig, AppState};
use flowgate_gate::{OriginPattern, PathRule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber(json_requested(std::env::var(LOG_JSON_VAR).ok().as_deref()));

    let config = AppConfig::from_env()
        .map_err(|e| {
            tracing::error!("Configuration rejected: {e}");
            e
        })
        .context("failed to load configuration")?;
    log_summary(&config);

    let port = config.port;
    let state = AppState::new(config);
    tracing::warn!("No execution backend attached. Execute and generate endpoints will return 503.");

    let app = flowgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("flowgate listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated abnormally")?;

    tracing::info!("flowgate stopped");
    Ok(())
}

fn log_summary(config: &AppConfig) {
    let gate = &config.gatekeeper;
    let origins: Vec<&str> = gate.cors.allow_list().iter().map(OriginPattern::as_str).collect();
    let scope: Vec<&str> = gate.auth.scope().iter().map(PathRule::as_str).collect();

    tracing::info!(
        mode = gate.mode.as_str(),
        port = config.port,
        origins = ?origins,
        no_origin = ?gate.cors.no_origin(),
        scope = ?scope,
        exemptions = gate.auth.exemptions().len(),
        diagnostics = ?gate.auth.diagnostics(),
        "gatekeeper configured"
    );

    if gate.auth.is_bypassed() {
        tracing::warn!(
            "DEVELOPMENT AUTH BYPASS ARMED: every request under {} passes without credentials",
            scope.join(", ")
        );
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, draining connections"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {e}. Serving until killed.");
            std::future::pending::<()>().await;
        }
    }
}

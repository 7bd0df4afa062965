//! # Application State
//!
//! Shared state for the Axum application, passed to route handlers via the
//! `State` extractor. Everything here is built once at startup and read-only
//! afterwards.
//!
//! The gatekeeper itself is not part of `AppState`: its two stages reach the
//! middleware through `Extension` layers (see [`crate::app`]).

use std::sync::Arc;

use flowgate_gate::{ConfigError, GatekeeperConfig};

use crate::catalog::{Catalog, ExecutionBackend};

/// Variable holding the bind port.
pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 4111;

/// Application configuration.
///
/// `Debug` delegates to [`GatekeeperConfig`], whose secret is redacted.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    pub gatekeeper: GatekeeperConfig,
}

impl AppConfig {
    /// Read the whole configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_VAR).filter(|v| !v.trim().is_empty()) {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: PORT_VAR,
                value: raw.clone(),
                expected: "a TCP port (0-65535)",
            })?,
        };
        let gatekeeper = GatekeeperConfig::from_lookup(lookup)?;
        Ok(Self { port, gatekeeper })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Engine workflows and agents are delegated to. `None` until one is
    /// attached; execution routes answer 503 meanwhile.
    pub backend: Option<Arc<dyn ExecutionBackend>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            catalog: Arc::new(Catalog::standard()),
            backend: None,
            config: Arc::new(config),
        }
    }

    /// Attach an execution backend.
    pub fn with_backend(mut self, backend: Arc<dyn ExecutionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("workflows", &self.catalog.workflows().len())
            .field("agents", &self.catalog.agents().len())
            .field("backend", &self.backend.as_ref().map(|_| "attached"))
            .field("config", &self.config)
            .finish()
    }
}

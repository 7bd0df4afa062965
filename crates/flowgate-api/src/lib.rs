//! # flowgate-api: Axum Application Server
//!
//! Fronts a workflow/agent execution backend with the request gatekeeper
//! from `flowgate-gate`.
//!
//! ## API Surface
//!
//! | Path                              | Module                  | Auth      |
//! |-----------------------------------|-------------------------|-----------|
//! | `/`, `/api`                       | [`routes::system`]      | exempt    |
//! | `/health/*`                       | [`routes::system`]      | exempt    |
//! | `/openapi.json`                   | [`openapi`]             | exempt    |
//! | `/api/workflows/*`                | [`routes::workflows`]   | bearer    |
//! | `/api/agents/*`                   | [`routes::agents`]      | bearer    |
//!
//! The auth column reflects the default scope and exemption profile.
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → cors_middleware → auth_middleware → Handler / 404 fallback
//! ```
//!
//! Every route and the fallback sit inside both gatekeeper stages, so CORS
//! headers appear on 401s and 404s alike and `OPTIONS` answers 204 anywhere.

pub mod catalog;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::middleware::from_fn;
use axum::Router;

use crate::state::AppState;

pub use error::AppError;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = Arc::new(state.config.gatekeeper.cors.clone());
    let guard = Arc::new(state.config.gatekeeper.auth.clone());

    Router::new()
        .merge(routes::system::router())
        .merge(routes::workflows::router())
        .merge(routes::agents::router())
        .merge(openapi::router())
        .fallback(routes::system::not_found)
        .layer(from_fn(middleware::auth::auth_middleware))
        .layer(from_fn(middleware::cors::cors_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(guard))
        .layer(axum::Extension(cors))
        .with_state(state)
}

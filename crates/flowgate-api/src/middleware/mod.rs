//! # HTTP Middleware
//!
//! Axum glue for the two gatekeeper stages plus request tracing.
//!
//! ```text
//! TraceLayer → cors_middleware → auth_middleware → handler
//! ```
//!
//! Both gatekeeper stages read their compiled configuration from request
//! extensions, injected by `Extension` layers outside them.

pub mod auth;
pub mod cors;
pub mod tracing_layer;

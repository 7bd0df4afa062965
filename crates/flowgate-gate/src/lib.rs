//! # flowgate-gate: Request Gatekeeper
//!
//! Decision logic for the two ordered stages every inbound request passes
//! before it reaches a route handler:
//!
//! ```text
//! request → CORS Resolver → Auth Guard (scoped) → handler
//! ```
//!
//! - [`cors::CorsPolicy`] decides the `Access-Control-Allow-Origin` grant from
//!   a precompiled allow-list ([`origin::AllowList`]) and flags preflight
//!   (`OPTIONS`) requests for a 204 short-circuit.
//! - [`auth::AuthGuard`] applies bearer-token authentication to the paths in
//!   its scope ([`path::PathRule`]), after ordered [`exemption::Exemption`]s
//!   and the explicitly armed development bypass.
//!
//! ## Crate Policy
//!
//! - No HTTP framework types. Inputs are plain `&str` method, path, and header
//!   values; outputs are decisions. `flowgate-api` owns the Axum glue.
//! - Configuration is built once ([`config::GatekeeperConfig`]) and only read
//!   afterwards. Nothing here touches the process environment mid-request.
//! - Every decision is a pure function of configuration and request, so the
//!   same request always yields the same outcome.

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod exemption;
mod glob;
pub mod origin;
pub mod path;

pub use auth::{AuthDiagnostics, AuthGuard, AuthOutcome, BearerSecret, GuardMode};
pub use config::{ExecutionMode, GatekeeperConfig};
pub use cors::{CorsDecision, CorsPolicy, DefaultOrigins, NoOriginPolicy, OriginGrant};
pub use error::{AuthRejection, ConfigError};
pub use exemption::{Exemption, ExemptionProfile};
pub use origin::{AllowList, OriginPattern};
pub use path::PathRule;

//! # Gatekeeper Configuration
//!
//! Builds the immutable [`GatekeeperConfig`] once at startup. Every value is
//! read from a lookup function so tests can supply a map; the binary passes
//! the process environment via [`GatekeeperConfig::from_env`].
//!
//! Variables:
//! - `FLOWGATE_ALLOWED_ORIGINS`: comma-separated allow-list (default: empty)
//! - `FLOWGATE_CORS_DEFAULTS`: `union` | `verbatim` (default: `union`)
//! - `FLOWGATE_CORS_NO_ORIGIN`: `wildcard` | `deny` (default: `wildcard`)
//! - `FLOWGATE_API_KEY`: bearer secret (required unless the bypass is armed)
//! - `FLOWGATE_ENV`: `production` | `development` (default: `production`)
//! - `FLOWGATE_DEV_AUTH_BYPASS`: `true` arms the bypass; development only
//! - `FLOWGATE_AUTH_SCOPE`: comma-separated path rules
//!   (default: `/api/agents/*,/api/workflows/*`)
//! - `FLOWGATE_AUTH_EXEMPTIONS`: `standard` | `api-root-only` (default: `standard`)
//! - `FLOWGATE_AUTH_DIAGNOSTICS`: `detailed` | `generic`
//!   (default: `detailed` in development, `generic` in production)

use std::str::FromStr;

use crate::auth::{AuthDiagnostics, AuthGuard, BearerSecret, GuardMode};
use crate::cors::{CorsPolicy, DefaultOrigins, NoOriginPolicy};
use crate::error::ConfigError;
use crate::exemption::ExemptionProfile;
use crate::origin::AllowList;
use crate::path::PathRule;

pub const ALLOWED_ORIGINS_VAR: &str = "FLOWGATE_ALLOWED_ORIGINS";
pub const CORS_DEFAULTS_VAR: &str = "FLOWGATE_CORS_DEFAULTS";
pub const CORS_NO_ORIGIN_VAR: &str = "FLOWGATE_CORS_NO_ORIGIN";
pub const API_KEY_VAR: &str = "FLOWGATE_API_KEY";
pub const ENV_VAR: &str = "FLOWGATE_ENV";
pub const DEV_AUTH_BYPASS_VAR: &str = "FLOWGATE_DEV_AUTH_BYPASS";
pub const AUTH_SCOPE_VAR: &str = "FLOWGATE_AUTH_SCOPE";
pub const AUTH_EXEMPTIONS_VAR: &str = "FLOWGATE_AUTH_EXEMPTIONS";
pub const AUTH_DIAGNOSTICS_VAR: &str = "FLOWGATE_AUTH_DIAGNOSTICS";

/// Default protected scope.
pub const DEFAULT_AUTH_SCOPE: [&str; 2] = ["/api/agents/*", "/api/workflows/*"];

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Production,
    Development,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue {
                var: ENV_VAR,
                value: s.to_string(),
                expected: "production | development",
            }),
        }
    }
}

impl FromStr for AuthDiagnostics {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "generic" => Ok(Self::Generic),
            _ => Err(ConfigError::InvalidValue {
                var: AUTH_DIAGNOSTICS_VAR,
                value: s.to_string(),
                expected: "detailed | generic",
            }),
        }
    }
}

/// The complete, immutable gatekeeper configuration.
#[derive(Debug, Clone)]
pub struct GatekeeperConfig {
    pub mode: ExecutionMode,
    pub cors: CorsPolicy,
    pub auth: AuthGuard,
}

impl GatekeeperConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]; the caller is expected to abort startup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = get(ENV_VAR)
            .map(|v| v.parse::<ExecutionMode>())
            .transpose()?
            .unwrap_or_default();

        // ── CORS ────────────────────────────────────────────────────
        let configured = AllowList::compile(split_list(get(ALLOWED_ORIGINS_VAR).as_deref()))?;
        let defaults = get(CORS_DEFAULTS_VAR)
            .map(|v| v.parse::<DefaultOrigins>())
            .transpose()?
            .unwrap_or_default();
        let no_origin = get(CORS_NO_ORIGIN_VAR)
            .map(|v| v.parse::<NoOriginPolicy>())
            .transpose()?
            .unwrap_or_default();
        let cors = CorsPolicy::new(configured, defaults, no_origin);

        // ── Auth ────────────────────────────────────────────────────
        let bypass_requested = get(DEV_AUTH_BYPASS_VAR)
            .map(|v| parse_flag(DEV_AUTH_BYPASS_VAR, &v))
            .transpose()?
            .unwrap_or(false);
        if bypass_requested && mode != ExecutionMode::Development {
            return Err(ConfigError::BypassOutsideDevelopment);
        }

        let guard_mode = if bypass_requested {
            GuardMode::DevelopmentBypass
        } else {
            let secret = get(API_KEY_VAR).ok_or(ConfigError::MissingSecret)?;
            GuardMode::Enforce(BearerSecret::new(secret)?)
        };

        let scope = match get(AUTH_SCOPE_VAR) {
            Some(raw) => split_list(Some(raw.as_str()))
                .into_iter()
                .map(PathRule::parse)
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_AUTH_SCOPE
                .iter()
                .map(|r| PathRule::parse(r))
                .collect::<Result<Vec<_>, _>>()?,
        };
        let exemptions = get(AUTH_EXEMPTIONS_VAR)
            .map(|v| v.parse::<ExemptionProfile>())
            .transpose()?
            .unwrap_or_default()
            .exemptions();
        let diagnostics = match get(AUTH_DIAGNOSTICS_VAR) {
            Some(v) => v.parse::<AuthDiagnostics>()?,
            None => match mode {
                ExecutionMode::Development => AuthDiagnostics::Detailed,
                ExecutionMode::Production => AuthDiagnostics::Generic,
            },
        };

        Ok(Self {
            mode,
            cors,
            auth: AuthGuard::new(scope, exemptions, guard_mode, diagnostics),
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            expected: "true | false",
        }),
    }
}

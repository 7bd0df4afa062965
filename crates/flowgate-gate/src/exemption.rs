//! # Auth Exemptions
//!
//! Predicates that let an in-scope request through the Auth Guard without
//! credentials. Evaluated in order, before the development bypass and before
//! the `Authorization` header is looked at.

use std::str::FromStr;

use crate::error::ConfigError;

/// Substrings that mark a system probe path.
pub const PROBE_MARKERS: [&str; 5] = ["/health", "/readiness", "/ready", "/live", "/ping"];

/// A single exemption predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exemption {
    /// Path equals the given string.
    ExactPath(String),
    /// Path contains the given substring anywhere.
    PathContains(String),
    /// Method and path both equal.
    MethodPath { method: String, path: String },
}

impl Exemption {
    pub fn matches(&self, method: &str, path: &str) -> bool {
        match self {
            Self::ExactPath(p) => path == p,
            Self::PathContains(fragment) => path.contains(fragment.as_str()),
            Self::MethodPath { method: m, path: p } => method == m && path == p,
        }
    }
}

/// Named exemption sets, selectable via `FLOWGATE_AUTH_EXEMPTIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExemptionProfile {
    /// Root, API root (any method), `/openapi.json`, and probe paths.
    #[default]
    Standard,
    /// `GET /api` only.
    ApiRootOnly,
}

impl ExemptionProfile {
    pub fn exemptions(self) -> Vec<Exemption> {
        match self {
            Self::Standard => {
                let mut list = vec![
                    Exemption::ExactPath("/".into()),
                    Exemption::ExactPath("/api".into()),
                    Exemption::ExactPath("/openapi.json".into()),
                ];
                list.extend(
                    PROBE_MARKERS
                        .iter()
                        .map(|m| Exemption::PathContains((*m).to_string())),
                );
                list
            }
            Self::ApiRootOnly => vec![Exemption::MethodPath {
                method: "GET".into(),
                path: "/api".into(),
            }],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ApiRootOnly => "api-root-only",
        }
    }
}

impl FromStr for ExemptionProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "api-root-only" => Ok(Self::ApiRootOnly),
            _ => Err(ConfigError::InvalidValue {
                var: "FLOWGATE_AUTH_EXEMPTIONS",
                value: s.to_string(),
                expected: "standard | api-root-only",
            }),
        }
    }
}

//! # CORS Resolver
//!
//! Decides the origin grant for a request and whether it is a preflight.
//! The resulting [`CorsDecision`] lists the exact response headers to set;
//! the HTTP layer applies them to every response, including 401 rejections.
//!
//! ## Headers
//!
//! | Header                              | Value                                   |
//! |-------------------------------------|-----------------------------------------|
//! | `Access-Control-Allow-Origin`       | `*`, the echoed origin, or omitted      |
//! | `Access-Control-Allow-Methods`      | `GET, POST, PUT, DELETE, OPTIONS`       |
//! | `Access-Control-Allow-Headers`      | `Content-Type, Authorization`           |
//! | `Access-Control-Allow-Credentials`  | `true`                                  |
//! | `Vary`                              | `Origin`, when an origin is echoed      |

use std::str::FromStr;

use crate::error::ConfigError;
use crate::origin::AllowList;

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
pub const VARY: &str = "vary";

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Local development console origin.
pub const LOCAL_DEV_ORIGIN: &str = "http://localhost:4111";
/// Hosted platform origins.
pub const PLATFORM_WILDCARD_ORIGIN: &str = "https://*.mastra.cloud";

/// Whether the built-in origins are added to the configured allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultOrigins {
    /// Configured entries ∪ [`LOCAL_DEV_ORIGIN`], [`PLATFORM_WILDCARD_ORIGIN`].
    #[default]
    Union,
    /// Configured entries only.
    Verbatim,
}

impl FromStr for DefaultOrigins {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(Self::Union),
            "verbatim" => Ok(Self::Verbatim),
            _ => Err(ConfigError::InvalidValue {
                var: "FLOWGATE_CORS_DEFAULTS",
                value: s.to_string(),
                expected: "union | verbatim",
            }),
        }
    }
}

/// Grant for requests that carry no `Origin` header (curl, server-to-server).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoOriginPolicy {
    /// `Access-Control-Allow-Origin: *`.
    #[default]
    Wildcard,
    /// No origin grant.
    Deny,
}

impl FromStr for NoOriginPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wildcard" => Ok(Self::Wildcard),
            "deny" => Ok(Self::Deny),
            _ => Err(ConfigError::InvalidValue {
                var: "FLOWGATE_CORS_NO_ORIGIN",
                value: s.to_string(),
                expected: "wildcard | deny",
            }),
        }
    }
}

/// Origin grant decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginGrant {
    /// `*`.
    Any,
    /// The request origin, echoed back.
    Echo(String),
    /// No grant. The request still proceeds.
    Denied,
}

/// Everything the HTTP layer needs to apply the CORS stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsDecision {
    pub grant: OriginGrant,
    /// `OPTIONS` request: answer 204 without running later stages.
    pub preflight: bool,
}

impl CorsDecision {
    pub fn allow_origin(&self) -> Option<&str> {
        match &self.grant {
            OriginGrant::Any => Some("*"),
            OriginGrant::Echo(origin) => Some(origin),
            OriginGrant::Denied => None,
        }
    }

    /// Response headers to set, as lowercase name / value pairs.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::with_capacity(5);
        if let Some(origin) = self.allow_origin() {
            headers.push((ALLOW_ORIGIN, origin));
        }
        headers.push((ALLOW_METHODS, ALLOWED_METHODS));
        headers.push((ALLOW_HEADERS, ALLOWED_HEADERS));
        headers.push((ALLOW_CREDENTIALS, "true"));
        if matches!(self.grant, OriginGrant::Echo(_)) {
            headers.push((VARY, "Origin"));
        }
        headers
    }
}

/// Compiled CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_list: AllowList,
    no_origin: NoOriginPolicy,
}

impl CorsPolicy {
    pub fn new(configured: AllowList, defaults: DefaultOrigins, no_origin: NoOriginPolicy) -> Self {
        let allow_list = match defaults {
            DefaultOrigins::Union => configured.union(builtin_origins()),
            DefaultOrigins::Verbatim => configured,
        };
        Self {
            allow_list,
            no_origin,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn no_origin(&self) -> NoOriginPolicy {
        self.no_origin
    }

    /// Decide the grant for a request with the given method and `Origin`.
    pub fn resolve(&self, method: &str, origin: Option<&str>) -> CorsDecision {
        let grant = match origin {
            None => match self.no_origin {
                NoOriginPolicy::Wildcard => OriginGrant::Any,
                NoOriginPolicy::Deny => OriginGrant::Denied,
            },
            Some(origin) => match self.allow_list.find(origin) {
                Some(_) => OriginGrant::Echo(origin.to_string()),
                None => OriginGrant::Denied,
            },
        };
        CorsDecision {
            grant,
            preflight: method == "OPTIONS",
        }
    }
}

fn builtin_origins() -> AllowList {
    // Both entries are well-formed, so lenient compilation keeps them.
    AllowList::compile_lenient([LOCAL_DEV_ORIGIN, PLATFORM_WILDCARD_ORIGIN])
}

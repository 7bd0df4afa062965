//! # Gatekeeper Errors
//!
//! [`ConfigError`] is fatal and surfaces at startup. [`AuthRejection`] is a
//! per-request outcome that the HTTP layer turns into a 401.

use thiserror::Error;

use crate::auth::AuthDiagnostics;

/// Configuration could not be turned into a gatekeeper. Prevents server start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An allow-list entry is not a valid origin or origin pattern.
    #[error("malformed allow-list entry {entry:?}: {reason}")]
    MalformedOrigin { entry: String, reason: String },

    /// An auth scope rule is not a valid path rule.
    #[error("malformed path rule {rule:?}: {reason}")]
    MalformedPathRule { rule: String, reason: String },

    /// Authentication is enforced but no bearer secret was configured.
    #[error("FLOWGATE_API_KEY is required unless the development auth bypass is armed")]
    MissingSecret,

    /// A configuration variable holds a value outside its accepted set.
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The development auth bypass was requested outside development mode.
    #[error("FLOWGATE_DEV_AUTH_BYPASS is only honoured when FLOWGATE_ENV=development")]
    BypassOutsideDevelopment,
}

/// Reason an in-scope request failed authentication.
///
/// The variants are kept apart for operator logs. What the caller sees is
/// decided by [`AuthDiagnostics`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization` header.
    #[error("missing authorization header")]
    Missing,

    /// Header present but not `Bearer <token>`.
    #[error("authorization header must use the Bearer scheme with a single token")]
    Malformed,

    /// Well-formed bearer token that does not match the secret.
    #[error("invalid bearer token")]
    InvalidToken,
}

impl AuthRejection {
    /// Plain-text body returned with the 401.
    pub fn public_message(&self, diagnostics: AuthDiagnostics) -> &'static str {
        match diagnostics {
            AuthDiagnostics::Generic => "Unauthorized",
            AuthDiagnostics::Detailed => match self {
                Self::Missing | Self::Malformed => "Unauthorized: Missing or invalid API key",
                Self::InvalidToken => "Unauthorized: Invalid API key",
            },
        }
    }
}

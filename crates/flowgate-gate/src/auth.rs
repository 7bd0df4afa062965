//! # Auth Guard
//!
//! Path-scoped bearer-token authentication against a single shared secret.
//!
//! ## Evaluation Order
//!
//! ```text
//! out of scope?          → OutOfScope     (guard never evaluated)
//! exemption matches?     → Exempt
//! development bypass?    → Bypassed
//! Authorization header   → Authenticated | Rejected(Missing | Malformed | InvalidToken)
//! ```
//!
//! Exactly one outcome is produced per request, and the outcome depends only
//! on the guard's configuration and the request's method, path, and header.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::config::API_KEY_VAR;
use crate::error::{AuthRejection, ConfigError};
use crate::exemption::Exemption;
use crate::path::PathRule;

// ── Secret ──────────────────────────────────────────────────────────────────

/// The shared bearer secret.
///
/// Zeroized on drop. Custom `Debug` redacts the value to prevent credential
/// leakage in logs.
#[derive(Clone)]
pub struct BearerSecret(Zeroizing<String>);

impl BearerSecret {
    /// Wrap a secret, dropping surrounding whitespace (a trailing newline from
    /// a key file or secrets mount). Empty secrets are refused, as are secrets
    /// with inner whitespace, which no bearer token could ever present.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = Zeroizing::new(secret.into());
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                var: API_KEY_VAR,
                value: "[REDACTED]".to_string(),
                expected: "a single token without whitespace",
            });
        }
        Ok(Self(Zeroizing::new(trimmed.to_string())))
    }

    /// Constant-time comparison against a presented token.
    pub fn verify(&self, provided: &str) -> bool {
        constant_time_token_eq(provided, &self.0)
    }
}

impl std::fmt::Debug for BearerSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerSecret([REDACTED])")
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so the early return does
/// not stand out in timing.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Guard Configuration ─────────────────────────────────────────────────────

/// How much of the rejection reason reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDiagnostics {
    /// Distinguish a missing/malformed header from a wrong token.
    Detailed,
    /// Always answer `Unauthorized`.
    Generic,
}

/// Whether credentials are checked at all for in-scope, non-exempt requests.
#[derive(Debug, Clone)]
pub enum GuardMode {
    /// Require `Authorization: Bearer <secret>`.
    Enforce(BearerSecret),
    /// Pass every request. Only constructed through
    /// [`crate::config::GatekeeperConfig`] when development mode and the
    /// bypass flag are both set, or explicitly in tests.
    DevelopmentBypass,
}

/// Result of evaluating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Path outside every scope rule.
    OutOfScope,
    /// An exemption matched.
    Exempt,
    /// Development bypass is armed.
    Bypassed,
    /// Token matched the secret.
    Authenticated,
    /// Terminal 401.
    Rejected(AuthRejection),
}

impl AuthOutcome {
    pub fn is_pass(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Path-scoped bearer-token guard.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    scope: Vec<PathRule>,
    exemptions: Vec<Exemption>,
    mode: GuardMode,
    diagnostics: AuthDiagnostics,
}

impl AuthGuard {
    pub fn new(
        scope: Vec<PathRule>,
        exemptions: Vec<Exemption>,
        mode: GuardMode,
        diagnostics: AuthDiagnostics,
    ) -> Self {
        Self {
            scope,
            exemptions,
            mode,
            diagnostics,
        }
    }

    pub fn scope(&self) -> &[PathRule] {
        &self.scope
    }

    pub fn exemptions(&self) -> &[Exemption] {
        &self.exemptions
    }

    pub fn diagnostics(&self) -> AuthDiagnostics {
        self.diagnostics
    }

    pub fn is_bypassed(&self) -> bool {
        matches!(self.mode, GuardMode::DevelopmentBypass)
    }

    /// Whether the guard applies to `path` at all.
    pub fn in_scope(&self, path: &str) -> bool {
        self.scope.iter().any(|rule| rule.matches(path))
    }

    /// Decide one request. `authorization` is the raw `Authorization` header
    /// value, if present.
    pub fn evaluate(&self, method: &str, path: &str, authorization: Option<&str>) -> AuthOutcome {
        if !self.in_scope(path) {
            return AuthOutcome::OutOfScope;
        }
        if self.exemptions.iter().any(|e| e.matches(method, path)) {
            return AuthOutcome::Exempt;
        }

        let secret = match &self.mode {
            GuardMode::DevelopmentBypass => return AuthOutcome::Bypassed,
            GuardMode::Enforce(secret) => secret,
        };

        match authorization.map(bearer_token) {
            None => AuthOutcome::Rejected(AuthRejection::Missing),
            Some(None) => AuthOutcome::Rejected(AuthRejection::Malformed),
            Some(Some(token)) if secret.verify(token) => AuthOutcome::Authenticated,
            Some(Some(_)) => AuthOutcome::Rejected(AuthRejection::InvalidToken),
        }
    }
}

/// Extract `<token>` from `Bearer <token>`. The scheme is case-sensitive and
/// the token must be a single non-empty word.
fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exemption::ExemptionProfile;

    fn scope() -> Vec<PathRule> {
        vec![
            PathRule::parse("/api/agents/*").unwrap(),
            PathRule::parse("/api/workflows/*").unwrap(),
        ]
    }

    fn enforcing(secret: &str) -> AuthGuard {
        AuthGuard::new(
            scope(),
            ExemptionProfile::Standard.exemptions(),
            GuardMode::Enforce(BearerSecret::new(secret).unwrap()),
            AuthDiagnostics::Generic,
        )
    }

    // ── Secret ───────────────────────────────────────────────────

    #[test]
    fn empty_secret_refused() {
        assert_eq!(BearerSecret::new("").unwrap_err(), ConfigError::MissingSecret);
    }

    #[test]
    fn secret_surrounding_whitespace_is_dropped() {
        let secret = BearerSecret::new(" s3cret\n").unwrap();
        assert!(secret.verify("s3cret"));
        assert!(!secret.verify(" s3cret\n"));
    }

    #[test]
    fn secret_with_inner_whitespace_refused() {
        let err = BearerSecret::new("two words").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: API_KEY_VAR, .. }));
        assert!(!err.to_string().contains("two words"));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = BearerSecret::new("hunter2").unwrap();
        let shown = format!("{secret:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("REDACTED"));
    }

    #[test]
    fn constant_time_eq_identical_tokens() {
        assert!(constant_time_token_eq("secret-token-123", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix_and_empty() {
        assert!(!constant_time_token_eq("secret", "secret-token-123"));
        assert!(!constant_time_token_eq("", "secret-token-123"));
        assert!(!constant_time_token_eq("wrong-token-1234", "secret-token-123"));
    }

    // ── Header parsing ───────────────────────────────────────────

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer a b"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearerabc"), None);
    }

    // ── Evaluation ───────────────────────────────────────────────

    #[test]
    fn out_of_scope_is_never_evaluated() {
        let guard = enforcing("s3cret");
        assert_eq!(guard.evaluate("GET", "/v1/other", None), AuthOutcome::OutOfScope);
        assert_eq!(guard.evaluate("GET", "/", None), AuthOutcome::OutOfScope);
    }

    #[test]
    fn correct_token_authenticates() {
        let guard = enforcing("s3cret");
        assert_eq!(
            guard.evaluate("POST", "/api/workflows/x/execute", Some("Bearer s3cret")),
            AuthOutcome::Authenticated
        );
    }

    #[test]
    fn wrong_token_rejected() {
        let guard = enforcing("s3cret");
        assert_eq!(
            guard.evaluate("GET", "/api/agents", Some("Bearer wrongtoken")),
            AuthOutcome::Rejected(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn missing_header_rejected() {
        let guard = enforcing("s3cret");
        assert_eq!(
            guard.evaluate("GET", "/api/agents", None),
            AuthOutcome::Rejected(AuthRejection::Missing)
        );
    }

    #[test]
    fn other_scheme_rejected_as_malformed() {
        let guard = enforcing("s3cret");
        assert_eq!(
            guard.evaluate("GET", "/api/agents", Some("Basic czNjcmV0")),
            AuthOutcome::Rejected(AuthRejection::Malformed)
        );
    }

    #[test]
    fn exemption_wins_inside_scope() {
        let guard = enforcing("s3cret");
        let outcome = guard.evaluate("GET", "/api/workflows/health", None);
        assert_eq!(outcome, AuthOutcome::Exempt);
        assert!(outcome.is_pass());
    }

    #[test]
    fn development_bypass_passes_without_header() {
        let guard = AuthGuard::new(
            scope(),
            ExemptionProfile::Standard.exemptions(),
            GuardMode::DevelopmentBypass,
            AuthDiagnostics::Detailed,
        );
        assert!(guard.is_bypassed());
        assert_eq!(
            guard.evaluate("POST", "/api/workflows/x/execute", None),
            AuthOutcome::Bypassed
        );
    }

    #[test]
    fn exemption_checked_before_bypass() {
        let guard = AuthGuard::new(
            scope(),
            ExemptionProfile::Standard.exemptions(),
            GuardMode::DevelopmentBypass,
            AuthDiagnostics::Detailed,
        );
        assert_eq!(
            guard.evaluate("GET", "/api/agents/ping", None),
            AuthOutcome::Exempt
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let guard = enforcing("s3cret");
        let first = guard.evaluate("GET", "/api/agents", Some("Bearer nope"));
        for _ in 0..10 {
            assert_eq!(guard.evaluate("GET", "/api/agents", Some("Bearer nope")), first);
        }
    }
}

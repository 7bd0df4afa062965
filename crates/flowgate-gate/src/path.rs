//! # Path Rules
//!
//! Scope rules for the Auth Guard. A rule containing `*` is a glob where `*`
//! spans any run of characters (slashes included); anything else is a
//! segment-aware prefix.
//!
//! A glob ending in `/*` also matches the bare prefix, so `/api/workflows/*`
//! covers `/api/workflows` as well as everything beneath it.

use crate::error::ConfigError;
use crate::glob::{Glob, GlobError};

/// One compiled scope rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    source: String,
    kind: RuleKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RuleKind {
    /// Anchored glob. `bare` holds the prefix a trailing `/*` also admits.
    Glob { glob: Glob, bare: Option<String> },
    /// `path == prefix` or `path` continues `prefix` at a `/` boundary.
    Prefix,
}

impl PathRule {
    pub fn parse(rule: &str) -> Result<Self, ConfigError> {
        let trimmed = rule.trim();
        let malformed = |reason: &str| ConfigError::MalformedPathRule {
            rule: rule.to_string(),
            reason: reason.to_string(),
        };

        if !trimmed.starts_with('/') {
            return Err(malformed("must start with '/'"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(malformed("contains whitespace"));
        }

        if !trimmed.contains('*') {
            return Ok(Self::prefix(trimmed));
        }

        let glob = Glob::compile(trimmed, None).map_err(|e| match e {
            GlobError::Empty => malformed("empty pattern"),
            GlobError::AdjacentWildcards => malformed("adjacent wildcards"),
        })?;
        let bare = trimmed
            .strip_suffix("/*")
            .filter(|p| !p.is_empty() && !p.contains('*'))
            .map(str::to_owned);

        Ok(Self {
            source: trimmed.to_string(),
            kind: RuleKind::Glob { glob, bare },
        })
    }

    /// Segment-aware prefix rule. A trailing `/` is dropped unless the
    /// prefix is the root.
    pub fn prefix(prefix: &str) -> Self {
        let normalized = match prefix.strip_suffix('/') {
            Some(p) if !p.is_empty() => p,
            _ => prefix,
        };
        Self {
            source: normalized.to_string(),
            kind: RuleKind::Prefix,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            RuleKind::Glob { glob, bare } => {
                glob.matches(path) || bare.as_deref().is_some_and(|b| b == path)
            }
            RuleKind::Prefix => {
                let prefix = self.source.as_str();
                if prefix == "/" {
                    return path.starts_with('/');
                }
                match path.strip_prefix(prefix) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/'),
                    None => false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_star_covers_bare_prefix() {
        let rule = PathRule::parse("/api/workflows/*").unwrap();
        assert!(rule.matches("/api/workflows"));
        assert!(rule.matches("/api/workflows/"));
        assert!(rule.matches("/api/workflows/markdown-chunk/execute"));
        assert!(!rule.matches("/api/workflowsx"));
        assert!(!rule.matches("/api/agents/weather-agent"));
    }

    #[test]
    fn inner_star_glob() {
        let rule = PathRule::parse("/api/*/execute").unwrap();
        assert!(rule.matches("/api/workflows/x/execute"));
        assert!(!rule.matches("/api/workflows/x"));
    }

    #[test]
    fn prefix_respects_segment_boundary() {
        let rule = PathRule::parse("/api").unwrap();
        assert!(rule.matches("/api"));
        assert!(rule.matches("/api/agents"));
        assert!(!rule.matches("/apiary"));
    }

    #[test]
    fn prefix_trailing_slash_normalized() {
        let rule = PathRule::prefix("/api/");
        assert_eq!(rule.as_str(), "/api");
        assert!(rule.matches("/api/x"));
    }

    #[test]
    fn root_prefix_matches_everything() {
        let rule = PathRule::parse("/").unwrap();
        assert!(rule.matches("/"));
        assert!(rule.matches("/anything/at/all"));
    }

    #[test]
    fn malformed_rules_rejected() {
        for rule in ["api/*", "", "/api/**", "/a b"] {
            assert!(
                matches!(PathRule::parse(rule), Err(ConfigError::MalformedPathRule { .. })),
                "expected {rule:?} to be rejected"
            );
        }
    }
}

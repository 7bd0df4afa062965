//! # Origin Allow-List
//!
//! Allow-list entries are compiled once, at configuration load, into
//! [`OriginPattern`]s. Three shapes are accepted:
//!
//! ```text
//! https://app.example.com        literal, exact match on the serialized origin
//! https://*.example.com          wildcard inside the authority, never spans `/`
//! *.example.com                  schemeless wildcard, `*` spans any run
//! *                              any origin
//! ```
//!
//! Wildcard patterns are anchored at both ends, so `https://*.example.com`
//! admits `https://a.example.com` but not `https://example.com`. Hosts are
//! case-insensitive: entries are lowercased at load and compared against the
//! `Origin` value as sent.

use url::Url;

use crate::error::ConfigError;
use crate::glob::{Glob, GlobError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Any,
    Exact(String),
    Wildcard(Glob),
}

/// One compiled allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    source: String,
    matcher: Matcher,
}

impl OriginPattern {
    /// Compile an allow-list entry, rejecting anything that cannot describe
    /// a browser origin.
    pub fn compile(entry: &str) -> Result<Self, ConfigError> {
        let trimmed = entry.trim();
        let malformed = |reason: &str| ConfigError::MalformedOrigin {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(malformed("empty entry"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(malformed("contains whitespace"));
        }
        if trimmed == "*" {
            return Ok(Self {
                source: trimmed.to_string(),
                matcher: Matcher::Any,
            });
        }

        // Browsers never send a trailing slash in `Origin`.
        let normalized = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let wildcard = |pattern: &str, barrier: Option<char>| {
            Glob::compile(&pattern.to_ascii_lowercase(), barrier)
                .map(|glob| Self {
                    source: pattern.to_string(),
                    matcher: Matcher::Wildcard(glob),
                })
                .map_err(|e| match e {
                    GlobError::Empty => malformed("empty pattern"),
                    GlobError::AdjacentWildcards => malformed("adjacent wildcards"),
                })
        };

        let Some((scheme, authority)) = normalized.split_once("://") else {
            // `*.example.com`: the wildcard also covers the scheme.
            if normalized.contains('*') {
                return wildcard(normalized, None);
            }
            return Err(malformed("expected scheme://host[:port]"));
        };
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(malformed("invalid scheme"));
        }
        if authority.is_empty() {
            return Err(malformed("missing host"));
        }
        if authority.contains(['/', '?', '#', '@']) {
            return Err(malformed("origins carry no path, query, fragment, or userinfo"));
        }

        if authority.contains('*') {
            return wildcard(normalized, Some('/'));
        }

        let url = Url::parse(normalized).map_err(|e| malformed(&e.to_string()))?;
        if url.host().is_none() {
            return Err(malformed("missing host"));
        }
        // Opaque origins (custom schemes) serialize as "null", so compare those lowercased.
        let origin = url.origin();
        let expected = if origin.is_tuple() {
            origin.ascii_serialization()
        } else {
            normalized.to_ascii_lowercase()
        };

        Ok(Self {
            source: normalized.to_string(),
            matcher: Matcher::Exact(expected),
        })
    }

    /// The entry as configured, minus surrounding whitespace and a trailing `/`.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.matcher, Matcher::Any | Matcher::Wildcard(_))
    }

    pub fn matches(&self, origin: &str) -> bool {
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Exact(expected) => origin == expected,
            Matcher::Wildcard(glob) => glob.matches(origin),
        }
    }
}

/// Ordered set of compiled origin patterns. First match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    patterns: Vec<OriginPattern>,
}

impl AllowList {
    /// Compile every entry; the first malformed one aborts with
    /// [`ConfigError::MalformedOrigin`].
    pub fn compile<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for entry in entries {
            list.push(OriginPattern::compile(entry.as_ref())?);
        }
        Ok(list)
    }

    /// Compile every entry, dropping malformed ones with a warning. A dropped
    /// entry behaves exactly like an entry that never matches.
    pub fn compile_lenient<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for entry in entries {
            match OriginPattern::compile(entry.as_ref()) {
                Ok(pattern) => list.push(pattern),
                Err(e) => tracing::warn!(error = %e, "ignoring allow-list entry"),
            }
        }
        list
    }

    /// Append a pattern unless an entry with the same source is already present.
    pub fn push(&mut self, pattern: OriginPattern) {
        if !self.patterns.iter().any(|p| p.source == pattern.source) {
            self.patterns.push(pattern);
        }
    }

    /// Append every pattern of `other` not already present.
    pub fn union(mut self, other: AllowList) -> Self {
        for pattern in other.patterns {
            self.push(pattern);
        }
        self
    }

    /// First pattern admitting `origin`.
    pub fn find(&self, origin: &str) -> Option<&OriginPattern> {
        self.patterns.iter().find(|p| p.matches(origin))
    }

    pub fn iter(&self) -> impl Iterator<Item = &OriginPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_origin_matches_exactly() {
        let p = OriginPattern::compile("https://app.example.com").unwrap();
        assert!(!p.is_wildcard());
        assert!(p.matches("https://app.example.com"));
        assert!(!p.matches("https://app.example.com:8443"));
        assert!(!p.matches("http://app.example.com"));
        assert!(!p.matches("https://APP.example.com.evil.test"));
    }

    #[test]
    fn literal_with_port_and_trailing_slash() {
        let p = OriginPattern::compile(" http://localhost:4111/ ").unwrap();
        assert_eq!(p.as_str(), "http://localhost:4111");
        assert!(p.matches("http://localhost:4111"));
    }

    #[test]
    fn wildcard_subdomain_is_anchored() {
        let p = OriginPattern::compile("https://*.example.com").unwrap();
        assert!(p.is_wildcard());
        assert!(p.matches("https://a.example.com"));
        assert!(p.matches("https://deep.nested.example.com"));
        assert!(!p.matches("https://example.com"));
        assert!(!p.matches("https://a.example.com.evil.test"));
        assert!(!p.matches("http://a.example.com"));
    }

    #[test]
    fn wildcard_does_not_cross_path_separator() {
        let p = OriginPattern::compile("https://*.example.com").unwrap();
        assert!(!p.matches("https://evil.test/.example.com"));
    }

    #[test]
    fn wildcard_port() {
        let p = OriginPattern::compile("http://localhost:*").unwrap();
        assert!(p.matches("http://localhost:3000"));
        assert!(p.matches("http://localhost:"));
        assert!(!p.matches("http://localhost"));
    }

    #[test]
    fn schemeless_wildcard_spans_scheme() {
        let p = OriginPattern::compile("*.example.com").unwrap();
        assert!(p.is_wildcard());
        assert!(p.matches("https://a.example.com"));
        assert!(p.matches("http://a.b.example.com"));
        assert!(!p.matches("https://example.com"));
        assert!(!p.matches("https://a.example.com.evil.test"));
    }

    #[test]
    fn schemeless_wildcard_loads_from_allow_list() {
        let list = AllowList::compile(["*.example.com"]).unwrap();
        let hit = list.find("https://a.example.com").unwrap();
        assert_eq!(hit.as_str(), "*.example.com");
    }

    #[test]
    fn literal_host_is_case_insensitive() {
        let p = OriginPattern::compile("https://App.Example.com").unwrap();
        assert_eq!(p.as_str(), "https://App.Example.com");
        assert!(p.matches("https://app.example.com"));
    }

    #[test]
    fn literal_default_port_is_dropped() {
        let p = OriginPattern::compile("https://app.example.com:443").unwrap();
        assert!(p.matches("https://app.example.com"));
    }

    #[test]
    fn wildcard_host_is_case_insensitive() {
        let p = OriginPattern::compile("https://*.Example.COM").unwrap();
        assert!(p.matches("https://a.example.com"));
    }

    #[test]
    fn bare_star_matches_everything() {
        let p = OriginPattern::compile("*").unwrap();
        assert!(p.is_wildcard());
        assert!(p.matches("https://anything.test"));
        assert!(p.matches("null"));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        for entry in [
            "",
            "   ",
            "example.com",
            "https://",
            "https://a.example.com/path",
            "https://user@a.example.com",
            "https://**.example.com",
            "*://example.com",
            "https://exa mple.com",
            "https://a.example.com?x=1",
        ] {
            let result = OriginPattern::compile(entry);
            assert!(
                matches!(result, Err(ConfigError::MalformedOrigin { .. })),
                "expected {entry:?} to be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn allow_list_strict_fails_on_first_bad_entry() {
        let err = AllowList::compile(["https://ok.test", "nope"]).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedOrigin { ref entry, .. } if entry == "nope"));
    }

    #[test]
    fn allow_list_lenient_drops_bad_entries() {
        let list = AllowList::compile_lenient(["https://ok.test", "https://**.bad", "nope"]);
        assert_eq!(list.len(), 1);
        assert!(list.find("https://ok.test").is_some());
        assert!(list.find("https://x.bad").is_none());
    }

    #[test]
    fn allow_list_first_match_wins_and_dedupes() {
        let list = AllowList::compile([
            "https://*.example.com",
            "https://a.example.com",
            "https://*.example.com",
        ])
        .unwrap();
        assert_eq!(list.len(), 2);
        let hit = list.find("https://a.example.com").unwrap();
        assert_eq!(hit.as_str(), "https://*.example.com");
    }

    #[test]
    fn union_keeps_order_and_skips_duplicates() {
        let a = AllowList::compile(["https://a.test", "https://b.test"]).unwrap();
        let b = AllowList::compile(["https://b.test", "https://c.test"]).unwrap();
        let merged = a.union(b);
        let sources: Vec<&str> = merged.iter().map(OriginPattern::as_str).collect();
        assert_eq!(sources, ["https://a.test", "https://b.test", "https://c.test"]);
    }
}

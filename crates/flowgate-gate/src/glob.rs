//! Single-wildcard glob shared by origin patterns and path rules.
//!
//! `*` matches zero or more characters. An optional barrier character may not
//! appear inside the text a wildcard absorbs, which keeps origin wildcards
//! inside the authority component.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GlobError {
    Empty,
    AdjacentWildcards,
}

/// Compiled glob. `pieces` holds the literal text between wildcards, so a
/// pattern with `n` wildcards has `n + 1` pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Glob {
    pieces: Vec<String>,
    barrier: Option<char>,
}

impl Glob {
    pub(crate) fn compile(pattern: &str, barrier: Option<char>) -> Result<Self, GlobError> {
        if pattern.is_empty() {
            return Err(GlobError::Empty);
        }
        if pattern.contains("**") {
            return Err(GlobError::AdjacentWildcards);
        }
        Ok(Self {
            pieces: pattern.split('*').map(str::to_owned).collect(),
            barrier,
        })
    }

    /// Anchored match against the whole candidate.
    ///
    /// Middle pieces are matched at their leftmost occurrence; with the
    /// barrier absent from every piece after the first, leftmost placement
    /// admits every match any other placement would.
    pub(crate) fn matches(&self, candidate: &str) -> bool {
        let Some((first, rest)) = self.pieces.split_first() else {
            return false;
        };
        let Some((last, middle)) = rest.split_last() else {
            return candidate == first;
        };
        let Some(mut remaining) = candidate.strip_prefix(first.as_str()) else {
            return false;
        };

        for piece in middle {
            let Some(idx) = remaining.find(piece.as_str()) else {
                return false;
            };
            if !self.absorbable(&remaining[..idx]) {
                return false;
            }
            remaining = &remaining[idx + piece.len()..];
        }

        match remaining.strip_suffix(last.as_str()) {
            Some(gap) => self.absorbable(gap),
            None => false,
        }
    }

    fn absorbable(&self, gap: &str) -> bool {
        match self.barrier {
            Some(c) => !gap.contains(c),
            None => true,
        }
    }
}

//! Glob-based ignore rules shared by migrate and sync.
//!
//! A pattern matches when it matches either the whole relative path (with
//! `/` separators) or just its base name, so `*.log` ignores log files at
//! any depth while `.config/*/cache` only ignores that exact shape.
use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;
use crate::safety::to_slash;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of ignore patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    patterns: Vec<Pattern>,
}

impl IgnoreMatcher {
    /// Compile every pattern up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that is
    /// not valid glob syntax.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(&collapse_stars(p.as_ref())).map_err(|source| {
                    ConfigError::InvalidPattern {
                        pattern: p.as_ref().to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Return `true` if any pattern matches the relative path or its base name.
    #[must_use]
    pub fn is_ignored(&self, relative: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let full = to_slash(relative);
        let base = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        self.patterns.iter().any(|p| {
            p.matches_with(&full, MATCH_OPTIONS)
                || base
                    .as_deref()
                    .is_some_and(|b| p.matches_with(b, MATCH_OPTIONS))
        })
    }

    /// Number of compiled patterns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the matcher has no patterns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Reduce every run of `*` to a single `*`.
///
/// Wildcards never cross `/`, so `**` means the same as `*` and is not a
/// recursive wildcard.
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// One-shot form of [`IgnoreMatcher::is_ignored`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPattern`] if any pattern is malformed.
pub fn should_ignore<S: AsRef<str>>(patterns: &[S], relative: &Path) -> Result<bool, ConfigError> {
    Ok(IgnoreMatcher::new(patterns)?.is_ignored(relative))
}

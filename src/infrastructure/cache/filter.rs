//! Predicates selecting cache entries for invalidation.

use std::fs::Metadata;
use std::path::Path;
use std::time::{Duration, SystemTime};

use regex::Regex;

/// Decides whether a walked file should be removed.
pub trait CacheFilter: Send + Sync {
    /// Returns true if the file at `path` should be removed.
    fn matches(&self, path: &Path, metadata: &Metadata) -> bool;
}

/// Matches files whose full path matches a regular expression.
#[derive(Debug, Clone)]
pub struct PatternFilter {
    pattern: Regex,
}

impl PatternFilter {
    /// Creates a filter from a compiled pattern.
    #[must_use]
    pub const fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl CacheFilter for PatternFilter {
    fn matches(&self, path: &Path, _metadata: &Metadata) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }
}

/// Matches files matching a pattern that were last modified before a cutoff.
#[derive(Debug, Clone)]
pub struct AgeFilter {
    pattern: PatternFilter,
    cutoff: SystemTime,
}

impl AgeFilter {
    /// Creates a filter removing entries older than `max_age` relative to `now`.
    #[must_use]
    pub fn new(pattern: Regex, max_age: Duration, now: SystemTime) -> Self {
        Self {
            pattern: PatternFilter::new(pattern),
            cutoff: now.checked_sub(max_age).unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

impl CacheFilter for AgeFilter {
    fn matches(&self, path: &Path, metadata: &Metadata) -> bool {
        if !self.pattern.matches(path, metadata) {
            return false;
        }
        metadata
            .modified()
            .is_ok_and(|modified| modified < self.cutoff)
    }
}

//! Test status code table
//!
//! Test-management backends report outcomes as small integers. The table is
//! a value handed to the aggregator so other backends (or custom statuses
//! configured on the TestRail instance) can extend or override it.

use std::collections::BTreeMap;

/// Label rendered for an observation that carries no status code
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Mapping from numeric status code to human label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMap {
    labels: BTreeMap<i64, String>,
}

impl Default for StatusMap {
    /// Built-in TestRail statuses
    fn default() -> Self {
        let labels = [
            (1, "Passed"),
            (2, "Blocked"),
            (3, "Untested"),
            (4, "Retest"),
            (5, "Failed"),
        ]
        .into_iter()
        .map(|(code, label)| (code, label.to_string()))
        .collect();
        Self { labels }
    }
}

impl StatusMap {
    /// An empty table; every code renders as its raw number
    pub fn empty() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    /// Add or replace entries (overrides take precedence)
    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        for (code, label) in overrides {
            self.labels.insert(code, label.into());
        }
        self
    }

    /// Resolve a status code to its label
    ///
    /// Unmapped codes render as the raw code (`9` -> `"9"`), never blank.
    pub fn label(&self, code: i64) -> String {
        self.labels
            .get(&code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }

    /// Resolve an optional status code; a missing code renders [`UNKNOWN_STATUS`]
    pub fn label_for(&self, code: Option<i64>) -> String {
        match code {
            Some(code) => self.label(code),
            None => UNKNOWN_STATUS.to_string(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(code, label)| (*code, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

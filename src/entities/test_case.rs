//! Test case entity type - one aggregated test-management case

use serde::{Deserialize, Serialize};

/// A test case with its most recent execution outcome
///
/// After aggregation there is exactly one `TestCase` per case id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Case identifier as reported by the source (`100`, `T100`, `C100`...)
    #[serde(rename = "ID")]
    pub id: String,

    /// Case title; the only field used when matching issues
    #[serde(rename = "Title", default)]
    pub title: String,

    /// Status label of the latest observation
    #[serde(rename = "Status", default)]
    pub status: String,

    /// Date of the latest observation as `YYYY-MM-DD`, empty when unknown
    #[serde(rename = "Tested On", default)]
    pub tested_on: String,
}

impl TestCase {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_tested_on(mut self, tested_on: impl Into<String>) -> Self {
        self.tested_on = tested_on.into();
        self
    }

    /// Identifier with any leading `T` prefix removed
    ///
    /// Test-run exports prefix test ids with `T`; the bare number is what
    /// the test-management UI expects in its view URLs.
    pub fn display_id(&self) -> &str {
        self.id.trim_start_matches('T')
    }

    /// Whether this case's title mentions the given issue key
    ///
    /// Plain case-sensitive substring containment. An empty key matches nothing.
    pub fn mentions(&self, issue_id: &str) -> bool {
        !issue_id.is_empty() && self.title.contains(issue_id)
    }
}

//! Issue entity type - one tracked requirement read from the issue tracker

use serde::{Deserialize, Serialize};

/// A requirement/issue as exported by the issue tracker
///
/// Issues are read once per run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable issue key (e.g. `MCR-5`)
    pub id: String,

    /// One-line summary
    #[serde(default)]
    pub summary: String,

    /// Workflow status label (e.g. "QA Finished")
    #[serde(default)]
    pub status: String,

    /// Last update, rendered as `YYYY-MM-DD` when the source value is a known date format
    #[serde(default)]
    pub updated: String,

    /// Sprint name, empty when the issue is not in a sprint
    #[serde(default)]
    pub sprint: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Acceptance criteria custom field
    #[serde(default)]
    pub acceptance_criteria: String,
}

impl Issue {
    /// Create an issue with only its key set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_sprint(mut self, sprint: impl Into<String>) -> Self {
        self.sprint = sprint.into();
        self
    }
}

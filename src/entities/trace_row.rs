//! Trace row - one line of the Requirement Traceability Matrix

use serde::{Deserialize, Serialize};

/// Report column headers, in output order
pub const COLUMNS: [&str; 13] = [
    "Jira ID",
    "Jira Summary",
    "Test Case IDs",
    "Test Case Titles",
    "Test Case Status",
    "Sprint",
    "Jira Status",
    "Jira Updated",
    "Description",
    "Acceptance Criteria",
    "Jira Link",
    "Test Case Links",
    "Tested On",
];

/// One issue joined with every test case that mentions it
///
/// Field order matches [`COLUMNS`]; the CSV writer relies on it.
/// The test-case list fields are delimiter-joined and aligned by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    #[serde(rename = "Jira ID")]
    pub issue_id: String,

    #[serde(rename = "Jira Summary")]
    pub summary: String,

    #[serde(rename = "Test Case IDs")]
    pub test_case_ids: String,

    #[serde(rename = "Test Case Titles")]
    pub test_case_titles: String,

    #[serde(rename = "Test Case Status")]
    pub test_case_statuses: String,

    #[serde(rename = "Sprint")]
    pub sprint: String,

    #[serde(rename = "Jira Status")]
    pub status: String,

    #[serde(rename = "Jira Updated")]
    pub updated: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Acceptance Criteria")]
    pub acceptance_criteria: String,

    #[serde(rename = "Jira Link")]
    pub issue_link: String,

    #[serde(rename = "Test Case Links")]
    pub test_case_links: String,

    #[serde(rename = "Tested On")]
    pub tested_on: String,
}

impl TraceRow {
    /// Cell values in [`COLUMNS`] order
    pub fn cells(&self) -> [&str; 13] {
        [
            &self.issue_id,
            &self.summary,
            &self.test_case_ids,
            &self.test_case_titles,
            &self.test_case_statuses,
            &self.sprint,
            &self.status,
            &self.updated,
            &self.description,
            &self.acceptance_criteria,
            &self.issue_link,
            &self.test_case_links,
            &self.tested_on,
        ]
    }

    /// True when no test case mentioned this issue
    pub fn is_uncovered(&self) -> bool {
        self.test_case_ids.is_empty()
    }

    /// Pair each test-case link with its id
    ///
    /// Both lists are split on `delimiter`; ids and links never contain it,
    /// unlike titles.
    pub fn test_case_link_pairs<'a>(&'a self, delimiter: &str) -> Vec<(&'a str, &'a str)> {
        if self.test_case_links.is_empty() || self.test_case_ids.is_empty() {
            return Vec::new();
        }
        self.test_case_ids
            .split(delimiter)
            .zip(self.test_case_links.split(delimiter))
            .collect()
    }

    /// The first matched test case's id and link, used where only one link fits
    pub fn primary_test_case_link<'a>(&'a self, delimiter: &str) -> Option<(&'a str, &'a str)> {
        self.test_case_link_pairs(delimiter).into_iter().next()
    }
}

//! Hyperlink derivation for issues and test cases

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the entity id in a link template
pub const ID_PLACEHOLDER: &str = "{id}";

/// URL templates for the two kinds of links in the matrix
///
/// Each template contains `{id}`. A missing template yields empty links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkTemplates {
    /// Issue browse URL, e.g. `https://example.atlassian.net/browse/{id}`
    pub issue: Option<String>,

    /// Test view URL, e.g. `https://example.testrail.io/index.php?/tests/view/{id}`
    pub test_case: Option<String>,
}

impl LinkTemplates {
    pub fn new(issue: impl Into<String>, test_case: impl Into<String>) -> Self {
        Self {
            issue: Some(issue.into()),
            test_case: Some(test_case.into()),
        }
    }

    /// Default templates derived from the tracker base URLs
    pub fn from_base_urls(jira_url: Option<&str>, testrail_url: Option<&str>) -> Self {
        Self {
            issue: jira_url.map(|base| format!("{}/browse/{ID_PLACEHOLDER}", base.trim_end_matches('/'))),
            test_case: testrail_url.map(|base| {
                format!(
                    "{}/index.php?/tests/view/{ID_PLACEHOLDER}",
                    base.trim_end_matches('/')
                )
            }),
        }
    }

    /// Link to an issue; empty for an empty id
    pub fn issue_link(&self, issue_id: &str) -> String {
        expand(self.issue.as_deref(), issue_id)
    }

    /// Link to a test case; any leading `T` prefix is stripped from the id
    pub fn test_case_link(&self, case_id: &str) -> String {
        expand(self.test_case.as_deref(), case_id.trim_start_matches('T'))
    }
}

fn expand(template: Option<&str>, id: &str) -> String {
    match template {
        Some(template) if !id.is_empty() => template.replace(ID_PLACEHOLDER, id),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_link() {
        let links = LinkTemplates::new("https://jira/browse/{id}", "https://tr/view/{id}");
        assert_eq!(links.issue_link("MCR-5"), "https://jira/browse/MCR-5");
        assert_eq!(links.issue_link(""), "");
    }

    #[test]
    fn test_case_link_strips_t_prefix() {
        let links = LinkTemplates::new("https://jira/browse/{id}", "https://tr/view/{id}");
        assert_eq!(links.test_case_link("T100"), "https://tr/view/100");
        assert_eq!(links.test_case_link("100"), "https://tr/view/100");
    }

    #[test]
    fn test_missing_template_yields_empty_link() {
        let links = LinkTemplates::default();
        assert_eq!(links.issue_link("MCR-5"), "");
        assert_eq!(links.test_case_link("T1"), "");
    }

    #[test]
    fn test_from_base_urls_trims_trailing_slash() {
        let links = LinkTemplates::from_base_urls(Some("https://jira.example/"), Some("https://tr.example"));
        assert_eq!(links.issue_link("A-1"), "https://jira.example/browse/A-1");
        assert_eq!(
            links.test_case_link("T7"),
            "https://tr.example/index.php?/tests/view/7"
        );
    }
}

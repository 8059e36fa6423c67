//! Jira issue source (REST API v2 search)
//!
//! Reads a single page of search results. Jira caps a page at
//! `maxResults`; when the query matches more issues than one page holds the
//! remainder is not fetched and a warning is logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::http::ApiClient;
use super::{IssueSource, SourceError};
use crate::core::dates::normalize_date;
use crate::entities::Issue;

/// Page size requested from the search endpoint
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const SERVICE: &str = "Jira";

/// Custom field ids that vary between Jira instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraFields {
    /// Sprint collection field
    pub sprint: String,

    /// Acceptance criteria text field
    pub acceptance_criteria: String,
}

impl Default for JiraFields {
    fn default() -> Self {
        Self {
            sprint: "customfield_10020".to_string(),
            acceptance_criteria: "customfield_10021".to_string(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub issues: Vec<Issue>,
    /// Total matches reported by Jira, when present
    pub total: Option<u64>,
}

impl SearchPage {
    /// True when Jira matched more issues than this page contains
    pub fn is_truncated(&self) -> bool {
        self.total
            .is_some_and(|total| total > self.issues.len() as u64)
    }
}

/// Jira search client bound to one JQL query
#[derive(Debug, Clone)]
pub struct JiraClient {
    api: ApiClient,
    base_url: String,
    jql: String,
    page_size: u32,
    fields: JiraFields,
}

impl JiraClient {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
        jql: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            api: ApiClient::new(SERVICE, email, token, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            jql: jql.into(),
            page_size: DEFAULT_PAGE_SIZE,
            fields: JiraFields::default(),
        })
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_fields(mut self, fields: JiraFields) -> Self {
        self.fields = fields;
        self
    }

    /// Fetch the first page of issues matching the query
    ///
    /// A non-success status fails with [`SourceError::Upstream`] whose
    /// context is the JQL that was sent.
    pub fn search(&self) -> Result<SearchPage, SourceError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let context = format!("JQL used: {}", self.jql);
        let query = [
            ("jql", self.jql.clone()),
            ("maxResults", self.page_size.to_string()),
        ];

        let body = self.api.get_json(&url, &query, &context)?;
        parse_search(&body, &self.fields).map_err(|message| SourceError::Decode {
            service: SERVICE,
            message,
            context,
        })
    }
}

impl IssueSource for JiraClient {
    fn issues(&self) -> Result<Vec<Issue>, SourceError> {
        let page = self.search()?;
        if page.is_truncated() {
            tracing::warn!(
                returned = page.issues.len(),
                total = page.total.unwrap_or_default(),
                jql = %self.jql,
                "Jira matched more issues than one page; only the first page is included"
            );
        }
        tracing::info!(count = page.issues.len(), "fetched Jira issues");
        Ok(page.issues)
    }
}

/// Decode a search response body into issues
pub fn parse_search(body: &Value, fields: &JiraFields) -> Result<SearchPage, String> {
    let issues = body
        .get("issues")
        .and_then(Value::as_array)
        .ok_or_else(|| "response has no 'issues' array".to_string())?;

    Ok(SearchPage {
        issues: issues.iter().map(|raw| parse_issue(raw, fields)).collect(),
        total: body.get("total").and_then(Value::as_u64),
    })
}

fn parse_issue(raw: &Value, fields: &JiraFields) -> Issue {
    let empty = Value::Null;
    let f = raw.get("fields").unwrap_or(&empty);

    let updated = match f.get("updated").or_else(|| f.get("updated_on")) {
        Some(Value::String(s)) => normalize_date(s),
        Some(Value::Number(n)) => normalize_date(&n.to_string()),
        _ => String::new(),
    };

    Issue {
        id: text(raw.get("key")),
        summary: text(f.get("summary")),
        status: text(f.get("status").and_then(|s| s.get("name"))),
        updated,
        sprint: first_sprint_name(f.get(&fields.sprint)),
        description: text(f.get("description")),
        acceptance_criteria: text(f.get(&fields.acceptance_criteria)),
    }
}

/// Name of the first object-valued entry in a sprint collection
///
/// Older Jira servers return sprints as opaque strings; those are skipped.
fn first_sprint_name(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .and_then(|sprints| sprints.iter().find(|s| s.is_object()))
        .map(|sprint| text(sprint.get("name")))
        .unwrap_or_default()
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

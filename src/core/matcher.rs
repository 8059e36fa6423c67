//! Trace matcher - joins issues to the test cases that mention them
//!
//! A test case covers an issue when the issue key appears anywhere in the
//! case title. The rule is deliberately permissive: `MCR-5` also matches a
//! title mentioning `MCR-50`, and a purely numeric key matches any title
//! containing those digits. There is no disambiguation.

use crate::core::links::LinkTemplates;
use crate::entities::{Issue, TestCase, TraceRow};

/// Default separator for joined test-case lists
pub const DEFAULT_DELIMITER: &str = ", ";

/// Options for building trace rows
#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub links: LinkTemplates,
    pub delimiter: String,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            links: LinkTemplates::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

/// Test cases mentioning `issue`, in test-case table order
pub fn matching_cases<'a>(issue: &Issue, cases: &'a [TestCase]) -> Vec<&'a TestCase> {
    cases.iter().filter(|case| case.mentions(&issue.id)).collect()
}

/// Build one trace row per issue, in issue order
///
/// Issues without any matching test case still produce a row with empty
/// test-case fields. Joined lists keep empty values as placeholders so the
/// ids, titles, statuses, dates and links stay aligned by position.
pub fn build_trace_rows(issues: &[Issue], cases: &[TestCase], opts: &MatchOptions) -> Vec<TraceRow> {
    issues
        .iter()
        .map(|issue| trace_row(issue, &matching_cases(issue, cases), opts))
        .collect()
}

fn trace_row(issue: &Issue, matches: &[&TestCase], opts: &MatchOptions) -> TraceRow {
    let join = |f: fn(&TestCase) -> String| -> String {
        matches
            .iter()
            .map(|case| f(case))
            .collect::<Vec<_>>()
            .join(&opts.delimiter)
    };

    let links = matches
        .iter()
        .map(|case| opts.links.test_case_link(&case.id))
        .collect::<Vec<_>>()
        .join(&opts.delimiter);

    TraceRow {
        issue_id: issue.id.clone(),
        summary: issue.summary.clone(),
        test_case_ids: join(|c| c.display_id().to_string()),
        test_case_titles: join(|c| c.title.clone()),
        test_case_statuses: join(|c| c.status.clone()),
        sprint: issue.sprint.clone(),
        status: issue.status.clone(),
        updated: issue.updated.clone(),
        description: issue.description.clone(),
        acceptance_criteria: issue.acceptance_criteria.clone(),
        issue_link: opts.links.issue_link(&issue.id),
        test_case_links: links,
        tested_on: join(|c| c.tested_on.clone()),
    }
}

/// Coverage counts for a built matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub issues: usize,
    pub covered: usize,
    pub uncovered: usize,
}

impl Coverage {
    pub fn of(rows: &[TraceRow]) -> Self {
        let covered = rows.iter().filter(|r| !r.is_uncovered()).count();
        Self {
            issues: rows.len(),
            covered,
            uncovered: rows.len() - covered,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.issues == 0 {
            0.0
        } else {
            (self.covered as f64 / self.issues as f64) * 100.0
        }
    }
}

//! Build pipeline: read both sources, join them into trace rows

use crate::core::matcher::{build_trace_rows, MatchOptions};
use crate::entities::TraceRow;
use crate::sources::{IssueSource, SourceError, TestCaseSource};

/// Read issues and test cases, then join them
///
/// The two sources share no state; issues are read first so a bad issue
/// query fails before the (slower) test-case walk starts.
pub fn build_matrix(
    issues: &dyn IssueSource,
    tests: &dyn TestCaseSource,
    opts: &MatchOptions,
) -> Result<Vec<TraceRow>, SourceError> {
    let issues = issues.issues()?;
    tracing::info!(count = issues.len(), "issues loaded");

    let cases = tests.test_cases()?;
    tracing::info!(count = cases.len(), "test cases loaded");

    Ok(build_trace_rows(&issues, &cases, opts))
}

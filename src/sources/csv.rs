//! CSV exports as issue and test-case sources
//!
//! Header lookup is case-insensitive and ignores surrounding whitespace.
//! Missing columns read as empty strings.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{IssueSource, SourceError, TestCaseSource};
use crate::core::dates::normalize_date;
use crate::entities::{Issue, TestCase};

/// Map from normalized header name to every column index carrying it
///
/// Jira exports repeat headers such as `Sprint` once per value.
pub type HeaderMap = HashMap<String, Vec<usize>>;

/// Build a map from header name to column indices
pub fn build_header_map(headers: &StringRecord) -> HeaderMap {
    let mut map: HeaderMap = HashMap::new();
    for (i, h) in headers.iter().enumerate() {
        map.entry(h.trim().to_lowercase()).or_default().push(i);
    }
    map
}

/// First non-empty value among the columns named by any of `names`
///
/// Values are returned as-is; only header names are normalized.
pub fn get_field(record: &StringRecord, header_map: &HeaderMap, names: &[&str]) -> String {
    names
        .iter()
        .filter_map(|name| header_map.get(*name))
        .flatten()
        .filter_map(|&idx| record.get(idx))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Jira CSV export
#[derive(Debug, Clone)]
pub struct CsvIssueSource {
    path: PathBuf,
}

impl CsvIssueSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IssueSource for CsvIssueSource {
    fn issues(&self) -> Result<Vec<Issue>, SourceError> {
        let file = open(&self.path)?;
        read_issues(file).map_err(|e| csv_error(&self.path, e))
    }
}

/// Parse issues from a Jira CSV export, one issue per row
pub fn read_issues<R: Read>(reader: R) -> Result<Vec<Issue>, csv::Error> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = build_header_map(rdr.headers()?);

    let mut issues = Vec::new();
    for result in rdr.records() {
        let record = result?;
        issues.push(Issue {
            id: get_field(&record, &headers, &["issue key", "jira id", "key"])
                .trim()
                .to_string(),
            summary: get_field(&record, &headers, &["summary", "jira summary"]),
            status: get_field(&record, &headers, &["status", "jira status"]),
            updated: normalize_date(&get_field(&record, &headers, &["updated", "jira updated"])),
            sprint: get_field(&record, &headers, &["sprint"]),
            description: get_field(&record, &headers, &["description"]),
            acceptance_criteria: get_field(
                &record,
                &headers,
                &["custom field (acceptance criteria)", "acceptance criteria"],
            ),
        });
    }
    Ok(issues)
}

/// TestRail CSV export with `ID, Title, Status, Tested On` columns
#[derive(Debug, Clone)]
pub struct CsvTestCaseSource {
    path: PathBuf,
}

impl CsvTestCaseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TestCaseSource for CsvTestCaseSource {
    fn test_cases(&self) -> Result<Vec<TestCase>, SourceError> {
        let file = open(&self.path)?;
        read_test_cases(file).map_err(|e| csv_error(&self.path, e))
    }
}

/// Parse test cases from a TestRail CSV export, values taken as-is
pub fn read_test_cases<R: Read>(reader: R) -> Result<Vec<TestCase>, csv::Error> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = build_header_map(rdr.headers()?);

    let mut cases = Vec::new();
    for result in rdr.records() {
        let record = result?;
        cases.push(TestCase {
            id: get_field(&record, &headers, &["id"]).trim().to_string(),
            title: get_field(&record, &headers, &["title"]),
            status: get_field(&record, &headers, &["status"]),
            tested_on: get_field(&record, &headers, &["tested on"]),
        });
    }
    Ok(cases)
}

fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|e| SourceError::Csv {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn csv_error(path: &Path, err: csv::Error) -> SourceError {
    SourceError::Csv {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

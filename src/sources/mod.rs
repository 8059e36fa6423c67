//! Data sources for issues and test cases
//!
//! Both sides of the join can come from a CSV export or from the vendor's
//! REST API. Each source implements one of the traits below so the build
//! pipeline does not care which path produced its input.

pub mod csv;
pub mod http;
pub mod jira;
pub mod testrail;

use miette::Diagnostic;
use thiserror::Error;

use crate::entities::{Issue, TestCase};

pub use self::csv::{CsvIssueSource, CsvTestCaseSource};
pub use jira::{JiraClient, JiraFields};
pub use testrail::{HttpTestRail, TestRailApi};

/// Anything that yields the issue table
pub trait IssueSource {
    fn issues(&self) -> Result<Vec<Issue>, SourceError>;
}

/// Anything that yields the aggregated test-case table
pub trait TestCaseSource {
    fn test_cases(&self) -> Result<Vec<TestCase>, SourceError>;
}

/// Errors raised while reading a source
#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    /// The upstream service answered with a non-success status
    #[error("{service} API error: HTTP {status}: {message}")]
    #[diagnostic(
        code(rtm::source::upstream),
        help("Request context: {context}\nCheck the query syntax and credentials.")
    )]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
        context: String,
    },

    #[error("{service} request failed ({context}): {message}")]
    #[diagnostic(code(rtm::source::transport))]
    Transport {
        service: &'static str,
        message: String,
        context: String,
    },

    #[error("Unexpected {service} response ({context}): {message}")]
    #[diagnostic(code(rtm::source::decode))]
    Decode {
        service: &'static str,
        message: String,
        context: String,
    },

    #[error("Failed to read CSV {path}: {message}")]
    #[diagnostic(code(rtm::source::csv))]
    Csv { path: String, message: String },

    #[error("Missing setting: {key}")]
    #[diagnostic(
        code(rtm::source::missing_setting),
        help("Set it in rtm.yaml, with the {env} environment variable, or on the command line")
    )]
    MissingSetting { key: &'static str, env: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// The request context attached to an upstream or transport failure
    pub fn context(&self) -> Option<&str> {
        match self {
            SourceError::Upstream { context, .. }
            | SourceError::Transport { context, .. }
            | SourceError::Decode { context, .. } => Some(context),
            _ => None,
        }
    }

    /// HTTP status of an upstream failure
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

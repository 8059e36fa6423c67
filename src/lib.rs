//! RTM: Requirement Traceability Matrix builder
//!
//! Joins issue-tracker records (Jira) with test-management records
//! (TestRail) and exports the result as spreadsheet, HTML and CSV reports.

pub mod cli;
pub mod core;
pub mod entities;
pub mod report;
pub mod sources;

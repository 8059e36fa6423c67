//! Integration tests for the rtm CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const JIRA_CSV: &str = "\
Issue key,Summary,Status,Updated,Sprint,Description,Custom field (Acceptance Criteria)
MCR-5,Login page,QA Finished,2024-03-01,Sprint 7,Users can log in,Given a user
MCR-6,Logout,QA Finished,2024-03-02,Sprint 7,,
MCR-7,Profile,In Progress,,,,
";

const TESTRAIL_CSV: &str = "\
ID,Title,Status,Tested On
T100,Covers MCR-5 login,Passed,2024-03-05
T101,MCR-5 lockout after failures,Failed,2024-03-06
T102,Logout clears session MCR-6,Retest,
";

/// Helper to get an rtm command isolated from the user's config and env
fn rtm(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rtm").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("RTM_CONFIG")
        .env_remove("RTM_JQL");
    for (name, _) in rtm::core::config::ENV_VARS {
        cmd.env_remove(name);
    }
    cmd
}

/// Helper to write the two CSV exports into a temp directory
fn setup_exports() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("jira.csv"), JIRA_CSV).unwrap();
    fs::write(tmp.path().join("testrail.csv"), TESTRAIL_CSV).unwrap();
    tmp
}

fn find_report(dir: &Path, ext: &str) -> PathBuf {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().is_some_and(|x| x == ext))
        .unwrap_or_else(|| panic!("no .{} report in {}", ext, dir.display()))
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Traceability"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rtm"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Build Command Tests
// ============================================================================

#[test]
fn test_build_writes_requested_reports() {
    let tmp = setup_exports();
    let out = tmp.path().join("out");

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args([
            "build",
            "--issues",
            "jira.csv",
            "--tests",
            "testrail.csv",
            "--jira-url",
            "https://jira.example",
            "--testrail-url",
            "https://tr.example",
            "--format",
            "xlsx,html,csv",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("MCR-5"))
        .stdout(predicate::str::contains("- **Issues:** 3"))
        .stdout(predicate::str::contains("Report written to"));

    let xlsx = find_report(&out, "xlsx");
    let name = xlsx.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("RTM_") && name.len() == "RTM_20240101_000000.xlsx".len());
    find_report(&out, "html");
    find_report(&out, "csv");
}

#[test]
fn test_build_csv_report_contents() {
    let tmp = setup_exports();
    let out = tmp.path().join("out");

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args([
            "build",
            "--issues",
            "jira.csv",
            "--tests",
            "testrail.csv",
            "--testrail-url",
            "https://tr.example",
            "--format",
            "csv",
            "--no-preview",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success();

    let file = fs::File::open(find_report(&out, "csv")).unwrap();
    let rows = rtm::report::csv::read_rows(file).unwrap();

    let ids: Vec<_> = rows.iter().map(|r| r.issue_id.as_str()).collect();
    assert_eq!(ids, vec!["MCR-5", "MCR-6", "MCR-7"]);

    assert_eq!(rows[0].test_case_ids, "100, 101");
    assert_eq!(rows[0].test_case_statuses, "Passed, Failed");
    assert_eq!(rows[0].tested_on, "2024-03-05, 2024-03-06");
    assert_eq!(
        rows[0].test_case_links,
        "https://tr.example/index.php?/tests/view/100, https://tr.example/index.php?/tests/view/101"
    );
    assert_eq!(rows[0].sprint, "Sprint 7");

    assert_eq!(rows[1].test_case_ids, "102");
    assert_eq!(rows[1].tested_on, "");

    // Unmatched issues are kept with empty test-case fields
    assert_eq!(rows[2].test_case_ids, "");
    assert_eq!(rows[2].test_case_titles, "");
    assert_eq!(rows[2].issue_link, "");
}

#[test]
fn test_build_html_has_anchor_links() {
    let tmp = setup_exports();
    let out = tmp.path().join("out");

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args([
            "build",
            "--issues",
            "jira.csv",
            "--tests",
            "testrail.csv",
            "--jira-url",
            "https://jira.example",
            "--testrail-url",
            "https://tr.example",
            "--format",
            "html",
            "-q",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let html = fs::read_to_string(find_report(&out, "html")).unwrap();
    assert!(html.contains(">MCR-5</a>"));
    assert!(html.contains(">100</a>"));
    assert!(html.contains(">101</a>"));
}

#[test]
fn test_build_uses_config_link_templates() {
    let tmp = setup_exports();
    let out = tmp.path().join("out");
    fs::write(
        tmp.path().join("rtm.yaml"),
        "links:\n  issue: https://issues.example/{id}\ndelimiter: \" | \"\n",
    )
    .unwrap();

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args([
            "build", "--issues", "jira.csv", "--tests", "testrail.csv", "--format", "csv", "-q",
            "-o",
        ])
        .arg(&out)
        .assert()
        .success();

    let rows = rtm::report::csv::read_rows(fs::File::open(find_report(&out, "csv")).unwrap()).unwrap();
    assert_eq!(rows[0].issue_link, "https://issues.example/MCR-5");
    assert_eq!(rows[0].test_case_ids, "100 | 101");
}

#[test]
fn test_build_missing_file_fails() {
    let tmp = setup_exports();
    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["build", "--issues", "nope.csv", "--tests", "testrail.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// Fetch Command Tests
// ============================================================================

#[test]
fn test_fetch_without_settings_names_missing_key() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["fetch", "--jql", "project = MCR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("jira.url"));
}

#[test]
fn test_fetch_upstream_error_reports_status_and_jql() {
    let tmp = TempDir::new().unwrap();
    let jira = common::serve(common::jira_bad_jql);
    let testrail = common::serve(common::testrail_partial);

    rtm(tmp.path())
        .current_dir(tmp.path())
        .env("RTM_JIRA_URL", &jira)
        .env("RTM_JIRA_EMAIL", "qa@example.com")
        .env("RTM_JIRA_TOKEN", "token")
        .env("RTM_TESTRAIL_URL", &testrail)
        .env("RTM_TESTRAIL_USER", "qa@example.com")
        .env("RTM_TESTRAIL_KEY", "key")
        .env("RTM_TESTRAIL_PROJECT", "2")
        .args(["fetch", "--jql", "project = = X", "-q", "-o"])
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 400"))
        .stderr(predicate::str::contains("JQL used: project = = X"));

    assert!(!tmp.path().join("out").exists());
}

#[test]
fn test_fetch_builds_matrix_from_apis() {
    let tmp = TempDir::new().unwrap();
    let jira = common::serve(common::jira_two_issues);
    let testrail = common::serve(common::testrail_partial);
    let out = tmp.path().join("out");

    rtm(tmp.path())
        .current_dir(tmp.path())
        .env("RTM_JIRA_URL", &jira)
        .env("RTM_JIRA_EMAIL", "qa@example.com")
        .env("RTM_JIRA_TOKEN", "token")
        .env("RTM_TESTRAIL_URL", &testrail)
        .env("RTM_TESTRAIL_USER", "qa@example.com")
        .env("RTM_TESTRAIL_KEY", "key")
        .args(["fetch", "--jql", "project = MCR", "--project", "2", "--format", "csv", "-q", "-o"])
        .arg(&out)
        .assert()
        .success();

    let rows = rtm::report::csv::read_rows(fs::File::open(find_report(&out, "csv")).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].issue_id, "MCR-5");
    assert_eq!(rows[0].sprint, "Sprint 7");
    assert_eq!(rows[0].test_case_ids, "5");
    assert_eq!(rows[0].test_case_statuses, "9");
    assert_eq!(rows[0].issue_link, format!("{}/browse/MCR-5", jira));
    assert_eq!(
        rows[0].test_case_links,
        format!("{}/index.php?/tests/view/5", testrail)
    );
    assert!(rows[1].is_uncovered());
}

#[test]
fn test_fetch_transport_failure_reports_jql() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .current_dir(tmp.path())
        .env("RTM_JIRA_URL", "http://127.0.0.1:9")
        .env("RTM_JIRA_EMAIL", "qa@example.com")
        .env("RTM_JIRA_TOKEN", "token")
        .env("RTM_TESTRAIL_URL", "http://127.0.0.1:9")
        .env("RTM_TESTRAIL_USER", "qa@example.com")
        .env("RTM_TESTRAIL_KEY", "key")
        .env("RTM_TESTRAIL_PROJECT", "2")
        .args(["fetch", "--jql", "project = MCR", "--timeout", "2", "-q", "-o"])
        .arg(tmp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("project = MCR"));

    assert!(!tmp.path().join("out").exists());
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_init_then_show() {
    let tmp = TempDir::new().unwrap();

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(tmp.path().join("rtm.yaml").exists());

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["config", "show", "testrail.project_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("rtm.yaml"), "delimiter: \";\"\n").unwrap();

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_show_masks_secrets() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .current_dir(tmp.path())
        .env("RTM_JIRA_TOKEN", "super-secret")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("super-secret").not())
        .stdout(predicate::str::contains("********"));
}

#[test]
fn test_config_statuses_lists_overrides() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("rtm.yaml"), "status_labels:\n  6: Deferred\n").unwrap();

    rtm(tmp.path())
        .current_dir(tmp.path())
        .args(["config", "statuses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tPassed"))
        .stdout(predicate::str::contains("6\tDeferred"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    rtm(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rtm"));
}

//! `rtm build` command - Build the matrix from CSV exports

use miette::Result;
use std::path::PathBuf;

use super::{emit_reports, load_config, match_options};
use crate::cli::{GlobalOpts, OutputArgs};
use crate::core::pipeline::build_matrix;
use crate::sources::{CsvIssueSource, CsvTestCaseSource};

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Jira CSV export
    #[arg(long)]
    pub issues: PathBuf,

    /// TestRail CSV export (ID, Title, Status, Tested On)
    #[arg(long)]
    pub tests: PathBuf,

    /// Jira base URL used for issue links
    #[arg(long)]
    pub jira_url: Option<String>,

    /// TestRail base URL used for test-case links
    #[arg(long)]
    pub testrail_url: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn run(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = load_config(global)?;
    if args.jira_url.is_some() {
        config.jira.url = args.jira_url.clone();
    }
    if args.testrail_url.is_some() {
        config.testrail.url = args.testrail_url.clone();
    }

    for path in [&args.issues, &args.tests] {
        if !path.exists() {
            return Err(miette::miette!("File not found: {}", path.display()));
        }
    }

    let opts = match_options(&config, &args.output);
    let rows = build_matrix(
        &CsvIssueSource::new(&args.issues),
        &CsvTestCaseSource::new(&args.tests),
        &opts,
    )?;

    emit_reports(&rows, &args.output, &opts, &config, global)
}

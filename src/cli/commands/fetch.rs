//! `rtm fetch` command - Build the matrix from the Jira and TestRail APIs

use console::style;
use miette::Result;

use super::{emit_reports, load_config, match_options};
use crate::cli::helpers::{require_secret, require_setting};
use crate::cli::{GlobalOpts, OutputArgs};
use crate::core::aggregate::TestRailSource;
use crate::core::pipeline::build_matrix;
use crate::core::Config;
use crate::sources::{HttpTestRail, JiraClient};

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// JQL filter selecting the issues to trace
    #[arg(long, env = "RTM_JQL")]
    pub jql: String,

    /// TestRail project id (default: testrail.project_id)
    #[arg(long)]
    pub project: Option<u64>,

    /// Jira base URL (default: jira.url)
    #[arg(long)]
    pub jira_url: Option<String>,

    /// Jira account email (default: jira.email)
    #[arg(long)]
    pub jira_email: Option<String>,

    /// TestRail base URL (default: testrail.url)
    #[arg(long)]
    pub testrail_url: Option<String>,

    /// TestRail user (default: testrail.user)
    #[arg(long)]
    pub testrail_user: Option<String>,

    /// Issues requested from Jira (a single page is read)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl FetchArgs {
    /// Overlay command-line values on the loaded config
    fn apply(&self, config: &mut Config) {
        if let Some(project) = self.project {
            config.testrail.project_id = Some(project);
        }
        if self.jira_url.is_some() {
            config.jira.url = self.jira_url.clone();
        }
        if self.jira_email.is_some() {
            config.jira.email = self.jira_email.clone();
        }
        if self.testrail_url.is_some() {
            config.testrail.url = self.testrail_url.clone();
        }
        if self.testrail_user.is_some() {
            config.testrail.user = self.testrail_user.clone();
        }
        if self.page_size.is_some() {
            config.jira.page_size = self.page_size;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
    }
}

pub fn run(args: FetchArgs, global: &GlobalOpts) -> Result<()> {
    let mut config = load_config(global)?;
    args.apply(&mut config);

    let jira_url = require_setting(config.jira.url.clone(), "jira.url", "RTM_JIRA_URL")?;
    let jira_email = require_setting(config.jira.email.clone(), "jira.email", "RTM_JIRA_EMAIL")?;
    let jira_token = require_secret(
        config.jira.token.clone(),
        "Jira API token",
        "jira.token",
        "RTM_JIRA_TOKEN",
    )?;
    let testrail_url = require_setting(config.testrail.url.clone(), "testrail.url", "RTM_TESTRAIL_URL")?;
    let testrail_user =
        require_setting(config.testrail.user.clone(), "testrail.user", "RTM_TESTRAIL_USER")?;
    let testrail_key = require_secret(
        config.testrail.api_key.clone(),
        "TestRail API key",
        "testrail.api_key",
        "RTM_TESTRAIL_KEY",
    )?;
    let project_id = require_setting(
        config.testrail.project_id,
        "testrail.project_id",
        "RTM_TESTRAIL_PROJECT",
    )?;

    let jira = JiraClient::new(jira_url, jira_email, jira_token, args.jql.clone(), config.timeout())?
        .with_page_size(config.page_size())
        .with_fields(config.jira_fields());
    let testrail = TestRailSource::new(
        HttpTestRail::new(testrail_url, testrail_user, testrail_key, config.timeout())?,
        project_id,
        config.status_map(),
    );

    if !global.quiet {
        eprintln!(
            "{} Fetching issues ({}) and TestRail project {}...",
            style("→").blue(),
            style(&args.jql).yellow(),
            style(project_id).cyan()
        );
    }

    let opts = match_options(&config, &args.output);
    let rows = build_matrix(&jira, &testrail, &opts)?;

    emit_reports(&rows, &args.output, &opts, &config, global)
}

//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    build::BuildArgs, completions::CompletionsArgs, config::ConfigCommands, fetch::FetchArgs,
};
use crate::report::ReportFormat;

#[derive(Parser)]
#[command(name = "rtm")]
#[command(author, version, about = "Requirement Traceability Matrix builder")]
#[command(long_about = "Joins Jira issues with TestRail test cases into a Requirement Traceability Matrix and exports it as spreadsheet, HTML and CSV reports.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (default: ./rtm.yaml plus the global config)
    #[arg(long, global = true, env = "RTM_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the matrix from Jira and TestRail CSV exports
    Build(BuildArgs),

    /// Build the matrix from the Jira and TestRail APIs
    Fetch(FetchArgs),

    /// Show or initialize configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Report options shared by `build` and `fetch`
#[derive(clap::Args, Clone, Debug)]
pub struct OutputArgs {
    /// Directory to write reports into (default: config output_dir or .)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Report formats to write
    #[arg(long = "format", short = 'f', value_enum, value_delimiter = ',', default_values_t = [ReportFormat::Xlsx, ReportFormat::Html])]
    pub formats: Vec<ReportFormat>,

    /// Separator for joined test-case lists
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Do not print the preview table
    #[arg(long)]
    pub no_preview: bool,

    /// Column width for the preview table
    #[arg(long, default_value_t = 30)]
    pub width: usize,
}

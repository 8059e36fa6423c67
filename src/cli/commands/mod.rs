//! CLI command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod fetch;

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputArgs};
use crate::core::matcher::MatchOptions;
use crate::core::Config;
use crate::entities::TraceRow;
use crate::report::{preview_table, write_artifacts};

/// Load configuration honoring `--config`
pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config> {
    Config::load(global.config.as_deref()).into_diagnostic()
}

/// Match options from config, with the command-line delimiter winning
pub(crate) fn match_options(config: &Config, output: &OutputArgs) -> MatchOptions {
    MatchOptions {
        links: config.link_templates(),
        delimiter: output
            .delimiter
            .clone()
            .unwrap_or_else(|| config.delimiter().to_string()),
    }
}

/// Print the preview and write the report files
pub(crate) fn emit_reports(
    rows: &[TraceRow],
    output: &OutputArgs,
    opts: &MatchOptions,
    config: &Config,
    global: &GlobalOpts,
) -> Result<()> {
    if !global.quiet && !output.no_preview {
        println!("{}", preview_table(rows, output.width));
    }

    let dir = output.output_dir.clone().unwrap_or_else(|| config.output_dir());
    let written = write_artifacts(rows, &output.formats, &dir, &Local::now(), &opts.delimiter)
        .into_diagnostic()?;

    if !global.quiet {
        for path in &written {
            println!("{} Report written to: {}", style("✓").green(), path.display());
        }
    }
    Ok(())
}

//! Report rendering - spreadsheet, HTML and CSV artifacts plus a terminal preview

pub mod csv;
pub mod html;
pub mod xlsx;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::cli::helpers::truncate_str;
use crate::core::matcher::Coverage;
use crate::entities::TraceRow;

pub use html::HtmlRenderer;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Unexpected report columns: {0}")]
    Columns(String),
}

/// Artifact kinds the build can emit
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    /// Excel workbook
    Xlsx,
    /// Standalone HTML page with clickable links
    Html,
    /// Plain CSV with the same 13 columns
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
        }
    }
}

/// File stem for a run started at `now`: `RTM_YYYYMMDD_HHMMSS`
pub fn artifact_stem(now: &DateTime<Local>) -> String {
    format!("RTM_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Write the requested artifacts into `dir`, returning their paths
pub fn write_artifacts(
    rows: &[TraceRow],
    formats: &[ReportFormat],
    dir: &Path,
    now: &DateTime<Local>,
    delimiter: &str,
) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir)?;
    let stem = artifact_stem(now);

    let mut written = Vec::new();
    for format in formats {
        let path = dir.join(format!("{}.{}", stem, format.extension()));
        match format {
            ReportFormat::Xlsx => xlsx::write_workbook(rows, delimiter, &path)?,
            ReportFormat::Html => {
                let generated = now.format("%Y-%m-%d %H:%M:%S").to_string();
                let html = HtmlRenderer::new()?.render(rows, delimiter, &generated)?;
                std::fs::write(&path, html)?;
            }
            ReportFormat::Csv => {
                let mut writer = BufWriter::new(File::create(&path)?);
                csv::write_rows(rows, &mut writer)?;
                writer.flush()?;
            }
        }
        tracing::info!(path = %path.display(), "report written");
        written.push(path);
    }
    Ok(written)
}

/// Markdown preview of the matrix with a coverage summary
pub fn preview_table(rows: &[TraceRow], width: usize) -> String {
    let mut output = String::new();
    output.push_str("# Requirement Traceability Matrix\n\n");

    let mut builder = Builder::default();
    builder.push_record(["Jira ID", "Summary", "Test Cases", "Status", "Jira Status", "Tested On"]);
    for row in rows {
        builder.push_record([
            row.issue_id.clone(),
            truncate_str(&row.summary, width),
            if row.is_uncovered() {
                "-".to_string()
            } else {
                truncate_str(&row.test_case_ids, width)
            },
            truncate_str(&row.test_case_statuses, width),
            row.status.clone(),
            truncate_str(&row.tested_on, width),
        ]);
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());

    let coverage = Coverage::of(rows);
    output.push_str("\n\n## Summary\n\n");
    output.push_str(&format!("- **Issues:** {}\n", coverage.issues));
    output.push_str(&format!(
        "- **Covered by test cases:** {} ({:.1}%)\n",
        coverage.covered,
        coverage.percent()
    ));
    output.push_str(&format!("- **Without test cases:** {}\n", coverage.uncovered));
    output
}

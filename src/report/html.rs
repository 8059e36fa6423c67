//! HTML rendition of the matrix
//!
//! Rendered from an embedded Tera template. Text is HTML-escaped; the Jira
//! Link column becomes an anchor labelled with the issue id and the Test
//! Case Links column becomes one anchor per matched test case.

use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;

use super::ReportError;
use crate::core::matcher::Coverage;
use crate::entities::{TraceRow, COLUMNS};

const TEMPLATE: &str = "rtm.html";

const ISSUE_LINK_COLUMN: usize = 10;
const TEST_CASE_LINKS_COLUMN: usize = 11;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Serialize)]
struct Anchor<'a> {
    href: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Cell<'a> {
    text: &'a str,
    links: Vec<Anchor<'a>>,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    cells: Vec<Cell<'a>>,
}

#[derive(Debug, Serialize)]
struct CoverageView {
    issues: usize,
    covered: usize,
    uncovered: usize,
}

/// Renders trace rows as a standalone HTML document
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    /// Create a renderer with the embedded template
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();
        let file = EmbeddedTemplates::get(TEMPLATE)
            .ok_or_else(|| ReportError::Template(format!("template not found: {TEMPLATE}")))?;
        let source = std::str::from_utf8(&file.data)
            .map_err(|e| ReportError::Template(e.to_string()))?;
        tera.add_raw_template(TEMPLATE, source)
            .map_err(|e| ReportError::Template(e.to_string()))?;
        Ok(Self { tera })
    }

    /// Render the document; `generated` is shown as the generation time
    pub fn render(
        &self,
        rows: &[TraceRow],
        delimiter: &str,
        generated: &str,
    ) -> Result<String, ReportError> {
        let view: Vec<Row> = rows.iter().map(|row| row_view(row, delimiter)).collect();
        let coverage = Coverage::of(rows);

        let mut context = tera::Context::new();
        context.insert("title", "Requirement Traceability Matrix");
        context.insert("generated", generated);
        context.insert("columns", &COLUMNS);
        context.insert("rows", &view);
        context.insert("delimiter", delimiter);
        context.insert(
            "coverage",
            &CoverageView {
                issues: coverage.issues,
                covered: coverage.covered,
                uncovered: coverage.uncovered,
            },
        );

        self.tera
            .render(TEMPLATE, &context)
            .map_err(|e| ReportError::Template(e.to_string()))
    }
}

fn row_view<'a>(row: &'a TraceRow, delimiter: &str) -> Row<'a> {
    let cells = row
        .cells()
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let links = match i {
                ISSUE_LINK_COLUMN if !row.issue_link.is_empty() => vec![Anchor {
                    href: &row.issue_link,
                    text: &row.issue_id,
                }],
                TEST_CASE_LINKS_COLUMN => row
                    .test_case_link_pairs(delimiter)
                    .into_iter()
                    .filter(|(id, link)| !id.is_empty() && !link.is_empty())
                    .map(|(id, link)| Anchor { href: link, text: id })
                    .collect(),
                _ => Vec::new(),
            };
            Cell { text, links }
        })
        .collect();
    Row { cells }
}

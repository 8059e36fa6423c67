//! Spreadsheet rendition of the matrix
//!
//! One sheet named `RTM` with a bold, frozen header row and an autofilter.
//! The Jira Link cell is a hyperlink showing the issue id. The Test Case
//! Links cell holds a single hyperlink to the first matched test case,
//! showing that case's id; the full list is in the CSV and HTML reports.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use super::ReportError;
use crate::entities::{TraceRow, COLUMNS};

const SHEET_NAME: &str = "RTM";

const ISSUE_LINK_COLUMN: u16 = 10;
const TEST_CASE_LINKS_COLUMN: u16 = 11;

/// Excel refuses longer cell strings
const MAX_CELL_CHARS: usize = 32_767;

const COLUMN_WIDTHS: [f64; 13] = [
    12.0, 40.0, 18.0, 50.0, 18.0, 14.0, 14.0, 12.0, 50.0, 50.0, 16.0, 16.0, 14.0,
];

/// Build the workbook in memory
pub fn build_workbook(rows: &[TraceRow], delimiter: &str) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_sheet(worksheet, rows, delimiter)?;
    Ok(workbook)
}

/// Write the workbook to `path`
pub fn write_workbook(rows: &[TraceRow], delimiter: &str, path: &Path) -> Result<(), ReportError> {
    let mut workbook = build_workbook(rows, delimiter)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialize the workbook to `.xlsx` bytes
pub fn workbook_bytes(rows: &[TraceRow], delimiter: &str) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(rows, delimiter)?;
    Ok(workbook.save_to_buffer()?)
}

fn fill_sheet(sheet: &mut Worksheet, rows: &[TraceRow], delimiter: &str) -> Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *name, &header)?;
        sheet.set_column_width(col, COLUMN_WIDTHS[col as usize])?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, value) in row.cells().iter().enumerate() {
            let col = col as u16;
            match col {
                ISSUE_LINK_COLUMN => write_link(sheet, r, col, value, &row.issue_id)?,
                TEST_CASE_LINKS_COLUMN => match row.primary_test_case_link(delimiter) {
                    Some((id, link)) => write_link(sheet, r, col, link, id)?,
                    None => write_text(sheet, r, col, value)?,
                },
                _ => write_text(sheet, r, col, value)?,
            }
        }
    }

    sheet.autofilter(0, 0, rows.len() as u32, (COLUMNS.len() - 1) as u16)?;
    Ok(())
}

/// Hyperlink for http(s) URLs, plain text otherwise
///
/// Excel also rejects some URLs (length limits); those fall back to text.
fn write_link(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    url: &str,
    label: &str,
) -> Result<(), XlsxError> {
    if is_web_url(url) {
        let text = if label.is_empty() { url } else { label };
        match sheet.write_url_with_text(row, col, url, text) {
            Ok(_) => return Ok(()),
            Err(e) => tracing::debug!(%url, error = %e, "hyperlink rejected, writing text"),
        }
    }
    write_text(sheet, row, col, url)
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, value: &str) -> Result<(), XlsxError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.chars().count() > MAX_CELL_CHARS {
        let clipped: String = value.chars().take(MAX_CELL_CHARS).collect();
        sheet.write_string(row, col, clipped)?;
    } else {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn is_web_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

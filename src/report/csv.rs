//! CSV rendition of the matrix
//!
//! Writes the 13 report columns with a header row. Reading the file back
//! yields the same rows in the same order.

use csv::{ReaderBuilder, WriterBuilder};
use std::io::{Read, Write};

use super::ReportError;
use crate::entities::{TraceRow, COLUMNS};

/// Write rows, header first (also when there are no rows)
pub fn write_rows<W: Write>(rows: &[TraceRow], writer: W) -> Result<(), ReportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read rows written by [`write_rows`]
///
/// Fails when the header does not carry exactly the report columns.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<TraceRow>, ReportError> {
    let mut rdr = ReaderBuilder::new().from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.iter().ne(COLUMNS.iter().copied()) {
        return Err(ReportError::Columns(
            headers.iter().map(str::to_string).collect::<Vec<_>>().join(", "),
        ));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<TraceRow> {
        vec![
            TraceRow {
                issue_id: "MCR-5".to_string(),
                summary: "Login, with comma".to_string(),
                test_case_ids: "100, 101".to_string(),
                test_case_titles: "Covers MCR-5 login, MCR-5 \"quoted\"".to_string(),
                test_case_statuses: "Passed, Failed".to_string(),
                description: "multi\nline".to_string(),
                issue_link: "https://jira/browse/MCR-5".to_string(),
                test_case_links: "https://tr/100, https://tr/101".to_string(),
                tested_on: "2024-01-01, ".to_string(),
                ..Default::default()
            },
            TraceRow {
                issue_id: "MCR-6".to_string(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_readback_recovers_columns_rows_and_order() {
        let rows = sample_rows();
        let mut buf = Vec::new();
        write_rows(&rows, &mut buf).unwrap();

        let header = String::from_utf8(buf.clone()).unwrap();
        assert!(header.starts_with("Jira ID,Jira Summary,Test Case IDs,"));

        let back = read_rows(buf.as_slice()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_empty_matrix_still_has_header() {
        let mut buf = Vec::new();
        write_rows(&[], &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(read_rows(buf.as_slice()).unwrap().is_empty());
    }

    #[test]
    fn test_foreign_header_rejected() {
        let err = read_rows("ID,Title\n1,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::Columns(_)));
    }
}

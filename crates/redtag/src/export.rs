//! Flat-file export of the record snapshot.
//!
//! The format is comma-delimited with a fixed header. Escaping is limited to
//! one rule: commas inside `Comments` become semicolons. No other field is
//! escaped and nothing is quoted, so downstream spreadsheets that already
//! consume these files see exactly the same layout.

use std::io::Write;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::record::{SubmissionRecord, DATE_FORMAT};

/// Column headings, in order.
pub const COLUMNS: [&str; 10] = [
    "ID",
    "MFC",
    "Date",
    "Tagged By",
    "Item Type",
    "Part Number",
    "Asset SN",
    "Service Call ID",
    "Reason",
    "Comments",
];

const DELIMITER: &str = ",";

/// A rendered export ready to hand to a file writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name.
    pub filename: String,
    /// Document text.
    pub contents: String,
}

impl CsvExport {
    /// The document as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }

    /// Write the document to `out` byte for byte, adding no line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing `out` fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(self.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Suggested file name for an export generated on `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("red-tag-export-{}.csv", date.format(DATE_FORMAT))
}

/// Render the header line.
#[must_use]
pub fn header_line() -> String {
    COLUMNS.join(DELIMITER)
}

/// Render one record as a line.
#[must_use]
pub fn record_line(record: &SubmissionRecord) -> String {
    let comments = record.comments.as_deref().unwrap_or_default().replace(',', ";");
    let id = record.id.to_string();
    [
        id.as_str(),
        record.mfc.as_str(),
        record.effective_date_str().unwrap_or_default(),
        record.tagged_by.as_str(),
        record.item_type.as_str(),
        record.part_number.as_str(),
        record.removed_from.as_str(),
        record.service_call_id.as_deref().unwrap_or_default(),
        record.reason_remove.as_str(),
        comments.as_str(),
    ]
    .join(DELIMITER)
}

/// Render `records` as a document: the header plus one line per record,
/// joined with `\n` and without a trailing newline.
pub fn render_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    let mut lines = vec![header_line()];
    lines.extend(records.into_iter().map(record_line));
    debug!("Rendered export with {} records", lines.len() - 1);
    lines.join("\n")
}

/// Render `records` as an export generated on `date`.
pub fn export_csv<'a, I>(records: I, date: NaiveDate) -> CsvExport
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    CsvExport {
        filename: export_filename(date),
        contents: render_csv(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_record;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
    }

    #[test]
    fn test_filename_pattern() {
        assert_eq!(export_filename(date()), "red-tag-export-2024-07-04.csv");
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header_line(),
            "ID,MFC,Date,Tagged By,Item Type,Part Number,Asset SN,Service Call ID,Reason,Comments"
        );
    }

    #[test]
    fn test_empty_snapshot_is_header_only() {
        let empty: Vec<SubmissionRecord> = Vec::new();
        let export = export_csv(&empty, date());
        assert_eq!(export.contents, header_line());
        assert_eq!(export.contents.split('\n').count(), 1);
    }

    #[test]
    fn test_three_records_with_comma_comment() {
        let mut records = vec![
            sample_record(1, "P-1", "SN-1", "DFW1"),
            sample_record(2, "P-2", "SN-2", "ORD2"),
            sample_record(3, "P-3", "SN-3", "ATL3"),
        ];
        records[1].comments = Some("ok, replaced".to_string());

        let export = export_csv(&records, date());
        let lines: Vec<&str> = export.contents.split('\n').collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("ok; replaced"));
        assert!(!lines[2].contains("ok, replaced"));
        assert_eq!(lines[2].split(',').count(), COLUMNS.len());
    }

    #[test]
    fn test_record_line_columns() {
        let mut record = sample_record(42, "P-9", "SN-9", "DFW1");
        record.service_call_id = Some("SC-77".to_string());
        record.comments = Some("a,b,c".to_string());

        assert_eq!(
            record_line(&record),
            "42,DFW1,2024-03-01,J. Ortega,Motor,P-9,SN-9,SC-77,Overheating,a;b;c"
        );
    }

    #[test]
    fn test_missing_optional_fields_render_empty() {
        let mut record = sample_record(5, "P-1", "SN-1", "DFW1");
        record.removal_date = None;
        record.service_call_id = None;
        record.comments = None;

        let line = record_line(&record);
        assert_eq!(line, "5,DFW1,,J. Ortega,Motor,P-1,SN-1,,Overheating,");
        assert!(!line.contains("undefined"));
    }

    #[test]
    fn test_legacy_date_column() {
        let mut record = sample_record(5, "P-1", "SN-1", "DFW1");
        record.removal_date = None;
        record.date = Some("2019-11-02".to_string());

        assert!(record_line(&record).contains(",2019-11-02,"));
    }

    #[test]
    fn test_only_comments_are_escaped() {
        let mut record = sample_record(6, "P-1", "SN-1", "DFW1");
        record.reason_remove = "Noisy, vibrating".to_string();
        record.comments = Some("line \"quoted\", ok".to_string());

        let line = record_line(&record);
        assert!(line.contains("Noisy, vibrating"));
        assert!(line.ends_with("line \"quoted\"; ok"));
    }

    #[test]
    fn test_export_preserves_snapshot_order() {
        let records = vec![
            sample_record(3, "P-3", "SN-3", "DFW1"),
            sample_record(1, "P-1", "SN-1", "DFW1"),
        ];
        let contents = render_csv(&records);
        let ids: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_write_to_adds_no_trailing_newline() {
        let records = vec![sample_record(1, "P-1", "SN-1", "DFW1")];
        let export = export_csv(&records, date());

        let mut out = Vec::new();
        export.write_to(&mut out).unwrap();

        assert_eq!(out, export.as_bytes());
        assert!(!out.ends_with(b"\n"));
    }

    #[test]
    fn test_write_to_reports_io_failure() {
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let empty: Vec<SubmissionRecord> = Vec::new();
        let err = export_csv(&empty, date()).write_to(&mut Closed).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_as_bytes() {
        let empty: Vec<SubmissionRecord> = Vec::new();
        let export = export_csv(&empty, date());
        assert_eq!(export.as_bytes(), header_line().as_bytes());
    }
}

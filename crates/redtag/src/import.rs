//! Import of records exported by the browser form.
//!
//! The input is a JSON array of record objects with camelCase keys. Older
//! records carry the removal date under `date`; both spellings are kept as
//! they are. The original `id` is dropped (the store assigns a new one) and
//! the original `timestamp` is preserved when present.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::record::Submission;
use crate::store::RecordStore;

/// One record as found in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportedRecord {
    /// The record's form fields.
    #[serde(flatten)]
    pub submission: Submission,
    /// Original creation time, if recorded.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records appended to the store.
    pub imported: usize,
    /// Records the store suppressed as duplicates.
    pub duplicates: usize,
}

/// Parse an import file.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of record objects.
pub fn parse_records(json: &str) -> Result<Vec<ImportedRecord>> {
    let records: Vec<ImportedRecord> = serde_json::from_str(json)?;
    debug!("Parsed {} records for import", records.len());
    Ok(records)
}

/// Append parsed records to `store`, in file order.
///
/// Records without a timestamp are stamped with `now`.
///
/// # Errors
///
/// Returns an error if the store fails; records appended before the failure
/// stay appended.
pub fn import_records<S: RecordStore + ?Sized>(
    store: &mut S,
    records: Vec<ImportedRecord>,
    now: DateTime<Utc>,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for record in records {
        let timestamp = record.timestamp.unwrap_or(now);
        match store.insert(record.submission, timestamp)? {
            Some(_) => summary.imported += 1,
            None => summary.duplicates += 1,
        }
    }
    info!(
        "Imported {} records ({} duplicates skipped)",
        summary.imported, summary.duplicates
    );
    Ok(summary)
}

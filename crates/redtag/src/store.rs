//! The record store boundary.
//!
//! Analysis never reads the store directly: it is handed a [`Snapshot`], an
//! immutable copy of the records in insertion order, taken once per pass.
//! Records appended after the snapshot was taken are not part of that pass.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;
use crate::record::{Submission, SubmissionRecord};

/// A point-in-time, insertion-ordered copy of all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<SubmissionRecord>,
}

impl Snapshot {
    /// Wrap records that are already in insertion order.
    #[must_use]
    pub fn new(records: Vec<SubmissionRecord>) -> Self {
        Self { records }
    }

    /// The records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    /// Number of records in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, SubmissionRecord> {
        self.records.iter()
    }
}

impl From<Vec<SubmissionRecord>> for Snapshot {
    fn from(records: Vec<SubmissionRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a SubmissionRecord;
    type IntoIter = std::slice::Iter<'a, SubmissionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// An append-only, insertion-ordered collection of red-tag records.
///
/// Implementors assign increasing ids and never modify a record once stored.
pub trait RecordStore {
    /// Store a submission created at `timestamp`.
    ///
    /// Returns the stored record, or `None` if the store suppressed it as a
    /// duplicate of an existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn insert(
        &mut self,
        submission: Submission,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<SubmissionRecord>>;

    /// Store a submission created now.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn append(&mut self, submission: Submission) -> Result<Option<SubmissionRecord>> {
        self.insert(submission, Utc::now())
    }

    /// Capture every record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn snapshot(&self) -> Result<Snapshot>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn count(&self) -> Result<usize>;
}

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<SubmissionRecord>,
    fingerprints: Vec<String>,
    deduplicate: bool,
}

impl MemoryStore {
    /// Create an empty store that keeps every submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that suppresses repeated submissions.
    #[must_use]
    pub fn with_deduplication() -> Self {
        Self {
            deduplicate: true,
            ..Self::default()
        }
    }
}

impl RecordStore for MemoryStore {
    fn insert(
        &mut self,
        submission: Submission,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<SubmissionRecord>> {
        let fingerprint = submission.fingerprint();
        if self.deduplicate && self.fingerprints.contains(&fingerprint) {
            debug!("Skipping duplicate submission {}", &fingerprint[..16]);
            return Ok(None);
        }

        let id = self.records.last().map_or(1, |r| r.id + 1);
        let record = SubmissionRecord::from_submission(id, timestamp, submission);
        self.records.push(record.clone());
        self.fingerprints.push(fingerprint);
        Ok(Some(record))
    }

    fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.records.clone()))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

//! Storage layer for redtag.
//!
//! This module provides `SQLite`-based persistent storage for red-tag
//! records. The table is append-only: nothing here updates or deletes a
//! record once it is written.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{Submission, SubmissionRecord};
use crate::store::{RecordStore, Snapshot};

use schema::RECORD_COLUMNS;

/// `SQLite`-backed record store.
///
/// Provides:
/// - Append with optional duplicate suppression by fingerprint
/// - Ordered snapshots for analysis and export
/// - Lookup by id, most recent, and by site
/// - Basic statistics
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Whether repeated submissions are suppressed.
    deduplicate: bool,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self {
            path,
            conn,
            deduplicate: true,
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            deduplicate: true,
        })
    }

    /// Enable or disable duplicate suppression.
    #[must_use]
    pub fn deduplicate(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a record with the given fingerprint already exists.
    fn exists_by_fingerprint(&self, fingerprint: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM red_tags WHERE fingerprint = ?1",
            [fingerprint],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a record by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<SubmissionRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM red_tags WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_record)
            .optional()?;
        Ok(result)
    }

    /// Get the most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<SubmissionRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM red_tags ORDER BY id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map([limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get the most recent records for one site, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn by_mfc(&self, mfc: &str, limit: usize) -> Result<Vec<SubmissionRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM red_tags WHERE mfc = ?1 ORDER BY id DESC LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map(params![mfc, limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_records = self.count()?;

        let bounds: (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM red_tags",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let parse = |s: String| {
            DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        };
        let oldest_record = bounds.0.and_then(parse);
        let newest_record = bounds.1.and_then(parse);

        let site_count: i64 =
            self.conn
                .query_row("SELECT COUNT(DISTINCT mfc) FROM red_tags", [], |row| {
                    row.get(0)
                })?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_records,
            site_count: usize::try_from(site_count).unwrap_or_default(),
            oldest_record,
            newest_record,
            db_size_bytes,
        })
    }

    /// Convert a database row to a record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SubmissionRecord> {
        let id: i64 = row.get(0)?;
        let timestamp_str: String = row.get(1)?;
        let attached_json: String = row.get(12)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str).map_or_else(
            |_| {
                warn!("Record {} has unparseable timestamp {:?}", id, timestamp_str);
                // Unix epoch
                DateTime::<Utc>::default()
            },
            |dt| dt.with_timezone(&Utc),
        );

        let attached_files = serde_json::from_str(&attached_json).unwrap_or_else(|e| {
            warn!("Record {} has malformed attachment list: {}", id, e);
            Vec::new()
        });

        Ok(SubmissionRecord {
            id,
            mfc: row.get(2)?,
            removal_date: row.get(3)?,
            date: row.get(4)?,
            tagged_by: row.get(5)?,
            item_type: row.get(6)?,
            part_number: row.get(7)?,
            removed_from: row.get(8)?,
            service_call_id: row.get(9)?,
            reason_remove: row.get(10)?,
            comments: row.get(11)?,
            attached_files,
            timestamp,
        })
    }
}

impl RecordStore for Storage {
    fn insert(
        &mut self,
        submission: Submission,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<SubmissionRecord>> {
        let fingerprint = submission.fingerprint();
        if self.deduplicate && self.exists_by_fingerprint(&fingerprint)? {
            debug!("Skipping duplicate submission {}", &fingerprint[..16]);
            return Ok(None);
        }

        let attached = serde_json::to_string(&submission.attached_files)?;
        self.conn.execute(
            r"
            INSERT INTO red_tags (
                timestamp, mfc, removal_date, legacy_date, tagged_by, item_type,
                part_number, removed_from, service_call_id, reason_remove, comments,
                attached_files, fingerprint
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
            params![
                timestamp.to_rfc3339(),
                submission.mfc,
                submission.removal_date,
                submission.date,
                submission.tagged_by,
                submission.item_type,
                submission.part_number,
                submission.removed_from,
                submission.service_call_id,
                submission.reason_remove,
                submission.comments,
                attached,
                fingerprint,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(
            "Recorded red tag {} for part {} at {}",
            id, submission.part_number, submission.mfc
        );
        Ok(Some(SubmissionRecord::from_submission(
            id, timestamp, submission,
        )))
    }

    fn snapshot(&self) -> Result<Snapshot> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM red_tags ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Captured snapshot of {} records", records.len());
        Ok(Snapshot::new(records))
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM red_tags", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| Error::internal(format!("negative row count {count}")))
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of records stored.
    pub total_records: usize,
    /// Number of distinct MFC sites.
    pub site_count: usize,
    /// Creation time of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Creation time of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

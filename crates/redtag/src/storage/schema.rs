//! `SQLite` schema definitions for redtag.
//!
//! These statements create the version 1 schema. Later versions are applied
//! on top by [`super::migrations`].

/// SQL statement to create the red tags table.
pub const CREATE_RED_TAGS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS red_tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    mfc TEXT NOT NULL,
    removal_date TEXT,
    tagged_by TEXT NOT NULL,
    item_type TEXT NOT NULL,
    part_number TEXT NOT NULL,
    removed_from TEXT NOT NULL,
    service_call_id TEXT,
    reason_remove TEXT NOT NULL,
    comments TEXT,
    attached_files TEXT NOT NULL DEFAULT '[]',
    fingerprint TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on `fingerprint` for duplicate checks.
pub const CREATE_FINGERPRINT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_red_tags_fingerprint ON red_tags(fingerprint)
";

/// SQL statement to create an index on `mfc` for per-site listing.
pub const CREATE_MFC_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_red_tags_mfc ON red_tags(mfc)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RED_TAGS_TABLE,
    CREATE_FINGERPRINT_INDEX,
    CREATE_MFC_INDEX,
    CREATE_METADATA_TABLE,
];

/// Version 2: column for the removal date of imported legacy records.
pub const ADD_LEGACY_DATE_COLUMN: &str = r"
ALTER TABLE red_tags ADD COLUMN legacy_date TEXT
";

/// Columns selected when reading a record, in `row_to_record` order.
pub const RECORD_COLUMNS: &str = "id, timestamp, mfc, removal_date, legacy_date, tagged_by, \
     item_type, part_number, removed_from, service_call_id, reason_remove, comments, \
     attached_files";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_red_tags_table_contains_required_columns() {
        assert!(CREATE_RED_TAGS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_RED_TAGS_TABLE.contains("mfc TEXT NOT NULL"));
        assert!(CREATE_RED_TAGS_TABLE.contains("part_number TEXT NOT NULL"));
        assert!(CREATE_RED_TAGS_TABLE.contains("removed_from TEXT NOT NULL"));
        assert!(CREATE_RED_TAGS_TABLE.contains("fingerprint TEXT NOT NULL"));
        assert!(CREATE_RED_TAGS_TABLE.contains("service_call_id TEXT,"));
    }

    #[test]
    fn test_record_columns_cover_legacy_date() {
        assert!(RECORD_COLUMNS.contains("legacy_date"));
        assert_eq!(RECORD_COLUMNS.split(',').count(), 13);
    }
}

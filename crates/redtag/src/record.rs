//! Core record types for redtag.
//!
//! A [`Submission`] is what the intake form produces. Once the record store
//! accepts it, it becomes an immutable [`SubmissionRecord`] carrying a store
//! id and a creation timestamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Date format used by the removal date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Grouping key for records whose selected field is missing or empty.
///
/// Such records are still counted, all under this one bucket. The value
/// matches the bucket name older exports show for absent fields.
pub const MISSING_FIELD_KEY: &str = "undefined";

/// A record field that analysis can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Site / location code.
    Mfc,
    /// Person who tagged the equipment.
    TaggedBy,
    /// Item type.
    ItemType,
    /// Part number.
    PartNumber,
    /// Asset serial the part was removed from.
    Asset,
    /// Reason for removal.
    Reason,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mfc => write!(f, "mfc"),
            Self::TaggedBy => write!(f, "tagged_by"),
            Self::ItemType => write!(f, "item_type"),
            Self::PartNumber => write!(f, "part_number"),
            Self::Asset => write!(f, "asset"),
            Self::Reason => write!(f, "reason"),
        }
    }
}

/// A red tag as submitted on the intake form, before the store accepts it.
///
/// Field names serialize in camelCase to stay compatible with records
/// exported by the browser form. Missing text fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Submission {
    /// Site / location code.
    pub mfc: String,
    /// Removal date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_date: Option<String>,
    /// Removal date as stored by older records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Person who tagged the equipment.
    pub tagged_by: String,
    /// Item type.
    pub item_type: String,
    /// Part number.
    pub part_number: String,
    /// Asset / serial number the part was removed from.
    pub removed_from: String,
    /// Service call identifier, if one was raised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_call_id: Option<String>,
    /// Reason for removal.
    pub reason_remove: String,
    /// Free-text comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Names of attached files.
    pub attached_files: Vec<String>,
}

impl Submission {
    /// The effective removal date string: `removalDate`, else the legacy `date`.
    #[must_use]
    pub fn effective_date_str(&self) -> Option<&str> {
        non_empty(self.removal_date.as_deref()).or_else(|| non_empty(self.date.as_deref()))
    }

    /// Compute the BLAKE3 fingerprint used to detect repeated submissions.
    ///
    /// Covers every form field except attachments and comments, trimmed, so a
    /// double-submitted form maps to the same value.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [
            self.mfc.as_str(),
            self.effective_date_str().unwrap_or_default(),
            self.tagged_by.as_str(),
            self.item_type.as_str(),
            self.part_number.as_str(),
            self.removed_from.as_str(),
            self.service_call_id.as_deref().unwrap_or_default(),
            self.reason_remove.as_str(),
        ] {
            hasher.update(part.trim().as_bytes());
            hasher.update(&[0x1f]);
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// An accepted red-tag record. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Store-assigned identifier, increasing in creation order.
    pub id: i64,
    /// Site / location code.
    pub mfc: String,
    /// Removal date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal_date: Option<String>,
    /// Removal date as stored by older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Person who tagged the equipment.
    pub tagged_by: String,
    /// Item type.
    pub item_type: String,
    /// Part number.
    pub part_number: String,
    /// Asset / serial number the part was removed from.
    pub removed_from: String,
    /// Service call identifier, if one was raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_call_id: Option<String>,
    /// Reason for removal.
    pub reason_remove: String,
    /// Free-text comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Names of attached files.
    #[serde(default)]
    pub attached_files: Vec<String>,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Build a record from an accepted submission.
    #[must_use]
    pub fn from_submission(id: i64, timestamp: DateTime<Utc>, submission: Submission) -> Self {
        Self {
            id,
            mfc: submission.mfc,
            removal_date: submission.removal_date,
            date: submission.date,
            tagged_by: submission.tagged_by,
            item_type: submission.item_type,
            part_number: submission.part_number,
            removed_from: submission.removed_from,
            service_call_id: submission.service_call_id,
            reason_remove: submission.reason_remove,
            comments: submission.comments,
            attached_files: submission.attached_files,
            timestamp,
        }
    }

    /// The effective removal date string: `removalDate`, else the legacy `date`.
    #[must_use]
    pub fn effective_date_str(&self) -> Option<&str> {
        non_empty(self.removal_date.as_deref()).or_else(|| non_empty(self.date.as_deref()))
    }

    /// The effective removal date, if present and parseable.
    ///
    /// Accepts `YYYY-MM-DD` and, for hand-edited imports, full RFC 3339
    /// timestamps (the date part is kept).
    #[must_use]
    pub fn effective_date(&self) -> Option<NaiveDate> {
        let raw = self.effective_date_str()?.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
    }

    /// The value of `field`, or `None` if it is missing or empty.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Mfc => self.mfc.as_str(),
            Field::TaggedBy => self.tagged_by.as_str(),
            Field::ItemType => self.item_type.as_str(),
            Field::PartNumber => self.part_number.as_str(),
            Field::Asset => self.removed_from.as_str(),
            Field::Reason => self.reason_remove.as_str(),
        };
        non_empty(Some(value))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

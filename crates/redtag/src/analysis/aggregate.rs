//! Frequency tables and ranked top-N lists.
//!
//! Ranking sorts by `(-count, first_seen)`: the higher count wins, and on a
//! tie the key that first appeared earlier in the snapshot wins. The
//! first-seen position is stored explicitly so ranking never depends on the
//! iteration order of a map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::{Field, SubmissionRecord, MISSING_FIELD_KEY};

/// Name of the placeholder entry reported when there are no records.
pub const NO_DATA_NAME: &str = "No data yet";

/// One key of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyEntry {
    /// The grouped field value.
    pub key: String,
    /// Number of records carrying the value.
    pub count: usize,
    /// Snapshot position of the first record carrying the value.
    pub first_seen: usize,
}

/// Occurrence counts per field value, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key` seen at snapshot position `position`.
    pub fn record(&mut self, key: &str, position: usize) {
        if let Some(&slot) = self.index.get(key) {
            self.entries[slot].count += 1;
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push(FrequencyEntry {
                key: key.to_string(),
                count: 1,
                first_seen: position,
            });
        }
    }

    /// Count for `key`, if it was seen.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&slot| self.entries[slot].count)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyEntry> {
        self.entries.iter()
    }

    /// Every key, ranked.
    #[must_use]
    pub fn ranked(&self) -> Vec<RankedEntry> {
        let mut sorted: Vec<&FrequencyEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        sorted
            .into_iter()
            .map(|e| RankedEntry {
                name: e.key.clone(),
                count: e.count,
            })
            .collect()
    }

    /// The `n` highest-ranked keys.
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<RankedEntry> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// A ranked `{name, count}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// The grouped field value.
    pub name: String,
    /// Number of records carrying the value.
    pub count: usize,
}

impl RankedEntry {
    /// The placeholder entry used when there are no records.
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            name: NO_DATA_NAME.to_string(),
            count: 0,
        }
    }

    /// Whether this is the no-data placeholder.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.count == 0 && self.name == NO_DATA_NAME
    }
}

/// Count one occurrence per record of `selector(record)`.
///
/// Records whose value is missing are counted under [`MISSING_FIELD_KEY`]
/// rather than skipped, so the table total always equals the record count.
pub fn compute_frequencies<'a, I, F>(records: I, selector: F) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
    F: Fn(&'a SubmissionRecord) -> Option<&'a str>,
{
    let mut table = FrequencyTable::new();
    for (position, record) in records.into_iter().enumerate() {
        table.record(selector(record).unwrap_or(MISSING_FIELD_KEY), position);
    }
    table
}

/// Frequency table over one of the standard record fields.
pub fn field_frequencies<'a, I>(records: I, field: Field) -> FrequencyTable
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    compute_frequencies(records, move |r| r.field(field))
}

/// The `n` highest-ranked entries of `table`.
#[must_use]
pub fn top_n(table: &FrequencyTable, n: usize) -> Vec<RankedEntry> {
    table.top_n(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_record;

    fn records(parts: &[&str]) -> Vec<SubmissionRecord> {
        parts
            .iter()
            .zip(1..)
            .map(|(part, id)| sample_record(id, part, "SN-1", "DFW1"))
            .collect()
    }

    fn names(entries: &[RankedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_compute_frequencies_counts() {
        let records = records(&["A", "B", "A", "C", "A", "B"]);
        let table = field_frequencies(&records, Field::PartNumber);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("A"), Some(3));
        assert_eq!(table.get("B"), Some(2));
        assert_eq!(table.get("C"), Some(1));
        assert_eq!(table.get("D"), None);
    }

    #[test]
    fn test_frequency_sum_equals_record_count() {
        let mut records = records(&["A", "B", "A", "", "C", "", "A"]);
        records[2].part_number.clear();

        let table = field_frequencies(&records, Field::PartNumber);
        assert_eq!(table.total(), records.len());
    }

    #[test]
    fn test_missing_values_share_sentinel_key() {
        let mut records = records(&["A", "B", "C"]);
        records[0].part_number.clear();
        records[2].part_number.clear();

        let table = field_frequencies(&records, Field::PartNumber);
        assert_eq!(table.get(MISSING_FIELD_KEY), Some(2));
        assert_eq!(table.get("B"), Some(1));
    }

    #[test]
    fn test_table_iterates_in_first_seen_order() {
        let records = records(&["C", "A", "C", "B"]);
        let table = field_frequencies(&records, Field::PartNumber);

        let keys: Vec<&str> = table.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["C", "A", "B"]);
        let firsts: Vec<usize> = table.iter().map(|e| e.first_seen).collect();
        assert_eq!(firsts, vec![0, 1, 3]);
    }

    #[test]
    fn test_top_n_sorted_by_count() {
        let records = records(&["A", "B", "B", "C", "C", "C"]);
        let table = field_frequencies(&records, Field::PartNumber);

        let top = top_n(&table, 5);
        assert_eq!(names(&top), vec!["C", "B", "A"]);
        assert_eq!(top[0].count, 3);
    }

    #[test]
    fn test_top_n_bound() {
        let seven = records(&["A", "B", "C", "D", "E", "F", "G"]);
        let table = field_frequencies(&seven, Field::PartNumber);

        assert_eq!(top_n(&table, 5).len(), 5);
        assert_eq!(top_n(&table, 100).len(), 7);
        assert!(top_n(&table, 0).is_empty());

        let few = records(&["A", "B", "A"]);
        let table = field_frequencies(&few, Field::PartNumber);
        assert_eq!(top_n(&table, 5).len(), 2);
    }

    #[test]
    fn test_tie_broken_by_first_occurrence() {
        // X and Y both appear twice; Y is seen first.
        let records = records(&["Y", "X", "X", "Y", "Z"]);
        let table = field_frequencies(&records, Field::PartNumber);

        let top = top_n(&table, 5);
        assert_eq!(names(&top), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_tie_break_survives_truncation() {
        let records = records(&["E", "D", "C", "B", "A", "F"]);
        let table = field_frequencies(&records, Field::PartNumber);

        assert_eq!(names(&top_n(&table, 3)), vec!["E", "D", "C"]);
    }

    #[test]
    fn test_ranked_returns_every_key() {
        let records = records(&["A", "B", "C", "D", "E", "F", "F"]);
        let table = field_frequencies(&records, Field::PartNumber);

        let ranked = table.ranked();
        assert_eq!(ranked.len(), 6);
        assert_eq!(ranked[0].name, "F");
    }

    #[test]
    fn test_empty_records() {
        let empty: Vec<SubmissionRecord> = Vec::new();
        let table = field_frequencies(&empty, Field::Mfc);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(top_n(&table, 5).is_empty());
    }

    #[test]
    fn test_custom_selector() {
        let records = records(&["A", "B"]);
        let table = compute_frequencies(&records, |r| Some(r.item_type.as_str()));
        assert_eq!(table.get("Motor"), Some(2));
    }

    #[test]
    fn test_no_data_entry() {
        let entry = RankedEntry::no_data();
        assert!(entry.is_no_data());
        assert_eq!(entry.name, "No data yet");
        assert_eq!(entry.count, 0);

        let real = RankedEntry {
            name: NO_DATA_NAME.to_string(),
            count: 2,
        };
        assert!(!real.is_no_data());
    }
}

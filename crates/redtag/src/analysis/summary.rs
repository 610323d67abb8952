//! The rolling analysis summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::{field_frequencies, RankedEntry};
use super::trend::{TrendClassifier, TrendResult};
use crate::config::AnalysisConfig;
use crate::record::Field;
use crate::store::Snapshot;

/// Default length of the top parts and top assets lists.
pub const DEFAULT_TOP_N: usize = 5;

/// Everything the analysis panel shows, computed from one snapshot.
///
/// On an empty snapshot every list holds the single no-data entry and the
/// trend is [`TrendResult::insufficient_data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Most frequently removed part numbers.
    pub top_parts: Vec<RankedEntry>,
    /// Assets with the most removals.
    pub top_assets: Vec<RankedEntry>,
    /// Every MFC site, ranked.
    pub mfc_breakdown: Vec<RankedEntry>,
    /// Most common removal reasons.
    pub top_reasons: Vec<RankedEntry>,
    /// Recent-vs-historical trend.
    pub trend: TrendResult,
    /// Number of records analysed.
    pub total_records: usize,
    /// Evaluation instant.
    pub generated_at: DateTime<Utc>,
}

/// Computes [`AnalysisSummary`] values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Analyzer {
    top_n: usize,
    classifier: TrendClassifier,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, TrendClassifier::default())
    }
}

impl Analyzer {
    /// Create an analyzer.
    #[must_use]
    pub fn new(top_n: usize, classifier: TrendClassifier) -> Self {
        Self { top_n, classifier }
    }

    /// Create an analyzer from the analysis configuration.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.top_n, TrendClassifier::from_config(config))
    }

    /// Analyse `snapshot` as of `now`.
    #[must_use]
    pub fn analyze(&self, snapshot: &Snapshot, now: DateTime<Utc>) -> AnalysisSummary {
        let trend = self.classifier.classify(snapshot, now);

        if snapshot.is_empty() {
            debug!("Empty snapshot, reporting placeholders");
            return AnalysisSummary {
                top_parts: vec![RankedEntry::no_data()],
                top_assets: vec![RankedEntry::no_data()],
                mfc_breakdown: vec![RankedEntry::no_data()],
                top_reasons: vec![RankedEntry::no_data()],
                trend,
                total_records: 0,
                generated_at: now,
            };
        }

        let parts = field_frequencies(snapshot, Field::PartNumber);
        let assets = field_frequencies(snapshot, Field::Asset);
        let sites = field_frequencies(snapshot, Field::Mfc);
        let reasons = field_frequencies(snapshot, Field::Reason);

        debug!(
            records = snapshot.len(),
            parts = parts.len(),
            assets = assets.len(),
            sites = sites.len(),
            reasons = reasons.len(),
            trend = %trend.trend,
            "Analysed snapshot"
        );

        AnalysisSummary {
            top_parts: parts.top_n(self.top_n),
            top_assets: assets.top_n(self.top_n),
            mfc_breakdown: sites.ranked(),
            top_reasons: reasons.top_n(self.top_n),
            trend,
            total_records: snapshot.len(),
            generated_at: now,
        }
    }
}

/// Analyse `snapshot` with the default settings.
#[must_use]
pub fn analyze(snapshot: &Snapshot, now: DateTime<Utc>) -> AnalysisSummary {
    Analyzer::default().analyze(snapshot, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trend::Trend;
    use crate::record::tests::sample_record;
    use crate::record::SubmissionRecord;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn record(id: i64, part: &str, asset: &str, mfc: &str) -> SubmissionRecord {
        sample_record(id, part, asset, mfc)
    }

    #[test]
    fn test_empty_snapshot_placeholders() {
        let summary = analyze(&Snapshot::default(), now());

        for list in [
            &summary.top_parts,
            &summary.top_assets,
            &summary.mfc_breakdown,
            &summary.top_reasons,
        ] {
            assert_eq!(list, &vec![RankedEntry::no_data()]);
        }
        assert_eq!(summary.trend, TrendResult::insufficient_data());
        assert_eq!(summary.total_records, 0);
    }

    #[test]
    fn test_top_lists_truncated_mfc_not() {
        let sites = ["S1", "S2", "S3", "S4", "S5", "S6", "S7"];
        let records: Vec<SubmissionRecord> = sites
            .iter()
            .zip(1..)
            .map(|(site, id)| record(id, &format!("P-{id}"), &format!("SN-{id}"), site))
            .collect();

        let summary = analyze(&Snapshot::new(records), now());
        assert_eq!(summary.top_parts.len(), 5);
        assert_eq!(summary.top_assets.len(), 5);
        assert_eq!(summary.mfc_breakdown.len(), 7);
        assert_eq!(summary.total_records, 7);
    }

    #[test]
    fn test_summary_rankings() {
        let records = vec![
            record(1, "P-1", "SN-A", "DFW1"),
            record(2, "P-2", "SN-B", "ORD2"),
            record(3, "P-2", "SN-B", "ORD2"),
            record(4, "P-3", "SN-A", "DFW1"),
            record(5, "P-2", "SN-C", "ATL3"),
        ];
        let summary = analyze(&Snapshot::new(records), now());

        assert_eq!(summary.top_parts[0].name, "P-2");
        assert_eq!(summary.top_parts[0].count, 3);
        // SN-A and SN-B tie at 2; SN-A appeared first.
        assert_eq!(summary.top_assets[0].name, "SN-A");
        assert_eq!(summary.top_assets[1].name, "SN-B");
        // DFW1 and ORD2 tie at 2; DFW1 appeared first.
        let sites: Vec<&str> = summary.mfc_breakdown.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(sites, vec!["DFW1", "ORD2", "ATL3"]);
        assert_eq!(summary.top_reasons[0].name, "Overheating");
        assert_eq!(summary.top_reasons[0].count, 5);
    }

    #[test]
    fn test_summary_trend_uses_snapshot() {
        // sample records are dated 2024-03-01, inside the window ending 03-15.
        let records = vec![record(1, "P-1", "SN-A", "DFW1")];
        let summary = analyze(&Snapshot::new(records), now());

        assert_eq!(summary.trend.trend, Trend::Increasing);
        assert_eq!(summary.trend.total_count, 1);
    }

    #[test]
    fn test_analyzer_from_config() {
        let config = AnalysisConfig {
            top_n: 2,
            ..AnalysisConfig::default()
        };
        let records = vec![
            record(1, "P-1", "SN-A", "DFW1"),
            record(2, "P-2", "SN-B", "DFW1"),
            record(3, "P-3", "SN-C", "DFW1"),
        ];
        let summary = Analyzer::from_config(&config).analyze(&Snapshot::new(records), now());
        assert_eq!(summary.top_parts.len(), 2);
        assert_eq!(summary.top_assets.len(), 2);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = analyze(&Snapshot::default(), now());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"topParts\""));
        assert!(json.contains("\"mfcBreakdown\""));
        assert!(json.contains("\"Insufficient data\""));
    }
}

//! Recent-vs-historical failure trend.
//!
//! A record is recent when its removal date, read as UTC midnight, falls on
//! or after `now - window`. The rate is reported as increasing when the
//! recent share of all records is strictly above the threshold.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::record::SubmissionRecord;

/// Default recency window.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Default share of recent records above which the rate is increasing.
pub const DEFAULT_INCREASING_THRESHOLD: f64 = 0.6;

/// Qualitative failure trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    /// Most records fall inside the recency window.
    #[serde(rename = "Increasing failure rate")]
    Increasing,
    /// Recent activity is in line with history.
    #[serde(rename = "Stable failure rate")]
    Stable,
    /// There are no records to judge by.
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl Trend {
    /// Display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Increasing => "Increasing failure rate",
            Self::Stable => "Stable failure rate",
            Self::InsufficientData => "Insufficient data",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    /// The classification.
    pub trend: Trend,
    /// Records inside the recency window.
    pub recent_count: usize,
    /// All records considered.
    pub total_count: usize,
}

impl TrendResult {
    /// The result for an empty record set.
    #[must_use]
    pub fn insufficient_data() -> Self {
        Self {
            trend: Trend::InsufficientData,
            recent_count: 0,
            total_count: 0,
        }
    }
}

/// Fixed-threshold trend classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendClassifier {
    window: Duration,
    threshold: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(
            Duration::days(DEFAULT_WINDOW_DAYS),
            DEFAULT_INCREASING_THRESHOLD,
        )
    }
}

impl TrendClassifier {
    /// Create a classifier with the given window and threshold.
    #[must_use]
    pub fn new(window: Duration, threshold: f64) -> Self {
        Self { window, threshold }
    }

    /// Create a classifier from the analysis configuration.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.recent_window(), config.increasing_threshold)
    }

    /// Start of the recency window for an evaluation at `now`.
    ///
    /// `None` when the window reaches past the earliest representable
    /// instant, in which case every dated record is recent.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(self.window)
    }

    /// Whether `record` falls inside the window ending at `now`.
    ///
    /// Records without a parseable date are never recent.
    #[must_use]
    pub fn is_recent(&self, record: &SubmissionRecord, now: DateTime<Utc>) -> bool {
        let cutoff = self.cutoff(now);
        record
            .effective_date()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .is_some_and(|midnight| {
                cutoff.map_or(true, |cutoff| Utc.from_utc_datetime(&midnight) >= cutoff)
            })
    }

    /// Classify the trend over `records` as of `now`.
    #[allow(clippy::cast_precision_loss)]
    pub fn classify<'a, I>(&self, records: I, now: DateTime<Utc>) -> TrendResult
    where
        I: IntoIterator<Item = &'a SubmissionRecord>,
    {
        let mut total_count = 0;
        let mut recent_count = 0;
        for record in records {
            total_count += 1;
            if self.is_recent(record, now) {
                recent_count += 1;
            }
        }

        if total_count == 0 {
            return TrendResult::insufficient_data();
        }

        let trend = if recent_count as f64 > total_count as f64 * self.threshold {
            Trend::Increasing
        } else {
            Trend::Stable
        };

        TrendResult {
            trend,
            recent_count,
            total_count,
        }
    }
}

/// Classify with the default 30-day window and 0.6 threshold.
pub fn classify_trend<'a, I>(records: I, now: DateTime<Utc>) -> TrendResult
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    TrendClassifier::default().classify(records, now)
}

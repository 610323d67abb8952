//! Display rows for the analysis panel.
//!
//! Pure transformation of an [`AnalysisSummary`] into rows a renderer can
//! draw without knowing anything about ranking or sentinels. Only the row at
//! index 0 of a list is emphasized, even when later rows tie with it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{AnalysisSummary, RankedEntry, Trend, TrendResult};

/// Text shown in place of an empty list.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// What a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// A ranked `{name, count}` entry.
    Entry,
    /// Placeholder for a list without data.
    NoData,
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Row label.
    pub name: String,
    /// Count shown next to the label.
    pub count: usize,
    /// Whether the row is highlighted.
    pub emphasized: bool,
    /// What the row represents.
    pub kind: RowKind,
}

impl DisplayRow {
    fn no_data() -> Self {
        Self {
            name: NO_DATA_MESSAGE.to_string(),
            count: 0,
            emphasized: false,
            kind: RowKind::NoData,
        }
    }
}

/// Format a ranked list.
///
/// An empty list, or one holding only the no-data entry, becomes a single
/// [`RowKind::NoData`] row.
#[must_use]
pub fn format_ranked(entries: &[RankedEntry]) -> Vec<DisplayRow> {
    match entries.first() {
        None => return vec![DisplayRow::no_data()],
        Some(first) if first.is_no_data() => return vec![DisplayRow::no_data()],
        Some(_) => {}
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| DisplayRow {
            name: entry.name.clone(),
            count: entry.count,
            emphasized: i == 0,
            kind: RowKind::Entry,
        })
        .collect()
}

/// How the trend should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    /// Failure rate is increasing.
    Alert,
    /// Failure rate is stable.
    Normal,
    /// Not enough data to tell.
    NoData,
}

/// Display form of a [`TrendResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    /// Trend label.
    pub label: String,
    /// Records inside the recency window.
    pub recent_count: usize,
    /// All records.
    pub total_count: usize,
    /// Presentation status.
    pub status: TrendStatus,
}

/// Format a trend result.
#[must_use]
pub fn format_trend(result: &TrendResult) -> TrendRow {
    let status = match result.trend {
        Trend::Increasing => TrendStatus::Alert,
        Trend::Stable => TrendStatus::Normal,
        Trend::InsufficientData => TrendStatus::NoData,
    };
    TrendRow {
        label: result.trend.label().to_string(),
        recent_count: result.recent_count,
        total_count: result.total_count,
        status,
    }
}

/// A titled list of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Section heading.
    pub title: &'static str,
    /// Rows in display order.
    pub rows: Vec<DisplayRow>,
}

/// The formatted analysis panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Most frequently removed parts.
    pub top_parts: Section,
    /// Assets with the most removals.
    pub top_assets: Section,
    /// All MFC sites.
    pub mfc_breakdown: Section,
    /// Failure trend.
    pub trend: TrendRow,
    /// Number of records analysed.
    pub total_records: usize,
    /// When the underlying analysis ran.
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Format an analysis summary.
    #[must_use]
    pub fn from_summary(summary: &AnalysisSummary) -> Self {
        Self {
            top_parts: Section {
                title: "Top Failed Parts",
                rows: format_ranked(&summary.top_parts),
            },
            top_assets: Section {
                title: "Top Problem Assets",
                rows: format_ranked(&summary.top_assets),
            },
            mfc_breakdown: Section {
                title: "MFC Breakdown",
                rows: format_ranked(&summary.mfc_breakdown),
            },
            trend: format_trend(&summary.trend),
            total_records: summary.total_records,
            generated_at: summary.generated_at,
        }
    }

    /// The list sections in display order.
    #[must_use]
    pub fn sections(&self) -> [&Section; 3] {
        [&self.top_parts, &self.top_assets, &self.mfc_breakdown]
    }
}

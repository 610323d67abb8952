//! Red-tag analytics.
//!
//! Despite the "AI analysis" label on the form, everything here is exact
//! frequency counting and a fixed-threshold trend heuristic:
//!
//! - **Aggregation**: frequency tables per record field and ranked top-N
//!   lists with a deterministic tie-break.
//!
//! - **Trend**: share of records inside a trailing window, compared against
//!   a fixed threshold.
//!
//! - **Summary**: both of the above for the tracked dimensions (part number,
//!   asset, MFC site, reason), computed from one snapshot.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use redtag::analysis::{analyze, Trend};
//! use redtag::store::Snapshot;
//!
//! let summary = analyze(&Snapshot::default(), Utc::now());
//! assert_eq!(summary.trend.trend, Trend::InsufficientData);
//! assert_eq!(summary.top_parts[0].name, "No data yet");
//! ```

mod aggregate;
mod summary;
mod trend;

pub use aggregate::{
    compute_frequencies, field_frequencies, top_n, FrequencyEntry, FrequencyTable, RankedEntry,
    NO_DATA_NAME,
};
pub use summary::{analyze, AnalysisSummary, Analyzer, DEFAULT_TOP_N};
pub use trend::{
    classify_trend, Trend, TrendClassifier, TrendResult, DEFAULT_INCREASING_THRESHOLD,
    DEFAULT_WINDOW_DAYS,
};

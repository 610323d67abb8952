//! `redtag` - An equipment removal ("red tag") log with rolling analytics
//!
//! This library provides the record store, the frequency and trend analysis
//! behind the analysis panel, the display-row formatter, and the flat-file
//! export.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod intake;
pub mod logging;
pub mod record;
pub mod report;
pub mod storage;
pub mod store;

pub use analysis::{AnalysisSummary, Analyzer, RankedEntry, Trend, TrendResult};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export_csv, CsvExport};
pub use logging::init_logging;
pub use record::{Submission, SubmissionRecord};
pub use report::Report;
pub use storage::{Storage, StorageStats};
pub use store::{MemoryStore, RecordStore, Snapshot};

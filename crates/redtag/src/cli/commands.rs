//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::record::{Submission, DATE_FORMAT};

/// Submit command arguments: one red tag.
#[derive(Debug, Args)]
pub struct SubmitCommand {
    /// Site (MFC) code
    #[arg(long)]
    pub mfc: String,

    /// Removal date (YYYY-MM-DD); defaults to today
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Person tagging the equipment
    #[arg(short, long)]
    pub tagged_by: String,

    /// Item type
    #[arg(short, long)]
    pub item_type: String,

    /// Part number
    #[arg(short, long)]
    pub part_number: String,

    /// Asset / serial number the part was removed from
    #[arg(short, long)]
    pub removed_from: String,

    /// Service call identifier
    #[arg(short, long)]
    pub service_call_id: Option<String>,

    /// Reason for removal
    #[arg(long)]
    pub reason: String,

    /// Free-text comments
    #[arg(long)]
    pub comments: Option<String>,

    /// Attach a file by name (repeatable)
    #[arg(short, long = "attach", value_name = "FILE")]
    pub attachments: Vec<PathBuf>,
}

impl SubmitCommand {
    /// Build the submission, using `today` when no date was given.
    ///
    /// Attachments are recorded by file name only.
    #[must_use]
    pub fn to_submission(&self, today: NaiveDate) -> Submission {
        let date = self.date.unwrap_or(today);
        Submission {
            mfc: self.mfc.trim().to_string(),
            removal_date: Some(date.format(DATE_FORMAT).to_string()),
            date: None,
            tagged_by: self.tagged_by.trim().to_string(),
            item_type: self.item_type.trim().to_string(),
            part_number: self.part_number.trim().to_string(),
            removed_from: self.removed_from.trim().to_string(),
            service_call_id: self
                .service_call_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            reason_remove: self.reason.trim().to_string(),
            comments: self
                .comments
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            attached_files: self
                .attachments
                .iter()
                .map(|p| {
                    p.file_name()
                        .unwrap_or(p.as_os_str())
                        .to_string_lossy()
                        .into_owned()
                })
                .collect(),
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Maximum number of records, newest first
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Only records from this site
    #[arg(short, long)]
    pub mfc: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Evaluate as of this date (YYYY-MM-DD, end of day UTC) instead of now
    #[arg(long, value_parser = parse_date)]
    pub as_of: Option<NaiveDate>,

    /// Output the raw analysis as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this file instead of the configured export directory
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the document to standard output
    #[arg(long)]
    pub stdout: bool,

    /// Generation date used in the file name (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file holding an array of records
    pub file: PathBuf,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Parse a `YYYY-MM-DD` argument.
fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

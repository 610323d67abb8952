//! Command-line interface for redtag.
//!
//! This module provides the CLI structure and command handlers for the
//! `redtag` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ExportCommand, ImportCommand, ListCommand, OutputFormat, ReportCommand,
    StatusCommand, SubmitCommand,
};

/// redtag - Equipment removal log
///
/// Records parts pulled from service and reports which parts, assets, and
/// sites fail most often, whether removals are trending up, and exports
/// the whole log as CSV.
#[derive(Debug, Parser)]
#[command(name = "redtag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a removed part
    Submit(SubmitCommand),

    /// List recorded removals
    List(ListCommand),

    /// Show the analysis panel
    Report(ReportCommand),

    /// Export all records as CSV
    Export(ExportCommand),

    /// Import records from a JSON file
    Import(ImportCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "redtag");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let args = vec![
            "redtag",
            "submit",
            "--mfc",
            "DFW1",
            "--date",
            "2024-03-01",
            "--tagged-by",
            "Sam",
            "--item-type",
            "Roller",
            "--part-number",
            "R-100",
            "--removed-from",
            "CONV-7",
            "--reason",
            "Worn",
            "--attach",
            "a.jpg",
            "--attach",
            "b.jpg",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Submit(cmd) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(cmd.mfc, "DFW1");
        assert_eq!(cmd.date, chrono::NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(cmd.attachments.len(), 2);
        assert!(cmd.comments.is_none());
    }

    #[test]
    fn test_parse_submit_requires_fields() {
        let args = vec!["redtag", "submit", "--mfc", "DFW1"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_submit_rejects_bad_date() {
        let args = vec![
            "redtag",
            "submit",
            "--mfc",
            "DFW1",
            "--date",
            "03/01/2024",
            "--tagged-by",
            "Sam",
            "--item-type",
            "Roller",
            "--part-number",
            "R-100",
            "--removed-from",
            "CONV-7",
            "--reason",
            "Worn",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(vec!["redtag", "list"]).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.limit, 20);
        assert!(cmd.mfc.is_none());
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_report_as_of() {
        let args = vec!["redtag", "report", "--as-of", "2024-06-30", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Report(cmd) = cli.command else {
            panic!("expected report");
        };
        assert!(cmd.json);
        assert_eq!(cmd.as_of, chrono::NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_parse_export_conflicts() {
        let args = vec!["redtag", "export", "--stdout", "-o", "out.csv"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(vec!["redtag", "import", "tags.json"]).unwrap();
        let Command::Import(cmd) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(cmd.file, PathBuf::from("tags.json"));
    }

    #[test]
    fn test_parse_config_validate() {
        let args = vec!["redtag", "config", "validate", "-f", "/tmp/c.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["redtag", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(vec!["redtag", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(vec!["redtag", "status", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}

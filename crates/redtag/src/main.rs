//! `redtag` - CLI for the equipment removal log
//!
//! This binary records removed parts, prints the analysis panel, and exports
//! or imports the log.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing::{debug, info};

use redtag::analysis::Analyzer;
use redtag::cli::{
    Cli, Command, ConfigCommand, ExportCommand, ImportCommand, ListCommand, OutputFormat,
    ReportCommand, StatusCommand, SubmitCommand,
};
use redtag::import::{import_records, parse_records};
use redtag::intake::IntakeRules;
use redtag::report::{RowKind, TrendStatus};
use redtag::{
    export_csv, init_logging, Config, Error, RecordStore, Report, Storage, SubmissionRecord,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // `config validate` must be able to report a broken file
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        let path = file
            .clone()
            .or_else(|| cli.config.clone())
            .unwrap_or_else(Config::default_config_path);
        return handle_validate(path);
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Submit(cmd) => handle_submit(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Export(cmd) => handle_export(&config, &cmd),
        Command::Import(cmd) => handle_import(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_storage(config: &Config) -> Result<Storage> {
    let storage = Storage::open(config.database_path())
        .context("failed to open the red tag database")?
        .deduplicate(config.storage.deduplicate);
    Ok(storage)
}

fn handle_submit(config: &Config, cmd: &SubmitCommand) -> Result<()> {
    let rules = IntakeRules::from_config(&config.intake)?;
    let submission = cmd.to_submission(Utc::now().date_naive());
    rules.validate(&submission)?;

    let fingerprint = submission.fingerprint();
    let mut storage = open_storage(config)?;
    let Some(record) = storage.append(submission)? else {
        return Err(Error::DuplicateSubmission { fingerprint }.into());
    };

    info!("Recorded red tag {} for part {}", record.id, record.part_number);
    println!(
        "Recorded red tag #{}: {} removed from {} at {}",
        record.id, record.part_number, record.removed_from, record.mfc
    );
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let records = match &cmd.mfc {
        Some(mfc) => storage.by_mfc(mfc, cmd.limit)?,
        None => storage.recent(cmd.limit)?,
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!("{}", list_line(record));
            }
        }
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No red tags recorded.");
                return Ok(());
            }
            println!(
                "{:>6}  {:<8}  {:<10}  {:<16}  {:<16}  {}",
                "ID", "MFC", "Date", "Part", "Asset", "Reason"
            );
            for record in &records {
                println!(
                    "{:>6}  {:<8}  {:<10}  {:<16}  {:<16}  {}",
                    record.id,
                    record.mfc,
                    record.effective_date_str().unwrap_or("-"),
                    record.part_number,
                    record.removed_from,
                    record.reason_remove
                );
            }
        }
    }
    Ok(())
}

fn list_line(record: &SubmissionRecord) -> String {
    format!(
        "{} {} {} {} {} {}",
        record.id,
        record.mfc,
        record.effective_date_str().unwrap_or("-"),
        record.part_number,
        record.removed_from,
        record.reason_remove
    )
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> Result<()> {
    let now = match cmd.as_of {
        Some(date) => date
            .and_hms_opt(23, 59, 59)
            .context("invalid --as-of date")?
            .and_utc(),
        None => Utc::now(),
    };

    let storage = open_storage(config)?;
    let snapshot = storage.snapshot()?;
    let summary = Analyzer::from_config(&config.analysis).analyze(&snapshot, now);
    debug!("Analysed {} records", summary.total_records);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let report = Report::from_summary(&summary);
    println!("Red Tag Analysis ({} records)", report.total_records);
    println!("========================");
    for section in report.sections() {
        println!();
        println!("[{}]", section.title);
        for row in &section.rows {
            match row.kind {
                RowKind::NoData => println!("  {}", row.name),
                RowKind::Entry => {
                    let marker = if row.emphasized { '*' } else { ' ' };
                    println!("{marker} {:<24} {:>5}", row.name, row.count);
                }
            }
        }
    }

    println!();
    println!("[Failure Trend]");
    let trend = &report.trend;
    match trend.status {
        TrendStatus::NoData => println!("  {}", trend.label),
        TrendStatus::Alert | TrendStatus::Normal => {
            let marker = if trend.status == TrendStatus::Alert { '!' } else { ' ' };
            println!(
                "{marker} {} ({} of {} records in the last {} days)",
                trend.label, trend.recent_count, trend.total_count, config.analysis.recent_window_days
            );
        }
    }
    Ok(())
}

fn handle_export(config: &Config, cmd: &ExportCommand) -> Result<()> {
    let date: NaiveDate = cmd.date.unwrap_or_else(|| Utc::now().date_naive());
    let storage = open_storage(config)?;
    let snapshot = storage.snapshot()?;
    let export = export_csv(&snapshot, date);

    if cmd.stdout {
        export.write_to(&mut std::io::stdout().lock())?;
        return Ok(());
    }

    let path = match &cmd.output {
        Some(path) => path.clone(),
        None => {
            let dir = config.export_dir();
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
            dir.join(&export.filename)
        }
    };
    std::fs::write(&path, export.as_bytes()).map_err(|source| Error::ExportWrite {
        path: path.clone(),
        source,
    })?;

    info!("Exported {} records to {}", snapshot.len(), path.display());
    println!("Exported {} records to {}", snapshot.len(), path.display());
    Ok(())
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> Result<()> {
    let text = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let records = parse_records(&text)?;

    let mut storage = open_storage(config)?;
    let summary = import_records(&mut storage, records, Utc::now())?;
    println!(
        "Imported {} records ({} duplicates skipped)",
        summary.imported, summary.duplicates
    );
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "total_records": stats.total_records,
            "site_count": stats.site_count,
            "oldest_record": stats.oldest_record,
            "newest_record": stats.newest_record,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("redtag status");
        println!("-------------");
        println!("Database:      {}", storage.path().display());
        println!("Records:       {}", stats.total_records);
        println!("Sites:         {}", stats.site_count);
        if let Some(oldest) = stats.oldest_record {
            println!("Oldest:        {}", oldest.to_rfc3339());
        }
        if let Some(newest) = stats.newest_record {
            println!("Newest:        {}", newest.to_rfc3339());
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Deduplicate:        {}", config.storage.deduplicate);
                println!();
                println!("[Analysis]");
                println!("  Top N:              {}", config.analysis.top_n);
                println!(
                    "  Recent window:      {} days",
                    config.analysis.recent_window_days
                );
                println!(
                    "  Increasing above:   {}",
                    config.analysis.increasing_threshold
                );
                println!();
                println!("[Export]");
                println!("  Output directory:   {}", config.export_dir().display());
                println!();
                println!("[Intake]");
                println!("  MFC pattern:        {}", config.intake.mfc_pattern);
                println!("  Max attachments:    {}", config.intake.max_attachments);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            return handle_validate(path);
        }
    }
    Ok(())
}

fn handle_validate(path: PathBuf) -> Result<()> {
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
    Ok(())
}

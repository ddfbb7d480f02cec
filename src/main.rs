//! payroll-import - load extracted payroll documents into the reporting database.
//!
//! Reads the JSON files written by the PDF extraction step, extracts employee
//! and KPI records and reconciles them into SQLite.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use payroll_import::config::{ConfigLoader, PolicyConfig};
use payroll_import::import::{ImportOptions, run_import};
use payroll_import::models::ImportSummary;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "payroll-import", version, about)]
struct Cli {
    /// Directory holding the extractor's JSON files.
    #[arg(long, env = "PAYROLL_SOURCE", default_value = "pdf_extraidos")]
    source: PathBuf,

    /// SQLite database to reconcile into.
    #[arg(long, env = "PAYROLL_DATABASE", default_value = "data/base.db")]
    database: PathBuf,

    /// Policy directory with policy.yaml and calendar.yaml. Built-in defaults when omitted.
    #[arg(long, env = "PAYROLL_CONFIG")]
    config: Option<PathBuf>,

    /// Keep existing attendance and KPI rows instead of wiping them first.
    #[arg(long)]
    no_wipe: bool,

    /// Extract and report without writing to the database.
    #[arg(long)]
    dry_run: bool,

    /// Also merge extracted employees into the roster table.
    #[arg(long)]
    sync_roster: bool,

    /// Log every pipeline decision.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "payroll_import=debug"
    } else {
        "payroll_import=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &cli.config {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("loading policy from {}", dir.display()))?
            .into_config(),
        None => PolicyConfig::default(),
    };

    let options = ImportOptions {
        source_dir: cli.source,
        database: cli.database,
        wipe: !cli.no_wipe,
        dry_run: cli.dry_run,
        sync_roster: cli.sync_roster,
    };
    let summary = run_import(&options, config).context("import failed")?;
    print_summary(&summary);

    if !summary.is_clean() {
        anyhow::bail!("{} document(s) failed", summary.failures.len());
    }
    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    println!("Run {}{}", summary.run_id, if summary.dry_run { " (dry run)" } else { "" });
    println!(
        "  documents: {} found, {} processed",
        summary.documents_found, summary.documents_processed
    );
    println!(
        "  records:   {} employees, {} KPIs",
        summary.employee_records, summary.kpi_records
    );
    if !summary.dry_run {
        println!(
            "  store:     {} inserted, {} updated",
            summary.reconciled.inserted, summary.reconciled.updated
        );
    }
    if let Some(roster) = summary.roster {
        println!(
            "  roster:    {} added, {} updated, {} unchanged",
            roster.added, roster.updated, roster.unchanged
        );
    }
    for name in &summary.empty_documents {
        println!("  no records, review manually: {name}");
    }
    for failure in &summary.failures {
        println!("  failed: {} ({})", failure.document, failure.reason);
    }
}

//! Import and export command implementations

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::export::{backup_json, export_transactions_csv};
use tally_core::{Config, Database, ImportReport, Importer};

use super::{build_filter, now, today};
use crate::cli::FilterArgs;

/// Open `output` for writing, or stdout when not given
fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn cmd_export_csv(db: &Database, filter: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let filter = build_filter(filter, None)?;
    let count = export_transactions_csv(db, &filter, open_output(output)?)?;

    if let Some(path) = output {
        println!("✅ Exported {} transactions to {}", count, path.display());
    }
    Ok(())
}

pub fn cmd_export_json(db: &Database, output: Option<&Path>) -> Result<()> {
    let count = backup_json(db, open_output(output)?)?;

    if let Some(path) = output {
        println!("✅ Backed up {} transactions to {}", count, path.display());
    }
    Ok(())
}

pub fn cmd_import_csv(db: &Database, config: &Config, file: &Path) -> Result<ImportReport> {
    println!("📥 Importing {}...", file.display());

    let classifier = config.classifier();
    let report = Importer::new(db, &classifier, today(), now())
        .import_csv(open_input(file)?)
        .context("Import failed")?;

    print_report(&report);
    Ok(report)
}

pub fn cmd_import_json(db: &Database, config: &Config, file: &Path) -> Result<ImportReport> {
    println!("📥 Restoring {}...", file.display());

    let classifier = config.classifier();
    let report = Importer::new(db, &classifier, today(), now())
        .restore_json(open_input(file)?)
        .context("Restore failed")?;

    print_report(&report);
    Ok(report)
}

fn print_report(report: &ImportReport) {
    println!("   Inserted: {}", report.inserted());

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        println!("   Skipped:  {}", failures.len());
        for outcome in failures {
            if let Err(e) = &outcome.result {
                println!("     row {}: {}", outcome.row, e);
            }
        }
    }
    println!("✅ Import complete!");
}

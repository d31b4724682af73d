//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Config, Database};
use tracing::debug;

/// Open the database, running migrations and seeding default settings
pub fn open_db(db_path: &Path, config: &Config) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!("Opening database at {}", path_str);
    let db = Database::new(path_str).context("Failed to open database")?;
    db.seed_settings(config.default_budget)
        .context("Failed to seed settings")?;
    Ok(db)
}

pub fn cmd_init(db_path: &Path, config: &Config) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, config)?;

    match db.monthly_budget()? {
        Some(budget) => println!("   Monthly budget: {:.2}", budget),
        None => println!("   Monthly budget: not set"),
    }
    println!("   {} category rules loaded", config.category_rules.len());

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a transaction: tally add \"Lunch\" 12.50");
    println!("  2. Add a recurring entry: tally recurring add \"Rent\" 600 --start 2024-01-15");
    println!("  3. See this month: tally summary");

    Ok(())
}

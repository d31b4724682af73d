//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_core::db::DEFAULT_LIST_LIMIT;

/// Tally - Personal income and expense ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Personal ledger with recurring entries and monthly summaries", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", env = "TALLY_DB", global = true)]
    pub db: PathBuf,

    /// Config file (defaults to ~/.config/tally/config.toml, then built-in defaults)
    #[arg(long, env = "TALLY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed the monthly budget
    Init,

    /// Add a transaction
    Add {
        /// What the money was for
        title: String,

        /// Amount (positive; use --kind income for money coming in)
        amount: String,

        /// expense or income
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Category (auto-detected from the title if not specified)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Manage transactions (list, edit, delete)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// List categories in use
    Categories,

    /// Manage recurring templates (list, add, deactivate, run)
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Show the monthly summary (totals, budget, categories, trend)
    Summary {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or set the monthly budget
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Export transactions (CSV) or a full JSON backup
    Export {
        #[command(subcommand)]
        action: ExportAction,
    },

    /// Import transactions from CSV or restore a JSON backup
    Import {
        #[command(subcommand)]
        action: ImportAction,
    },
}

/// Filters shared by `transactions list` and `export csv`
#[derive(clap::Args, Clone, Default)]
pub struct FilterArgs {
    /// Search title and notes
    #[arg(short, long)]
    pub q: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Exact category
    #[arg(long)]
    pub category: Option<String>,

    /// expense or income
    #[arg(long)]
    pub kind: Option<String>,
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number to show
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: i64,
    },

    /// Edit fields of a transaction
    Edit {
        /// Transaction ID
        id: i64,

        /// New title (re-categorizes unless --category is given)
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring templates
    List {
        /// Include deactivated templates
        #[arg(long)]
        all: bool,
    },

    /// Add a recurring template
    Add {
        title: String,

        amount: String,

        /// weekly or monthly
        #[arg(long, default_value = "monthly")]
        cadence: String,

        /// expense or income
        #[arg(short, long, default_value = "expense")]
        kind: String,

        /// Category (auto-detected from the title if not specified)
        #[arg(short, long)]
        category: Option<String>,

        /// First due date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,
    },

    /// Stop a template from producing transactions
    Deactivate {
        /// Template ID
        id: i64,
    },

    /// Materialize every due occurrence up to a date
    Run {
        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Set the monthly budget
    Set {
        /// Budget amount (0 disables utilization)
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum ExportAction {
    /// Export transactions as CSV
    Csv {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write a full JSON backup
    Json {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ImportAction {
    /// Import a CSV file (columns: kind,title,amount,category,date,notes)
    Csv {
        /// CSV file to import
        file: PathBuf,
    },

    /// Restore a JSON backup
    Json {
        /// Backup file to restore
        file: PathBuf,
    },
}

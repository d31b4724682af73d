//! Tally Core Library
//!
//! Shared functionality for the Tally personal ledger:
//! - Database access and migrations (`LedgerStore` implementation)
//! - Recurrence engine for recurring income and expenses
//! - Monthly analytics aggregator
//! - Keyword auto-categorization
//! - CSV/JSON import and export
//! - TOML configuration

pub mod analytics;
pub mod categorize;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod recurrence;
pub mod store;

pub use analytics::{get_summary, summarize};
pub use categorize::{classify, CategoryRule, Classifier};
pub use config::Config;
pub use db::{Database, TransactionFilter};
pub use error::{Error, Result};
pub use import::{ImportOutcome, ImportReport, Importer};
pub use recurrence::{run_recurrence, RecurrenceReport};
pub use store::LedgerStore;

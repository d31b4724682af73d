//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `import` - Import/export commands (CSV import/export, JSON backup/restore)
//! - `recurring` - Recurring template commands (list, add, deactivate, run)
//! - `reports` - Monthly summary
//! - `settings` - Budget commands
//! - `transactions` - Transaction commands (add, list, edit, delete, categories)

pub mod core;
pub mod import;
pub mod recurring;
pub mod reports;
pub mod settings;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use recurring::*;
pub use reports::*;
pub use settings::*;
pub use transactions::*;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tally_core::models::TransactionKind;
use tally_core::TransactionFilter;

use crate::cli::FilterArgs;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Today's date in the local timezone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Creation timestamp for new records
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an optional YYYY-MM-DD argument
pub fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(tally_core::dates::parse_date)
        .transpose()
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
}

/// Build a store filter from CLI filter flags
pub fn build_filter<'a>(args: &'a FilterArgs, limit: Option<i64>) -> Result<TransactionFilter<'a>> {
    let kind = args
        .kind
        .as_deref()
        .map(str::parse::<TransactionKind>)
        .transpose()?;

    Ok(TransactionFilter::new()
        .search(args.q.as_deref())
        .from(parse_date_arg(args.from.as_deref(), "--from")?)
        .to(parse_date_arg(args.to.as_deref(), "--to")?)
        .category(args.category.as_deref())
        .kind(kind)
        .limit(limit))
}

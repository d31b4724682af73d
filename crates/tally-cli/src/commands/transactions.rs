//! Transaction command implementations

use anyhow::{Context, Result};
use tally_core::models::{TransactionInput, TransactionKind};
use tally_core::{Config, Database};

use super::{build_filter, now, today, truncate};
use crate::cli::FilterArgs;

/// Fields of `tally add`
pub struct AddArgs {
    pub title: String,
    pub amount: String,
    pub kind: String,
    pub category: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

/// Fields of `tally transactions edit`; `None` keeps the stored value, except
/// that a new title without a category is re-categorized
#[derive(Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

pub fn cmd_add(db: &Database, config: &Config, args: AddArgs) -> Result<i64> {
    let input = TransactionInput {
        kind: Some(args.kind),
        title: Some(args.title),
        amount: Some(args.amount),
        category: args.category,
        date: args.date,
        notes: args.notes,
    };
    let tx = input
        .into_new_transaction(&config.classifier(), today(), now())
        .context("Invalid transaction")?;
    let id = db.insert_transaction(&tx)?;

    println!(
        "✅ Added {} [{}] {} {:.2} on {} ({})",
        tx.kind,
        id,
        tx.title,
        tx.amount,
        tx.date,
        tx.category.as_deref().unwrap_or("Other")
    );
    Ok(id)
}

pub fn cmd_transactions_list(db: &Database, filter: &FilterArgs, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(&build_filter(filter, Some(limit))?)?;

    if transactions.is_empty() {
        println!("No transactions found. Add one with:");
        println!("  tally add \"Lunch\" 12.50");
        return Ok(());
    }

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.kind {
            TransactionKind::Expense => format!("\x1b[31m-{:.2}\x1b[0m", tx.amount), // Red for expenses
            TransactionKind::Income => format!("\x1b[32m+{:.2}\x1b[0m", tx.amount), // Green for income
        };

        println!(
            "   [{}] {} │ {:>10} │ {:<14} │ {}",
            tx.id,
            tx.date,
            amount_str,
            truncate(tx.category.as_deref().unwrap_or("Other"), 14),
            truncate(&tx.title, 35)
        );
    }

    Ok(())
}

/// Apply the given fields over a stored transaction and save it
pub fn cmd_transactions_edit(
    db: &Database,
    config: &Config,
    id: i64,
    args: EditArgs,
) -> Result<()> {
    let existing = db
        .get_transaction(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction {} not found", id))?;

    // A new title without an explicit category is classified again
    let category = match (args.category, &args.title) {
        (Some(category), _) => Some(category),
        (None, Some(_)) => None,
        (None, None) => existing.category,
    };

    let input = TransactionInput {
        kind: Some(args.kind.unwrap_or_else(|| existing.kind.to_string())),
        title: Some(args.title.unwrap_or(existing.title)),
        amount: Some(args.amount.unwrap_or_else(|| existing.amount.to_string())),
        category,
        date: Some(args.date.unwrap_or_else(|| existing.date.to_string())),
        notes: Some(args.notes.unwrap_or(existing.notes)),
    };
    let tx = input
        .into_new_transaction(&config.classifier(), existing.date, existing.created_at)
        .context("Invalid transaction")?;

    db.update_transaction(id, &tx)?;
    println!("✅ Updated transaction {}", id);
    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_transaction(id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;
    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}

pub fn cmd_categories(db: &Database) -> Result<()> {
    let categories = db.list_categories()?;

    if categories.is_empty() {
        println!("No categories yet.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    for category in categories {
        println!("   {}", category);
    }

    Ok(())
}

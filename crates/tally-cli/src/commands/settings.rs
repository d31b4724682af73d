//! Budget command implementations

use anyhow::{Context, Result};
use tally_core::Database;

pub fn cmd_budget_show(db: &Database) -> Result<()> {
    match db.monthly_budget()? {
        Some(budget) if budget > 0.0 => println!("💰 Monthly budget: {:.2}", budget),
        _ => println!("💰 No monthly budget set. Set one with: tally budget set 10000"),
    }
    Ok(())
}

pub fn cmd_budget_set(db: &Database, amount: f64) -> Result<()> {
    db.set_monthly_budget(amount)
        .context("Failed to set budget")?;
    println!("✅ Monthly budget set to {:.2}", amount);
    Ok(())
}

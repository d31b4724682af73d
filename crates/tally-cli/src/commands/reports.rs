//! Report command implementations

use anyhow::{Context, Result};
use chrono::Datelike;
use serde_json::json;
use tally_core::models::Summary;
use tally_core::{get_summary, Database};

use super::{today, truncate};

/// Share of the budget spent, as a percentage; `None` when no budget is set
pub fn budget_utilization(summary: &Summary) -> Option<f64> {
    if summary.budget > 0.0 {
        Some(summary.totals.expense / summary.budget * 100.0)
    } else {
        None
    }
}

/// Resolve `--year`/`--month`, defaulting to the current month
pub fn resolve_month(year: Option<i32>, month: Option<u32>) -> Result<(i32, u32)> {
    let now = today();
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| now.month());
    if !(1..=12).contains(&month) {
        anyhow::bail!("Invalid --month {} (use 1-12)", month);
    }
    Ok((year, month))
}

pub fn cmd_summary(db: &Database, year: Option<i32>, month: Option<u32>, json: bool) -> Result<()> {
    let (year, month) = resolve_month(year, month)?;
    let summary = get_summary(db, year, month).context("Failed to build summary")?;
    let utilization = budget_utilization(&summary);

    if json {
        let mut value = serde_json::to_value(&summary)?;
        value["budget_utilization"] = json!(utilization);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let net = summary.totals.income - summary.totals.expense;

    println!();
    println!("📊 Summary for {}", summary.month);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:   \x1b[32m{:>12.2}\x1b[0m", summary.totals.income);
    println!("   Expenses: \x1b[31m{:>12.2}\x1b[0m", summary.totals.expense);
    println!("   Net:      {:>12.2}", net);

    match utilization {
        Some(pct) => {
            let icon = if pct > 100.0 { "⚠️ " } else { "✅" };
            println!(
                "   Budget:   {:>12.2}  {} {:.1}% used",
                summary.budget, icon, pct
            );
        }
        None => println!("   Budget:   not set (tally budget set AMOUNT)"),
    }

    if !summary.categories.is_empty() {
        println!();
        println!("   By category:");
        for c in &summary.categories {
            let share = if summary.totals.expense > 0.0 {
                c.amount / summary.totals.expense * 100.0
            } else {
                0.0
            };
            println!(
                "   {:<18} {:>10.2}  {:>5.1}%",
                truncate(&c.category, 18),
                c.amount,
                share
            );
        }
    }

    println!();
    println!("   Expense trend:");
    let peak = summary
        .trend
        .iter()
        .map(|p| p.amount)
        .fold(0.0_f64, f64::max);
    for point in &summary.trend {
        let width = if peak > 0.0 {
            (point.amount / peak * 30.0).round() as usize
        } else {
            0
        };
        println!(
            "   {}-{:02} {:>10.2} {}",
            point.year,
            point.month,
            point.amount,
            "█".repeat(width)
        );
    }

    Ok(())
}

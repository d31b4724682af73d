//! Recurring template command implementations

use anyhow::{Context, Result};
use tally_core::models::{parse_amount, Cadence, NewRecurringTemplate, TransactionKind};
use tally_core::recurrence::RecurrenceReport;
use tally_core::{run_recurrence, Config, Database};

use super::{now, parse_date_arg, today, truncate};

/// Fields of `tally recurring add`
pub struct RecurringAddArgs {
    pub title: String,
    pub amount: String,
    pub cadence: String,
    pub kind: String,
    pub category: Option<String>,
    pub start: Option<String>,
}

pub fn cmd_recurring_list(db: &Database, all: bool) -> Result<()> {
    let templates = db.list_templates(!all)?;

    if templates.is_empty() {
        println!("No recurring templates. Add one with:");
        println!("  tally recurring add \"Rent\" 600 --start 2024-01-15");
        return Ok(());
    }

    println!();
    println!("🔁 Recurring Templates");
    println!("   ─────────────────────────────────────────────────────────────");

    for t in templates {
        let status_icon = if t.active { "✅" } else { "⏸️ " };
        println!(
            "   {} [{}] {:20} │ {:>10.2} {:<7} │ {:<7} │ next {}",
            status_icon,
            t.id,
            truncate(&t.title, 20),
            t.amount,
            t.kind.as_str(),
            t.cadence.as_str(),
            t.next_date
        );
    }

    Ok(())
}

pub fn cmd_recurring_add(db: &Database, config: &Config, args: RecurringAddArgs) -> Result<i64> {
    let cadence: Cadence = args.cadence.parse()?;
    let kind: TransactionKind = args.kind.parse()?;
    let amount = parse_amount(&args.amount).context("Invalid amount")?;
    let next_date = parse_date_arg(args.start.as_deref(), "--start")?.unwrap_or_else(today);

    let category = args
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| config.classifier().classify(&args.title));

    let template = NewRecurringTemplate {
        title: args.title.trim().to_string(),
        amount,
        category: Some(category),
        kind,
        cadence,
        next_date,
    };
    let id = db.create_template(&template)?;

    println!(
        "✅ Added {} template [{}] {} {:.2}, first due {}",
        template.cadence, id, template.title, template.amount, template.next_date
    );
    Ok(id)
}

pub fn cmd_recurring_deactivate(db: &Database, id: i64) -> Result<()> {
    db.deactivate_template(id)
        .with_context(|| format!("Failed to deactivate template {}", id))?;
    println!("⏸️  Template {} deactivated", id);
    Ok(())
}

/// Run the recurrence engine as of `date` (default today)
pub fn cmd_recurring_run(db: &Database, date: Option<&str>) -> Result<RecurrenceReport> {
    let reference = parse_date_arg(date, "--date")?.unwrap_or_else(today);
    let report = run_recurrence(db, reference, now()).context("Recurrence run failed")?;

    if report.created_dates.is_empty() {
        println!("Nothing due as of {}.", reference);
        return Ok(report);
    }

    println!(
        "🔁 Created {} transaction(s) from {} template(s) as of {}:",
        report.created_dates.len(),
        report.templates_advanced,
        reference
    );
    for d in &report.created_dates {
        println!("   {}", d);
    }

    Ok(report)
}

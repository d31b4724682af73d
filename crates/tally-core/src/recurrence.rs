//! Recurrence engine
//!
//! Materializes every transaction a recurring template owes as of a
//! reference date and moves the template's `next_date` past it. A template
//! left alone for several periods catches up fully in one run.
//!
//! The engine assumes a single writer. Two overlapping runs over the same
//! templates can both see the old `next_date` and materialize the same
//! occurrences twice; callers must serialize runs (one scheduler, one CLI
//! invocation at a time, or a store-level lock).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{NewTransaction, RecurringTemplate};
use crate::store::LedgerStore;

/// Everything one template owes for a run
#[derive(Debug, Clone, PartialEq)]
pub struct CatchUp {
    /// The template with its final, fully advanced `next_date`
    pub template: RecurringTemplate,
    /// One transaction per due occurrence, in increasing date order
    pub transactions: Vec<NewTransaction>,
}

/// Result of planning a run over a template snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceRun {
    pub catch_ups: Vec<CatchUp>,
}

impl RecurrenceRun {
    pub fn materialized(&self) -> impl Iterator<Item = &NewTransaction> {
        self.catch_ups.iter().flat_map(|c| c.transactions.iter())
    }

    pub fn updated_templates(&self) -> impl Iterator<Item = &RecurringTemplate> {
        self.catch_ups.iter().map(|c| &c.template)
    }
}

/// Summary of a run applied to a store
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecurrenceReport {
    /// Dates of every materialized transaction, per template in date order
    pub created_dates: Vec<NaiveDate>,
    /// Number of templates whose `next_date` moved
    pub templates_advanced: usize,
}

/// Plan the catch-up of one template.
///
/// Returns `None` for inactive templates and for templates not yet due; those
/// are left untouched.
pub fn catch_up(
    template: &RecurringTemplate,
    reference_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<Option<CatchUp>> {
    if !template.active || template.next_date > reference_date {
        return Ok(None);
    }

    let mut next_date = template.next_date;
    let mut transactions = Vec::new();
    while next_date <= reference_date {
        transactions.push(template.materialize(next_date, created_at));
        next_date = template.cadence.advance(next_date)?;
    }

    let mut template = template.clone();
    template.next_date = next_date;
    Ok(Some(CatchUp {
        template,
        transactions,
    }))
}

/// Plan a run over a template snapshot without touching any store
pub fn run(
    reference_date: NaiveDate,
    created_at: DateTime<Utc>,
    templates: &[RecurringTemplate],
) -> Result<RecurrenceRun> {
    let mut catch_ups = Vec::new();
    for template in templates {
        if let Some(c) = catch_up(template, reference_date, created_at)? {
            catch_ups.push(c);
        }
    }
    Ok(RecurrenceRun { catch_ups })
}

/// Run the engine against a store.
///
/// Each template's inserts and `next_date` update are written together. A
/// store failure stops the run: templates already written stay written, the
/// failing one is not advanced at all, and the error is returned.
pub fn run_recurrence<S: LedgerStore + ?Sized>(
    store: &S,
    reference_date: NaiveDate,
    created_at: DateTime<Utc>,
) -> Result<RecurrenceReport> {
    let templates = store.list_templates(true)?;
    let planned = run(reference_date, created_at, &templates)?;

    let mut report = RecurrenceReport::default();
    for c in &planned.catch_ups {
        store.apply_catch_up(c.template.id, &c.transactions, c.template.next_date)?;
        debug!(
            "Template {} ({}): {} occurrence(s), next date {}",
            c.template.id,
            c.template.title,
            c.transactions.len(),
            c.template.next_date
        );
        report
            .created_dates
            .extend(c.transactions.iter().map(|tx| tx.date));
        report.templates_advanced += 1;
    }

    info!(
        "Recurrence run as of {}: {} transaction(s) from {} template(s)",
        reference_date,
        report.created_dates.len(),
        report.templates_advanced
    );
    Ok(report)
}

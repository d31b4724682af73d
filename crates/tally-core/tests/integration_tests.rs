//! Integration tests for tally-core
//!
//! These tests exercise the recurring → summary → backup → restore workflow
//! through the public API.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tally_core::{
    db::Database,
    export::{backup_json, export_transactions_csv},
    get_summary,
    models::{Cadence, NewRecurringTemplate, TransactionInput, TransactionKind, RECURRING_NOTE},
    run_recurrence, Classifier, Config, Importer, TransactionFilter,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 20, 18, 30, 0).unwrap()
}

fn add(db: &Database, kind: &str, title: &str, amount: &str, category: Option<&str>, d: &str) -> i64 {
    let classifier = Classifier::default();
    let tx = TransactionInput {
        kind: Some(kind.into()),
        title: Some(title.into()),
        amount: Some(amount.into()),
        category: category.map(String::from),
        date: Some(d.into()),
        notes: None,
    }
    .into_new_transaction(&classifier, date(d), now())
    .expect("valid input");
    db.insert_transaction(&tx).expect("insert")
}

// =============================================================================
// Recurrence
// =============================================================================

#[test]
fn test_monthly_template_catches_up_three_months() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let id = db
        .create_template(&NewRecurringTemplate {
            title: "Rent".into(),
            amount: 600.0,
            category: Some("Rent".into()),
            kind: TransactionKind::Expense,
            cadence: Cadence::Monthly,
            next_date: date("2024-01-15"),
        })
        .unwrap();

    let report = run_recurrence(&db, date("2024-03-20"), now()).unwrap();
    assert_eq!(
        report.created_dates,
        vec![date("2024-01-15"), date("2024-02-15"), date("2024-03-15")]
    );
    assert_eq!(report.templates_advanced, 1);

    let template = db.get_template(id).unwrap().unwrap();
    assert_eq!(template.next_date, date("2024-04-15"));

    let created = db.list_all_transactions().unwrap();
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|t| t.notes == RECURRING_NOTE && t.amount == 600.0));
    assert!(created.iter().all(|t| t.created_at == now()));
}

#[test]
fn test_weekly_and_future_templates() {
    let db = Database::in_memory().unwrap();
    let weekly = db
        .create_template(&NewRecurringTemplate {
            title: "Bus pass".into(),
            amount: 15.0,
            category: None,
            kind: TransactionKind::Expense,
            cadence: Cadence::Weekly,
            next_date: date("2024-03-01"),
        })
        .unwrap();
    let future = db
        .create_template(&NewRecurringTemplate {
            title: "Salary".into(),
            amount: 5000.0,
            category: Some("Income".into()),
            kind: TransactionKind::Income,
            cadence: Cadence::Monthly,
            next_date: date("2024-04-01"),
        })
        .unwrap();

    let report = run_recurrence(&db, date("2024-03-20"), now()).unwrap();
    assert_eq!(
        report.created_dates,
        vec![date("2024-03-01"), date("2024-03-08"), date("2024-03-15")]
    );
    assert_eq!(db.get_template(weekly).unwrap().unwrap().next_date, date("2024-03-22"));
    assert_eq!(db.get_template(future).unwrap().unwrap().next_date, date("2024-04-01"));

    // Materialized rows keep the template's missing category
    let created = db.list_all_transactions().unwrap();
    assert!(created.iter().all(|t| t.category.is_none()));
}

// =============================================================================
// Analytics
// =============================================================================

#[test]
fn test_leap_february_summary() {
    let db = Database::in_memory().unwrap();
    db.seed_settings(Config::default().default_budget).unwrap();

    add(&db, "expense", "Pizza", "10", None, "2024-02-01");
    add(&db, "expense", "Cab", "20", None, "2024-02-29");
    add(&db, "expense", "Lunch", "40", None, "2024-03-01");
    add(&db, "income", "Salary", "1000", None, "2024-02-10");

    let summary = get_summary(&db, 2024, 2).unwrap();
    assert_eq!(summary.month, "2024-02");
    assert_eq!(summary.totals.expense, 30.0);
    assert_eq!(summary.totals.income, 1000.0);
    assert_eq!(summary.budget, 10000.0);

    let labels: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(labels, vec!["Transport", "Food"]);

    assert_eq!(summary.trend.len(), 6);
    assert_eq!((summary.trend[0].year, summary.trend[0].month), (2023, 9));
    assert_eq!(summary.trend[5].amount, 30.0);
}

#[test]
fn test_summary_without_budget_setting() {
    let db = Database::in_memory().unwrap();
    let summary = get_summary(&db, 2024, 1).unwrap();
    assert_eq!(summary.budget, 0.0);
    assert_eq!(summary.totals.expense, 0.0);
    assert!(summary.categories.is_empty());
}

// =============================================================================
// Backup / Restore
// =============================================================================

#[test]
fn test_backup_then_restore_into_fresh_database() {
    let source = Database::in_memory().unwrap();
    add(&source, "expense", "Amazon order", "45.5", None, "2024-03-02");
    add(&source, "income", "Stipend", "300", None, "2024-03-01");

    let mut backup = Vec::new();
    assert_eq!(backup_json(&source, &mut backup).unwrap(), 2);

    let target = Database::in_memory().unwrap();
    let classifier = Classifier::default();
    let report = Importer::new(&target, &classifier, date("2024-03-20"), now())
        .restore_json(backup.as_slice())
        .unwrap();
    assert_eq!(report.inserted(), 2);
    assert_eq!(report.failures().count(), 0);

    let restored = target.list_all_transactions().unwrap();
    assert_eq!(restored[0].title, "Amazon order");
    assert_eq!(restored[0].category.as_deref(), Some("Shopping"));
    assert_eq!(restored[1].kind, TransactionKind::Income);
    assert_eq!(restored[1].amount, 300.0);
}

#[test]
fn test_csv_export_then_import() {
    let source = Database::in_memory().unwrap();
    add(&source, "expense", "Grocery run", "62.0", None, "2024-03-05");
    add(&source, "expense", "Netflix", "9.5", None, "2024-03-06");

    let mut csv = Vec::new();
    export_transactions_csv(&source, &TransactionFilter::new(), &mut csv).unwrap();

    let target = Database::in_memory().unwrap();
    let classifier = Classifier::default();
    let report = Importer::new(&target, &classifier, date("2024-03-20"), now())
        .import_csv(csv.as_slice())
        .unwrap();
    assert_eq!(report.inserted(), 2);

    let summary = get_summary(&target, 2024, 3).unwrap();
    assert_eq!(summary.totals.expense, 71.5);
    let labels: Vec<&str> = summary.categories.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(labels, vec!["Groceries", "Entertainment"]);
}

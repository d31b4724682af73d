//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use clap::Parser;
use tally_core::db::{Database, DEFAULT_LIST_LIMIT};
use tally_core::models::{Cadence, TransactionKind, MONTHLY_BUDGET_KEY};
use tally_core::Config;

use crate::cli::{Cli, Commands, FilterArgs, TransactionsAction};
use crate::commands::{self, AddArgs, EditArgs, RecurringAddArgs};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.seed_settings(Config::default().default_budget).unwrap();
    db
}

fn add(db: &Database, title: &str, amount: &str, date: &str) -> i64 {
    commands::cmd_add(
        db,
        &Config::default(),
        AddArgs {
            title: title.into(),
            amount: amount.into(),
            kind: "expense".into(),
            category: None,
            date: Some(date.into()),
            notes: None,
        },
    )
    .unwrap()
}

// ========== Init Command Tests ==========

#[test]
fn test_cmd_init_creates_and_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");

    let result = commands::cmd_init(&path, &Config::default());
    assert!(result.is_ok());
    assert!(path.exists());

    let db = commands::open_db(&path, &Config::default()).unwrap();
    assert_eq!(db.monthly_budget().unwrap(), Some(10000.0));
}

#[test]
fn test_open_db_keeps_existing_budget() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");

    let db = commands::open_db(&path, &Config::default()).unwrap();
    db.set_monthly_budget(1200.0).unwrap();
    drop(db);

    let reopened = commands::open_db(&path, &Config::default()).unwrap();
    assert_eq!(reopened.monthly_budget().unwrap(), Some(1200.0));
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_add_auto_category() {
    let db = setup_test_db();
    let id = add(&db, "Pizza with friends", "18.40", "2024-02-03");

    let tx = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(tx.category.as_deref(), Some("Food"));
    assert_eq!(tx.kind, TransactionKind::Expense);
    assert_eq!(tx.amount, 18.4);
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let db = setup_test_db();
    let result = commands::cmd_add(
        &db,
        &Config::default(),
        AddArgs {
            title: "Lunch".into(),
            amount: "-3".into(),
            kind: "expense".into(),
            category: None,
            date: None,
            notes: None,
        },
    );
    assert!(result.is_err());
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_cmd_transactions_list() {
    let db = setup_test_db();
    assert!(commands::cmd_transactions_list(&db, &FilterArgs::default(), 20).is_ok());

    add(&db, "Cab home", "12", "2024-02-03");
    let filter = FilterArgs {
        kind: Some("expense".into()),
        from: Some("2024-02-01".into()),
        ..Default::default()
    };
    assert!(commands::cmd_transactions_list(&db, &filter, 20).is_ok());

    let bad = FilterArgs {
        from: Some("yesterday".into()),
        ..Default::default()
    };
    assert!(commands::cmd_transactions_list(&db, &bad, 20).is_err());
}

#[test]
fn test_cmd_transactions_edit_keeps_unset_fields() {
    let db = setup_test_db();
    let id = add(&db, "Dinner", "30", "2024-02-03");
    let before = db.get_transaction(id).unwrap().unwrap();

    let result = commands::cmd_transactions_edit(
        &db,
        &Config::default(),
        id,
        EditArgs {
            amount: Some("35.5".into()),
            notes: Some("with tip".into()),
            ..Default::default()
        },
    );
    assert!(result.is_ok());

    let after = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(after.amount, 35.5);
    assert_eq!(after.notes, "with tip");
    assert_eq!(after.title, "Dinner");
    assert_eq!(after.category, before.category);
    assert_eq!(after.date, before.date);
    assert_eq!(after.created_at, before.created_at);
}

#[test]
fn test_cmd_transactions_edit_title_recategorizes() {
    let db = setup_test_db();
    let id = add(&db, "Dinner", "30", "2024-02-03");

    commands::cmd_transactions_edit(
        &db,
        &Config::default(),
        id,
        EditArgs {
            title: Some("Uber to airport".into()),
            ..Default::default()
        },
    )
    .unwrap();
    let tx = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(tx.category.as_deref(), Some("Transport"));

    // An explicit category wins over the new title
    commands::cmd_transactions_edit(
        &db,
        &Config::default(),
        id,
        EditArgs {
            title: Some("Pizza".into()),
            category: Some("Travel".into()),
            ..Default::default()
        },
    )
    .unwrap();
    let tx = db.get_transaction(id).unwrap().unwrap();
    assert_eq!(tx.title, "Pizza");
    assert_eq!(tx.category.as_deref(), Some("Travel"));
}

#[test]
fn test_transactions_list_default_limit() {
    let cli = Cli::try_parse_from(["tally", "transactions", "list"]).unwrap();
    match cli.command {
        Commands::Transactions {
            action: Some(TransactionsAction::List { limit, .. }),
        } => assert_eq!(limit, DEFAULT_LIST_LIMIT),
        _ => panic!("expected transactions list"),
    }
}

#[test]
fn test_cmd_transactions_edit_missing() {
    let db = setup_test_db();
    let result = commands::cmd_transactions_edit(&db, &Config::default(), 42, EditArgs::default());
    assert!(result.is_err());
}

#[test]
fn test_cmd_transactions_delete() {
    let db = setup_test_db();
    let id = add(&db, "Bus", "2", "2024-02-03");

    assert!(commands::cmd_transactions_delete(&db, id).is_ok());
    assert!(db.get_transaction(id).unwrap().is_none());
    assert!(commands::cmd_transactions_delete(&db, id).is_err());
}

#[test]
fn test_cmd_categories() {
    let db = setup_test_db();
    assert!(commands::cmd_categories(&db).is_ok());

    add(&db, "Netflix", "9", "2024-02-03");
    add(&db, "Something odd", "4", "2024-02-04");
    assert!(commands::cmd_categories(&db).is_ok());
    assert_eq!(db.list_categories().unwrap(), vec!["Entertainment", "Other"]);
}

// ========== Recurring Command Tests ==========

fn add_rent(db: &Database, start: &str) -> i64 {
    commands::cmd_recurring_add(
        db,
        &Config::default(),
        RecurringAddArgs {
            title: "Rent".into(),
            amount: "600".into(),
            cadence: "monthly".into(),
            kind: "expense".into(),
            category: None,
            start: Some(start.into()),
        },
    )
    .unwrap()
}

#[test]
fn test_cmd_recurring_add_and_list() {
    let db = setup_test_db();
    assert!(commands::cmd_recurring_list(&db, false).is_ok());

    let id = add_rent(&db, "2024-01-15");
    let template = db.get_template(id).unwrap().unwrap();
    assert_eq!(template.cadence, Cadence::Monthly);
    assert_eq!(template.category.as_deref(), Some("Rent"));
    assert!(commands::cmd_recurring_list(&db, true).is_ok());
}

#[test]
fn test_cmd_recurring_add_rejects_unknown_cadence() {
    let db = setup_test_db();
    let result = commands::cmd_recurring_add(
        &db,
        &Config::default(),
        RecurringAddArgs {
            title: "Gym".into(),
            amount: "40".into(),
            cadence: "yearly".into(),
            kind: "expense".into(),
            category: None,
            start: None,
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_cmd_recurring_run() {
    let db = setup_test_db();
    let id = add_rent(&db, "2024-01-15");

    let report = commands::cmd_recurring_run(&db, Some("2024-03-20")).unwrap();
    assert_eq!(report.created_dates.len(), 3);
    assert_eq!(
        db.get_template(id).unwrap().unwrap().next_date.to_string(),
        "2024-04-15"
    );

    // Nothing new on a second run
    let again = commands::cmd_recurring_run(&db, Some("2024-03-20")).unwrap();
    assert!(again.created_dates.is_empty());

    assert!(commands::cmd_recurring_run(&db, Some("March")).is_err());
}

#[test]
fn test_cmd_recurring_deactivate() {
    let db = setup_test_db();
    let id = add_rent(&db, "2024-01-15");

    assert!(commands::cmd_recurring_deactivate(&db, id).is_ok());
    let report = commands::cmd_recurring_run(&db, Some("2024-03-20")).unwrap();
    assert!(report.created_dates.is_empty());
    assert!(commands::cmd_recurring_deactivate(&db, id + 1).is_err());
}

// ========== Summary / Budget Command Tests ==========

#[test]
fn test_cmd_summary() {
    let db = setup_test_db();
    add(&db, "Lunch", "12", "2024-02-10");

    assert!(commands::cmd_summary(&db, Some(2024), Some(2), false).is_ok());
    assert!(commands::cmd_summary(&db, Some(2024), Some(2), true).is_ok());
    assert!(commands::cmd_summary(&db, Some(2024), Some(0), false).is_err());
}

#[test]
fn test_cmd_summary_with_corrupt_budget() {
    let db = setup_test_db();
    db.set_setting(MONTHLY_BUDGET_KEY, "plenty").unwrap();
    assert!(commands::cmd_summary(&db, Some(2024), Some(2), false).is_err());
}

#[test]
fn test_cmd_budget() {
    let db = setup_test_db();
    assert!(commands::cmd_budget_show(&db).is_ok());

    assert!(commands::cmd_budget_set(&db, 2500.0).is_ok());
    assert_eq!(db.monthly_budget().unwrap(), Some(2500.0));

    assert!(commands::cmd_budget_set(&db, -10.0).is_err());
    assert_eq!(db.monthly_budget().unwrap(), Some(2500.0));
}

// ========== Import / Export Command Tests ==========

#[test]
fn test_cmd_export_and_import_csv() {
    let db = setup_test_db();
    add(&db, "Grocery run", "40", "2024-02-10");
    add(&db, "Train ticket", "15", "2024-02-11");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    assert!(commands::cmd_export_csv(&db, &FilterArgs::default(), Some(&path)).is_ok());

    let target = setup_test_db();
    let report = commands::cmd_import_csv(&target, &Config::default(), &path).unwrap();
    assert_eq!(report.inserted(), 2);
    assert_eq!(target.count_transactions().unwrap(), 2);
}

#[test]
fn test_cmd_import_csv_reports_bad_rows() {
    let db = setup_test_db();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "kind,title,amount,category,date,notes").unwrap();
    writeln!(file, "expense,Lunch,10,,2024-02-01,").unwrap();
    writeln!(file, "refund,Lunch,10,,2024-02-01,").unwrap();
    writeln!(file, "expense,Lunch,,,2024-02-01,").unwrap();

    let report = commands::cmd_import_csv(&db, &Config::default(), file.path()).unwrap();
    assert_eq!(report.inserted(), 1);
    assert_eq!(report.failures().count(), 2);
}

#[test]
fn test_cmd_export_and_restore_json() {
    let db = setup_test_db();
    add(&db, "Salary credit", "5000", "2024-02-01");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    assert!(commands::cmd_export_json(&db, Some(&path)).is_ok());

    let target = setup_test_db();
    let report = commands::cmd_import_json(&target, &Config::default(), &path).unwrap();
    assert_eq!(report.inserted(), 1);

    let restored = &target.list_all_transactions().unwrap()[0];
    assert_eq!(restored.title, "Salary credit");
    assert_eq!(restored.category.as_deref(), Some("Income"));
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let result = commands::cmd_import_csv(
        &db,
        &Config::default(),
        std::path::Path::new("/nonexistent/file.csv"),
    );
    assert!(result.is_err());
}

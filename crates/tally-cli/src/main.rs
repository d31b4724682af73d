//! Tally CLI - Personal income and expense ledger
//!
//! Usage:
//!   tally init                        Initialize database
//!   tally add "Lunch" 12.50           Add an expense (category auto-detected)
//!   tally recurring run               Materialize due recurring entries
//!   tally summary --year 2024 --month 2

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::db::DEFAULT_LIST_LIMIT;
use tally_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, &config),
        Commands::Add {
            title,
            amount,
            kind,
            category,
            date,
            notes,
        } => {
            let db = commands::open_db(&cli.db, &config)?;
            commands::cmd_add(
                &db,
                &config,
                commands::AddArgs {
                    title,
                    amount,
                    kind,
                    category,
                    date,
                    notes,
                },
            )
            .map(|_| ())
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, &config)?;
            match action {
                None => commands::cmd_transactions_list(
                    &db,
                    &FilterArgs::default(),
                    DEFAULT_LIST_LIMIT,
                ),
                Some(TransactionsAction::List { filter, limit }) => {
                    commands::cmd_transactions_list(&db, &filter, limit)
                }
                Some(TransactionsAction::Edit {
                    id,
                    title,
                    amount,
                    kind,
                    category,
                    date,
                    notes,
                }) => commands::cmd_transactions_edit(
                    &db,
                    &config,
                    id,
                    commands::EditArgs {
                        title,
                        amount,
                        kind,
                        category,
                        date,
                        notes,
                    },
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db, &config)?;
            commands::cmd_categories(&db)
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db, &config)?;
            match action {
                None => commands::cmd_recurring_list(&db, false),
                Some(RecurringAction::List { all }) => commands::cmd_recurring_list(&db, all),
                Some(RecurringAction::Add {
                    title,
                    amount,
                    cadence,
                    kind,
                    category,
                    start,
                }) => commands::cmd_recurring_add(
                    &db,
                    &config,
                    commands::RecurringAddArgs {
                        title,
                        amount,
                        cadence,
                        kind,
                        category,
                        start,
                    },
                )
                .map(|_| ()),
                Some(RecurringAction::Deactivate { id }) => {
                    commands::cmd_recurring_deactivate(&db, id)
                }
                Some(RecurringAction::Run { date }) => {
                    commands::cmd_recurring_run(&db, date.as_deref()).map(|_| ())
                }
            }
        }
        Commands::Summary { year, month, json } => {
            let db = commands::open_db(&cli.db, &config)?;
            commands::cmd_summary(&db, year, month, json)
        }
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db, &config)?;
            match action {
                None => commands::cmd_budget_show(&db),
                Some(BudgetAction::Set { amount }) => commands::cmd_budget_set(&db, amount),
            }
        }
        Commands::Export { action } => {
            let db = commands::open_db(&cli.db, &config)?;
            match action {
                ExportAction::Csv { output, filter } => {
                    commands::cmd_export_csv(&db, &filter, output.as_deref())
                }
                ExportAction::Json { output } => commands::cmd_export_json(&db, output.as_deref()),
            }
        }
        Commands::Import { action } => {
            let db = commands::open_db(&cli.db, &config)?;
            match action {
                ImportAction::Csv { file } => {
                    commands::cmd_import_csv(&db, &config, &file).map(|_| ())
                }
                ImportAction::Json { file } => {
                    commands::cmd_import_json(&db, &config, &file).map(|_| ())
                }
            }
        }
    }
}

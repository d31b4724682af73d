//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `transactions` - Transaction CRUD and filtered listing
//! - `recurring` - Recurring template operations
//! - `reports` - Range sums used by the analytics aggregator
//! - `settings` - Key/value settings (monthly budget)
//!
//! `Database` also implements `LedgerStore` for the core engines.

use std::collections::HashMap;

use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;
use crate::models::{NewTransaction, RecurringTemplate, TransactionKind};
use crate::store::LedgerStore;

mod recurring;
mod reports;
mod settings;
mod transaction_filter;
mod transactions;

pub use transaction_filter::{FilterResult, TransactionFilter, DEFAULT_LIST_LIMIT};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for the database path
pub const DB_PATH_ENV: &str = "TALLY_DB";

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (creating if needed) a database file and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every
    /// pooled connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any leftovers from an earlier run
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Transactions (income and expense records)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                kind TEXT NOT NULL CHECK (kind IN ('expense', 'income')),
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT,
                date DATE NOT NULL,                -- YYYY-MM-DD, attributed date
                notes TEXT NOT NULL DEFAULT '',
                created_at DATETIME NOT NULL       -- set once on insert
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_kind_date ON transactions(kind, date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

            -- Recurring templates
            CREATE TABLE IF NOT EXISTS recurring_templates (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                category TEXT,
                kind TEXT NOT NULL CHECK (kind IN ('expense', 'income')),
                cadence TEXT NOT NULL CHECK (cadence IN ('weekly', 'monthly')),
                next_date DATE NOT NULL,
                active BOOLEAN NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_recurring_active ON recurring_templates(active, next_date);

            -- Settings (monthly_budget, ...)
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

impl LedgerStore for Database {
    fn list_templates(&self, active_only: bool) -> Result<Vec<RecurringTemplate>> {
        Database::list_templates(self, active_only)
    }

    fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        Database::insert_transaction(self, tx)
    }

    fn update_template_next_date(&self, template_id: i64, next_date: NaiveDate) -> Result<()> {
        Database::update_template_next_date(self, template_id, next_date)
    }

    fn apply_catch_up(
        &self,
        template_id: i64,
        transactions: &[NewTransaction],
        next_date: NaiveDate,
    ) -> Result<Vec<i64>> {
        Database::apply_catch_up(self, template_id, transactions, next_date)
    }

    fn sum_by_kind_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<TransactionKind, f64>> {
        Database::sum_by_kind_in_range(self, from, to)
    }

    fn sum_by_category_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        kind: TransactionKind,
    ) -> Result<Vec<(Option<String>, f64)>> {
        Database::sum_by_category_in_range(self, from, to, kind)
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Database::get_setting(self, key)
    }
}

//! Transaction operations

use rusqlite::{params, OptionalExtension, Row};

use super::transaction_filter::TransactionFilter;
use super::Database;
use crate::dates::{format_datetime, parse_date, parse_datetime};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, OTHER_CATEGORY};

const SELECT_COLUMNS: &str =
    "SELECT id, kind, title, amount, category, date, notes, created_at FROM transactions";

/// Column values as stored, before date and kind parsing
struct TransactionRow {
    id: i64,
    kind: String,
    title: String,
    amount: f64,
    category: Option<String>,
    date: String,
    notes: String,
    created_at: String,
}

impl TransactionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            title: row.get(2)?,
            amount: row.get(3)?,
            category: row.get(4)?,
            date: row.get(5)?,
            notes: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            id: self.id,
            kind: self.kind.parse()?,
            title: self.title,
            amount: self.amount,
            category: self.category,
            date: parse_date(&self.date)?,
            notes: self.notes,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl Database {
    /// Insert a validated transaction, returning its id
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (kind, title, amount, category, date, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.kind.as_str(),
                tx.title,
                tx.amount,
                tx.category,
                tx.date.to_string(),
                tx.notes,
                format_datetime(&tx.created_at),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                TransactionRow::from_row,
            )
            .optional()?;

        row.map(TransactionRow::into_transaction).transpose()
    }

    /// List transactions matching a filter, newest date first
    pub fn list_transactions(&self, filter: &TransactionFilter<'_>) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "{} {} {}",
            SELECT_COLUMNS, built.where_clause, built.order_clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            built.params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), TransactionRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// Every transaction, newest first (used for backups)
    pub fn list_all_transactions(&self) -> Result<Vec<Transaction>> {
        self.list_transactions(&TransactionFilter::new())
    }

    /// Replace the user-editable fields of a transaction.
    ///
    /// `created_at` of the stored row is kept; the one on `tx` is ignored.
    pub fn update_transaction(&self, id: i64, tx: &NewTransaction) -> Result<()> {
        tx.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET kind = ?, title = ?, amount = ?, category = ?, date = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                tx.kind.as_str(),
                tx.title,
                tx.amount,
                tx.category,
                tx.date.to_string(),
                tx.notes,
                id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }

    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }

    /// Distinct category labels in use, sorted; missing ones read as "Other"
    pub fn list_categories(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT COALESCE(NULLIF(TRIM(category), ''), ?)
            FROM transactions
            ORDER BY 1
            "#,
        )?;

        let categories = stmt
            .query_map(params![OTHER_CATEGORY], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(categories)
    }

    /// Count all transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }
}

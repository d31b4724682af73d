//! Recurring template operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::dates::{format_datetime, parse_date};
use crate::error::{Error, Result};
use crate::models::{NewRecurringTemplate, NewTransaction, RecurringTemplate};

const SELECT_COLUMNS: &str =
    "SELECT id, title, amount, category, kind, cadence, next_date, active FROM recurring_templates";

struct TemplateRow {
    id: i64,
    title: String,
    amount: f64,
    category: Option<String>,
    kind: String,
    cadence: String,
    next_date: String,
    active: bool,
}

impl TemplateRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            kind: row.get(4)?,
            cadence: row.get(5)?,
            next_date: row.get(6)?,
            active: row.get(7)?,
        })
    }

    fn into_template(self) -> Result<RecurringTemplate> {
        Ok(RecurringTemplate {
            id: self.id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            kind: self.kind.parse()?,
            cadence: self.cadence.parse()?,
            next_date: parse_date(&self.next_date)?,
            active: self.active,
        })
    }
}

impl Database {
    /// Create an active recurring template
    pub fn create_template(&self, template: &NewRecurringTemplate) -> Result<i64> {
        template.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO recurring_templates (title, amount, category, kind, cadence, next_date, active)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            "#,
            params![
                template.title,
                template.amount,
                template.category,
                template.kind.as_str(),
                template.cadence.as_str(),
                template.next_date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    pub fn get_template(&self, id: i64) -> Result<Option<RecurringTemplate>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?", SELECT_COLUMNS),
                params![id],
                TemplateRow::from_row,
            )
            .optional()?;

        row.map(TemplateRow::into_template).transpose()
    }

    /// List templates by next due date, optionally only active ones
    pub fn list_templates(&self, active_only: bool) -> Result<Vec<RecurringTemplate>> {
        let conn = self.conn()?;
        let sql = if active_only {
            format!("{} WHERE active = 1 ORDER BY next_date, id", SELECT_COLUMNS)
        } else {
            format!("{} ORDER BY next_date, id", SELECT_COLUMNS)
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], TemplateRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(TemplateRow::into_template).collect()
    }

    /// Stop a template from producing further transactions
    pub fn deactivate_template(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_templates SET active = 0 WHERE id = ?",
            params![id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("recurring template {}", id)));
        }
        Ok(())
    }

    pub fn update_template_next_date(&self, template_id: i64, next_date: NaiveDate) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_templates SET next_date = ? WHERE id = ?",
            params![next_date.to_string(), template_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("recurring template {}", template_id)));
        }
        Ok(())
    }

    /// Insert a template's materialized transactions and move its
    /// `next_date` in one SQL transaction.
    ///
    /// Any failure (including an unknown template id) rolls the whole
    /// write back.
    pub fn apply_catch_up(
        &self,
        template_id: i64,
        transactions: &[NewTransaction],
        next_date: NaiveDate,
    ) -> Result<Vec<i64>> {
        for tx in transactions {
            tx.validate()?;
        }

        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(transactions.len());
        for tx in transactions {
            db_tx.execute(
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
            ids.push(db_tx.last_insert_rowid());
        }

        let updated = db_tx.execute(
            "UPDATE recurring_templates SET next_date = ? WHERE id = ?",
            params![next_date.to_string(), template_id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("recurring template {}", template_id)));
        }

        db_tx.commit()?;
        Ok(ids)
    }
}

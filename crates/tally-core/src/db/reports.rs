//! Range sums backing the monthly summary

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::TransactionKind;

impl Database {
    /// Sum of amounts per kind for dates in `[from, to]`
    pub fn sum_by_kind_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<TransactionKind, f64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT kind, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE date BETWEEN ?1 AND ?2
            GROUP BY kind
            "#,
        )?;

        let rows = stmt
            .query_map(params![from.to_string(), to.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut sums = HashMap::new();
        for (kind, amount) in rows {
            sums.insert(kind.parse()?, amount);
        }
        Ok(sums)
    }

    /// Sum of amounts per stored category for one kind in `[from, to]`.
    ///
    /// Categories are returned as stored; NULL comes back as `None`.
    pub fn sum_by_category_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        kind: TransactionKind,
    ) -> Result<Vec<(Option<String>, f64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT category, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE kind = ?1 AND date BETWEEN ?2 AND ?3
            GROUP BY category
            "#,
        )?;

        let sums = stmt
            .query_map(
                params![kind.as_str(), from.to_string(), to.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sums)
    }
}

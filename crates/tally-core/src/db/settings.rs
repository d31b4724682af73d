//! Key/value settings

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{parse_budget, MONTHLY_BUDGET_KEY};

impl Database {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a setting
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// All settings ordered by key
    pub fn list_settings(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
        let settings = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(settings)
    }

    /// Write defaults for settings that have never been set
    pub fn seed_settings(&self, default_budget: f64) -> Result<()> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)",
            params![MONTHLY_BUDGET_KEY, default_budget.to_string()],
        )?;
        if inserted > 0 {
            info!("Seeded {} = {}", MONTHLY_BUDGET_KEY, default_budget);
        }
        Ok(())
    }

    /// The stored monthly budget, if any
    pub fn monthly_budget(&self) -> Result<Option<f64>> {
        self.get_setting(MONTHLY_BUDGET_KEY)?
            .map(|raw| parse_budget(&raw))
            .transpose()
    }

    /// Set the monthly budget; zero is allowed, negative values are not
    pub fn set_monthly_budget(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(format!(
                "budget {} must be zero or more",
                amount
            )));
        }
        self.set_setting(MONTHLY_BUDGET_KEY, &amount.to_string())
    }
}

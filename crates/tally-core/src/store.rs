//! Ledger store collaborator interface
//!
//! The recurrence engine and the analytics aggregator never own a store
//! handle; callers open one, pass it in, and release it afterwards.
//! `Database` is the SQLite implementation.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{NewTransaction, RecurringTemplate, TransactionKind};

pub trait LedgerStore {
    /// Templates, optionally restricted to active ones
    fn list_templates(&self, active_only: bool) -> Result<Vec<RecurringTemplate>>;

    /// Insert one transaction, returning its new id
    fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64>;

    fn update_template_next_date(&self, template_id: i64, next_date: NaiveDate) -> Result<()>;

    /// Insert every transaction of one template's catch-up and move its
    /// `next_date`, as a single all-or-nothing write.
    ///
    /// On error nothing from this call is visible to readers.
    fn apply_catch_up(
        &self,
        template_id: i64,
        transactions: &[NewTransaction],
        next_date: NaiveDate,
    ) -> Result<Vec<i64>>;

    /// Sum of amounts per kind for dates in `[from, to]`; kinds with no rows
    /// may be missing from the map
    fn sum_by_kind_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<HashMap<TransactionKind, f64>>;

    /// Sum of amounts per stored category (`None` for missing) for one kind
    /// and dates in `[from, to]`
    fn sum_by_category_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        kind: TransactionKind,
    ) -> Result<Vec<(Option<String>, f64)>>;

    fn get_setting(&self, key: &str) -> Result<Option<String>>;
}

//! Monthly analytics aggregator
//!
//! Produces the dashboard summary of one calendar month: income/expense
//! totals, the per-category expense breakdown, a trailing six-month expense
//! trend and the configured budget. Budget utilization is left to the caller.
//!
//! `summarize` works on an in-memory snapshot; `get_summary` asks a
//! `LedgerStore` for the same sums. Both use exact calendar month windows.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::{month_label, month_window, shift_month};
use crate::error::Result;
use crate::models::{
    parse_budget, CategoryAmount, KindTotals, Summary, Transaction, TransactionKind, TrendPoint,
    MONTHLY_BUDGET_KEY, OTHER_CATEGORY,
};
use crate::store::LedgerStore;

/// Number of months in the trend, including the summarized month
pub const TREND_MONTHS: u32 = 6;

/// `(year, month)` pairs of the trend window, oldest first
pub fn trend_months(year: i32, month: u32) -> Vec<(i32, u32)> {
    (0..TREND_MONTHS as i32)
        .rev()
        .map(|back| shift_month(year, month, -back))
        .collect()
}

/// Summarize a month from a transaction snapshot
pub fn summarize(
    year: i32,
    month: u32,
    transactions: &[Transaction],
    budget: f64,
) -> Result<Summary> {
    let (from, to) = month_window(year, month)?;
    let in_window = |tx: &&Transaction| tx.date >= from && tx.date <= to;

    let mut totals = KindTotals::default();
    for tx in transactions.iter().filter(in_window) {
        totals.add(tx.kind, tx.amount);
    }

    let categories = merge_categories(
        transactions
            .iter()
            .filter(in_window)
            .filter(|tx| tx.kind == TransactionKind::Expense)
            .map(|tx| (tx.category.clone(), tx.amount)),
    );

    let trend = trend_months(year, month)
        .into_iter()
        .map(|(y, m)| {
            let (from, to) = month_window(y, m)?;
            let amount = transactions
                .iter()
                .filter(|tx| tx.kind == TransactionKind::Expense)
                .filter(|tx| tx.date >= from && tx.date <= to)
                .map(|tx| tx.amount)
                .sum();
            Ok(TrendPoint {
                year: y,
                month: m,
                amount,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Summary {
        month: month_label(year, month),
        totals,
        categories,
        trend,
        budget,
    })
}

/// Summarize a month by querying a store.
///
/// The budget is the stored "monthly_budget" setting, 0.0 when unset.
pub fn get_summary<S: LedgerStore + ?Sized>(store: &S, year: i32, month: u32) -> Result<Summary> {
    let (from, to) = month_window(year, month)?;
    let mut summary = Summary::empty(year, month);

    summary.totals = kind_totals(store, from, to)?;
    summary.categories =
        merge_categories(store.sum_by_category_in_range(from, to, TransactionKind::Expense)?);

    for (y, m) in trend_months(year, month) {
        let (from, to) = month_window(y, m)?;
        let amount = kind_totals(store, from, to)?.get(TransactionKind::Expense);
        summary.trend.push(TrendPoint {
            year: y,
            month: m,
            amount,
        });
    }

    summary.budget = read_budget(store)?;

    debug!(
        "Summary {}: expense {:.2}, income {:.2}, {} categories",
        summary.month,
        summary.totals.expense,
        summary.totals.income,
        summary.categories.len()
    );
    Ok(summary)
}

fn kind_totals<S: LedgerStore + ?Sized>(
    store: &S,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<KindTotals> {
    let sums = store.sum_by_kind_in_range(from, to)?;
    let mut totals = KindTotals::default();
    for (kind, amount) in sums {
        totals.add(kind, amount);
    }
    Ok(totals)
}

fn read_budget<S: LedgerStore + ?Sized>(store: &S) -> Result<f64> {
    let budget = store
        .get_setting(MONTHLY_BUDGET_KEY)?
        .map(|raw| parse_budget(&raw))
        .transpose()?;
    Ok(budget.unwrap_or(0.0))
}

/// Fold category sums so each label appears once; missing or blank
/// categories count as "Other". Largest first, ties by name.
fn merge_categories<I>(rows: I) -> Vec<CategoryAmount>
where
    I: IntoIterator<Item = (Option<String>, f64)>,
{
    let mut sums: HashMap<String, f64> = HashMap::new();
    for (category, amount) in rows {
        let label = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| OTHER_CATEGORY.to_string());
        *sums.entry(label).or_insert(0.0) += amount;
    }

    let mut categories: Vec<CategoryAmount> = sums
        .into_iter()
        .map(|(category, amount)| CategoryAmount { category, amount })
        .collect();
    categories.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

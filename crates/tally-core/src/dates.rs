//! Calendar date helpers shared by the recurrence engine and analytics
//!
//! All dates are plain calendar dates (`NaiveDate`) without time of day.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Storage and input format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for creation timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Monthly cadence never lands on a day-of-month above this.
///
/// A template due on the 29th-31st fires on that day once, then on the 28th
/// of every following month.
pub const MONTHLY_DAY_CLAMP: u32 = 28;

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse a stored `YYYY-MM-DD HH:MM:SS` timestamp
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|e| Error::InvalidDate(format!("timestamp '{}': {}", s, e)))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Shift a (year, month) pair by `delta` months, either direction
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Inclusive `[first day, last day]` window of a calendar month.
///
/// Computed from the first day of the following month, so 28/29/30/31-day
/// months are all exact.
pub fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidDate(format!("no such month: {}-{:02}", year, month)))?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::InvalidDate(format!("no end for month: {}-{:02}", year, month)))?;
    Ok((first, last))
}

/// `YYYY-MM` label for a month
pub fn month_label(year: i32, month: u32) -> String {
    format!("{}-{:02}", year, month)
}

pub(crate) fn add_weeks(date: NaiveDate, weeks: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(weeks * 7))
        .ok_or_else(|| Error::InvalidDate(format!("{} + {} weeks is out of range", date, weeks)))
}

/// Same day-of-month in the following month, clamped to `MONTHLY_DAY_CLAMP`
pub(crate) fn add_month_clamped(date: NaiveDate) -> Result<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), 1);
    let day = date.day().min(MONTHLY_DAY_CLAMP);
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidDate(format!("{} + 1 month is out of range", date)))
}

//! Export functionality for transactions
//!
//! Supports:
//! - Filtered transaction CSV export
//! - Full JSON backup (every transaction, newest first)

use std::io::Write;

use tracing::info;

use crate::dates::format_datetime;
use crate::db::{Database, TransactionFilter};
use crate::error::Result;
use crate::models::Transaction;

/// Column order of the CSV export
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "kind",
    "title",
    "amount",
    "category",
    "date",
    "notes",
    "created_at",
];

/// Write transactions as CSV, returning the number of rows written
pub fn write_transactions_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for tx in transactions {
        wtr.write_record([
            tx.id.to_string(),
            tx.kind.as_str().to_string(),
            tx.title.clone(),
            tx.amount.to_string(),
            tx.category.clone().unwrap_or_default(),
            tx.date.to_string(),
            tx.notes.clone(),
            format_datetime(&tx.created_at),
        ])?;
    }

    wtr.flush()?;
    Ok(transactions.len())
}

/// Export transactions matching `filter` as CSV
pub fn export_transactions_csv<W: Write>(
    db: &Database,
    filter: &TransactionFilter<'_>,
    writer: W,
) -> Result<usize> {
    let transactions = db.list_transactions(filter)?;
    let count = write_transactions_csv(&transactions, writer)?;
    info!("Exported {} transactions to CSV", count);
    Ok(count)
}

/// Write every transaction as a pretty-printed JSON array
pub fn backup_json<W: Write>(db: &Database, mut writer: W) -> Result<usize> {
    let transactions = db.list_all_transactions()?;
    serde_json::to_writer_pretty(&mut writer, &transactions)?;
    writer.flush()?;
    info!("Backed up {} transactions to JSON", transactions.len());
    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTransaction, TransactionKind};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn seed(db: &Database) {
        for (title, amount, category, date) in [
            ("Pizza", 10.5, Some("Food"), "2024-01-10"),
            ("Cab, late night", 22.0, None, "2024-01-12"),
        ] {
            db.insert_transaction(&NewTransaction {
                kind: TransactionKind::Expense,
                title: title.into(),
                amount,
                category: category.map(String::from),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                notes: String::new(),
                created_at: Utc.with_ymd_and_hms(2024, 1, 13, 8, 0, 0).unwrap(),
            })
            .unwrap();
        }
    }

    #[test]
    fn test_csv_export() {
        let db = Database::in_memory().unwrap();
        seed(&db);

        let mut out = Vec::new();
        let count = export_transactions_csv(&db, &TransactionFilter::new(), &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,kind,title,amount,category,date,notes,created_at");
        assert_eq!(
            lines[1],
            "2,expense,\"Cab, late night\",22,,2024-01-12,,2024-01-13 08:00:00"
        );
        assert_eq!(lines[2], "1,expense,Pizza,10.5,Food,2024-01-10,,2024-01-13 08:00:00");
    }

    #[test]
    fn test_csv_export_respects_filter() {
        let db = Database::in_memory().unwrap();
        seed(&db);

        let mut out = Vec::new();
        let filter = TransactionFilter::new().category(Some("Food"));
        assert_eq!(export_transactions_csv(&db, &filter, &mut out).unwrap(), 1);
    }

    #[test]
    fn test_json_backup() {
        let db = Database::in_memory().unwrap();
        seed(&db);

        let mut out = Vec::new();
        assert_eq!(backup_json(&db, &mut out).unwrap(), 2);

        let parsed: Vec<Transaction> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Cab, late night");
        assert_eq!(parsed[1].category.as_deref(), Some("Food"));
    }
}

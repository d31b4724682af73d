//! CSV import and JSON restore
//!
//! Every record goes through `TransactionInput`, so imported rows get the
//! same validation and auto-categorization as hand-entered ones. A record
//! that fails validation is reported and skipped; a store failure stops
//! the import.

use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::categorize::Classifier;
use crate::error::{Error, Result};
use crate::models::TransactionInput;
use crate::store::LedgerStore;

/// Title given to imported records that have none
pub const IMPORTED_TITLE: &str = "Imported";

/// What happened to one imported record
#[derive(Debug)]
pub struct ImportOutcome {
    /// 1-based record number within the file
    pub row: usize,
    /// New transaction id, or why the record was rejected
    pub result: Result<i64>,
}

/// Per-record results of an import
#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    /// Number of records stored
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Records that were rejected
    pub fn failures(&self) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Shared settings for one import
pub struct Importer<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    classifier: &'a Classifier,
    today: NaiveDate,
    created_at: DateTime<Utc>,
}

impl<'a, S: LedgerStore + ?Sized> Importer<'a, S> {
    /// `today` fills missing dates; `created_at` stamps every new row
    pub fn new(
        store: &'a S,
        classifier: &'a Classifier,
        today: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            store,
            classifier,
            today,
            created_at,
        }
    }

    /// Import a CSV file with a header row naming any of
    /// `kind,title,amount,category,date,notes`
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<ImportReport> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut report = ImportReport::default();
        for (index, record) in rdr.deserialize::<TransactionInput>().enumerate() {
            let row = index + 1;
            match record {
                Ok(input) => self.record(&mut report, row, input)?,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => self.reject(&mut report, row, Error::InvalidData(e.to_string())),
            }
        }

        info!(
            "CSV import: {} inserted, {} rejected",
            report.inserted(),
            report.failures().count()
        );
        Ok(report)
    }

    /// Restore a JSON array of transaction objects (as written by a backup).
    ///
    /// Ids and creation times in the file are ignored. Amounts may be
    /// numbers or strings.
    pub fn restore_json<R: Read>(&self, reader: R) -> Result<ImportReport> {
        let data: Value = serde_json::from_reader(reader)?;
        let records = match data {
            Value::Array(records) => records,
            _ => {
                return Err(Error::InvalidData(
                    "backup must be a JSON array of transactions".into(),
                ))
            }
        };

        let mut report = ImportReport::default();
        for (index, value) in records.into_iter().enumerate() {
            let row = index + 1;
            match input_from_json(&value) {
                Some(input) => self.record(&mut report, row, input)?,
                None => self.reject(
                    &mut report,
                    row,
                    Error::InvalidData("record is not a JSON object".into()),
                ),
            }
        }

        info!(
            "JSON restore: {} inserted, {} rejected",
            report.inserted(),
            report.failures().count()
        );
        Ok(report)
    }

    fn record(&self, report: &mut ImportReport, row: usize, mut input: TransactionInput) -> Result<()> {
        let has_title = input.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_title {
            input.title = Some(IMPORTED_TITLE.to_string());
        }

        let inserted = input
            .into_new_transaction(self.classifier, self.today, self.created_at)
            .and_then(|tx| self.store.insert_transaction(&tx));

        match inserted {
            Ok(id) => report.outcomes.push(ImportOutcome { row, result: Ok(id) }),
            Err(e) if e.is_store_unavailable() => return Err(e),
            Err(e) => self.reject(report, row, e),
        }
        Ok(())
    }

    fn reject(&self, report: &mut ImportReport, row: usize, error: Error) {
        warn!("Skipping record {}: {}", row, error);
        report.outcomes.push(ImportOutcome {
            row,
            result: Err(error),
        });
    }
}

/// Map a JSON object to textual input fields; `None` if not an object
fn input_from_json(value: &Value) -> Option<TransactionInput> {
    let object = value.as_object()?;
    let field = |name: &str| -> Option<String> {
        match object.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    };

    Some(TransactionInput {
        kind: field("kind"),
        title: field("title"),
        amount: field("amount"),
        category: field("category"),
        date: field("date"),
        notes: field("notes"),
    })
}

//! Data models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::categorize::Classifier;
use crate::dates::{self, month_label};
use crate::error::{Error, Result};

/// Notes written on every transaction materialized from a recurring template
pub const RECURRING_NOTE: &str = "recurring";

/// Settings key of the monthly budget
pub const MONTHLY_BUDGET_KEY: &str = "monthly_budget";

/// Category label used when none is known
pub const OTHER_CATEGORY: &str = "Other";

/// Whether money went out or came in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(Error::InvalidData(format!(
                "Unknown kind: {} (valid: expense, income)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recurrence interval of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// The due date following `date`.
    ///
    /// Weekly adds exactly 7 days. Monthly keeps the day-of-month but clamps
    /// it to `dates::MONTHLY_DAY_CLAMP`, so it is not calendar-accurate past
    /// the 28th.
    pub fn advance(&self, date: NaiveDate) -> Result<NaiveDate> {
        match self {
            Self::Weekly => dates::add_weeks(date, 1),
            Self::Monthly => dates::add_month_clamped(date),
        }
    }
}

impl std::str::FromStr for Cadence {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(Error::InvalidData(format!(
                "Unknown cadence: {} (valid: weekly, monthly)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub title: String,
    /// Always positive; direction comes from `kind`
    pub amount: f64,
    pub category: Option<String>,
    /// Date the transaction is attributed to (not the creation date)
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction to be inserted (before the store assigns an id)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Check the invariants every stored transaction must hold
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_amount(self.amount)?;
        Ok(())
    }
}

/// Raw, untrusted transaction fields as they arrive from a form, CSV row or
/// JSON backup entry.
///
/// This is the only way user data becomes a `NewTransaction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionInput {
    /// Validate and convert.
    ///
    /// A blank kind means expense, a blank date means `today`, and a blank
    /// category is filled in by `classifier` from the title.
    pub fn into_new_transaction(
        self,
        classifier: &Classifier,
        today: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<NewTransaction> {
        let kind = match non_blank(self.kind) {
            Some(k) => k.parse()?,
            None => TransactionKind::Expense,
        };

        let title = non_blank(self.title).unwrap_or_default();
        validate_title(&title)?;

        let amount = match non_blank(self.amount) {
            Some(a) => parse_amount(&a)?,
            None => return Err(Error::InvalidAmount("amount is required".into())),
        };

        let date = match non_blank(self.date) {
            Some(d) => dates::parse_date(&d)?,
            None => today,
        };

        let category = non_blank(self.category).unwrap_or_else(|| classifier.classify(&title));

        Ok(NewTransaction {
            kind,
            title,
            amount,
            category: Some(category),
            date,
            notes: self.notes.unwrap_or_default(),
            created_at,
        })
    }
}

/// A recurring transaction definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub kind: TransactionKind,
    pub cadence: Cadence,
    /// Next date at which an instance should be materialized
    pub next_date: NaiveDate,
    /// Inactive templates are kept for history but never processed
    pub active: bool,
}

impl RecurringTemplate {
    /// The transaction this template produces for one due date
    pub fn materialize(&self, date: NaiveDate, created_at: DateTime<Utc>) -> NewTransaction {
        NewTransaction {
            kind: self.kind,
            title: self.title.clone(),
            amount: self.amount,
            category: self.category.clone(),
            date,
            notes: RECURRING_NOTE.to_string(),
            created_at,
        }
    }
}

/// A recurring template to be created
#[derive(Debug, Clone)]
pub struct NewRecurringTemplate {
    pub title: String,
    pub amount: f64,
    pub category: Option<String>,
    pub kind: TransactionKind,
    pub cadence: Cadence,
    pub next_date: NaiveDate,
}

impl NewRecurringTemplate {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_amount(self.amount)?;
        Ok(())
    }
}

/// Income and expense sums for a period; absent kinds are 0.0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KindTotals {
    pub expense: f64,
    pub income: f64,
}

impl KindTotals {
    pub fn get(&self, kind: TransactionKind) -> f64 {
        match kind {
            TransactionKind::Expense => self.expense,
            TransactionKind::Income => self.income,
        }
    }

    pub(crate) fn add(&mut self, kind: TransactionKind, amount: f64) {
        match kind {
            TransactionKind::Expense => self.expense += amount,
            TransactionKind::Income => self.income += amount,
        }
    }
}

/// Expense sum of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

/// A month's expense total in the trailing trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub amount: f64,
}

/// Monthly analytics for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// `YYYY-MM`
    pub month: String,
    pub totals: KindTotals,
    pub categories: Vec<CategoryAmount>,
    /// Six entries, oldest first, ending at the summarized month
    pub trend: Vec<TrendPoint>,
    pub budget: f64,
}

impl Summary {
    pub(crate) fn empty(year: i32, month: u32) -> Self {
        Self {
            month: month_label(year, month),
            totals: KindTotals::default(),
            categories: Vec::new(),
            trend: Vec::new(),
            budget: 0.0,
        }
    }
}

/// Parse an amount string at the input boundary (rejects non-positive values)
pub fn parse_amount(s: &str) -> Result<f64> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(format!("'{}' is not a number", s)))?;
    validate_amount(value)
}

/// Parse a stored monthly budget; zero is allowed, non-numeric or
/// non-finite text is not
pub fn parse_budget(raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        Error::InvalidAmount(format!("stored {} '{}' is not a number", MONTHLY_BUDGET_KEY, raw))
    })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidAmount(format!(
            "stored {} '{}' is not finite",
            MONTHLY_BUDGET_KEY, raw
        )))
    }
}

fn validate_amount(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(format!("{} must be greater than 0", amount)))
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidData("title is required".into()));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

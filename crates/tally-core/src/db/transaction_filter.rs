//! Transaction filter builder for constructing dynamic SQL queries
//!
//! Shared by transaction listing and CSV export so both apply the same
//! WHERE clause.

use chrono::NaiveDate;

use crate::models::{TransactionKind, OTHER_CATEGORY};

/// Default row cap for listings
pub const DEFAULT_LIST_LIMIT: i64 = 500;

/// Builder for constructing transaction query filters
///
/// The lifetime `'query` represents how long borrowed filter parameters
/// (search text, category) must remain valid.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter<'query> {
    /// Substring of title or notes
    pub search: Option<&'query str>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<&'query str>,
    pub kind: Option<TransactionKind>,
    /// `None` means no limit
    pub limit: Option<i64>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY (and LIMIT, if any) clause
    pub order_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.from = date;
        self
    }

    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
        self.to = date;
        self
    }

    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(q) = self.search.map(str::trim).filter(|q| !q.is_empty()) {
            conditions.push("(title LIKE ? OR notes LIKE ?)".to_string());
            let pattern = format!("%{}%", q);
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        if let Some(from) = self.from {
            conditions.push("date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to {
            conditions.push("date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(category) = self.category.map(str::trim).filter(|c| !c.is_empty()) {
            // Missing and blank categories read as "Other", as in list_categories
            conditions.push("COALESCE(NULLIF(TRIM(category), ''), ?) = ?".to_string());
            params.push(Box::new(OTHER_CATEGORY));
            params.push(Box::new(category.to_string()));
        }

        if let Some(kind) = self.kind {
            conditions.push("kind = ?".to_string());
            params.push(Box::new(kind.as_str()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let mut order_clause = "ORDER BY date DESC, id DESC".to_string();
        if let Some(limit) = self.limit {
            order_clause.push_str(" LIMIT ?");
            params.push(Box::new(limit.max(0)));
        }

        FilterResult {
            where_clause,
            order_clause,
            params,
        }
    }
}

//! Keyword-based auto-categorization of transaction titles
//!
//! Rules are checked in order and the first keyword found anywhere in the
//! title (case-insensitive) decides the category. Titles matching nothing
//! fall back to "Other".

use serde::{Deserialize, Serialize};

use crate::models::OTHER_CATEGORY;

/// Built-in keyword table, in match order
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("pizza", "Food"),
    ("burger", "Food"),
    ("cafe", "Food"),
    ("lunch", "Food"),
    ("dinner", "Food"),
    ("uber", "Transport"),
    ("bus", "Transport"),
    ("cab", "Transport"),
    ("train", "Transport"),
    ("grocery", "Groceries"),
    ("supermarket", "Groceries"),
    ("flipkart", "Shopping"),
    ("amazon", "Shopping"),
    ("rent", "Rent"),
    ("salary", "Income"),
    ("stipend", "Income"),
    ("subscription", "Bills"),
    ("netflix", "Entertainment"),
];

/// One keyword → category mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

/// Ordered keyword classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
}

impl Classifier {
    /// Build from rules in match order. Empty keywords are dropped.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|r| !r.keyword.trim().is_empty())
            .map(|r| CategoryRule {
                keyword: r.keyword.trim().to_lowercase(),
                category: r.category,
            })
            .collect();
        Self { rules }
    }

    pub fn default_rules() -> Vec<CategoryRule> {
        DEFAULT_RULES
            .iter()
            .map(|(keyword, category)| CategoryRule {
                keyword: keyword.to_string(),
                category: category.to_string(),
            })
            .collect()
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category for a title
    pub fn classify(&self, title: &str) -> String {
        let title = title.to_lowercase();
        self.rules
            .iter()
            .find(|r| title.contains(&r.keyword))
            .map(|r| r.category.clone())
            .unwrap_or_else(|| OTHER_CATEGORY.to_string())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

/// Classify with the built-in keyword table
pub fn classify(title: &str) -> String {
    Classifier::default().classify(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defaults() {
        assert_eq!(classify("Pizza night"), "Food");
        assert_eq!(classify("random gibberish"), "Other");
        assert_eq!(classify("Monthly SALARY"), "Income");
        assert_eq!(classify("NETFLIX.COM"), "Entertainment");
        assert_eq!(classify(""), "Other");
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("UBER trip"), "Transport");
        assert_eq!(classify("uber trip"), "Transport");
        assert_eq!(classify("UbEr TrIp"), "Transport");
    }

    #[test]
    fn test_first_rule_in_order_wins() {
        // "pizza" precedes "amazon" in the table
        assert_eq!(classify("Amazon pizza order"), "Food");

        let classifier = Classifier::new(vec![
            CategoryRule {
                keyword: "amazon".into(),
                category: "Shopping".into(),
            },
            CategoryRule {
                keyword: "pizza".into(),
                category: "Food".into(),
            },
        ]);
        assert_eq!(classifier.classify("Amazon pizza order"), "Shopping");
    }

    #[test]
    fn test_substring_match() {
        // "bus" inside "business" still matches; this is substring matching
        assert_eq!(classify("Business cards"), "Transport");
        assert_eq!(classify("Parents evening snacks"), "Rent");
    }

    #[test]
    fn test_custom_rules_are_normalized() {
        let classifier = Classifier::new(vec![
            CategoryRule {
                keyword: "  GYM ".into(),
                category: "Health".into(),
            },
            CategoryRule {
                keyword: "".into(),
                category: "Ignored".into(),
            },
        ]);
        assert_eq!(classifier.rules().len(), 1);
        assert_eq!(classifier.classify("gym membership"), "Health");
        assert_eq!(classifier.classify("anything else"), "Other");
    }
}

//! Keyword tables driving classification.
//!
//! Everything the classifier knows about language lives here as plain data:
//! the query keywords, the expense/income signal patterns, and the ordered
//! domain rules. The CLI can replace the whole table from its config file.
//!
//! Domain rules are evaluated top to bottom and every matching rule
//! overwrites the category, so the LAST matching rule wins.

use pocketlog_core::TransactionKind;
use serde::{Deserialize, Serialize};

/// One topical override: if `pattern` matches the lowercased message, file
/// it under `category`, and optionally turn on the `force` signal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainRule {
    pub name: String,
    /// Regex, matched against the lowercased message
    pub pattern: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<TransactionKind>,
}

impl DomainRule {
    pub fn new(name: &str, pattern: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            category: category.to_string(),
            force: None,
        }
    }

    pub fn forcing(mut self, kind: TransactionKind) -> Self {
        self.force = Some(kind);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordTable {
    /// Plain substrings that turn a message into a balance query
    pub query: Vec<String>,
    /// Regexes signalling money going out
    pub expense: Vec<String>,
    /// Regexes signalling money coming in
    pub income: Vec<String>,
    /// Ordered, later-wins
    pub rules: Vec<DomainRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            query: strings(&["balance", "summary", "total", "how much"]),
            expense: strings(&["spent", "paid", "bought", "expense", "cost", r"-[$€£¥]?\d"]),
            income: strings(&["earned", "received", "got paid", "income", "salary", r"\+[$€£¥]?\d"]),
            rules: vec![
                DomainRule::new(
                    "food",
                    "food|meal|coffee|restaurant|grocer|eat|lunch|dinner|breakfast",
                    "Food",
                ),
                DomainRule::new(
                    "transport",
                    "uber|lyft|taxi|gas|fuel|train|bus|transport",
                    "Transport",
                ),
                DomainRule::new(
                    "entertainment",
                    "netflix|spotify|movie|game|entertainment",
                    "Entertainment",
                ),
                DomainRule::new("bills", "electric|water|internet|rent|bill", "Bills"),
                DomainRule::new("salary", "salary|paycheck", "Salary")
                    .forcing(TransactionKind::Income),
                DomainRule::new("freelance", "freelance|client|project", "Freelance")
                    .forcing(TransactionKind::Income),
            ],
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

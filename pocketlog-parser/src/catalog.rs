//! The fixed set of category labels a transaction can be filed under.

use serde::{Deserialize, Serialize};

/// A list left out of a config section keeps its default labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CategoryCatalog {
    pub income: Vec<String>,
    pub expense: Vec<String>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(
            ["Salary", "Freelance", "Investment", "Other"],
            ["Food", "Transport", "Entertainment", "Bills", "Shopping", "Health", "Other"],
        )
    }
}

impl CategoryCatalog {
    pub fn new<I, E>(income: I, expense: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            income: income.into_iter().map(Into::into).collect(),
            expense: expense.into_iter().map(Into::into).collect(),
        }
    }

    /// All labels, income first, each list in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.income.iter().chain(self.expense.iter()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    /// First label whose lowercased name occurs in `lowered`.
    /// Blank labels never match.
    pub fn find_in(&self, lowered: &str) -> Option<&str> {
        self.iter()
            .filter(|c| !c.trim().is_empty())
            .find(|c| lowered.contains(&c.to_lowercase()))
    }
}

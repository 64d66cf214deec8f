//! Transaction record types kept by the chat ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of money flow for a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl TransactionKind {
    /// Multiplier applied to an amount when computing a balance
    pub fn sign(&self) -> f64 {
        match self {
            TransactionKind::Income => 1.0,
            TransactionKind::Expense => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction logged from a chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Ledger-assigned identifier (`tx-0001`, `tx-0002`, ...)
    pub id: String,
    pub kind: TransactionKind,
    /// Always positive; direction is carried by `kind`
    pub amount: f64,
    pub category: String,
    /// The raw message the transaction was parsed from
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Positive for income, negative for expenses
    pub fn signed_amount(&self) -> f64 {
        self.amount * self.kind.sign()
    }
}

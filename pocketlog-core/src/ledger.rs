//! Ledger: in-memory, append-only list of chat transactions.
//!
//! The chat layer owns one ledger per session. Nothing is persisted:
//! records live as long as the process does.
//!
//! Ids are sequential (`tx-0001`, `tx-0002`, ...) and never reused.
//! Totals are recomputed from the records on demand, so they can never
//! drift from what the transaction list shows.

use crate::error::LedgerError;
use crate::record::{TransactionKind, TransactionRecord};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;

/// Running totals over every record in a ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    /// income - expense
    pub balance: f64,
}

#[derive(Debug, Default, Clone)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
    next_id: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Append a transaction, stamping it with a fresh id and the current time.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&TransactionRecord, LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            tracing::warn!(amount, "rejecting transaction with non-positive amount");
            return Err(LedgerError::InvalidAmount(amount));
        }
        let category = category.into();
        if category.trim().is_empty() {
            tracing::warn!("rejecting transaction with empty category");
            return Err(LedgerError::EmptyCategory);
        }

        self.next_id += 1;
        let record = TransactionRecord {
            id: format!("tx-{:04}", self.next_id),
            kind,
            amount,
            category,
            description: description.into(),
            created_at: Utc::now(),
        };
        tracing::info!(id = %record.id, kind = %record.kind, amount, category = %record.category, "recorded transaction");

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for r in &self.records {
            if r.is_expense() {
                totals.expense += r.amount;
            } else {
                totals.income += r.amount;
            }
            totals.balance += r.signed_amount();
        }
        totals
    }

    /// Up to `n` records, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().rev().take(n)
    }

    /// Per-category sums for one kind, largest first (ties broken by name).
    pub fn by_category(&self, kind: TransactionKind) -> Vec<(String, f64)> {
        let mut sums: HashMap<&str, f64> = HashMap::new();
        for r in self.records.iter().filter(|r| r.kind == kind) {
            *sums.entry(r.category.as_str()).or_insert(0.0) += r.amount;
        }

        let mut out: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

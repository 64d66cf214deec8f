//! Chat reply templates.

use pocketlog_core::{format_money, Ledger, Totals, TransactionKind, TransactionRecord};
use pocketlog_parser::CategoryCatalog;

pub fn balance(totals: &Totals) -> String {
    format!(
        "Your current balance is {}.\nIncome: {} | Expenses: {}",
        format_money(totals.balance),
        format_money(totals.income),
        format_money(totals.expense)
    )
}

pub fn recorded(record: &TransactionRecord, totals: &Totals) -> String {
    format!(
        "Recorded {} of {} for {}.\nYour balance is now {}.",
        record.kind,
        format_money(record.amount),
        record.category,
        format_money(totals.balance)
    )
}

pub fn unrecognized() -> String {
    "I couldn't find an amount in that. Try something like:\n\
- \"Spent $25 on lunch\"\n\
- \"Got paid $3000 salary\"\n\
- \"What's my balance?\""
        .to_string()
}

pub fn help() -> String {
    "Tell me what you spent or earned, with an amount:\n\
- \"Spent $50 on groceries\" or \"-20 lunch\"\n\
- \"Received $500 freelance payment\" or \"+100 gift\"\n\
- \"What's my balance?\"\n\
\nCommands: /help /summary /list /categories"
        .to_string()
}

pub fn summary(ledger: &Ledger) -> String {
    let mut out = balance(&ledger.totals());
    let spending = ledger.by_category(TransactionKind::Expense);
    if spending.is_empty() {
        out.push_str("\nNo expenses yet.");
        return out;
    }
    out.push_str("\nSpending by category:");
    for (category, total) in spending {
        out.push_str(&format!("\n- {category}: {}", format_money(total)));
    }
    out
}

pub fn list(ledger: &Ledger, limit: usize) -> String {
    if ledger.is_empty() {
        return "No transactions yet.".to_string();
    }
    let mut out = format!("Last {} transaction(s):", ledger.len().min(limit));
    for r in ledger.recent(limit) {
        out.push_str(&format!("\n{}", list_line(r)));
    }
    out
}

/// One transaction as shown in /list and the side panel
pub fn list_line(r: &TransactionRecord) -> String {
    format!(
        "{} {}{} {} ({})",
        r.created_at.format("%H:%M"),
        if r.is_income() { "+" } else { "-" },
        format_money(r.amount),
        r.category,
        r.id
    )
}

pub fn categories(catalog: &CategoryCatalog) -> String {
    format!(
        "Income categories: {}\nExpense categories: {}",
        catalog.income.join(", "),
        catalog.expense.join(", ")
    )
}

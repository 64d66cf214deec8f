use pocketlog_core::{Ledger, TransactionKind};
use pocketlog_parser::{classify, CategoryCatalog, ClassificationResult, Classifier};

fn transaction(kind: TransactionKind, amount: f64, category: &str, description: &str) -> ClassificationResult {
    ClassificationResult::Transaction {
        kind,
        amount,
        category: category.to_string(),
        description: description.to_string(),
    }
}

#[test]
fn test_chat_scenarios() {
    let catalog = CategoryCatalog::default();

    assert_eq!(
        classify("Spent $50 on groceries", &catalog),
        transaction(TransactionKind::Expense, 50.0, "Food", "Spent $50 on groceries")
    );
    assert_eq!(
        classify("Got paid $3000 salary", &catalog),
        transaction(TransactionKind::Income, 3000.0, "Salary", "Got paid $3000 salary")
    );
    assert_eq!(classify("What's my balance?", &catalog), ClassificationResult::Query);
    assert_eq!(classify("asdf no numbers here", &catalog), ClassificationResult::Unrecognized);
    assert_eq!(
        classify("Received $500 freelance payment", &catalog),
        transaction(TransactionKind::Income, 500.0, "Freelance", "Received $500 freelance payment")
    );
    assert_eq!(
        classify("-20 lunch", &catalog),
        transaction(TransactionKind::Expense, 20.0, "Food", "-20 lunch")
    );
}

#[test]
fn test_query_keywords_ignore_case_and_amounts() {
    let catalog = CategoryCatalog::default();
    for input in [
        "BALANCE",
        "monthly Summary please",
        "what's the total after $30",
        "How much did I spend on food, 20?",
    ] {
        assert_eq!(classify(input, &catalog), ClassificationResult::Query, "{input}");
    }
}

#[test]
fn test_amount_precision() {
    let catalog = CategoryCatalog::default();
    let amount = |input: &str| match classify(input, &catalog) {
        ClassificationResult::Transaction { amount, .. } => Some(amount),
        _ => None,
    };
    assert_eq!(amount("spent $45.5"), Some(45.5));
    assert_eq!(amount("spent 45.50"), Some(45.5));
    assert_eq!(amount("spent 45.555"), None);
    assert_eq!(classify("45.555", &catalog), ClassificationResult::Unrecognized);
}

#[test]
fn test_later_domain_rule_forces_income() {
    let r = classify("Spent $12 on netflix and salary", &CategoryCatalog::default());
    assert_eq!(
        r,
        transaction(TransactionKind::Income, 12.0, "Salary", "Spent $12 on netflix and salary")
    );
}

#[test]
fn test_classify_is_idempotent() {
    let catalog = CategoryCatalog::default();
    let classifier = Classifier::default();
    for input in ["Spent $50 on groceries", "-20 lunch", "balance", "hello"] {
        assert_eq!(classifier.classify(input, &catalog), classifier.classify(input, &catalog));
        assert_eq!(classify(input, &catalog), classifier.classify(input, &catalog));
    }
}

#[test]
fn test_results_feed_a_ledger() {
    let catalog = CategoryCatalog::default();
    let mut ledger = Ledger::new();

    for input in ["Got paid $3000 salary", "Spent $50 on groceries", "-20 lunch", "uber 15.25"] {
        if let ClassificationResult::Transaction {
            kind,
            amount,
            category,
            description,
        } = classify(input, &catalog)
        {
            ledger.record(kind, amount, category, description).unwrap();
        }
    }

    let totals = ledger.totals();
    assert_eq!(ledger.len(), 4);
    assert_eq!(totals.income, 3000.0);
    assert_eq!(totals.expense, 85.25);
    assert_eq!(totals.balance, 2914.75);
}

//! One chat session: classifier + catalog + the ledger the messages build up.

use anyhow::{Context, Result};
use pocketlog_core::Ledger;
use pocketlog_parser::{CategoryCatalog, ClassificationResult, Classifier, KeywordTable};

use crate::config::Config;
use crate::reply;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Query,
    Recorded,
    Rejected,
    Unrecognized,
    Command,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub outcome: Outcome,
    pub text: String,
}

pub struct Session {
    classifier: Classifier,
    catalog: CategoryCatalog,
    ledger: Ledger,
    recent_limit: usize,
}

impl Session {
    pub fn new(classifier: Classifier, catalog: CategoryCatalog, recent_limit: usize) -> Self {
        Self {
            classifier,
            catalog,
            ledger: Ledger::new(),
            recent_limit,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let table = cfg.keyword_table();
        for rule in uncatalogued_rules(&table, &cfg.catalog) {
            tracing::warn!(rule, "domain rule files under a category missing from the catalog");
        }
        let classifier = Classifier::new(&table).context("compile keyword table")?;
        Ok(Self::new(classifier, cfg.catalog.clone(), cfg.chat.recent_limit))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Handle one message. Blank input gets no reply.
    /// Transactions keep the message exactly as typed as their description.
    pub fn handle(&mut self, input: &str) -> Option<Reply> {
        let command = input.trim();
        if command.is_empty() {
            return None;
        }
        if command.starts_with('/') {
            return Some(Reply {
                outcome: Outcome::Command,
                text: self.slash(command),
            });
        }

        let reply = match self.classifier.classify(input, &self.catalog) {
            ClassificationResult::Query => Reply {
                outcome: Outcome::Query,
                text: reply::balance(&self.ledger.totals()),
            },
            ClassificationResult::Transaction {
                kind,
                amount,
                category,
                description,
            } => match self.ledger.record(kind, amount, category, description) {
                Ok(record) => {
                    let record = record.clone();
                    Reply {
                        outcome: Outcome::Recorded,
                        text: reply::recorded(&record, &self.ledger.totals()),
                    }
                }
                Err(e) => Reply {
                    outcome: Outcome::Rejected,
                    text: format!("I couldn't record that: {e}."),
                },
            },
            ClassificationResult::Unrecognized => {
                tracing::info!(input, "unrecognized message");
                Reply {
                    outcome: Outcome::Unrecognized,
                    text: reply::unrecognized(),
                }
            }
        };
        Some(reply)
    }

    fn slash(&self, command: &str) -> String {
        match command {
            "/help" => reply::help(),
            "/summary" => reply::summary(&self.ledger),
            "/list" => reply::list(&self.ledger, self.recent_limit),
            "/categories" => reply::categories(&self.catalog),
            _ => "Unknown command. Try /help".to_string(),
        }
    }
}

/// Names of domain rules whose category the catalog does not list
fn uncatalogued_rules<'a>(table: &'a KeywordTable, catalog: &CategoryCatalog) -> Vec<&'a str> {
    table
        .rules
        .iter()
        .filter(|r| !catalog.contains(&r.category))
        .map(|r| r.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pocketlog_core::TransactionKind;

    fn session() -> Session {
        Session::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_transaction_updates_ledger() {
        let mut s = session();
        let reply = s.handle("Got paid $3000 salary").unwrap();
        assert_eq!(reply.outcome, Outcome::Recorded);
        assert_eq!(
            reply.text,
            "Recorded income of $3,000.00 for Salary.\nYour balance is now $3,000.00."
        );

        let reply = s.handle("Spent $50 on groceries").unwrap();
        assert!(reply.text.contains("expense of $50.00 for Food"));
        assert!(reply.text.ends_with("$2,950.00."));

        let record = &s.ledger().records()[1];
        assert_eq!(record.kind, TransactionKind::Expense);
        assert_eq!(record.description, "Spent $50 on groceries");
    }

    #[test]
    fn test_query_reports_totals() {
        let mut s = session();
        s.handle("-20 lunch");
        let reply = s.handle("What's my balance?").unwrap();
        assert_eq!(reply.outcome, Outcome::Query);
        assert!(reply.text.starts_with("Your current balance is -$20.00."));
        assert_eq!(s.ledger().len(), 1);
    }

    #[test]
    fn test_unrecognized_leaves_ledger_alone() {
        let mut s = session();
        let reply = s.handle("asdf no numbers here").unwrap();
        assert_eq!(reply.outcome, Outcome::Unrecognized);
        assert!(reply.text.contains("Spent $25 on lunch"));
        assert!(s.ledger().is_empty());
    }

    #[test]
    fn test_description_keeps_surrounding_whitespace() {
        let mut s = session();
        let reply = s.handle("  -20 lunch ").unwrap();
        assert_eq!(reply.outcome, Outcome::Recorded);
        assert_eq!(s.ledger().records()[0].description, "  -20 lunch ");
        assert_eq!(s.handle("  /help ").unwrap().outcome, Outcome::Command);
    }

    #[test]
    fn test_uncatalogued_rules() {
        let table = KeywordTable::default();
        assert!(uncatalogued_rules(&table, &CategoryCatalog::default()).is_empty());

        let narrow = CategoryCatalog::new(["salary"], ["Food"]);
        assert_eq!(
            uncatalogued_rules(&table, &narrow),
            vec!["transport", "entertainment", "bills", "freelance"]
        );
    }

    #[test]
    fn test_blank_input_is_ignored() {
        assert_eq!(session().handle("   "), None);
    }

    #[test]
    fn test_slash_commands() {
        let mut s = session();
        assert!(s.handle("/help").unwrap().text.contains("/summary"));
        assert_eq!(s.handle("/list").unwrap().text, "No transactions yet.");
        assert!(s.handle("/categories").unwrap().text.contains("Freelance"));
        assert_eq!(s.handle("/nope").unwrap().text, "Unknown command. Try /help");

        s.handle("uber 12");
        let list = s.handle("/list").unwrap().text;
        assert!(list.contains("-$12.00 Transport (tx-0001)"));
    }

    #[test]
    fn test_custom_config_catalog() {
        let cfg = crate::config::parse_config(
            r#"
[catalog]
income = ["Salary"]
expense = ["Pets"]
"#,
        )
        .unwrap();
        let mut s = Session::from_config(&cfg).unwrap();
        s.handle("spent 40 on pets");
        assert_eq!(s.ledger().records()[0].category, "Pets");
    }
}

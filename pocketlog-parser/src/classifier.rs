//! Transaction text classifier.
//!
//! Pipeline, on the lowercased message:
//! 1. query keyword → `Query` (nothing else runs)
//! 2. expense / income signals (both kept)
//! 3. first valid amount, or `Unrecognized`
//! 4. first catalog label contained in the message, else "Other"
//! 5. domain rules in order, later match overwrites category; a rule may
//!    switch a signal on
//! 6. income if the income signal is on, else `DEFAULT_TRANSACTION_KIND`

use pocketlog_core::TransactionKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::amount::find_amount;
use crate::catalog::CategoryCatalog;
use crate::error::ParserError;
use crate::keywords::KeywordTable;

/// Kind used when no income signal fired, including when no signal fired at all.
pub const DEFAULT_TRANSACTION_KIND: TransactionKind = TransactionKind::Expense;

/// Category used when neither the catalog nor a domain rule matched.
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// The user asked for their balance or a summary
    Query,
    Transaction {
        kind: TransactionKind,
        amount: f64,
        category: String,
        description: String,
    },
    /// No amount could be found
    Unrecognized,
}

/// Why a transaction ended up with its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "rule", rename_all = "snake_case")]
pub enum KindSource {
    IncomeSignal,
    ForcedByRule(String),
    DefaultPolicy,
}

/// Classification result plus the trace of every stage that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub result: ClassificationResult,
    pub query_keyword: Option<String>,
    pub expense_signal: bool,
    pub income_signal: bool,
    pub amount_text: Option<String>,
    pub catalog_match: Option<String>,
    /// Names of matching domain rules, in evaluation order
    pub fired_rules: Vec<String>,
    pub kind_source: Option<KindSource>,
}

impl Explanation {
    fn new() -> Self {
        Self {
            result: ClassificationResult::Unrecognized,
            query_keyword: None,
            expense_signal: false,
            income_signal: false,
            amount_text: None,
            catalog_match: None,
            fired_rules: Vec::new(),
            kind_source: None,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    re: Regex,
    category: String,
    force: Option<TransactionKind>,
}

/// A keyword table compiled once, ready to classify any number of messages.
#[derive(Debug, Clone)]
pub struct Classifier {
    query: Vec<String>,
    expense: Option<Regex>,
    income: Option<Regex>,
    rules: Vec<CompiledRule>,
}

impl Classifier {
    pub fn new(table: &KeywordTable) -> Result<Self, ParserError> {
        let rules = table
            .rules
            .iter()
            .map(|rule| {
                if rule.category.trim().is_empty() {
                    return Err(ParserError::EmptyCategory {
                        rule: rule.name.clone(),
                    });
                }
                Ok(CompiledRule {
                    name: rule.name.clone(),
                    re: compile(&format!("rule '{}'", rule.name), &rule.pattern)?,
                    category: rule.category.clone(),
                    force: rule.force,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            query: table
                .query
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            expense: compile_any("expense signals", &table.expense)?,
            income: compile_any("income signals", &table.income)?,
            rules,
        })
    }

    pub fn classify(&self, input: &str, catalog: &CategoryCatalog) -> ClassificationResult {
        self.explain(input, catalog).result
    }

    pub fn explain(&self, input: &str, catalog: &CategoryCatalog) -> Explanation {
        let lowered = input.to_lowercase();
        let mut ex = Explanation::new();

        if let Some(keyword) = self.query.iter().find(|k| lowered.contains(k.as_str())) {
            tracing::debug!(keyword = %keyword, "balance query");
            ex.query_keyword = Some(keyword.clone());
            ex.result = ClassificationResult::Query;
            return ex;
        }

        ex.expense_signal = signal_hit(&self.expense, &lowered);
        ex.income_signal = signal_hit(&self.income, &lowered);

        let Some(amount) = find_amount(&lowered) else {
            tracing::debug!("no amount found");
            return ex;
        };
        ex.amount_text = Some(amount.text);

        let mut category = FALLBACK_CATEGORY.to_string();
        if let Some(name) = catalog.find_in(&lowered) {
            category = name.to_string();
            ex.catalog_match = Some(name.to_string());
        }

        let mut forced_income: Option<&str> = None;
        for rule in self.rules.iter().filter(|r| r.re.is_match(&lowered)) {
            category = rule.category.clone();
            ex.fired_rules.push(rule.name.clone());
            match rule.force {
                Some(TransactionKind::Income) => forced_income = Some(rule.name.as_str()),
                Some(TransactionKind::Expense) => ex.expense_signal = true,
                None => {}
            }
        }

        let (kind, source) = if ex.income_signal {
            (TransactionKind::Income, KindSource::IncomeSignal)
        } else if let Some(rule) = forced_income {
            (TransactionKind::Income, KindSource::ForcedByRule(rule.to_string()))
        } else {
            (DEFAULT_TRANSACTION_KIND, KindSource::DefaultPolicy)
        };
        if forced_income.is_some() {
            ex.income_signal = true;
        }
        ex.kind_source = Some(source);

        tracing::debug!(
            %kind,
            amount = amount.value,
            category = %category,
            rules = ?ex.fired_rules,
            "classified transaction"
        );

        ex.result = ClassificationResult::Transaction {
            kind,
            amount: amount.value,
            category,
            description: input.to_string(),
        };
        ex
    }
}

impl Default for Classifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| {
    Classifier::new(&KeywordTable::default()).expect("built-in keyword table compiles")
});

/// Classify with the built-in keyword table.
pub fn classify(input: &str, catalog: &CategoryCatalog) -> ClassificationResult {
    DEFAULT_CLASSIFIER.classify(input, catalog)
}

fn compile(rule: &str, pattern: &str) -> Result<Regex, ParserError> {
    if pattern.is_empty() {
        return Err(ParserError::EmptyPattern {
            rule: rule.to_string(),
        });
    }
    Regex::new(pattern).map_err(|source| ParserError::InvalidPattern {
        rule: rule.to_string(),
        source,
    })
}

/// Join a pattern list into one alternation. An empty list never matches.
fn compile_any(rule: &str, patterns: &[String]) -> Result<Option<Regex>, ParserError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    // validate one by one so the error names the bad pattern
    for p in patterns {
        compile(&format!("{rule} ('{p}')"), p)?;
    }
    let joined = patterns
        .iter()
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    compile(rule, &joined).map(Some)
}

fn signal_hit(re: &Option<Regex>, lowered: &str) -> bool {
    re.as_ref().is_some_and(|re| re.is_match(lowered))
}

//! pocketlog-parser: turns a free-text chat message into a transaction or a balance query.
//!
//! No model involved: ordered keyword tables and one amount pattern cover the
//! messages people actually type ("Spent $50 on groceries", "-20 lunch").

pub mod amount;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod keywords;

pub use amount::extract_amount;
pub use catalog::CategoryCatalog;
pub use classifier::{
    classify, ClassificationResult, Classifier, Explanation, KindSource,
    DEFAULT_TRANSACTION_KIND,
};
pub use error::ParserError;
pub use keywords::{DomainRule, KeywordTable};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid pattern in {rule}: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("empty pattern in {rule}")]
    EmptyPattern { rule: String },

    #[error("rule {rule} has no category")]
    EmptyCategory { rule: String },
}

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("amount must be a positive number, got {0}")]
    InvalidAmount(f64),

    #[error("category must not be empty")]
    EmptyCategory,
}

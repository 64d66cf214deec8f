//! pocketlog-core: transaction records and the in-memory ledger behind the chat

pub mod error;
pub mod ledger;
pub mod money;
pub mod record;

pub use error::LedgerError;
pub use ledger::{Ledger, Totals};
pub use money::format_money;
pub use record::{TransactionKind, TransactionRecord};

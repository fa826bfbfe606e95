pub mod account;
pub mod constants;
pub mod error;
pub mod processor;
pub mod transaction;
pub mod types;

pub use account::{AccountRoot, AccountState};
pub use constants::*;
pub use error::SubmitError;
pub use processor::{apply, decode_submit_blob, validate, TransactionProcessor};
pub use transaction::{TecReason, Transaction, TransactionResult, TransactionType, TxBody};
pub use types::{AccountID, Amount, Drops};

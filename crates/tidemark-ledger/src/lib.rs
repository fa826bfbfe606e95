//! tidemark-ledger
//!
//! The linear ledger chain (genesis through the current close), account-state
//! invariant probes run after every apply, and the sync/reorg path that feeds
//! externally fetched ledgers into the chain.

pub mod chain;
pub mod error;
pub mod invariants;
pub mod ledger;
pub mod sync;

pub use chain::{transaction_merkle_root, LedgerManager};
pub use error::ChainError;
pub use invariants::{
    check_balance_conservation, check_ledger_sequence_monotonicity, check_sequence_monotonicity,
    check_total_coins_within_bound, report_violation, InvariantViolation,
};
pub use ledger::Ledger;
pub use sync::LedgerSync;

//! Ledger-chain error taxonomy (§7).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("expected ledger sequence {expected}, got {got}")]
    SequenceGap { expected: u32, got: u32 },

    #[error("ledger parent_hash does not match the current chain tip")]
    ParentHashMismatch,

    #[error("ledger data is structurally invalid")]
    InvalidLedgerData,
}

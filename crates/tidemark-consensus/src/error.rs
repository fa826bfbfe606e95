//! Consensus error taxonomy (§7). Consensus errors never terminate a round;
//! the offending proposal is simply dropped by the caller.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("proposal is structurally invalid")]
    InvalidProposal,

    #[error("proposal received from a validator outside the trusted UNL")]
    UntrustedValidator,

    #[error("proposal targets a different network or ledger lineage")]
    NetworkMismatch,
}

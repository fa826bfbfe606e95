//! A validator's proposed position for the current round (§3).

use serde::{Deserialize, Serialize};

/// What a validator (or this node) proposes the next ledger should contain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub prior_ledger: [u8; 32],
    pub transactions: Vec<[u8; 32]>,
    pub close_time: i64,
}

/// A signed proposal received from a peer validator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub validator_id: [u8; 32],
    pub ledger_seq: u32,
    pub close_time: i64,
    pub position: Position,
    pub signature: [u8; 64],
    pub timestamp: i64,
}

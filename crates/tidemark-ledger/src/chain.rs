//! Linear ledger history: closing new ledgers and extending the chain from
//! both the local consensus path and an external feed (§4.3, §4.9).

use tracing::{info, warn};

use tidemark_core::transaction::Transaction;
use tidemark_crypto::hash::sha512_half;

use crate::error::ChainError;
use crate::ledger::Ledger;

/// Build the transaction merkle root used as a closed ledger's
/// `transaction_hash` (§4.3 step 1).
///
/// Each leaf is `SHA-512-Half(account(20) ‖ sequence(4, BE) ‖ fee(8, BE))`.
/// Pairs are reduced by hashing their concatenation; an odd leaf at any level
/// is duplicated rather than carried forward unpaired. An empty transaction
/// set yields the zero hash.
pub fn transaction_merkle_root(txs: &[Transaction]) -> [u8; 32] {
    if txs.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<[u8; 32]> = txs
        .iter()
        .map(|tx| {
            let mut buf = Vec::with_capacity(20 + 4 + 8);
            buf.extend_from_slice(tx.account.as_bytes());
            buf.extend_from_slice(&tx.sequence.to_be_bytes());
            buf.extend_from_slice(&tx.fee.to_be_bytes());
            sha512_half(&buf)
        })
        .collect();

    while level.len() > 1 {
        if level.len() % 2 == 1 {
            let last = *level.last().unwrap();
            level.push(last);
        }
        level = level
            .chunks_exact(2)
            .map(|pair| {
                let mut buf = Vec::with_capacity(64);
                buf.extend_from_slice(&pair[0]);
                buf.extend_from_slice(&pair[1]);
                sha512_half(&buf)
            })
            .collect();
    }

    level[0]
}

/// Owns the append-only ledger history starting from genesis.
///
/// External consumers only ever see by-value `Ledger` snapshots; nothing
/// holds a reference back into this manager.
#[derive(Debug, Clone)]
pub struct LedgerManager {
    history: Vec<Ledger>,
}

impl Default for LedgerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerManager {
    /// A fresh manager seeded with the genesis ledger.
    pub fn new() -> Self {
        Self {
            history: vec![Ledger::genesis()],
        }
    }

    /// The current (most recently appended) ledger.
    pub fn current(&self) -> &Ledger {
        self.history.last().expect("genesis ledger always present")
    }

    pub fn get(&self, sequence: u32) -> Option<&Ledger> {
        self.history.iter().find(|l| l.sequence == sequence)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Close a new ledger over `txs` and append it to the chain (§4.3).
    ///
    /// `close_time` is supplied by the caller (wall-clock at the call site)
    /// rather than read internally, keeping this function a pure transform
    /// over its inputs.
    pub fn close_ledger(&mut self, txs: &[Transaction], close_time: i64) -> Ledger {
        let previous = self.current().clone();
        let transaction_hash = transaction_merkle_root(txs);
        // Simplified placeholder account-state commitment (§9 open question a):
        // a real state tree is out of scope for this core.
        let account_state_hash = sha512_half(&previous.hash);
        let sequence = previous.sequence + 1;
        let close_flags = 0u32;

        let hash = Ledger::compute_hash(
            sequence,
            &previous.hash,
            close_time,
            &account_state_hash,
            &transaction_hash,
            close_flags,
        );

        let ledger = Ledger {
            sequence,
            hash,
            parent_hash: previous.hash,
            close_time,
            close_time_resolution: previous.close_time_resolution,
            total_coins: previous.total_coins,
            account_state_hash,
            transaction_hash,
            close_flags,
            parent_close_time: previous.close_time,
        };

        info!(sequence, tx_count = txs.len(), "ledger closed");
        self.history.push(ledger.clone());
        ledger
    }

    /// Append an externally sourced ledger, enforcing chain continuity
    /// (§4.3 `appendLedger`).
    pub fn append_ledger(&mut self, ledger: Ledger) -> Result<(), ChainError> {
        let current = self.current();
        if ledger.sequence != current.sequence + 1 {
            return Err(ChainError::SequenceGap {
                expected: current.sequence + 1,
                got: ledger.sequence,
            });
        }
        if ledger.parent_hash != current.hash {
            return Err(ChainError::ParentHashMismatch);
        }
        if !ledger.hash_is_valid() {
            warn!(sequence = ledger.sequence, "appended ledger hash does not recompute");
        }
        self.history.push(ledger);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidemark_core::types::AccountID;

    fn make_tx(account: [u8; 20], sequence: u32, fee: u64) -> Transaction {
        Transaction {
            account: AccountID::from_bytes(account),
            sequence,
            fee,
            signing_pub_key: Vec::new(),
            txn_signature: Vec::new(),
            body: tidemark_core::transaction::TxBody::AccountSet,
        }
    }

    #[test]
    fn empty_tx_set_yields_zero_merkle_root() {
        assert_eq!(transaction_merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn odd_leaf_count_duplicates_the_last_leaf() {
        let txs = vec![
            make_tx([1u8; 20], 1, 10),
            make_tx([2u8; 20], 1, 10),
            make_tx([3u8; 20], 1, 10),
        ];
        let root = transaction_merkle_root(&txs);
        assert_ne!(root, [0u8; 32]);
    }

    #[test]
    fn close_ledger_chains_parent_hash_and_increments_sequence() {
        let mut mgr = LedgerManager::new();
        let genesis_hash = mgr.current().hash;
        let l1 = mgr.close_ledger(&[], 1000);
        assert_eq!(l1.sequence, 2);
        assert_eq!(l1.parent_hash, genesis_hash);
        assert!(l1.hash_is_valid());
        assert_eq!(mgr.current().hash, l1.hash);
    }

    #[test]
    fn append_ledger_rejects_sequence_gap() {
        let mut mgr = LedgerManager::new();
        let mut bad = mgr.current().clone();
        bad.sequence = 5;
        bad.parent_hash = mgr.current().hash;
        let err = mgr.append_ledger(bad).unwrap_err();
        assert_eq!(err, ChainError::SequenceGap { expected: 2, got: 5 });
    }

    #[test]
    fn append_ledger_rejects_parent_hash_mismatch() {
        let mut mgr = LedgerManager::new();
        let mut bad = mgr.current().clone();
        bad.sequence = 2;
        bad.parent_hash = [0xFF; 32];
        let err = mgr.append_ledger(bad).unwrap_err();
        assert_eq!(err, ChainError::ParentHashMismatch);
    }

    #[test]
    fn append_ledger_accepts_valid_successor() {
        let mut mgr = LedgerManager::new();
        let genesis_hash = mgr.current().hash;
        let account_state_hash = sha512_half(&genesis_hash);
        let hash = Ledger::compute_hash(2, &genesis_hash, 500, &account_state_hash, &[0u8; 32], 0);
        let next = Ledger {
            sequence: 2,
            hash,
            parent_hash: genesis_hash,
            close_time: 500,
            close_time_resolution: 10,
            total_coins: mgr.current().total_coins,
            account_state_hash,
            transaction_hash: [0u8; 32],
            close_flags: 0,
            parent_close_time: 0,
        };
        assert!(mgr.append_ledger(next).is_ok());
        assert_eq!(mgr.current().sequence, 2);
    }
}

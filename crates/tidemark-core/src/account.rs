//! Account state: the single on-chain record per AccountID (§3, §4.3).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{AccountID, Drops};

/// A single account's on-chain record.
///
/// Invariant: `sequence` never decreases; `balance <= MAX_XRP`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountRoot {
    pub account: AccountID,
    pub balance: Drops,
    pub flags: u32,
    pub owner_count: u32,
    pub previous_txn_id: [u8; 32],
    pub previous_txn_lgr_seq: u32,
    pub sequence: u32,
}

impl AccountRoot {
    /// A fresh account record with the given starting balance and sequence 1,
    /// the conventional starting sequence for a newly funded XRPL-style account.
    pub fn new(account: AccountID, balance: Drops) -> Self {
        Self {
            account,
            balance,
            flags: 0,
            owner_count: 0,
            previous_txn_id: [0u8; 32],
            previous_txn_lgr_seq: 0,
            sequence: 1,
        }
    }
}

/// A mapping AccountID → AccountRoot. Insertion order is irrelevant.
#[derive(Default, Debug, Clone)]
pub struct AccountState {
    accounts: HashMap<AccountID, AccountRoot>,
}

impl AccountState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &AccountID) -> Option<&AccountRoot> {
        self.accounts.get(id)
    }

    pub fn get_mut(&mut self, id: &AccountID) -> Option<&mut AccountRoot> {
        self.accounts.get_mut(id)
    }

    /// Insert or replace the record keyed by `root.account`.
    pub fn put(&mut self, root: AccountRoot) {
        self.accounts.insert(root.account, root);
    }

    pub fn contains(&self, id: &AccountID) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Wrapping sum of every account's balance, for invariant checks (§4.8).
    pub fn sum_balances(&self) -> Drops {
        self.accounts
            .values()
            .fold(0u64, |acc, root| acc.wrapping_add(root.balance))
    }

    pub fn for_each(&self, mut f: impl FnMut(&AccountRoot)) {
        for root in self.accounts.values() {
            f(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_account(id: [u8; 20], balance: Drops, sequence: u32) -> AccountRoot {
        let mut root = AccountRoot::new(AccountID::from_bytes(id), balance);
        root.sequence = sequence;
        root
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut state = AccountState::new();
        let id = AccountID::from_bytes([1u8; 20]);
        state.put(seed_account([1u8; 20], 1_000, 7));
        let root = state.get(&id).unwrap();
        assert_eq!(root.balance, 1_000);
        assert_eq!(root.sequence, 7);
    }

    #[test]
    fn put_replaces_existing_entry() {
        let mut state = AccountState::new();
        state.put(seed_account([2u8; 20], 100, 1));
        state.put(seed_account([2u8; 20], 200, 2));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&AccountID::from_bytes([2u8; 20])).unwrap().balance, 200);
    }

    #[test]
    fn sum_balances_adds_every_account() {
        let mut state = AccountState::new();
        state.put(seed_account([1u8; 20], 100, 1));
        state.put(seed_account([2u8; 20], 250, 1));
        assert_eq!(state.sum_balances(), 350);
    }

    #[test]
    fn contains_reflects_membership() {
        let mut state = AccountState::new();
        let id = AccountID::from_bytes([9u8; 20]);
        assert!(!state.contains(&id));
        state.put(seed_account([9u8; 20], 1, 1));
        assert!(state.contains(&id));
    }
}

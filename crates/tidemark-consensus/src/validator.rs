//! The trusted validator list (UNL) consensus agreement is measured against
//! (§3, §9: validators are referenced by id, never by pointer).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One validator's identity and trust status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    pub public_key: [u8; 33],
    pub node_id: [u8; 32],
    pub is_trusted: bool,
}

/// The Unique Node List: the set of validators this engine trusts for
/// agreement. A linear scan keyed by `node_id`; small by construction.
#[derive(Default, Debug, Clone)]
pub struct ValidatorSet {
    validators: HashMap<[u8; 32], ValidatorInfo>,
}

impl ValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: ValidatorInfo) {
        self.validators.insert(info.node_id, info);
    }

    pub fn get(&self, node_id: &[u8; 32]) -> Option<&ValidatorInfo> {
        self.validators.get(node_id)
    }

    /// Whether `node_id` names a validator that is both known and trusted.
    pub fn is_trusted(&self, node_id: &[u8; 32]) -> bool {
        self.validators.get(node_id).is_some_and(|v| v.is_trusted)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn trusted_ids(&self) -> impl Iterator<Item = &[u8; 32]> {
        self.validators.values().filter(|v| v.is_trusted).map(|v| &v.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(id: u8, trusted: bool) -> ValidatorInfo {
        ValidatorInfo {
            public_key: [id; 33],
            node_id: [id; 32],
            is_trusted: trusted,
        }
    }

    #[test]
    fn trusted_membership_is_queryable() {
        let mut unl = ValidatorSet::new();
        unl.add(validator(1, true));
        unl.add(validator(2, false));
        assert!(unl.is_trusted(&[1u8; 32]));
        assert!(!unl.is_trusted(&[2u8; 32]));
        assert!(!unl.is_trusted(&[3u8; 32]));
    }

    #[test]
    fn len_counts_all_entries_regardless_of_trust() {
        let mut unl = ValidatorSet::new();
        unl.add(validator(1, true));
        unl.add(validator(2, false));
        assert_eq!(unl.len(), 2);
    }
}

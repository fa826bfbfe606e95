use std::fmt;

use serde::{Deserialize, Serialize};

/// Indivisible currency unit. 1 XRP = 1,000,000 drops (§3).
pub type Drops = u64;

// ── AccountID ────────────────────────────────────────────────────────────────

/// 20-byte opaque account identifier, derived as RIPEMD-160(SHA-256(pubkey)).
/// Equality and hashing are bytewise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountID(pub [u8; 20]);

impl AccountID {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Derive an AccountID directly from a raw public key, per §4.2.
    pub fn from_pubkey(pubkey_bytes: &[u8]) -> Self {
        Self(tidemark_crypto::hash::account_id_from_pubkey(pubkey_bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let mut arr = [0u8; 20];
        let n = bytes.len().min(20);
        arr[..n].copy_from_slice(&bytes[..n]);
        Ok(Self(arr))
    }
}

impl fmt::Display for AccountID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountID({})", &self.to_hex()[..8])
    }
}

// ── Amount ───────────────────────────────────────────────────────────────────

/// Tagged currency amount: either native XRP (in drops) or an IOU denominated
/// in a third party's currency and issued by a specific account (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Amount {
    Xrp(Drops),
    Iou {
        currency_code: [u8; 20],
        issuer: AccountID,
        /// Signed decimal value, represented as a scaled integer (no
        /// fractional-currency arithmetic is exercised by this core).
        value: i64,
    },
}

impl Amount {
    /// Checked positivity predicate used by payment validation.
    pub fn is_positive(&self) -> bool {
        match self {
            Amount::Xrp(drops) => *drops > 0,
            Amount::Iou { value, .. } => *value > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_hex_round_trips() {
        let id = AccountID::from_bytes([7u8; 20]);
        let hex = id.to_hex();
        assert_eq!(AccountID::from_hex(&hex).unwrap(), id);
    }

    #[test]
    fn xrp_amount_positivity() {
        assert!(Amount::Xrp(1).is_positive());
        assert!(!Amount::Xrp(0).is_positive());
    }

    #[test]
    fn iou_amount_positivity() {
        let iou = Amount::Iou {
            currency_code: [0u8; 20],
            issuer: AccountID::from_bytes([1u8; 20]),
            value: -5,
        };
        assert!(!iou.is_positive());
    }
}

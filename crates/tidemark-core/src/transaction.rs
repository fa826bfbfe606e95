//! Transaction types and the outcome codes they can produce (§3, §4.4).

use serde::{Deserialize, Serialize};

use crate::types::{AccountID, Amount, Drops};

/// Transaction type codes (§3). Only `Payment` is exercised by the apply
/// pipeline; the others are accepted by validation but rejected at apply
/// time as unimplemented transactors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Payment,
    OfferCreate,
    OfferCancel,
    TrustSet,
    AccountSet,
}

impl TransactionType {
    pub fn as_u16(self) -> u16 {
        match self {
            TransactionType::Payment => 0,
            TransactionType::OfferCreate => 1,
            TransactionType::OfferCancel => 2,
            TransactionType::TrustSet => 3,
            TransactionType::AccountSet => 4,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            0 => Some(TransactionType::Payment),
            1 => Some(TransactionType::OfferCreate),
            2 => Some(TransactionType::OfferCancel),
            3 => Some(TransactionType::TrustSet),
            4 => Some(TransactionType::AccountSet),
            _ => None,
        }
    }
}

/// Type-specific transaction fields. Only `Payment` carries fields this core
/// inspects; the remaining bodies are placeholders recognized by decode but
/// not acted on by apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TxBody {
    Payment { destination: AccountID, amount: Amount },
    OfferCreate,
    OfferCancel,
    TrustSet,
    AccountSet,
}

impl TxBody {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TxBody::Payment { .. } => TransactionType::Payment,
            TxBody::OfferCreate => TransactionType::OfferCreate,
            TxBody::OfferCancel => TransactionType::OfferCancel,
            TxBody::TrustSet => TransactionType::TrustSet,
            TxBody::AccountSet => TransactionType::AccountSet,
        }
    }
}

/// A decoded transaction, common fields plus its type-specific body (§3).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub account: AccountID,
    pub sequence: u32,
    pub fee: Drops,
    pub signing_pub_key: Vec<u8>,
    pub txn_signature: Vec<u8>,
    pub body: TxBody,
}

/// Outcome classes mirroring the `tem`/`tel`/`ter`/`tec`/`tef`/`tes` families of
/// engine result codes (§4.4, §7): malformed, local-only, retriable, claimed
/// fee with no other effect, hard failure, and fully successful.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionResult {
    TesSuccess,
    TemMalformed,
    TelLocalError,
    TerRetry,
    TecClaimFee { reason: TecReason },
    TefFailure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TecReason {
    InsufficientBalance,
    UnfundedPayment,
}

impl TransactionResult {
    /// The engine-result string returned over RPC (§4.5, §4.7). The mapping
    /// is fixed regardless of the specific `TecReason`: every `tec_claim`
    /// outcome reports as `tecCLAIM`.
    pub fn engine_code(&self) -> &'static str {
        match self {
            TransactionResult::TesSuccess => "tesSUCCESS",
            TransactionResult::TemMalformed => "temMALFORMED",
            TransactionResult::TelLocalError => "telLOCAL_ERROR",
            TransactionResult::TerRetry => "terRETRY",
            TransactionResult::TecClaimFee { .. } => "tecCLAIM",
            TransactionResult::TefFailure => "tefFAILURE",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::TesSuccess)
    }
}

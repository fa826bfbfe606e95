//! Transaction validation, the submit wire format, and apply (§4.4, §4.5).

use std::collections::VecDeque;

use crate::account::AccountState;
use crate::constants::MIN_TX_FEE;
use crate::error::SubmitError;
use crate::transaction::{TecReason, Transaction, TransactionResult, TransactionType, TxBody};
use crate::types::{AccountID, Amount};

/// Check a transaction against account state without mutating anything (§4.4).
pub fn validate(tx: &Transaction, state: &AccountState) -> TransactionResult {
    let Some(account) = state.get(&tx.account) else {
        return TransactionResult::TelLocalError;
    };
    if tx.fee < MIN_TX_FEE {
        return TransactionResult::TemMalformed;
    }
    if account.balance < tx.fee {
        return TransactionResult::TecClaimFee {
            reason: TecReason::InsufficientBalance,
        };
    }
    if tx.sequence != account.sequence {
        return TransactionResult::TerRetry;
    }
    TransactionResult::TesSuccess
}

/// Decode a submit blob per §4.5's fixed big-endian layout.
pub fn decode_submit_blob(blob: &[u8]) -> Result<Transaction, SubmitError> {
    if blob.len() < 34 {
        return Err(SubmitError::InvalidTxBlob);
    }
    let tx_type_code = u16::from_be_bytes([blob[0], blob[1]]);
    let tx_type =
        TransactionType::from_u16(tx_type_code).ok_or(SubmitError::UnsupportedTransactionType(tx_type_code))?;

    let mut account_bytes = [0u8; 20];
    account_bytes.copy_from_slice(&blob[2..22]);
    let account = AccountID::from_bytes(account_bytes);

    let fee = u64::from_be_bytes(blob[22..30].try_into().unwrap());
    let sequence = u32::from_be_bytes(blob[30..34].try_into().unwrap());

    let body = match tx_type {
        TransactionType::Payment => {
            if blob.len() != 62 {
                return Err(SubmitError::InvalidTxBlob);
            }
            let mut destination_bytes = [0u8; 20];
            destination_bytes.copy_from_slice(&blob[34..54]);
            let destination = AccountID::from_bytes(destination_bytes);
            let amount = u64::from_be_bytes(blob[54..62].try_into().unwrap());
            TxBody::Payment {
                destination,
                amount: Amount::Xrp(amount),
            }
        }
        TransactionType::OfferCreate => {
            if blob.len() != 34 {
                return Err(SubmitError::InvalidTxBlob);
            }
            TxBody::OfferCreate
        }
        TransactionType::OfferCancel => {
            if blob.len() != 34 {
                return Err(SubmitError::InvalidTxBlob);
            }
            TxBody::OfferCancel
        }
        TransactionType::TrustSet => {
            if blob.len() != 34 {
                return Err(SubmitError::InvalidTxBlob);
            }
            TxBody::TrustSet
        }
        TransactionType::AccountSet => {
            if blob.len() != 34 {
                return Err(SubmitError::InvalidTxBlob);
            }
            TxBody::AccountSet
        }
    };

    Ok(Transaction {
        account,
        sequence,
        fee,
        signing_pub_key: Vec::new(),
        txn_signature: Vec::new(),
        body,
    })
}

/// Apply a decoded transaction to account state, enqueueing it on success.
///
/// `Ok(result)` where `result` is not `TesSuccess` means validation rejected
/// the transaction before any mutation occurred. `Err(_)` covers the
/// payment-specific apply failures in §4.5 step 2-4, which also leave state
/// untouched.
pub fn apply(
    tx: Transaction,
    state: &mut AccountState,
    pending: &mut VecDeque<Transaction>,
) -> Result<TransactionResult, SubmitError> {
    let result = validate(&tx, state);
    if !result.is_success() {
        return Ok(result);
    }

    match &tx.body {
        TxBody::Payment { destination, amount } => {
            if !state.contains(destination) {
                return Err(SubmitError::DestinationAccountNotFound);
            }
            let Amount::Xrp(amount_drops) = *amount else {
                return Err(SubmitError::InvalidPaymentAmount);
            };
            if amount_drops == 0 {
                return Err(SubmitError::InvalidPaymentAmount);
            }

            let sender = state.get(&tx.account).expect("validated above");
            let balance_after_fee = sender.balance - tx.fee;
            if balance_after_fee < amount_drops {
                return Err(SubmitError::InsufficientPaymentBalance);
            }

            let sender = state.get_mut(&tx.account).expect("validated above");
            sender.sequence += 1;
            sender.balance = balance_after_fee - amount_drops;

            let dest = state.get_mut(destination).expect("checked above");
            dest.balance += amount_drops;

            pending.push_back(tx);
            Ok(TransactionResult::TesSuccess)
        }
        _ => {
            let sender = state.get_mut(&tx.account).expect("validated above");
            sender.sequence += 1;
            sender.balance -= tx.fee;
            pending.push_back(tx);
            Ok(TransactionResult::TesSuccess)
        }
    }
}

/// Holds the FIFO pending-transaction queue for one node (§4.4).
#[derive(Default)]
pub struct TransactionProcessor {
    pending: VecDeque<Transaction>,
}

impl TransactionProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, tx: Transaction) {
        self.pending.push_back(tx);
    }

    pub fn get_pending(&self) -> &VecDeque<Transaction> {
        &self.pending
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn apply(
        &mut self,
        tx: Transaction,
        state: &mut AccountState,
    ) -> Result<TransactionResult, SubmitError> {
        apply(tx, state, &mut self.pending)
    }
}

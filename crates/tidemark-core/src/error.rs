//! Submit-path error taxonomy (§7).

use thiserror::Error;

/// Errors produced while decoding, validating, or applying a submitted
/// transaction blob. Names mirror §7's submit decode/apply error list;
/// several are retained for taxonomy completeness even though the current
/// `Payment`-only apply path never constructs them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("transaction blob could not be decoded")]
    InvalidTxBlob,

    #[error("transaction type {0} is not supported")]
    UnsupportedTransactionType(u16),

    #[error("destination account not found")]
    DestinationAccountNotFound,

    #[error("payment amount must be positive")]
    InvalidPaymentAmount,

    #[error("sender balance insufficient to cover fee and payment amount")]
    InsufficientPaymentBalance,

    #[error("transaction fee below network minimum")]
    SubmitFeeTooLow,

    #[error("transaction sequence does not match account sequence")]
    SubmitSequenceMismatch,

    #[error("sender balance insufficient to cover fee")]
    SubmitInsufficientFeeBalance,

    #[error("account not found")]
    AccountNotFound,
}

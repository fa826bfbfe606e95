//! RPC-layer error taxonomy (§7): method-level domain errors that are
//! reported inside a `"result"` envelope, and HTTP framing errors that close
//! the response with a 4xx/5xx status before any JSON-RPC envelope is built.

use thiserror::Error;

use tidemark_core::error::SubmitError;

/// Method-level errors. These never fail the HTTP request — they're
/// reported as `{"result": {..., "status": "error", ...}}` (§6).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("unknown config key")]
    UnsupportedConfigKey,

    #[error("config value could not be parsed")]
    InvalidConfigValue,

    #[error("config value is out of the allowed range")]
    ConfigValueOutOfRange,

    #[error("transition to production profile violates a safety invariant")]
    UnsafeProfileTransition,

    #[error("config change violates production policy")]
    PolicyViolation,

    #[error("ledger not found")]
    LedgerNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("method call rejects params")]
    UnexpectedParams,

    #[error("missing required param: {0}")]
    MissingParam(&'static str),

    #[error("invalid param: {0}")]
    InvalidParam(String),

    #[error("Method blocked by profile policy")]
    MethodBlocked,

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl RpcError {
    /// Numeric error code returned in the `"error_code"` field. `§4.7` pins
    /// `ledger` misses to 20 and `account_info` misses to 15; the remaining
    /// codes are this daemon's own scheme, documented once here rather than
    /// scattered across call sites.
    pub fn error_code(&self) -> i32 {
        match self {
            RpcError::LedgerNotFound => 20,
            RpcError::AccountNotFound => 15,
            RpcError::UnsupportedConfigKey => 1,
            RpcError::InvalidConfigValue => 2,
            RpcError::ConfigValueOutOfRange => 3,
            RpcError::UnsafeProfileTransition => 4,
            RpcError::PolicyViolation => 5,
            RpcError::UnexpectedParams => 6,
            RpcError::MissingParam(_) => 7,
            RpcError::InvalidParam(_) => 8,
            RpcError::Submit(_) => 9,
            RpcError::MethodBlocked => 100,
        }
    }
}

/// Transport-level framing errors (§7): these close the HTTP response with a
/// status code before any method dispatch happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("request body is empty")]
    NoBody,

    #[error("Incomplete request body")]
    IncompleteBody,

    #[error("request payload exceeds the maximum allowed size")]
    PayloadTooLarge,

    #[error("request could not be parsed as a JSON-RPC call")]
    InvalidRequest,
}

impl FramingError {
    /// The HTTP status this framing error maps to (§6).
    pub fn status_code(&self) -> u16 {
        match self {
            FramingError::PayloadTooLarge => 413,
            FramingError::NoBody | FramingError::IncompleteBody | FramingError::InvalidRequest => 400,
        }
    }
}

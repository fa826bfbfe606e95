//! Post-apply invariant checks (§4.8, C8): pure predicates over account
//! state and ledger headers, plus a structured-artifact sink for violations.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::error;

use tidemark_core::account::AccountState;
use tidemark_core::types::{AccountID, Drops};

use crate::ledger::Ledger;

/// A single failed invariant, ready to be written as one line of JSON.
#[derive(Debug, Clone, Serialize)]
pub struct InvariantViolation {
    pub probe: &'static str,
    pub detail: String,
    pub observed_at: i64,
}

impl InvariantViolation {
    fn new(probe: &'static str, detail: impl Into<String>) -> Self {
        Self {
            probe,
            detail: detail.into(),
            observed_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// `sum(balances) + fees_destroyed == expected_total`. Addition wraps; the
/// check itself treats the wrapped sum as exact (§4.8 #1).
pub fn check_balance_conservation(
    state: &AccountState,
    fees_destroyed: Drops,
    expected_total: Drops,
) -> Result<(), InvariantViolation> {
    let total = state.sum_balances().wrapping_add(fees_destroyed);
    if total == expected_total {
        Ok(())
    } else {
        Err(InvariantViolation::new(
            "balance_conservation",
            format!("sum(balances) + fees_destroyed = {total}, expected {expected_total}"),
        ))
    }
}

/// For every AccountID present in both `before` and `after`,
/// `after.sequence >= before.sequence` (§4.8 #2).
pub fn check_sequence_monotonicity(
    before: &AccountState,
    after: &AccountState,
) -> Result<(), InvariantViolation> {
    let mut offender: Option<(AccountID, u32, u32)> = None;
    before.for_each(|prior| {
        if offender.is_some() {
            return;
        }
        if let Some(current) = after.get(&prior.account) {
            if current.sequence < prior.sequence {
                offender = Some((prior.account, prior.sequence, current.sequence));
            }
        }
    });
    match offender {
        None => Ok(()),
        Some((account, before_seq, after_seq)) => Err(InvariantViolation::new(
            "sequence_monotonicity",
            format!("account {account} sequence regressed {before_seq} -> {after_seq}"),
        )),
    }
}

/// New ledger sequence must be strictly greater than the previous one
/// (§4.8 #3).
pub fn check_ledger_sequence_monotonicity(
    previous: &Ledger,
    new: &Ledger,
) -> Result<(), InvariantViolation> {
    if new.sequence > previous.sequence {
        Ok(())
    } else {
        Err(InvariantViolation::new(
            "ledger_sequence_monotonicity",
            format!("new sequence {} did not exceed previous {}", new.sequence, previous.sequence),
        ))
    }
}

/// `ledger.total_coins <= MAX_XRP` (§4.8 #4).
pub fn check_total_coins_within_bound(ledger: &Ledger) -> Result<(), InvariantViolation> {
    if ledger.total_coins <= tidemark_core::constants::MAX_XRP {
        Ok(())
    } else {
        Err(InvariantViolation::new(
            "total_coins_within_bound",
            format!("total_coins {} exceeds MAX_XRP", ledger.total_coins),
        ))
    }
}

/// Surface a violation: panic in debug builds (the probes are meant to be
/// fatal while developing against this core), append a JSON line to
/// `<data_dir>/invariant-violations.jsonl` in release builds so an operator
/// can inspect it offline without attaching a debugger.
pub fn report_violation(violation: InvariantViolation, data_dir: &Path) {
    error!(probe = violation.probe, detail = %violation.detail, "invariant violated");

    #[cfg(debug_assertions)]
    {
        panic!("invariant violated: {} — {}", violation.probe, violation.detail);
    }

    #[cfg(not(debug_assertions))]
    {
        let path = data_dir.join("invariant-violations.jsonl");
        let line = serde_json::to_string(&violation).unwrap_or_default();
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{line}");
        }
    }
}

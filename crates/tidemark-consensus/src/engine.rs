//! The phase-driven consensus state machine (§4.6, C6).
//!
//! One round collects proposals from the trusted validator set, advances
//! through a fixed phase ladder, and — once agreement clears the configured
//! threshold — directs the ledger manager to close a new ledger.

use std::collections::HashMap;

use tracing::{debug, info};

use tidemark_core::transaction::Transaction;
use tidemark_ledger::LedgerManager;

use crate::config::ConsensusConfig;
use crate::error::ConsensusError;
use crate::proposal::{Position, Proposal};
use crate::validator::ValidatorSet;

/// Coarse round state (§4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Open,
    Establish,
    Accepted,
    Validated,
}

/// The fine-grained phase a round is currently in, carrying its own tick
/// counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Open(u32),
    Establish(u32),
    Consensus50(u32),
    Consensus60(u32),
    Consensus70(u32),
    Consensus80(u32),
    Validation,
}

/// The outcome of a finalized round (§4.6 `finalizeRound`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundResult {
    pub round_number: u64,
    pub success: bool,
    pub transaction_count: usize,
    pub duration_ms: i64,
    pub final_ledger_seq: u32,
}

/// One node's consensus round driver. Owns its UNL and current proposals;
/// borrows the ledger manager mutably only for the duration of
/// `finalize_round`.
pub struct ConsensusEngine {
    config: ConsensusConfig,
    unl: ValidatorSet,
    state: RoundState,
    phase: Phase,
    round_number: u64,
    round_start_ms: i64,
    /// Keyed by validator_id; inserting for an id already present overwrites
    /// it, which is exactly "most recent wins, tie-break last received"
    /// (§4.6 failure model).
    proposals: HashMap<[u8; 32], Proposal>,
    our_position: Position,
    candidate_count: usize,
}

impl ConsensusEngine {
    pub fn new(config: ConsensusConfig, unl: ValidatorSet) -> Self {
        Self {
            config,
            unl,
            state: RoundState::Open,
            phase: Phase::Open(0),
            round_number: 0,
            round_start_ms: 0,
            proposals: HashMap::new(),
            our_position: Position {
                prior_ledger: [0u8; 32],
                transactions: Vec::new(),
                close_time: 0,
            },
            candidate_count: 0,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_number(&self) -> u64 {
        self.round_number
    }

    pub fn unl(&self) -> &ValidatorSet {
        &self.unl
    }

    pub fn unl_mut(&mut self) -> &mut ValidatorSet {
        &mut self.unl
    }

    /// Begin a new round over `candidates` (§4.6 `startRound`).
    pub fn start_round(
        &mut self,
        candidates: &[Transaction],
        current_ledger_hash: [u8; 32],
        now_ms: i64,
        now_s: i64,
    ) {
        self.round_number += 1;
        self.state = RoundState::Open;
        self.phase = Phase::Open(0);
        self.round_start_ms = now_ms;
        self.proposals.clear();
        self.candidate_count = candidates.len();
        self.our_position = Position {
            prior_ledger: current_ledger_hash,
            transactions: Vec::new(),
            close_time: now_s,
        };
        info!(round = self.round_number, candidates = candidates.len(), "consensus round started");
    }

    /// Validate and record an incoming proposal (§4.6 `processProposal`).
    pub fn process_proposal(&mut self, proposal: Proposal) -> Result<(), ConsensusError> {
        const MAX_PROPOSAL_TRANSACTIONS: usize = 10_000;

        if proposal.ledger_seq == 0 || proposal.position.transactions.len() > MAX_PROPOSAL_TRANSACTIONS {
            return Err(ConsensusError::InvalidProposal);
        }
        if !self.unl.is_trusted(&proposal.validator_id) {
            return Err(ConsensusError::UntrustedValidator);
        }
        self.proposals.insert(proposal.validator_id, proposal);
        Ok(())
    }

    /// Fraction of the UNL (plus self) whose latest proposal agrees with our
    /// position's `prior_ledger` (§4.6). An empty UNL trivially agrees (1.0).
    pub fn agreement(&self) -> f64 {
        if self.unl.is_empty() {
            return 1.0;
        }
        let matching = self
            .proposals
            .values()
            .filter(|p| p.position.prior_ledger == self.our_position.prior_ledger)
            .count();
        (matching + 1) as f64 / (self.unl.len() + 1) as f64
    }

    /// Advance the phase by one invocation; returns `true` once the round
    /// has reached `accepted`/`validation` and is ready to finalize
    /// (§4.6 `runRoundStep`).
    pub fn run_round_step(&mut self, now_ms: i64) -> bool {
        match self.phase {
            Phase::Open(ticks) => {
                let next_ticks = ticks + 1;
                let elapsed = now_ms - self.round_start_ms;
                if next_ticks >= self.config.open_phase_ticks || elapsed > self.config.open_phase_ms {
                    self.state = RoundState::Establish;
                    self.phase = Phase::Establish(0);
                } else {
                    self.phase = Phase::Open(next_ticks);
                }
                false
            }
            Phase::Establish(ticks) => {
                let next_ticks = ticks + 1;
                if next_ticks >= self.config.establish_phase_ticks {
                    self.phase = Phase::Consensus50(0);
                } else {
                    self.phase = Phase::Establish(next_ticks);
                }
                false
            }
            Phase::Consensus50(ticks) => self.step_threshold(ticks, 0.50, Phase::Consensus60(0)),
            Phase::Consensus60(ticks) => self.step_threshold(ticks, 0.60, Phase::Consensus70(0)),
            Phase::Consensus70(ticks) => self.step_threshold(ticks, 0.70, Phase::Consensus80(0)),
            Phase::Consensus80(ticks) => {
                let next_ticks = ticks + 1;
                let agreement = self.agreement();
                if next_ticks >= self.config.consensus_round_ticks
                    && agreement >= 0.80
                    && agreement >= self.config.final_threshold
                {
                    self.state = RoundState::Accepted;
                    self.phase = Phase::Validation;
                    debug!(round = self.round_number, agreement, "consensus accepted");
                    true
                } else {
                    self.phase = Phase::Consensus80(next_ticks);
                    false
                }
            }
            Phase::Validation => true,
        }
    }

    fn step_threshold(&mut self, ticks: u32, threshold_pct: f64, next_phase: Phase) -> bool {
        let next_ticks = ticks + 1;
        let agreement = self.agreement();
        if next_ticks >= self.config.consensus_round_ticks && agreement >= threshold_pct {
            self.phase = next_phase;
        } else {
            self.phase = self.bump_ticks(next_ticks);
        }
        false
    }

    fn bump_ticks(&self, ticks: u32) -> Phase {
        match self.phase {
            Phase::Consensus50(_) => Phase::Consensus50(ticks),
            Phase::Consensus60(_) => Phase::Consensus60(ticks),
            Phase::Consensus70(_) => Phase::Consensus70(ticks),
            Phase::Consensus80(_) => Phase::Consensus80(ticks),
            other => other,
        }
    }

    /// Close a new ledger with the (for this simplified core) empty final
    /// transaction set, mark the round validated, and report the outcome
    /// (§4.6 `finalizeRound`).
    pub fn finalize_round(&mut self, ledger_manager: &mut LedgerManager, close_time: i64) -> RoundResult {
        let started_at = self.round_start_ms;
        let ledger = ledger_manager.close_ledger(&[], close_time);
        self.state = RoundState::Validated;
        let duration_ms = close_time.saturating_mul(1000) - started_at;
        let result = RoundResult {
            round_number: self.round_number,
            success: true,
            transaction_count: self.candidate_count,
            duration_ms: duration_ms.max(0),
            final_ledger_seq: ledger.sequence,
        };
        info!(round = self.round_number, final_ledger_seq = ledger.sequence, "round finalized");
        result
    }
}

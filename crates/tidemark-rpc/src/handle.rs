//! `NodeHandle` bundles every piece of mutable core state one RPC request (or
//! consensus tick) touches (§5, §10). Callers hold it behind a single
//! `tokio::sync::Mutex` so the "never execute concurrently against the
//! ledger history" rule from §5 is structural rather than documented.

use std::path::PathBuf;
use std::time::Instant;

use tidemark_consensus::{ConsensusConfig, ConsensusEngine, ValidatorSet};
use tidemark_core::{AccountState, TransactionProcessor};
use tidemark_ledger::LedgerManager;

use crate::config::AgentControlConfig;

/// The single logical lock's contents: ledger history, account state,
/// pending-transaction queue, consensus engine, and the mutable control
/// config, all advanced together under one mutable borrow.
pub struct NodeHandle {
    pub ledger: LedgerManager,
    pub accounts: AccountState,
    pub processor: TransactionProcessor,
    pub consensus: ConsensusEngine,
    pub control: AgentControlConfig,
    /// Where C8's `report_violation` appends `invariant-violations.jsonl`.
    pub data_dir: PathBuf,
    started_at: Instant,
}

impl NodeHandle {
    pub fn new(
        consensus_config: ConsensusConfig,
        unl: ValidatorSet,
        control: AgentControlConfig,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            ledger: LedgerManager::new(),
            accounts: AccountState::new(),
            processor: TransactionProcessor::new(),
            consensus: ConsensusEngine::new(consensus_config, unl),
            control,
            data_dir,
            started_at: Instant::now(),
        }
    }

    /// Whole seconds elapsed since this handle was constructed, used by
    /// `server_info` and `agent_status` (§4.7).
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

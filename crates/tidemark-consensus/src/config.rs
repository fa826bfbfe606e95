//! Consensus round timing and agreement-threshold configuration (§3).

use serde::{Deserialize, Serialize};

use tidemark_core::constants::{
    DEFAULT_CONSENSUS_ROUND_TICKS, DEFAULT_ESTABLISH_PHASE_TICKS, DEFAULT_FINAL_THRESHOLD,
    DEFAULT_OPEN_PHASE_MS, DEFAULT_OPEN_PHASE_TICKS,
};

/// Tunable knobs governing one consensus round's phase progression.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Final agreement threshold required to close a round, in (0, 1].
    pub final_threshold: f64,
    pub open_phase_ticks: u32,
    pub open_phase_ms: i64,
    pub establish_phase_ticks: u32,
    pub consensus_round_ticks: u32,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            final_threshold: DEFAULT_FINAL_THRESHOLD,
            open_phase_ticks: DEFAULT_OPEN_PHASE_TICKS,
            open_phase_ms: DEFAULT_OPEN_PHASE_MS,
            establish_phase_ticks: DEFAULT_ESTABLISH_PHASE_TICKS,
            consensus_round_ticks: DEFAULT_CONSENSUS_ROUND_TICKS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = ConsensusConfig::default();
        assert_eq!(cfg.final_threshold, 0.80);
        assert_eq!(cfg.open_phase_ticks, 20);
        assert_eq!(cfg.open_phase_ms, 2000);
        assert_eq!(cfg.establish_phase_ticks, 5);
        assert_eq!(cfg.consensus_round_ticks, 5);
    }
}

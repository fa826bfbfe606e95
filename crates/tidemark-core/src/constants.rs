//! Network constants (§3, §4.7).

use crate::types::Drops;

/// 1 XRP in drops.
pub const XRP: Drops = 1_000_000;

/// Maximum possible supply: 100 * 10^9 * XRP.
pub const MAX_XRP: Drops = 100_000_000_000 * XRP;

/// Minimum fee a transaction must pay to avoid `temMALFORMED`.
pub const MIN_TX_FEE: Drops = 10;

/// Default consensus agreement threshold (§3 ConsensusConfig default).
pub const DEFAULT_FINAL_THRESHOLD: f64 = 0.80;

/// Default open-phase tick count before falling through to establish.
pub const DEFAULT_OPEN_PHASE_TICKS: u32 = 20;

/// Default open-phase wall-clock fallback, in milliseconds.
pub const DEFAULT_OPEN_PHASE_MS: i64 = 2_000;

/// Default establish-phase tick count.
pub const DEFAULT_ESTABLISH_PHASE_TICKS: u32 = 5;

/// Default tick count required at each consensus_X threshold step.
pub const DEFAULT_CONSENSUS_ROUND_TICKS: u32 = 5;

/// Maximum `max_peers` allowed while in the production profile.
pub const PRODUCTION_MAX_PEERS: u32 = 100;

/// Maximum `fee_multiplier` allowed while in the production profile.
pub const PRODUCTION_MAX_FEE_MULTIPLIER: u32 = 5;

/// Maximum `fee_multiplier` allowed in any profile.
pub const MAX_FEE_MULTIPLIER: u32 = 100;

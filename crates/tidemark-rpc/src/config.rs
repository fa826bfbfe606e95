//! The agent control profile and its mutation rules (§3, §4.7).

use serde::{Deserialize, Serialize};

use tidemark_core::constants::{MAX_FEE_MULTIPLIER, PRODUCTION_MAX_FEE_MULTIPLIER, PRODUCTION_MAX_PEERS};

use crate::error::RpcError;

/// The runtime operating mode. Production tightens several
/// `AgentControlConfig` bounds and narrows the method allowlist (§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlProfile {
    Research,
    Production,
}

/// Mutable control-plane knobs, replaced wholesale (copy-on-write) by
/// `agent_config_set` (§5, §4.7).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentControlConfig {
    pub profile: ControlProfile,
    pub max_peers: u32,
    pub fee_multiplier: u32,
    pub strict_crypto_required: bool,
    pub allow_unl_updates: bool,
}

impl Default for AgentControlConfig {
    /// Permissive research defaults that also happen to already satisfy every
    /// production bound except `strict_crypto_required`, so the single-field
    /// walk described in §8 scenario 5 is the only change needed to reach a
    /// valid production transition.
    fn default() -> Self {
        Self {
            profile: ControlProfile::Research,
            max_peers: 50,
            fee_multiplier: 1,
            strict_crypto_required: false,
            allow_unl_updates: false,
        }
    }
}

const MIN_MAX_PEERS: u32 = 5;
const RESEARCH_MAX_PEERS: u32 = 200;
const MIN_FEE_MULTIPLIER: u32 = 1;

/// Apply a single `key`/`value` mutation to `current`, returning the proposed
/// next config. Bounds depend on the *effective* profile: `current.profile`
/// unless `key` itself is `"profile"` (§4.7's bounds table).
pub fn apply_config_change(
    current: &AgentControlConfig,
    key: &str,
    value: &serde_json::Value,
) -> Result<AgentControlConfig, RpcError> {
    let mut next = current.clone();

    if key == "profile" {
        let s = value.as_str().ok_or(RpcError::InvalidConfigValue)?;
        next.profile = match s {
            "research" => ControlProfile::Research,
            "production" => ControlProfile::Production,
            _ => return Err(RpcError::InvalidConfigValue),
        };
        if next.profile == ControlProfile::Production {
            validate_production_transition(current, &next)?;
        }
        return Ok(next);
    }

    let effective_profile = current.profile;

    match key {
        "max_peers" => {
            let v = parse_u32(value)?;
            let max = if effective_profile == ControlProfile::Production {
                PRODUCTION_MAX_PEERS
            } else {
                RESEARCH_MAX_PEERS
            };
            if v < MIN_MAX_PEERS || v > max {
                return Err(RpcError::ConfigValueOutOfRange);
            }
            next.max_peers = v;
        }
        "fee_multiplier" => {
            let v = parse_u32(value)?;
            let max = if effective_profile == ControlProfile::Production {
                PRODUCTION_MAX_FEE_MULTIPLIER
            } else {
                MAX_FEE_MULTIPLIER
            };
            if v < MIN_FEE_MULTIPLIER || v > max {
                return Err(RpcError::ConfigValueOutOfRange);
            }
            next.fee_multiplier = v;
        }
        "strict_crypto_required" => {
            let v = value.as_bool().ok_or(RpcError::InvalidConfigValue)?;
            if effective_profile == ControlProfile::Production && !v {
                return Err(RpcError::PolicyViolation);
            }
            next.strict_crypto_required = v;
        }
        "allow_unl_updates" => {
            let v = value.as_bool().ok_or(RpcError::InvalidConfigValue)?;
            if effective_profile == ControlProfile::Production && v {
                return Err(RpcError::PolicyViolation);
            }
            next.allow_unl_updates = v;
        }
        _ => return Err(RpcError::UnsupportedConfigKey),
    }

    Ok(next)
}

fn parse_u32(value: &serde_json::Value) -> Result<u32, RpcError> {
    let n = value.as_u64().ok_or(RpcError::InvalidConfigValue)?;
    u32::try_from(n).map_err(|_| RpcError::InvalidConfigValue)
}

/// §4.7's profile-transition invariant: every listed field must already be in
/// its production-safe state before the switch is allowed.
fn validate_production_transition(
    current: &AgentControlConfig,
    next: &AgentControlConfig,
) -> Result<(), RpcError> {
    let safe = next.strict_crypto_required
        && !next.allow_unl_updates
        && next.fee_multiplier <= PRODUCTION_MAX_FEE_MULTIPLIER
        && next.max_peers <= PRODUCTION_MAX_PEERS;

    if safe {
        return Ok(());
    }

    if current.profile == ControlProfile::Production {
        Err(RpcError::PolicyViolation)
    } else {
        Err(RpcError::UnsafeProfileTransition)
    }
}

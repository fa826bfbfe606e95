//! RPC method implementations and profile-allowlist enforcement (§4.7, C7).
//!
//! Every method here is a pure function of `NodeHandle` plus request params;
//! the HTTP-level framing (body size, content-length, path routing) lives in
//! `server.rs`. Read methods never mutate `handle`.

use rand::RngCore;
use serde_json::{json, Map, Value};

use tidemark_core::account::AccountState;
use tidemark_core::processor::decode_submit_blob;
use tidemark_core::transaction::TxBody;
use tidemark_core::types::AccountID;
use tidemark_ledger::{check_sequence_monotonicity, report_violation};

use crate::config::{apply_config_change, ControlProfile};
use crate::error::RpcError;
use crate::handle::NodeHandle;

/// Every method this daemon exposes, in the order §4.7 lists them.
pub const ALL_METHODS: &[&str] = &[
    "server_info",
    "ledger",
    "ledger_current",
    "fee",
    "account_info",
    "submit",
    "ping",
    "random",
    "agent_status",
    "agent_config_get",
    "agent_config_set",
];

/// Methods reachable while `profile = production` (§4.7). Research allows
/// every method in [`ALL_METHODS`].
pub const PRODUCTION_ALLOWLIST: &[&str] = &[
    "server_info",
    "ledger",
    "ledger_current",
    "fee",
    "ping",
    "agent_status",
    "agent_config_get",
    "account_info",
];

/// Whether `method` may be dispatched under `profile` (§4.7 request-level
/// policy). Unknown method names are rejected in both profiles — they never
/// reach this allowlist check in practice because dispatch itself fails for
/// them, but an explicit `false` keeps the predicate total.
pub fn is_allowed(profile: ControlProfile, method: &str) -> bool {
    match profile {
        ControlProfile::Research => ALL_METHODS.contains(&method),
        ControlProfile::Production => PRODUCTION_ALLOWLIST.contains(&method),
    }
}

/// Collapse the JSON-RPC `params` shape (`<object>` or `[<object>]`, §6) down
/// to the single object callers actually want to read fields from.
fn normalize(params: Option<&Value>) -> Option<&Value> {
    match params {
        Some(Value::Array(items)) => items.first(),
        other => other,
    }
}

/// Whether `params` is absent, null, or an empty array — i.e. "no params
/// supplied", which `ledger_current` and `ping` require (§4.7).
fn is_empty_params(params: Option<&Value>) -> bool {
    match params {
        None => true,
        Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn reject_params(params: Option<&Value>) -> Result<(), RpcError> {
    if is_empty_params(params) {
        Ok(())
    } else {
        Err(RpcError::UnexpectedParams)
    }
}

fn str_field<'a>(obj: Option<&'a Value>, field: &'static str) -> Result<&'a str, RpcError> {
    obj.and_then(Value::as_object)
        .and_then(|o| o.get(field))
        .and_then(Value::as_str)
        .ok_or(RpcError::MissingParam(field))
}

/// Dispatch one already-allowlisted method call against `handle`.
pub fn dispatch(handle: &mut NodeHandle, method: &str, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    let params = normalize(params);
    match method {
        "server_info" => server_info(handle),
        "ledger" => ledger(handle, params),
        "ledger_current" => ledger_current(handle, params),
        "fee" => fee(handle),
        "account_info" => account_info(handle, params),
        "submit" => submit(handle, params),
        "ping" => ping(params),
        "random" => random(),
        "agent_status" => agent_status(handle),
        "agent_config_get" => agent_config_get(handle),
        "agent_config_set" => agent_config_set(handle, params),
        other => Err(RpcError::InvalidParam(format!("unknown method '{other}'"))),
    }
}

fn success(mut body: Map<String, Value>) -> Map<String, Value> {
    body.insert("status".into(), json!("success"));
    body
}

fn server_info(handle: &NodeHandle) -> Result<Map<String, Value>, RpcError> {
    let current = handle.ledger.current();
    Ok(success(
        json!({
            "build_version": env!("CARGO_PKG_VERSION"),
            "network_id": 1,
            "server_state": "full",
            "validated_ledger_hash": hex::encode(current.hash),
            "validated_ledger_seq": current.sequence,
            "uptime": handle.uptime_secs(),
        })
        .as_object()
        .expect("object literal")
        .clone(),
    ))
}

fn ledger(handle: &NodeHandle, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    let index = match params.and_then(Value::as_object).and_then(|o| o.get("index")) {
        None | Some(Value::Null) => handle.ledger.current().sequence,
        Some(v) => v.as_u64().and_then(|n| u32::try_from(n).ok()).ok_or_else(|| {
            RpcError::InvalidParam("index must be a non-negative integer".into())
        })?,
    };
    let ledger = handle.ledger.get(index).ok_or(RpcError::LedgerNotFound)?;
    Ok(success(
        json!({
            "sequence": ledger.sequence,
            "hash": hex::encode(ledger.hash),
            "parent_hash": hex::encode(ledger.parent_hash),
            "close_time": ledger.close_time,
            "close_time_resolution": ledger.close_time_resolution,
            "total_coins": ledger.total_coins.to_string(),
            "account_state_hash": hex::encode(ledger.account_state_hash),
            "transaction_hash": hex::encode(ledger.transaction_hash),
            "close_flags": ledger.close_flags,
            "parent_close_time": ledger.parent_close_time,
        })
        .as_object()
        .expect("object literal")
        .clone(),
    ))
}

fn ledger_current(handle: &NodeHandle, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    reject_params(params)?;
    let mut out = Map::new();
    out.insert("ledger_current_index".into(), json!(handle.ledger.current().sequence));
    Ok(success(out))
}

fn fee(handle: &NodeHandle) -> Result<Map<String, Value>, RpcError> {
    let base = tidemark_core::constants::MIN_TX_FEE;
    let open_ledger = base.saturating_mul(handle.control.fee_multiplier as u64);
    Ok(success(
        json!({
            "base_fee": base.to_string(),
            "median_fee": base.to_string(),
            "minimum_fee": base.to_string(),
            "open_ledger_fee": open_ledger.to_string(),
        })
        .as_object()
        .expect("object literal")
        .clone(),
    ))
}

fn account_info(handle: &NodeHandle, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    let account_hex = str_field(params, "account")?;
    let account = AccountID::from_hex(account_hex)
        .map_err(|e| RpcError::InvalidParam(format!("account: {e}")))?;
    let root = handle.accounts.get(&account).ok_or(RpcError::AccountNotFound)?;
    Ok(success(
        json!({
            "account": root.account.to_hex(),
            "balance": root.balance.to_string(),
            "flags": root.flags,
            "owner_count": root.owner_count,
            "previous_txn_id": hex::encode(root.previous_txn_id),
            "previous_txn_lgr_seq": root.previous_txn_lgr_seq,
            "sequence": root.sequence,
        })
        .as_object()
        .expect("object literal")
        .clone(),
    ))
}

/// Decode, validate, and apply a submitted transaction blob (§4.5). On any
/// non-success outcome the response still carries `"status": "success"` at
/// the RPC-call level (submit itself executed) with an embedded
/// `engine_result` describing the transaction outcome — mirroring real
/// JSON-RPC `submit` semantics where the call succeeds even when the
/// transaction does not.
fn submit(handle: &mut NodeHandle, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    let blob_hex = str_field(params, "tx_blob")?;
    if blob_hex.is_empty() || blob_hex.len() % 2 != 0 {
        return Err(RpcError::InvalidParam("tx_blob must be non-empty, even-length hex".into()));
    }
    if blob_hex.len() > 64 * 1024 {
        return Err(RpcError::InvalidParam("tx_blob exceeds the 64 KiB limit".into()));
    }
    let blob = hex::decode(blob_hex).map_err(|_| RpcError::InvalidParam("tx_blob is not valid hex".into()))?;

    let tx = match decode_submit_blob(&blob) {
        Ok(tx) => tx,
        Err(e) => {
            return Ok({
                let mut out = Map::new();
                out.insert("status".into(), json!("error"));
                out.insert("error_message".into(), json!(e.to_string()));
                out
            });
        }
    };

    let mut before = AccountState::new();
    if let Some(root) = handle.accounts.get(&tx.account) {
        before.put(root.clone());
    }
    if let TxBody::Payment { destination, .. } = &tx.body {
        if let Some(root) = handle.accounts.get(destination) {
            before.put(root.clone());
        }
    }

    match handle.processor.apply(tx, &mut handle.accounts) {
        Ok(result) if result.is_success() => {
            if let Err(violation) = check_sequence_monotonicity(&before, &handle.accounts) {
                report_violation(violation, &handle.data_dir);
            }
            let current = handle.ledger.current();
            Ok(success(
                json!({
                    "engine_result": result.engine_code(),
                    "validated_ledger_seq": current.sequence,
                })
                .as_object()
                .expect("object literal")
                .clone(),
            ))
        }
        Ok(result) => {
            let mut out = Map::new();
            out.insert("status".into(), json!("error"));
            out.insert("engine_result".into(), json!(result.engine_code()));
            Ok(out)
        }
        Err(e) => {
            let mut out = Map::new();
            out.insert("status".into(), json!("error"));
            out.insert("error_message".into(), json!(e.to_string()));
            Ok(out)
        }
    }
}

fn ping(params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    reject_params(params)?;
    Ok(success(Map::new()))
}

/// Generate 32 bytes of OS-backed randomness but return only an 8-byte
/// prefix (§4.7: "prefix only returned") so the RPC surface never leaks a
/// caller-usable full-entropy value over an unauthenticated channel.
fn random() -> Result<Map<String, Value>, RpcError> {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    let mut out = Map::new();
    out.insert("random_prefix".into(), json!(hex::encode(&bytes[..8])));
    out.insert("length".into(), json!(32));
    Ok(success(out))
}

fn agent_status(handle: &NodeHandle) -> Result<Map<String, Value>, RpcError> {
    Ok(success(
        json!({
            "profile": handle.control.profile,
            "strict_crypto_required": handle.control.strict_crypto_required,
            "uptime": handle.uptime_secs(),
            "validated_ledger_seq": handle.ledger.current().sequence,
            "pending_tx_count": handle.processor.get_pending().len(),
            "max_peers": handle.control.max_peers,
            "unl_size": handle.consensus.unl().len(),
            "allow_unl_updates": handle.control.allow_unl_updates,
        })
        .as_object()
        .expect("object literal")
        .clone(),
    ))
}

fn agent_config_get(handle: &NodeHandle) -> Result<Map<String, Value>, RpcError> {
    let value = serde_json::to_value(&handle.control).expect("AgentControlConfig serializes");
    Ok(success(value.as_object().expect("object literal").clone()))
}

fn agent_config_set(handle: &mut NodeHandle, params: Option<&Value>) -> Result<Map<String, Value>, RpcError> {
    let key = str_field(params, "key")?.to_string();
    let value = params
        .and_then(Value::as_object)
        .and_then(|o| o.get("value"))
        .ok_or(RpcError::MissingParam("value"))?
        .clone();

    let next = apply_config_change(&handle.control, &key, &value)?;
    handle.control = next;
    agent_config_get(handle)
}

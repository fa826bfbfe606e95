//! HTTP transport: the JSON-RPC POST entry point, GET diagnostic routes, and
//! the body-framing validation that sits in front of method dispatch (§6,
//! §10). This is the "external collaborator" the core spec treats the HTTP
//! transport as — but a complete daemon binary still needs one wired up, so
//! it lives here rather than in a fictional separate crate.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tidemark_ledger::{check_ledger_sequence_monotonicity, check_total_coins_within_bound, report_violation};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ControlProfile;
use crate::error::{FramingError, RpcError};
use crate::handle::NodeHandle;
use crate::methods::{self, ALL_METHODS};

/// Maximum JSON-RPC request body, per §4.7/§5.
pub const MAX_BODY_BYTES: usize = 32 * 1024;

/// Shared node state behind the single logical lock described in §5/§10.
pub type SharedHandle = Arc<Mutex<NodeHandle>>;

/// Build the axum router: JSON-RPC POST at `/` and `/jsonrpc`, GET
/// diagnostics at `/server_info`, `/ledger`, `/health` (§6).
pub fn build_router(handle: SharedHandle) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", post(rpc_post))
        .route("/jsonrpc", post(rpc_post))
        .route("/server_info", get(get_server_info).post(not_found))
        .route("/ledger", get(get_ledger).post(not_found))
        .route("/health", get(get_health).post(not_found))
        .fallback(not_found)
        .layer(cors)
        .with_state(handle)
}

/// Serve `router` on `addr`, returning once a Ctrl-C signal is received
/// (§10: "serve with `axum::serve(...).with_graceful_shutdown(...)`").
pub async fn serve(router: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "RPC server listening");
    axum::serve(router, listener)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Spawn the background task that drives consensus rounds forward on a
/// fixed tick, per §5/§10 ("a background tick task drives C6's
/// `runRoundStep`"). Returns the task handle so the caller can abort it on
/// shutdown if desired.
pub fn spawn_consensus_ticker(handle: SharedHandle, tick: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let now_ms = chrono::Utc::now().timestamp_millis();
            let mut node = handle.lock().await;
            if node.consensus.round_number() == 0 {
                let hash = node.ledger.current().hash;
                let now_s = chrono::Utc::now().timestamp();
                node.consensus.start_round(&[], hash, now_ms, now_s);
                continue;
            }
            if node.consensus.run_round_step(now_ms) {
                let previous = node.ledger.current().clone();
                let close_time = chrono::Utc::now().timestamp();
                let result = node.consensus.finalize_round(&mut node.ledger, close_time);
                let closed = node.ledger.current().clone();

                if let Err(violation) = check_ledger_sequence_monotonicity(&previous, &closed) {
                    report_violation(violation, &node.data_dir);
                }
                if let Err(violation) = check_total_coins_within_bound(&closed) {
                    report_violation(violation, &node.data_dir);
                }

                let hash = closed.hash;
                let now_s = chrono::Utc::now().timestamp();
                node.consensus.start_round(&[], hash, now_ms, now_s);
                info!(
                    round = result.round_number,
                    final_ledger_seq = result.final_ledger_seq,
                    "consensus round finalized"
                );
            }
        }
    })
}

// ── POST /  and /jsonrpc ──────────────────────────────────────────────────────

async fn rpc_post(State(handle): State<SharedHandle>, headers: HeaderMap, body: Bytes) -> Response {
    match frame_and_dispatch(handle, headers, body).await {
        Ok(result) => Json(json!({ "result": result })).into_response(),
        Err(framing) => {
            let status = StatusCode::from_u16(framing.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            (status, Json(json!({ "error": framing.to_string() }))).into_response()
        }
    }
}

async fn frame_and_dispatch(
    handle: SharedHandle,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Value, FramingError> {
    if body.is_empty() {
        return Err(FramingError::NoBody);
    }
    if let Some(declared) = headers.get(header::CONTENT_LENGTH).and_then(|v| v.to_str().ok()).and_then(|s| s.parse::<usize>().ok()) {
        if declared != body.len() {
            return Err(FramingError::IncompleteBody);
        }
    }
    if body.len() > MAX_BODY_BYTES {
        return Err(FramingError::PayloadTooLarge);
    }

    let request: Value = serde_json::from_slice(&body).map_err(|_| FramingError::InvalidRequest)?;
    let method = request.get("method").and_then(Value::as_str).ok_or(FramingError::InvalidRequest)?;
    if !is_valid_method_name(method) {
        return Err(FramingError::InvalidRequest);
    }
    let params = request.get("params").cloned();

    let mut node = handle.lock().await;
    let outcome = dispatch_checked(&mut node, method, params.as_ref());
    Ok(outcome_to_json(outcome))
}

/// Method names must be 1-64 chars of `[A-Za-z0-9_]` (§4.7).
fn is_valid_method_name(method: &str) -> bool {
    !method.is_empty()
        && method.len() <= 64
        && method.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn dispatch_checked(
    node: &mut NodeHandle,
    method: &str,
    params: Option<&Value>,
) -> Result<serde_json::Map<String, Value>, RpcError> {
    if !ALL_METHODS.contains(&method) {
        return Err(RpcError::InvalidParam(format!("unknown method '{method}'")));
    }
    if !methods::is_allowed(node.control.profile, method) {
        warn!(%method, profile = ?node.control.profile, "method blocked by profile policy");
        return Err(RpcError::MethodBlocked);
    }
    methods::dispatch(node, method, params)
}

fn outcome_to_json(outcome: Result<serde_json::Map<String, Value>, RpcError>) -> Value {
    match outcome {
        Ok(map) => Value::Object(map),
        Err(err) => json!({
            "status": "error",
            "error_code": err.error_code(),
            "error_message": err.to_string(),
        }),
    }
}

// ── GET diagnostics ────────────────────────────────────────────────────────────

async fn get_server_info(State(handle): State<SharedHandle>) -> Response {
    let mut node = handle.lock().await;
    let outcome = dispatch_checked(&mut node, "server_info", None);
    Json(json!({ "result": outcome_to_json(outcome) })).into_response()
}

async fn get_ledger(State(handle): State<SharedHandle>) -> Response {
    let mut node = handle.lock().await;
    let outcome = dispatch_checked(&mut node, "ledger", None);
    Json(json!({ "result": outcome_to_json(outcome) })).into_response()
}

async fn get_health(State(handle): State<SharedHandle>) -> Response {
    let node = handle.lock().await;
    Json(json!({
        "status": "ok",
        "uptime": node.uptime_secs(),
        "ledger_seq": node.ledger.current().sequence,
    }))
    .into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

//! tidemark-node — the tidemark daemon binary.
//!
//! Startup sequence:
//!   1. Parse CLI flags into process-level config.
//!   2. Build the core: a genesis-seeded ledger manager, empty account
//!      state, empty pending queue, and a consensus engine over the
//!      configured (initially empty) UNL.
//!   3. Wrap the core in one `tokio::sync::Mutex` behind an `Arc`.
//!   4. Build the axum router and spawn the background consensus ticker.
//!   5. Serve until Ctrl-C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::info;

use tidemark_consensus::{ConsensusConfig, ValidatorSet};
use tidemark_rpc::config::{AgentControlConfig, ControlProfile};
use tidemark_rpc::{build_router, serve, spawn_consensus_ticker, NodeHandle};

#[derive(Parser, Debug)]
#[command(
    name = "tidemark-node",
    version,
    about = "tidemark node — an educational XRPL-style ledger daemon"
)]
struct Args {
    /// JSON-RPC listen address.
    #[arg(long, default_value = "127.0.0.1:8546")]
    rpc_listen: SocketAddr,

    /// Directory for the invariant-violation log. Ledger history and
    /// account state are in memory and are not persisted here.
    #[arg(long, default_value = "./tidemark-data")]
    data_dir: PathBuf,

    /// Default tracing filter; overridden by `RUST_LOG` when set.
    #[arg(long, default_value = "info,tidemark=debug")]
    log_filter: String,

    /// Consensus tick interval, in milliseconds.
    #[arg(long, default_value_t = 200)]
    tick_ms: u64,

    /// Consensus final agreement threshold.
    #[arg(long, default_value_t = 0.80)]
    final_threshold: f64,

    /// Starting control-plane profile ("research" or "production").
    #[arg(long, default_value = "research")]
    profile: String,

    /// Starting max peer count.
    #[arg(long, default_value_t = 50)]
    max_peers: u32,

    /// Starting fee multiplier applied to the open-ledger fee estimate.
    #[arg(long, default_value_t = 1)]
    fee_multiplier: u32,

    /// Whether strict cryptographic verification is required at startup.
    #[arg(long, default_value_t = false)]
    strict_crypto_required: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| args.log_filter.parse().unwrap());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("tidemark node starting");

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("creating data dir {}", args.data_dir.display()))?;

    let profile = match args.profile.as_str() {
        "research" => ControlProfile::Research,
        "production" => ControlProfile::Production,
        other => anyhow::bail!("unknown --profile '{other}', expected 'research' or 'production'"),
    };

    let control = AgentControlConfig {
        profile,
        max_peers: args.max_peers,
        fee_multiplier: args.fee_multiplier,
        strict_crypto_required: args.strict_crypto_required,
        allow_unl_updates: matches!(profile, ControlProfile::Research),
    };

    let consensus_config = ConsensusConfig {
        final_threshold: args.final_threshold,
        ..ConsensusConfig::default()
    };

    // No trusted validators are wired in by default: a single-node daemon
    // reaches agreement vacuously, since agreement is defined as 1.0 when
    // the UNL is empty. Operators add validators out of band via
    // `agent_config_set`'s `allow_unl_updates` gate and a future UNL-edit
    // method, not modeled here.
    let unl = ValidatorSet::new();

    let handle = NodeHandle::new(consensus_config, unl, control, args.data_dir.clone());
    let shared = Arc::new(Mutex::new(handle));

    let _ticker = spawn_consensus_ticker(Arc::clone(&shared), Duration::from_millis(args.tick_ms));

    let router = build_router(Arc::clone(&shared));
    info!(addr = %args.rpc_listen, "serving JSON-RPC");
    serve(router, args.rpc_listen).await.context("running RPC server")?;

    Ok(())
}

//! tidemark-rpc
//!
//! The JSON-RPC method surface, profile-gated policy, and the HTTP transport
//! wiring that exposes both to the outside world (§4.7, §6, §10).

pub mod config;
pub mod error;
pub mod handle;
pub mod methods;
pub mod server;

pub use config::{apply_config_change, AgentControlConfig, ControlProfile};
pub use error::{FramingError, RpcError};
pub use handle::NodeHandle;
pub use server::{build_router, serve, spawn_consensus_ticker, SharedHandle, MAX_BODY_BYTES};

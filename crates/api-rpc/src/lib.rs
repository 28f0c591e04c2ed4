//! JSON-RPC API Layer
//!
//! Exposes every orchestrator operation as a `<entity>.<operation>.v1` JSON-RPC 2.0 method.
//! `error::to_rpc_error` is the only place application errors become wire errors.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};

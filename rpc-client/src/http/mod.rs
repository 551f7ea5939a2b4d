// File: rpc-client/src/http/mod.rs
//! HTTP communication with the node's management API
//!
//! Every call is a JSON POST to `https://{host}:{port}/{path}` over a
//! mutual-TLS connection pool owned by one [`RpcClient`].
//!
//! # Request Flow
//!
//! ```text
//! Endpoint binding → fetch() → Transport POST → node service
//!                      ↑  ↓
//!              404: wait 1s, retry (5 attempts)
//!                         ↓
//!            status check → envelope `success` check → typed result
//! ```

pub mod endpoints;
pub mod rpc_client;
pub mod transport;

pub use rpc_client::RpcClient;
pub use transport::{ReqwestTransport, Transport, TransportResponse};

//! Central repository for retry, transport and configuration defaults
//!
//! Constants are grouped by concern so the dispatcher, the TLS loader and the
//! configuration layer read their defaults from a single place.

use std::time::Duration;

/// Retry policy defaults for the dispatcher
pub mod retry {
    use super::Duration;

    /// Total attempts per logical request (attempts are indexed from 0)
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Fixed wait between attempts after a 404 (no growth, no jitter)
    pub const BACKOFF: Duration = Duration::from_secs(1);

    /// Whether a success that needed retries is reported as an error
    pub const REJECT_DELAYED_SUCCESS: bool = true;
}

/// Default configuration values
pub mod defaults {
    /// Hostname of the co-located node service
    pub const SELF_HOSTNAME: &str = "localhost";

    /// Default port of the full node management API
    pub const FULL_NODE_RPC_PORT: u16 = 8555;

    /// Name of the client configuration file looked up by the CLI
    pub const CONFIG_FILE: &str = "rpc-client.toml";
}

/// Management API paths
pub mod paths {
    pub const GET_CONNECTIONS: &str = "get_connections";
    pub const OPEN_CONNECTION: &str = "open_connection";
    pub const CLOSE_CONNECTION: &str = "close_connection";
    pub const STOP_NODE: &str = "stop_node";
    pub const HEALTHZ: &str = "healthz";
}

// File: rpc-client/src/config/mod.rs
pub mod manager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
pub use manager::ConfigManager;

use crate::constants::{defaults, retry};

/// Full client configuration as stored in `rpc-client.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_self_hostname")]
    pub self_hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub root_path: PathBuf,
    #[serde(default)]
    pub retry: RetryConfig,
    pub network: NetworkConfig,
}

fn default_self_hostname() -> String {
    defaults::SELF_HOSTNAME.to_string()
}

fn default_port() -> u16 {
    defaults::FULL_NODE_RPC_PORT
}

/// Network section naming the TLS material of the private certificate authority
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub private_ssl_ca: SslCaPaths,
    pub daemon_ssl: DaemonSslPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SslCaPaths {
    pub crt: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSslPaths {
    pub private_crt: PathBuf,
    pub private_key: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub backoff_ms: Option<u64>,
    pub reject_delayed_success: Option<bool>,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(retry::MAX_ATTEMPTS),
            backoff: self
                .backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(retry::BACKOFF),
            reject_delayed_success: self
                .reject_delayed_success
                .unwrap_or(retry::REJECT_DELAYED_SUCCESS),
        }
    }
}

/// How the dispatcher treats 404 responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    /// Report a success that needed retries as `RpcError::DelayedSuccess`
    pub reject_delayed_success: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            backoff: retry::BACKOFF,
            reject_delayed_success: retry::REJECT_DELAYED_SUCCESS,
        }
    }
}

/// Absolute paths to the four PEM files used for mutual TLS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub ca_crt: PathBuf,
    pub ca_key: PathBuf,
    pub crt: PathBuf,
    pub key: PathBuf,
}

impl NetworkConfig {
    /// Resolve the configured paths against the node's root directory.
    /// Absolute entries are kept as they are.
    pub fn tls_paths(&self, root_path: &Path) -> TlsPaths {
        TlsPaths {
            ca_crt: root_path.join(&self.private_ssl_ca.crt),
            ca_key: root_path.join(&self.private_ssl_ca.key),
            crt: root_path.join(&self.daemon_ssl.private_crt),
            key: root_path.join(&self.daemon_ssl.private_key),
        }
    }
}

//! Error types for the node RPC client
//!
//! Every failure the dispatcher can produce is classified here so callers can
//! tell a service that refused a request apart from one that never answered.

use serde_json::Value;
use std::fmt;

/// Main error type for the RPC client
#[derive(Debug)]
pub enum RpcError {
    /// Non-2xx status that is not retried (or a 404 on the final attempt)
    HttpStatus { status: u16, body: String },

    /// 2xx response whose envelope carried `success = false`
    Rejected { envelope: Value },

    /// Request only succeeded after one or more 404 retries
    DelayedSuccess { retries: u32, payload: Value },

    /// Request never produced a response (connection, TLS, closed transport)
    Transport { url: String, reason: String },

    /// Response body could not be narrowed into the expected shape
    Decode { reason: String },

    /// TLS material errors raised while building the client
    Tls(TlsError),

    /// Configuration errors
    Config(ConfigError),

    /// Retry loop ended without a verdict
    Internal(String),
}

/// TLS material error variants
#[derive(Debug)]
pub enum TlsError {
    /// Certificate or key file does not exist or cannot be read
    MissingMaterial { path: String, reason: String },

    /// File exists but does not hold the expected PEM block
    InvalidMaterial { path: String, reason: String },

    /// The HTTP client rejected the certificate setup
    ClientBuild { reason: String },
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    LoadFailed { path: String, reason: String },

    /// Configuration parsing error
    ParseError { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },
}

impl RpcError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RpcError::Rejected { .. })
    }

    pub fn is_delayed_success(&self) -> bool {
        matches!(self, RpcError::DelayedSuccess { .. })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::HttpStatus { status, body } => {
                write!(f, "Request failed with status {}: {}", status, body)
            }
            RpcError::Rejected { envelope } => {
                write!(f, "Request rejected by node: {}", envelope)
            }
            RpcError::DelayedSuccess { retries, payload } => {
                write!(f, "took {} retries: {}", retries, payload)
            }
            RpcError::Transport { url, reason } => {
                write!(f, "HTTP request to {} failed: {}", url, reason)
            }
            RpcError::Decode { reason } => write!(f, "Failed to decode response: {}", reason),
            RpcError::Tls(e) => write!(f, "TLS error: {}", e),
            RpcError::Config(e) => write!(f, "Configuration error: {}", e),
            RpcError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl fmt::Display for TlsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsError::MissingMaterial { path, reason } => {
                write!(f, "Cannot read '{}': {}", path, reason)
            }
            TlsError::InvalidMaterial { path, reason } => {
                write!(f, "Invalid PEM in '{}': {}", path, reason)
            }
            TlsError::ClientBuild { reason } => {
                write!(f, "Failed to build HTTPS client: {}", reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::ParseError { path, reason } => {
                write!(f, "Failed to parse config '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for RpcError {}
impl std::error::Error for TlsError {}
impl std::error::Error for ConfigError {}

impl From<TlsError> for RpcError {
    fn from(err: TlsError) -> Self {
        RpcError::Tls(err)
    }
}

impl From<ConfigError> for RpcError {
    fn from(err: ConfigError) -> Self {
        RpcError::Config(err)
    }
}

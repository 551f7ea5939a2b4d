pub mod config;
pub mod constants;
pub mod errors;
pub mod http;
pub mod tls;
pub mod types;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigManager, NetworkConfig, RetryPolicy};
pub use errors::{ConfigError, RpcError, TlsError};
pub use http::{ReqwestTransport, RpcClient, Transport, TransportResponse};
pub use types::{Connection, Envelope, NodeType};

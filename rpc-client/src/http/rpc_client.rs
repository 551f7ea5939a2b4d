// File: rpc-client/src/http/rpc_client.rs
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::transport::{ReqwestTransport, Transport};
use crate::config::{NetworkConfig, RetryPolicy};
use crate::errors::{ConfigError, RpcError};
use crate::tls::TlsMaterial;
use crate::types::Envelope;

/// Client for the management API of a co-located node service.
///
/// The handle owns its transport exclusively. Call [`RpcClient::close`] and
/// then [`RpcClient::await_closed`] when done.
pub struct RpcClient {
    hostname: String,
    port: u16,
    url: String,
    policy: RetryPolicy,
    transport: Arc<dyn Transport>,
    closing_task: Option<JoinHandle<()>>,
    closed: bool,
}

impl RpcClient {
    /// Build a client with the default retry policy
    pub fn create(
        self_hostname: &str,
        port: u16,
        root_path: &Path,
        net_config: &NetworkConfig,
    ) -> Result<Self, RpcError> {
        Self::create_with_policy(self_hostname, port, root_path, net_config, RetryPolicy::default())
    }

    /// Load the mutual-TLS material named by `net_config` and open the transport
    pub fn create_with_policy(
        self_hostname: &str,
        port: u16,
        root_path: &Path,
        net_config: &NetworkConfig,
        policy: RetryPolicy,
    ) -> Result<Self, RpcError> {
        let paths = net_config.tls_paths(root_path);
        let material = TlsMaterial::load(&paths)?;
        let client = material.build_client()?;

        let rpc = Self::with_transport(
            base_url(self_hostname, port),
            Arc::new(ReqwestTransport::new(client)),
            policy,
        )?;

        info!("RPC client ready for {}", rpc.url);
        Ok(rpc)
    }

    /// Build a client over an arbitrary transport. `base_url` must be an
    /// absolute URL with a host and end with `/`.
    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        policy: RetryPolicy,
    ) -> Result<Self, RpcError> {
        let url = base_url.into();
        let (hostname, port) = host_and_port(&url)?;
        Ok(Self {
            hostname,
            port,
            url,
            policy,
            transport,
            closing_task: None,
            closed: false,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// POST `body` to `path` and return the decoded envelope.
    ///
    /// A 404 is retried after a fixed backoff until the attempt budget runs
    /// out. Every other non-2xx status fails at once. A non-empty
    /// `correlation_id` is appended verbatim as the query string and turns on
    /// retry logging.
    pub async fn fetch(
        &self,
        path: &str,
        request_json: Value,
        correlation_id: &str,
    ) -> Result<Envelope, RpcError> {
        let url = request_url(&self.url, path, correlation_id);
        let last_attempt = self.policy.max_attempts.saturating_sub(1);

        for attempt in 0..self.policy.max_attempts {
            if attempt == 0 && !correlation_id.is_empty() {
                debug!("[{}] fetching {}", correlation_id, url);
            }

            let response = self.transport.post_json(&url, &request_json).await?;

            if response.status == 404 && attempt != last_attempt {
                if !correlation_id.is_empty() {
                    warn!(
                        "[{}] 404 fetching {} (attempt {}/{}), retrying in {:?}",
                        correlation_id,
                        url,
                        attempt + 1,
                        self.policy.max_attempts,
                        self.policy.backoff
                    );
                }
                sleep(self.policy.backoff).await;
                continue;
            }

            if !response.is_success() {
                return Err(RpcError::HttpStatus {
                    status: response.status,
                    body: response.body,
                });
            }

            let decoded: Value =
                serde_json::from_str(&response.body).map_err(|e| RpcError::Decode {
                    reason: format!("{} from {}", e, url),
                })?;
            let envelope = Envelope::from_value(decoded)?;

            if !envelope.success() {
                return Err(RpcError::Rejected {
                    envelope: envelope.into_value(),
                });
            }

            if attempt != 0 {
                if self.policy.reject_delayed_success {
                    return Err(RpcError::DelayedSuccess {
                        retries: attempt,
                        payload: envelope.into_value(),
                    });
                }
                info!("{} succeeded after {} retries", url, attempt);
            }

            return Ok(envelope);
        }

        Err(RpcError::Internal(format!(
            "retry loop for {} ended without a response",
            url
        )))
    }

    /// Start closing the transport in the background. Later calls are no-ops.
    ///
    /// Must be called from within a tokio runtime.
    pub fn close(&mut self) {
        if self.closing_task.is_some() || self.closed {
            return;
        }
        let transport = Arc::clone(&self.transport);
        self.closing_task = Some(tokio::spawn(async move {
            transport.close().await;
        }));
    }

    /// Wait for a close started by [`RpcClient::close`]. Returns at once if
    /// `close` was never called.
    pub async fn await_closed(&mut self) {
        if let Some(task) = self.closing_task.take() {
            if let Err(e) = task.await {
                warn!("Transport close task for {} failed: {}", self.url, e);
            }
            self.closed = true;
        }
    }

    /// True once `close` has been called, whether or not it has finished
    pub fn is_closing(&self) -> bool {
        self.closing_task.is_some() || self.closed
    }
}

fn base_url(hostname: &str, port: u16) -> String {
    format!("https://{}:{}/", hostname, port)
}

fn request_url(base: &str, path: &str, correlation_id: &str) -> String {
    format!("{}{}?{}", base, path, correlation_id)
}

fn host_and_port(url: &str) -> Result<(String, u16), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        field: "base_url".to_string(),
        reason,
    };

    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(format!("'{}': {}", url, e)))?;
    let hostname = parsed
        .host_str()
        .ok_or_else(|| invalid(format!("'{}' has no host", url)))?;
    let port = parsed
        .port_or_known_default()
        .ok_or_else(|| invalid(format!("'{}' has no port", url)))?;
    if !url.ends_with('/') {
        return Err(invalid(format!("'{}' must end with '/'", url)));
    }

    Ok((hostname.to_string(), port))
}

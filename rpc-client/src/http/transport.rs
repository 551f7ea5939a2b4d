// File: rpc-client/src/http/transport.rs
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::RwLock;
use tracing::{debug, info};

use crate::errors::RpcError;

/// Status and raw body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can POST a JSON body and hand back the raw reply.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, RpcError>;

    /// Release pooled connections. Posts issued afterwards fail.
    async fn close(&self);
}

/// `reqwest`-backed transport owning one connection pool
pub struct ReqwestTransport {
    client: RwLock<Option<Client>>,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    /// Transport without TLS configuration, for plain-HTTP services
    pub fn plain() -> Self {
        Self::new(Client::new())
    }

    fn current_client(&self) -> Option<Client> {
        match self.client.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, RpcError> {
        let client = self.current_client().ok_or_else(|| RpcError::Transport {
            url: url.to_string(),
            reason: "transport is closed".to_string(),
        })?;

        let response = client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| RpcError::Transport {
            url: url.to_string(),
            reason: format!("failed to read body: {}", e),
        })?;

        debug!("POST {} -> {}", url, status);

        Ok(TransportResponse { status, body })
    }

    async fn close(&self) {
        let client = match self.client.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if client.is_some() {
            info!("HTTP transport closed");
        }
        // connections held by in-flight clones close when those requests finish
        drop(client);
    }
}

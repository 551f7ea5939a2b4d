// File: rpc-client/src/http/endpoints.rs
use serde_json::{json, Value};
use tracing::info;

use super::rpc_client::RpcClient;
use crate::constants::paths;
use crate::errors::RpcError;
use crate::types::{Connection, Envelope, NodeType};

impl RpcClient {
    // === Connection Management ===

    /// List peer connections, optionally restricted to one node type
    pub async fn get_connections(
        &self,
        node_type: Option<NodeType>,
    ) -> Result<Vec<Connection>, RpcError> {
        let mut request = json!({});
        if let Some(node_type) = node_type {
            request["node_type"] = json!(node_type.value());
        }

        let mut response = self.fetch(paths::GET_CONNECTIONS, request, "").await?;
        let connections = match response.take("connections") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(RpcError::Decode {
                    reason: format!("'connections' is not an array: {}", other),
                })
            }
            None => {
                return Err(RpcError::Decode {
                    reason: "response has no 'connections' field".to_string(),
                })
            }
        };

        connections
            .into_iter()
            .map(|item| {
                serde_json::from_value::<Connection>(item).map_err(|e| RpcError::Decode {
                    reason: format!("bad connection record: {}", e),
                })
            })
            .collect()
    }

    pub async fn open_connection(&self, host: &str, port: u16) -> Result<Envelope, RpcError> {
        let payload = json!({"host": host, "port": port});
        let result = self.fetch(paths::OPEN_CONNECTION, payload, "").await?;
        info!("Opened connection to {}:{}", host, port);
        Ok(result)
    }

    pub async fn close_connection(&self, node_id: &[u8]) -> Result<Envelope, RpcError> {
        let payload = json!({"node_id": hex::encode(node_id)});
        self.fetch(paths::CLOSE_CONNECTION, payload, "").await
    }

    // === Node Control ===

    pub async fn stop_node(&self) -> Result<Envelope, RpcError> {
        self.fetch(paths::STOP_NODE, json!({}), "").await
    }

    pub async fn healthz(&self) -> Result<Envelope, RpcError> {
        self.fetch(paths::HEALTHZ, json!({}), "").await
    }
}

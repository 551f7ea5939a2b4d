use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::RpcError;

/// Kind of peer a node talks to, sent on the wire as its integer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NodeType {
    FullNode = 1,
    Harvester = 2,
    Farmer = 3,
    Timelord = 4,
    Introducer = 5,
    Wallet = 6,
    DataLayer = 7,
}

impl NodeType {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl From<NodeType> for u8 {
    fn from(node_type: NodeType) -> Self {
        node_type.value()
    }
}

impl TryFrom<u8> for NodeType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NodeType::FullNode),
            2 => Ok(NodeType::Harvester),
            3 => Ok(NodeType::Farmer),
            4 => Ok(NodeType::Timelord),
            5 => Ok(NodeType::Introducer),
            6 => Ok(NodeType::Wallet),
            7 => Ok(NodeType::DataLayer),
            other => Err(format!("unknown node type {}", other)),
        }
    }
}

/// JSON object returned by the node service.
///
/// Kept untyped at the dispatcher boundary; bindings narrow it further when
/// they need specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    /// Narrow a decoded body into an envelope. Only JSON objects qualify.
    pub fn from_value(value: Value) -> Result<Self, RpcError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RpcError::Decode {
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }

    /// Only an explicit `false` marks failure; a missing flag counts as success.
    pub fn success(&self) -> bool {
        !matches!(self.0.get("success"), Some(Value::Bool(false)))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Remove a field from the envelope, handing ownership to the caller
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// A peer connection as reported by `get_connections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(with = "node_id_hex")]
    pub node_id: Vec<u8>,
    #[serde(rename = "type", default)]
    pub node_type: Option<u8>,
    #[serde(default)]
    pub local_port: Option<u16>,
    #[serde(default)]
    pub peer_host: Option<String>,
    #[serde(default)]
    pub peer_port: Option<u16>,
    #[serde(default)]
    pub peer_server_port: Option<u16>,
    #[serde(default)]
    pub creation_time: Option<f64>,
    #[serde(default)]
    pub bytes_read: Option<u64>,
    #[serde(default)]
    pub bytes_written: Option<u64>,
    #[serde(default)]
    pub last_message_time: Option<f64>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Connection {
    pub fn node_id_hex(&self) -> String {
        hex::encode(&self.node_id)
    }

    pub fn kind(&self) -> Option<NodeType> {
        self.node_type.and_then(|t| NodeType::try_from(t).ok())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_time.and_then(unix_seconds_to_utc)
    }

    pub fn last_message_at(&self) -> Option<DateTime<Utc>> {
        self.last_message_time.and_then(unix_seconds_to_utc)
    }
}

fn unix_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
}

/// Decode a hex string as sent by the node, with or without a `0x` prefix
pub fn hexstr_to_bytes(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(trimmed)
}

mod node_id_hex {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hexstr_to_bytes(&raw).map_err(serde::de::Error::custom)
    }
}

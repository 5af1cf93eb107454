//! Handshake payload definitions
//!
//! The `d` field of Hello, Identify, Resume and READY frames.

use botgate_core::{Intents, ShardConfig, User};
use serde::{Deserialize, Serialize};

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Interval used when the server omits one (45 seconds)
    pub const DEFAULT_HEARTBEAT_INTERVAL: u64 = 45_000;
}

impl Default for HelloPayload {
    fn default() -> Self {
        Self {
            heartbeat_interval: Self::DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

/// Payload for op 2 (Identify)
///
/// Starts a new session for one shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// `Bot {app_id}.{access_token}`
    pub token: String,
    /// Event categories the shard wants to receive
    pub intents: Intents,
    /// `[shard_id, shard_count]`
    pub shard: ShardConfig,
    #[serde(default)]
    pub properties: IdentifyProperties,
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(rename = "$os")]
    pub os: String,
    #[serde(rename = "$browser")]
    pub browser: String,
    #[serde(rename = "$device")]
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: concat!("botgate/", env!("CARGO_PKG_VERSION")).to_string(),
            device: String::new(),
        }
    }
}

/// Payload for op 6 (Resume)
///
/// Continues a dropped session from the last received sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePayload {
    pub token: String,
    pub session_id: String,
    pub seq: u64,
}

/// Data of the READY dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReadyData {
    #[serde(default)]
    pub version: u32,
    pub session_id: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub shard: ShardConfig,
}

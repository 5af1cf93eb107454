//! Gateway access point - where to connect and how many shards to run

use serde::{Deserialize, Serialize};

/// Access point returned by `GET /gateway/bot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WebsocketAp {
    /// WebSocket URL of the gateway
    pub url: String,
    /// Recommended shard count
    #[serde(default)]
    pub shards: u32,
    #[serde(default)]
    pub session_start_limit: SessionStartLimit,
}

/// Session-start quota for the current rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionStartLimit {
    /// Session starts allowed per window
    #[serde(default)]
    pub total: u32,
    /// Session starts left in the current window
    #[serde(default)]
    pub remaining: u32,
    /// Milliseconds until the window resets
    #[serde(default)]
    pub reset_after: u64,
    /// Shards that may start within one 2 second window
    #[serde(default)]
    pub max_concurrency: u32,
}

impl WebsocketAp {
    /// Whether the quota left in this window covers every shard
    #[inline]
    pub fn fits_quota(&self) -> bool {
        self.shards <= self.session_start_limit.remaining
    }
}

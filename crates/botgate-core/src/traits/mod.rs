//! Ports - interfaces the gateway needs from the REST side
//!
//! The core defines what it needs; an HTTP adapter provides it.

use async_trait::async_trait;

use crate::entities::WebsocketAp;
use crate::error::CoreError;

/// Source of gateway access point info
#[async_trait]
pub trait WebsocketApi: Send + Sync {
    /// Fetch the gateway URL, shard count and session-start quota
    async fn ws(&self) -> Result<WebsocketAp, CoreError>;
}

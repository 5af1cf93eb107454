//! Gateway error types

use botgate_common::AppError;
use botgate_core::CoreError;
use thiserror::Error;

use crate::protocol::CloseCode;

/// Errors raised by shard connections and the session manager
///
/// `Clone` so one error can be both returned to the manager and handed to the
/// error callback.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// More shards than session starts left in the current window
    #[error("Shard count {shards} exceeds remaining session starts {remaining}")]
    SessionLimit { shards: u32, remaining: u32 },

    #[error("Invalid access point: {0}")]
    InvalidAccessPoint(String),

    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Server closed the connection with a close frame
    #[error("Connection closed with code {code}: {reason}")]
    Closed { code: u16, reason: String },

    /// Stream ended without a close frame
    #[error("Connection lost")]
    ConnectionLost,

    /// Server sent op 7
    #[error("Server requested reconnect")]
    NeedReconnect,

    /// Server sent op 9
    #[error("Session invalidated by server")]
    InvalidSession,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Session queue closed")]
    QueueClosed,

    #[error("API error: {0}")]
    Api(String),
}

impl GatewayError {
    /// Close code carried by a `Closed` error
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Closed { code, .. } => CloseCode::from_u16(*code),
            _ => None,
        }
    }

    /// Whether the session id and sequence must be dropped before reconnecting
    pub fn can_not_resume(&self) -> bool {
        match self {
            Self::InvalidSession => true,
            _ => self.close_code().is_some_and(|code| !code.can_resume()),
        }
    }

    /// Whether the credential has been rejected for good
    pub fn can_not_identify(&self) -> bool {
        self.close_code().is_some_and(|code| !code.can_identify())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for GatewayError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

impl From<CoreError> for GatewayError {
    fn from(err: CoreError) -> Self {
        Self::Api(err.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::gateway(err)
    }
}

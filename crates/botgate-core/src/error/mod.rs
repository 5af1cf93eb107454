//! Core errors

use thiserror::Error;

/// Errors raised by the data model and the REST port
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("App id must not be zero")]
    EmptyAppId,

    #[error("Access token must not be empty")]
    EmptyAccessToken,

    /// The REST API answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The REST request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

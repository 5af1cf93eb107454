//! Dispatch error types

use thiserror::Error;

/// Failure delivering one frame to its handler
///
/// Local to a single frame; the connection keeps running.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The `d` sub-document did not match the category's structure
    #[error("Failed to decode {event_type} payload: {source}")]
    Decode {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// The registered callback returned an error
    #[error("Handler for {event_type} failed: {source}")]
    Handler {
        event_type: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DispatchError {
    pub fn event_type(&self) -> &str {
        match self {
            Self::Decode { event_type, .. } | Self::Handler { event_type, .. } => event_type,
        }
    }
}

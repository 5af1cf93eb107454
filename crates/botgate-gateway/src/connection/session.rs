//! Shard session
//!
//! Durable identity of one shard across reconnects. The manager owns it while
//! the shard is queued; a transport owns it while connected.

use std::fmt;
use std::sync::Arc;

use botgate_core::{ShardConfig, Token};

use crate::events::EventHandlers;
use crate::protocol::{IdentifyPayload, IdentifyProperties, ResumePayload};

/// One shard's connection state
///
/// `id` and `last_seq` are set or cleared together: a non-empty `id` means the
/// session can be resumed from `last_seq`.
#[derive(Clone)]
pub struct Session {
    /// Resumable session id assigned by READY; empty until then
    pub id: String,
    /// Gateway WebSocket URL
    pub url: String,
    pub token: Token,
    /// Last sequence received on this shard
    pub last_seq: u64,
    pub shards: ShardConfig,
    pub handlers: Arc<EventHandlers>,
}

impl Session {
    /// Create a session that has never been identified
    pub fn new(
        url: impl Into<String>,
        token: Token,
        shards: ShardConfig,
        handlers: Arc<EventHandlers>,
    ) -> Self {
        Self {
            id: String::new(),
            url: url.into(),
            token,
            last_seq: 0,
            shards,
            handlers,
        }
    }

    /// Whether the next handshake should be a Resume
    #[inline]
    pub fn is_resumable(&self) -> bool {
        !self.id.is_empty()
    }

    /// Forget the session id and sequence, forcing a fresh Identify
    pub fn clear_identity(&mut self) {
        self.id.clear();
        self.last_seq = 0;
    }

    /// Record a newly established session
    pub fn establish(&mut self, session_id: impl Into<String>) {
        self.id = session_id.into();
    }

    /// Advance the sequence; never moves backwards
    pub fn record_seq(&mut self, seq: u64) {
        if seq > self.last_seq {
            self.last_seq = seq;
        }
    }

    /// Identify payload using the intents registered right now
    pub fn identify_payload(&self) -> IdentifyPayload {
        IdentifyPayload {
            token: self.token.authorization(),
            intents: self.handlers.intents(),
            shard: self.shards,
            properties: IdentifyProperties::default(),
        }
    }

    pub fn resume_payload(&self) -> ResumePayload {
        ResumePayload {
            token: self.token.authorization(),
            session_id: self.id.clone(),
            seq: self.last_seq,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("last_seq", &self.last_seq)
            .field("shards", &self.shards)
            .field("intents", &self.handlers.intents())
            .finish_non_exhaustive()
    }
}

//! Message audit entity - payload of MESSAGE_AUDIT_PASS/REJECT

use serde::{Deserialize, Serialize};

/// Result of the platform reviewing a message the bot sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageAudit {
    #[serde(default)]
    pub audit_id: String,
    /// Set only when the audit passed
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub audit_time: String,
    #[serde(default)]
    pub create_time: String,
}

impl MessageAudit {
    #[inline]
    pub fn passed(&self) -> bool {
        !self.message_id.is_empty()
    }
}

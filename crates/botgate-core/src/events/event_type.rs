//! Gateway event types
//!
//! Defines the event names carried in the `t` field of dispatch frames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dispatch event types understood by the built-in dispatch table
///
/// Event names not listed here are still delivered, but only to the
/// catch-all handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Connection events
    /// Sent after a successful Identify
    Ready,
    /// Sent after a successful Resume
    Resumed,

    // Guild events
    GuildCreate,
    GuildUpdate,
    GuildDelete,

    // Channel events
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,

    // Member events
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberRemove,

    // Message events
    /// Any message in a guild
    MessageCreate,
    /// Message that mentions the bot
    AtMessageCreate,
    /// Direct message to the bot
    DirectMessageCreate,

    // Reaction events
    MessageReactionAdd,
    MessageReactionRemove,

    // Audio events
    AudioStart,
    AudioFinish,
    AudioOnMic,
    AudioOffMic,

    // Audit events
    MessageAuditPass,
    MessageAuditReject,
}

impl EventType {
    /// Every known event type
    pub const ALL: [EventType; 22] = [
        Self::Ready,
        Self::Resumed,
        Self::GuildCreate,
        Self::GuildUpdate,
        Self::GuildDelete,
        Self::ChannelCreate,
        Self::ChannelUpdate,
        Self::ChannelDelete,
        Self::GuildMemberAdd,
        Self::GuildMemberUpdate,
        Self::GuildMemberRemove,
        Self::MessageCreate,
        Self::AtMessageCreate,
        Self::DirectMessageCreate,
        Self::MessageReactionAdd,
        Self::MessageReactionRemove,
        Self::AudioStart,
        Self::AudioFinish,
        Self::AudioOnMic,
        Self::AudioOffMic,
        Self::MessageAuditPass,
        Self::MessageAuditReject,
    ];

    /// Get the wire name of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildUpdate => "GUILD_UPDATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::AtMessageCreate => "AT_MESSAGE_CREATE",
            Self::DirectMessageCreate => "DIRECT_MESSAGE_CREATE",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
            Self::AudioStart => "AUDIO_START",
            Self::AudioFinish => "AUDIO_FINISH",
            Self::AudioOnMic => "AUDIO_ON_MIC",
            Self::AudioOffMic => "AUDIO_OFF_MIC",
            Self::MessageAuditPass => "MESSAGE_AUDIT_PASS",
            Self::MessageAuditReject => "MESSAGE_AUDIT_REJECT",
        }
    }

    /// Parse an event type from its wire name
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.as_str() == s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EventType> for String {
    fn from(event: EventType) -> Self {
        event.as_str().to_string()
    }
}

//! Intent bitflags declaring which event categories a shard wants to receive
//!
//! Each registered handler category owns a fixed group of bits; the union of
//! those groups is sent in every Identify handshake.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::events::EventType;

bitflags! {
    /// Gateway intent flags
    ///
    /// Serialized as a plain integer in the Identify payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u32 {
        /// Guild create/update/delete and channel create/update/delete
        const GUILDS                   = 1 << 0;
        /// Guild member add/update/remove
        const GUILD_MEMBERS            = 1 << 1;
        const GUILD_BANS               = 1 << 2;
        const GUILD_EMOJIS             = 1 << 3;
        const GUILD_INTEGRATIONS       = 1 << 4;
        const GUILD_WEBHOOKS           = 1 << 5;
        const GUILD_INVITES            = 1 << 6;
        const GUILD_VOICE_STATES       = 1 << 7;
        const GUILD_PRESENCES          = 1 << 8;
        /// Every message posted in a guild (private bots only)
        const GUILD_MESSAGES           = 1 << 9;
        /// Reaction add/remove on guild messages
        const GUILD_MESSAGE_REACTIONS  = 1 << 10;
        const GUILD_MESSAGE_TYPING     = 1 << 11;
        /// Direct messages sent to the bot
        const DIRECT_MESSAGE           = 1 << 12;
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        const DIRECT_MESSAGE_TYPING    = 1 << 14;
        /// Message audit pass/reject results
        const AUDIT                    = 1 << 27;
        /// Audio playback and microphone events
        const AUDIO                    = 1 << 29;
        /// Messages that mention the bot
        const GUILD_AT_MESSAGE         = 1 << 30;
    }
}

impl Intents {
    /// Intent bit required to receive a single event type
    ///
    /// Connection-level events (`READY`, `RESUMED`) need no intent.
    #[must_use]
    pub const fn for_event(event: EventType) -> Self {
        match event {
            EventType::GuildCreate
            | EventType::GuildUpdate
            | EventType::GuildDelete
            | EventType::ChannelCreate
            | EventType::ChannelUpdate
            | EventType::ChannelDelete => Self::GUILDS,
            EventType::GuildMemberAdd
            | EventType::GuildMemberUpdate
            | EventType::GuildMemberRemove => Self::GUILD_MEMBERS,
            EventType::MessageCreate => Self::GUILD_MESSAGES,
            EventType::MessageReactionAdd | EventType::MessageReactionRemove => {
                Self::GUILD_MESSAGE_REACTIONS
            }
            EventType::AtMessageCreate => Self::GUILD_AT_MESSAGE,
            EventType::DirectMessageCreate => Self::DIRECT_MESSAGE,
            EventType::AudioStart
            | EventType::AudioFinish
            | EventType::AudioOnMic
            | EventType::AudioOffMic => Self::AUDIO,
            EventType::MessageAuditPass | EventType::MessageAuditReject => Self::AUDIT,
            EventType::Ready | EventType::Resumed => Self::empty(),
        }
    }

    /// Union of the intents required by every given event type
    pub fn for_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = EventType>,
    {
        events
            .into_iter()
            .fold(Self::empty(), |acc, event| acc | Self::for_event(event))
    }

    /// Whether an event of this type would be delivered under these intents
    #[inline]
    pub fn allows(&self, event: EventType) -> bool {
        self.contains(Self::for_event(event))
    }
}

impl Default for Intents {
    fn default() -> Self {
        Intents::empty()
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Intents::from_bits_retain)
    }
}

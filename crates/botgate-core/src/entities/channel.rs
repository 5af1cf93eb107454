//! Channel entity - payload of CHANNEL_CREATE/UPDATE/DELETE

use serde::{Deserialize, Serialize};

/// Channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "u32", into = "u32")]
pub enum ChannelType {
    /// Text channel
    #[default]
    Text,
    /// Voice channel
    Voice,
    /// Channel group
    Category,
    /// Live-stream channel
    Live,
    /// Application channel
    Application,
    /// Forum channel
    Forum,
    /// Any type this client does not know yet
    Other(u32),
}

impl From<u32> for ChannelType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Text,
            2 => Self::Voice,
            4 => Self::Category,
            10005 => Self::Live,
            10006 => Self::Application,
            10007 => Self::Forum,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelType> for u32 {
    fn from(value: ChannelType) -> Self {
        match value {
            ChannelType::Text => 0,
            ChannelType::Voice => 2,
            ChannelType::Category => 4,
            ChannelType::Live => 10005,
            ChannelType::Application => 10006,
            ChannelType::Forum => 10007,
            ChannelType::Other(other) => other,
        }
    }
}

/// Channel inside a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub owner_id: String,
    /// User who triggered the event
    #[serde(default)]
    pub op_user_id: String,
}

impl Channel {
    /// Check if this is a text channel
    #[inline]
    pub fn is_text(&self) -> bool {
        self.channel_type == ChannelType::Text
    }
}

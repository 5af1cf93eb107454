//! Reaction entity - payload of MESSAGE_REACTION_ADD/REMOVE

use serde::{Deserialize, Serialize};

/// A user adding or removing an emoji reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageReaction {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub target: ReactionTarget,
    #[serde(default)]
    pub emoji: Emoji,
}

/// Object the reaction was attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReactionTarget {
    #[serde(default)]
    pub id: String,
    /// 0 message, 1 post, 2 comment, 3 reply
    #[serde(rename = "type", default)]
    pub target_type: u32,
}

/// Emoji reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Emoji {
    #[serde(default)]
    pub id: String,
    /// 1 system emoji, 2 unicode emoji
    #[serde(rename = "type", default)]
    pub emoji_type: u32,
}

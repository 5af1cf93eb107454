//! Guild entity - payload of GUILD_CREATE/UPDATE/DELETE

use serde::{Deserialize, Serialize};

/// Guild (server) as delivered by guild events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Guild {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub member_count: u32,
    #[serde(default)]
    pub max_members: u32,
    #[serde(default)]
    pub description: String,
    /// When the bot joined, as an ISO-8601 string
    #[serde(default)]
    pub joined_at: String,
    /// User who triggered the event
    #[serde(default)]
    pub op_user_id: String,
}

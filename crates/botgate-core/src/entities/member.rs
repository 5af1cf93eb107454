//! Guild member entity - payload of GUILD_MEMBER_ADD/UPDATE/REMOVE

use serde::{Deserialize, Serialize};

use super::User;

/// Membership of a user in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Member {
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub joined_at: String,
    /// User who triggered the event
    #[serde(default)]
    pub op_user_id: String,
}

impl Member {
    /// Nickname if set, else the username
    pub fn display_name(&self) -> &str {
        if !self.nick.is_empty() {
            return &self.nick;
        }
        self.user.as_ref().map_or("", User::display_name)
    }

    /// Check if member has a specific role
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }
}

//! User entity - an account as seen in event payloads

use serde::{Deserialize, Serialize};

/// User attached to messages, members and the READY payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bot: bool,
    /// Open id scoped to the bot application
    #[serde(default)]
    pub union_openid: String,
}

impl User {
    /// Display name for logs
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.id
        } else {
            &self.username
        }
    }
}

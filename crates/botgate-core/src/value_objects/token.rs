//! Bot credential
//!
//! A token pairs the numeric application id with its access token and renders
//! the `Authorization` value used by both the REST API and the Identify frame.

use std::fmt;

use crate::error::CoreError;

/// Credential used to authenticate REST calls and gateway sessions
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    app_id: u64,
    access_token: String,
}

impl Token {
    /// Create a bot token
    pub fn bot(app_id: u64, access_token: impl Into<String>) -> Result<Self, CoreError> {
        let access_token = access_token.into();
        if app_id == 0 {
            return Err(CoreError::EmptyAppId);
        }
        if access_token.trim().is_empty() {
            return Err(CoreError::EmptyAccessToken);
        }
        Ok(Self {
            app_id,
            access_token,
        })
    }

    #[inline]
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Render the value sent as `Authorization` header and Identify token
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bot {}.{}", self.app_id, self.access_token)
    }
}

// Never print the secret part
impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("app_id", &self.app_id)
            .field("access_token", &"***")
            .finish()
    }
}

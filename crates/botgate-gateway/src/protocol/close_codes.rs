//! Gateway close codes
//!
//! Close codes the server sends when it terminates a connection, and how each
//! one affects reconnecting.

/// Gateway close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// Invalid opcode sent
    InvalidOpcode,
    /// Invalid payload sent
    InvalidPayload,
    /// Session id is no longer valid
    InvalidSession,
    /// Sequence number for Resume is invalid
    InvalidSeq,
    /// Too many frames sent
    RateLimited,
    /// Session has timed out
    SessionTimedOut,
    /// Invalid shard configuration
    InvalidShard,
    /// Too many guilds for one connection
    ShardingRequired,
    /// Invalid gateway version
    InvalidVersion,
    /// Invalid intent value
    InvalidIntent,
    /// Intent not granted to the bot
    DisallowedIntent,
    /// Server-side failure, value in `4900..=4913`
    Internal(u16),
    /// Bot has been taken offline
    BotOffline,
    /// Bot has been banned
    BotBanned,
}

impl CloseCode {
    /// Create a `CloseCode` from a raw u16 value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            4001 => Some(Self::InvalidOpcode),
            4002 => Some(Self::InvalidPayload),
            4006 => Some(Self::InvalidSession),
            4007 => Some(Self::InvalidSeq),
            4008 => Some(Self::RateLimited),
            4009 => Some(Self::SessionTimedOut),
            4010 => Some(Self::InvalidShard),
            4011 => Some(Self::ShardingRequired),
            4012 => Some(Self::InvalidVersion),
            4013 => Some(Self::InvalidIntent),
            4014 => Some(Self::DisallowedIntent),
            4900..=4913 => Some(Self::Internal(value)),
            4914 => Some(Self::BotOffline),
            4915 => Some(Self::BotBanned),
            _ => None,
        }
    }

    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::InvalidOpcode => 4001,
            Self::InvalidPayload => 4002,
            Self::InvalidSession => 4006,
            Self::InvalidSeq => 4007,
            Self::RateLimited => 4008,
            Self::SessionTimedOut => 4009,
            Self::InvalidShard => 4010,
            Self::ShardingRequired => 4011,
            Self::InvalidVersion => 4012,
            Self::InvalidIntent => 4013,
            Self::DisallowedIntent => 4014,
            Self::Internal(code) => code,
            Self::BotOffline => 4914,
            Self::BotBanned => 4915,
        }
    }

    /// Whether the session id and sequence may still be used to Resume
    #[must_use]
    pub const fn can_resume(self) -> bool {
        !matches!(
            self,
            Self::InvalidSession | Self::InvalidSeq | Self::Internal(_)
        )
    }

    /// Whether a fresh Identify with the same credential can ever succeed
    #[must_use]
    pub const fn can_identify(self) -> bool {
        !matches!(self, Self::BotOffline | Self::BotBanned)
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidOpcode => "Invalid opcode",
            Self::InvalidPayload => "Invalid payload",
            Self::InvalidSession => "Invalid session",
            Self::InvalidSeq => "Invalid sequence number",
            Self::RateLimited => "Rate limited",
            Self::SessionTimedOut => "Session timed out",
            Self::InvalidShard => "Invalid shard",
            Self::ShardingRequired => "Sharding required",
            Self::InvalidVersion => "Invalid version",
            Self::InvalidIntent => "Invalid intent",
            Self::DisallowedIntent => "Disallowed intent",
            Self::Internal(_) => "Internal server error",
            Self::BotOffline => "Bot offline",
            Self::BotBanned => "Bot banned",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

//! # botgate-core
//!
//! Data model of the gateway client: intents, event types, credentials,
//! access point info and event payloads, plus the REST port the gateway needs.
//! This crate performs no I/O.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, AudioAction, Channel, ChannelType, Emoji, Guild, Member, Message, MessageAudit,
    MessageReaction, ReactionTarget, SessionStartLimit, User, WebsocketAp,
};
pub use error::CoreError;
pub use events::EventType;
pub use traits::WebsocketApi;
pub use value_objects::{Intents, ShardConfig, Token};

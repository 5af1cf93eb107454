//! Gateway entities - event payloads and access point info

mod access_point;
mod audio;
mod audit;
mod channel;
mod guild;
mod member;
mod message;
mod reaction;
mod user;

pub use access_point::{SessionStartLimit, WebsocketAp};
pub use audio::AudioAction;
pub use audit::MessageAudit;
pub use channel::{Channel, ChannelType};
pub use guild::Guild;
pub use member::Member;
pub use message::{Attachment, Message};
pub use reaction::{Emoji, MessageReaction, ReactionTarget};
pub use user::User;

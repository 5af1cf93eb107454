//! Value objects - immutable types defined by their attributes

mod intents;
mod shard;
mod token;

pub use intents::Intents;
pub use shard::ShardConfig;
pub use token::Token;

//! Shard identity

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One partition of the event stream, sent as `[shard_id, shard_count]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShardConfig {
    pub shard_id: u32,
    pub shard_count: u32,
}

impl ShardConfig {
    #[must_use]
    pub const fn new(shard_id: u32, shard_count: u32) -> Self {
        Self {
            shard_id,
            shard_count,
        }
    }
}

impl fmt::Display for ShardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.shard_id, self.shard_count)
    }
}

impl Serialize for ShardConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.shard_id, self.shard_count].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShardConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [shard_id, shard_count] = <[u32; 2]>::deserialize(deserializer)?;
        Ok(Self::new(shard_id, shard_count))
    }
}

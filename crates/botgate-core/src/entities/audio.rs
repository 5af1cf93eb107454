//! Audio entity - payload of AUDIO_START/FINISH/ON_MIC/OFF_MIC

use serde::{Deserialize, Serialize};

/// Audio playback or microphone state change in a voice channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AudioAction {
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub audio_url: String,
    /// Status text shown while playing
    #[serde(default)]
    pub text: String,
}

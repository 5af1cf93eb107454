//! Gateway frame envelope
//!
//! Every frame on the gateway connection is `{ "op", "s", "t", "d" }`.

use botgate_core::EventType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{IdentifyPayload, OpCode, ResumePayload};

/// Gateway frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsPayload {
    /// Operation code
    pub op: OpCode,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event type (only for op=0 Dispatch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Frame data
    #[serde(default)]
    pub d: Option<Value>,

    /// Raw bytes the frame was parsed from; empty for outbound frames
    #[serde(skip)]
    pub raw_message: Vec<u8>,
}

impl WsPayload {
    /// Create an outbound frame
    fn outbound(op: OpCode, d: Option<Value>) -> Self {
        Self {
            op,
            s: None,
            t: None,
            d,
            raw_message: Vec::new(),
        }
    }

    /// Create an Identify frame (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self::outbound(OpCode::Identify, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Resume frame (op=6)
    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::outbound(OpCode::Resume, Some(serde_json::to_value(payload)?)))
    }

    /// Create a Heartbeat frame (op=1)
    ///
    /// `d` is null until the first sequence has been received.
    #[must_use]
    pub fn heartbeat(last_seq: u64) -> Self {
        let d = (last_seq > 0).then(|| Value::Number(last_seq.into()));
        Self::outbound(OpCode::Heartbeat, d)
    }

    /// Create a Dispatch frame (op=0), as the server would send it
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, seq: u64, data: Value) -> Self {
        let mut frame = Self {
            op: OpCode::Dispatch,
            s: Some(seq),
            t: Some(event_type.into()),
            d: Some(data),
            raw_message: Vec::new(),
        };
        frame.raw_message = frame.to_json().unwrap_or_default().into_bytes();
        frame
    }

    /// Parse an inbound frame, keeping its raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let mut frame: Self = serde_json::from_slice(bytes)?;
        frame.raw_message = bytes.to_vec();
        Ok(frame)
    }

    /// Known event type of a dispatch frame
    pub fn event_type(&self) -> Option<EventType> {
        self.t.as_deref().and_then(EventType::from_name)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for WsPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "WsPayload(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "WsPayload(op={})", self.op)
        }
    }
}

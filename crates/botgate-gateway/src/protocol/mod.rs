//! Gateway protocol definitions
//!
//! Op codes, the frame envelope, handshake payloads and close codes.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::WsPayload;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, IdentifyPayload, IdentifyProperties, ReadyData, ResumePayload};

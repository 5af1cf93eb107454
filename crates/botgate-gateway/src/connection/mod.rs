//! Shard connections
//!
//! Session state, the transport contract and its WebSocket implementation,
//! and the manager that keeps every shard connected.

mod connection;
mod error;
mod manager;
mod session;
mod transport;

pub use connection::{WebSocketConnection, WebSocketConnectionFactory};
pub use error::GatewayError;
pub use manager::SessionManager;
pub use session::Session;
pub use transport::{PanicHandler, Transport, TransportFactory};

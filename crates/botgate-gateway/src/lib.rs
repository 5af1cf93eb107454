//! # botgate-gateway
//!
//! Gateway client for bot platforms: keeps every shard of a bot connected,
//! resumes sessions across reconnects and routes events to typed handlers.

pub mod connection;
pub mod events;
pub mod openapi;
pub mod protocol;

pub use connection::{
    GatewayError, PanicHandler, Session, SessionManager, Transport, TransportFactory,
    WebSocketConnection, WebSocketConnectionFactory,
};
pub use events::{dispatch, DispatchError, EventHandler, EventHandlers};
pub use openapi::{fetch_access_point, HttpWebsocketApi};

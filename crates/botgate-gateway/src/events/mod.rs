//! Event handling
//!
//! Handler registry and the dispatch table that feeds it.

mod dispatcher;
mod error;
mod handlers;

pub use dispatcher::dispatch;
pub use error::DispatchError;
pub use handlers::{Callback, ErrorNotifyHandler, EventHandler, EventHandlers, PlainEventHandler};

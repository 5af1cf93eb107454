//! Gateway event names

mod event_type;

pub use event_type::EventType;

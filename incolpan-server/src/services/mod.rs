//! Server services
//!
//! - [`MessageBusService`] - in-process broadcast bus feeding `/ws/sync`

pub mod message_bus;

pub use message_bus::MessageBusService;

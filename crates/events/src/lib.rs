//! In-process event bus.
//!
//! The pipeline publishes a [`PlatformEvent`] for every state change it
//! makes and for every error it surfaces. Front ends subscribe to the bus
//! instead of polling the controllers.

pub mod bus;
pub mod logger;
pub mod types;

pub use bus::{EventBus, PlatformEvent};
pub use logger::EventLogger;

//! Application layer
//!
//! Drives the event pump from a `winit` loop and hands decoded events to
//! subscribers.

pub mod pump;
mod runner;
pub mod subscriber;

pub use pump::{EventPump, PumpState, TickReport};
pub use runner::App;
pub use subscriber::{EventLogger, EventSubscriber, TickContext};

//! Event subscriber trait

use tracing::{debug, trace};

use crate::input::{DeviceRegistry, FramedEvent, InputState};
use crate::window::WindowState;

/// Read-only view of the pump handed to subscribers during delivery
pub struct TickContext<'a> {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Input state after every event of this tick was applied
    pub input: &'a InputState,
    pub devices: &'a DeviceRegistry,
    pub window: Option<&'a WindowState>,
}

/// Receives every event of a tick, in arrival order
///
/// Subscribers are called in priority order (highest first). There is no
/// consumption: each subscriber sees the full sequence.
pub trait EventSubscriber {
    /// Name of this subscriber for logging
    fn name(&self) -> &str;

    /// Delivery order (higher = earlier)
    fn priority(&self) -> u32;

    fn on_event(&mut self, event: &FramedEvent, cx: &TickContext<'_>);

    /// Called once per tick after the last event was delivered
    fn end_tick(&mut self, _cx: &TickContext<'_>) {}
}

/// Logs every delivered event at `debug` level
#[derive(Debug, Default)]
pub struct EventLogger {
    events: u64,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen since creation
    pub fn count(&self) -> u64 {
        self.events
    }
}

impl EventSubscriber for EventLogger {
    fn name(&self) -> &str {
        "event_logger"
    }

    fn priority(&self) -> u32 {
        0
    }

    fn on_event(&mut self, event: &FramedEvent, cx: &TickContext<'_>) {
        self.events += 1;
        debug!(
            tick = cx.tick,
            event = event.name(),
            timestamp = event.timestamp(),
            window = ?event.window(),
            "Event"
        );
    }

    fn end_tick(&mut self, cx: &TickContext<'_>) {
        trace!(tick = cx.tick, devices = cx.devices.len(), "Tick delivered");
    }
}

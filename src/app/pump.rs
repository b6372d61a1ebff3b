//! Event pump: drains the native queue once per tick
//!
//! Each tick runs `Idle -> Draining -> Drained -> Idle`:
//!
//! 1. Draining: poll until the native queue is empty. Every event is decoded,
//!    routed to the device registry and the window tracker, folded into the
//!    input state and queued for delivery.
//! 2. Drained: the queued events are delivered, in arrival order, to every
//!    subscriber.
//!
//! Registry and window state change only during draining, so subscribers and
//! the application always observe a consistent snapshot.

use std::cmp::Reverse;

use tracing::{debug, info, trace, warn};

use super::subscriber::{EventSubscriber, TickContext};
use crate::config::{PumpConfig, WindowConfig};
use crate::error::{NativeInitError, RouteError};
use crate::input::{DeviceChange, DeviceKind, DeviceRegistry, FramedEvent, InputState, decode};
use crate::platform::{NativeDeviceApi, NativePlatform, NativeWindowApi};
use crate::window::{Applied, WindowState, WindowTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PumpState {
    #[default]
    Idle,
    Draining,
    Drained,
}

/// Summary of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub tick: u64,
    /// Events decoded and delivered
    pub events: usize,
    /// Native events that did not decode, plus background joystick input
    pub dropped: usize,
    /// Events whose routing failed; they were still delivered
    pub failures: usize,
    /// A quit event or a close request was seen
    pub quit_requested: bool,
}

pub struct EventPump {
    state: PumpState,
    tick: u64,
    devices: DeviceRegistry,
    window: Option<WindowTracker>,
    input: InputState,
    /// Sorted by priority, highest first
    subscribers: Vec<Box<dyn EventSubscriber>>,
    /// Events of the last tick, in arrival order
    events: Vec<FramedEvent>,
    burst_warning: usize,
    joystick_background_events: bool,
}

impl EventPump {
    pub fn new(config: &PumpConfig) -> Self {
        Self {
            state: PumpState::Idle,
            tick: 0,
            devices: DeviceRegistry::new(),
            window: None,
            input: InputState::new(),
            subscribers: Vec::new(),
            events: Vec::new(),
            burst_warning: config.burst_warning,
            joystick_background_events: config.joystick_background_events,
        }
    }

    /// Registers a subscriber for every following tick
    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) {
        info!(
            subscriber = subscriber.name(),
            priority = subscriber.priority(),
            "Subscriber registered"
        );
        self.subscribers.push(subscriber);
        // Stable sort keeps registration order among equal priorities
        self.subscribers.sort_by_key(|s| Reverse(s.priority()));
    }

    /// Removes a subscriber by name
    pub fn unsubscribe(&mut self, name: &str) -> Option<Box<dyn EventSubscriber>> {
        let index = self.subscribers.iter().position(|s| s.name() == name)?;
        Some(self.subscribers.remove(index))
    }

    /// Creates the tracked window, replacing any previous one
    pub fn open_window(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        config: &WindowConfig,
    ) -> Result<&WindowTracker, NativeInitError> {
        if let Some(previous) = self.window.take() {
            let id = previous.id();
            if let Err(error) = previous.destroy(api) {
                warn!(window.id = id.0, error = %error, "Failed to destroy replaced window");
            }
        }
        let tracker = WindowTracker::create(api, config).map_err(NativeInitError::Window)?;
        Ok(self.window.insert(tracker))
    }

    pub fn window(&self) -> Option<&WindowTracker> {
        self.window.as_ref()
    }

    /// Mutable access for window commands between ticks
    pub fn window_mut(&mut self) -> Option<&mut WindowTracker> {
        self.window.as_mut()
    }

    pub fn window_state(&self) -> Option<&WindowState> {
        self.window.as_ref().map(WindowTracker::state)
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Events of the last tick
    pub fn events(&self) -> &[FramedEvent] {
        &self.events
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Runs one full tick against `platform`
    pub fn tick<P: NativePlatform>(&mut self, platform: &mut P) -> TickReport {
        self.tick += 1;
        self.input.advance_frame();
        self.events.clear();

        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        self.state = PumpState::Draining;
        let mut polled = 0usize;
        while let Some(native) = platform.poll_next_event() {
            polled += 1;
            let Some(event) = decode(&native, &*platform) else {
                trace!(
                    tag = native.event_type().0,
                    "Unrecognized native event dropped"
                );
                report.dropped += 1;
                continue;
            };
            if self.is_background_joystick_input(&event) {
                trace!(
                    event = event.name(),
                    "Joystick input dropped while unfocused"
                );
                report.dropped += 1;
                continue;
            }

            if let Err(error) = self.route(platform, &event, &mut report) {
                warn!(event = event.name(), error = %error, "Event routing failed");
                report.failures += 1;
            }
            self.input.apply(&event);
            self.events.push(event);
        }
        if polled > self.burst_warning {
            warn!(
                tick = self.tick,
                polled,
                threshold = self.burst_warning,
                "Large native event burst"
            );
        }

        self.state = PumpState::Drained;
        self.deliver();
        report.events = self.events.len();

        self.state = PumpState::Idle;
        trace!(
            tick = report.tick,
            events = report.events,
            dropped = report.dropped,
            failures = report.failures,
            "Tick complete"
        );
        report
    }

    /// Releases every device handle and the tracked window
    pub fn shutdown(&mut self, api: &mut (impl NativeDeviceApi + NativeWindowApi + ?Sized)) {
        self.devices.clear(api);
        if let Some(window) = self.window.take() {
            let id = window.id();
            if let Err(error) = window.destroy(api) {
                warn!(window.id = id.0, error = %error, "Failed to destroy window");
            }
        }
        info!(ticks = self.tick, "Event pump shut down");
    }

    fn route<P: NativePlatform>(
        &mut self,
        platform: &mut P,
        event: &FramedEvent,
        report: &mut TickReport,
    ) -> Result<(), RouteError> {
        match event {
            FramedEvent::Quit { .. } => {
                info!("Quit requested");
                report.quit_requested = true;
            }
            FramedEvent::Window { .. } => {
                if let Some(window) = &mut self.window
                    && window.apply(&*platform, event)? == Applied::CloseRequested
                {
                    report.quit_requested = true;
                }
            }
            FramedEvent::DeviceChange {
                kind, id, change, ..
            } => self.route_device_change(platform, *kind, *id, *change),
            FramedEvent::Key { device, .. } => {
                self.require_device(DeviceKind::Keyboard, *device)?;
            }
            FramedEvent::MouseMotion { device, .. }
            | FramedEvent::MouseButton { device, .. }
            | FramedEvent::MouseWheel { device, .. } => {
                self.require_device(DeviceKind::Mouse, *device)?;
            }
            FramedEvent::Joystick { id, .. } => {
                // Gamepads are registered once, as gamepads, but still send raw
                // joystick input
                if !self.devices.contains(DeviceKind::Gamepad, *id) {
                    self.require_device(DeviceKind::Joystick, *id)?;
                }
            }
            FramedEvent::Gamepad { id, .. } => {
                self.require_device(DeviceKind::Gamepad, *id)?;
            }
            FramedEvent::TextEditing { .. }
            | FramedEvent::TextInput { .. }
            | FramedEvent::Display { .. }
            | FramedEvent::Drop { .. }
            | FramedEvent::RenderReset { .. } => {}
        }
        Ok(())
    }

    fn route_device_change<P: NativePlatform>(
        &mut self,
        platform: &mut P,
        kind: DeviceKind,
        id: u32,
        change: DeviceChange,
    ) {
        match change {
            DeviceChange::Added => {
                if kind == DeviceKind::Joystick && platform.is_gamepad(id) {
                    debug!(
                        device.id = id,
                        "Joystick add skipped, registering as gamepad"
                    );
                    return;
                }
                self.devices.on_device_added(platform, kind, id);
            }
            DeviceChange::Removed => {
                self.devices.on_device_removed(platform, kind, id);
            }
            DeviceChange::Remapped => {
                if self
                    .devices
                    .on_device_remapped(platform, kind, id)
                    .is_none()
                {
                    debug!(device.kind = %kind, device.id = id, "Remap of unknown device ignored");
                }
            }
        }
    }

    fn is_background_joystick_input(&self, event: &FramedEvent) -> bool {
        !self.joystick_background_events
            && matches!(
                event,
                FramedEvent::Joystick { .. } | FramedEvent::Gamepad { .. }
            )
            && self
                .window
                .as_ref()
                .is_some_and(|w| !w.state().is_focused())
    }

    /// Input from device id 0 comes from a virtual or merged device and is
    /// always accepted
    fn require_device(&self, kind: DeviceKind, id: u32) -> Result<(), RouteError> {
        if id == 0 || self.devices.contains(kind, id) {
            Ok(())
        } else {
            Err(RouteError::UnknownDevice { kind, id })
        }
    }

    fn deliver(&mut self) {
        let cx = TickContext {
            tick: self.tick,
            input: &self.input,
            devices: &self.devices,
            window: self.window.as_ref().map(WindowTracker::state),
        };
        for event in &self.events {
            for subscriber in &mut self.subscribers {
                subscriber.on_event(event, &cx);
            }
        }
        for subscriber in &mut self.subscribers {
            subscriber.end_tick(&cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::input::{GamepadButton, Key, Keymod, WindowEventKind};
    use crate::platform::headless::HeadlessPlatform;
    use crate::platform::native::CommonPayload;
    use crate::platform::{DeviceInfo, EventType, NativeEvent, Size};

    type Log = Rc<RefCell<Vec<(String, u64, &'static str)>>>;

    struct Recorder {
        name: String,
        priority: u32,
        log: Log,
    }

    impl Recorder {
        fn boxed(name: &str, priority: u32, log: &Log) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                priority,
                log: log.clone(),
            })
        }
    }

    impl EventSubscriber for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn on_event(&mut self, event: &FramedEvent, cx: &TickContext<'_>) {
            self.log
                .borrow_mut()
                .push((self.name.clone(), cx.tick, event.name()));
        }
    }

    fn pump() -> EventPump {
        EventPump::new(&PumpConfig::default())
    }

    fn gamepad_info() -> DeviceInfo {
        DeviceInfo {
            name: "Pad".to_string(),
            buttons: 15,
            axes: 6,
            ..DeviceInfo::default()
        }
    }

    #[test]
    fn test_tick_on_empty_queue() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();

        let report = pump.tick(&mut platform);

        assert_eq!(report.tick, 1);
        assert_eq!(report.events, 0);
        assert_eq!(pump.state(), PumpState::Idle);
    }

    #[test]
    fn test_unrecognized_events_dropped() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        platform.push_raw(NativeEvent::encode(&CommonPayload::new(EventType::USER, 0)));
        platform.push_quit();
        let sentinel = CommonPayload::new(EventType::POLL_SENTINEL, 0);
        platform.push_raw(NativeEvent::encode(&sentinel));

        let report = pump.tick(&mut platform);

        assert_eq!(report.dropped, 2);
        assert_eq!(report.events, 1);
        assert!(report.quit_requested);
        assert!(matches!(pump.events(), [FramedEvent::Quit { .. }]));
    }

    #[test]
    fn test_gamepad_registered_once() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let id = platform.plug_gamepad(gamepad_info());

        pump.tick(&mut platform);

        assert!(pump.devices().contains(DeviceKind::Gamepad, id));
        assert!(!pump.devices().contains(DeviceKind::Joystick, id));
        assert_eq!(pump.devices().len(), 1);

        platform.push_joystick_axis(id, 0, 1200);
        let report = pump.tick(&mut platform);
        assert_eq!(report.failures, 0);
        assert_eq!(report.events, 1);

        platform.unplug(id);
        pump.tick(&mut platform);
        assert!(pump.devices().is_empty());
        assert_eq!(platform.open_handles(), 0);
    }

    #[test]
    fn test_input_from_unknown_device_counted_and_delivered() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        platform.push_key(window, 42, Key::A, true, Keymod::empty());

        let report = pump.tick(&mut platform);

        assert_eq!(report.failures, 1);
        assert_eq!(report.events, 1);
        assert!(pump.input().key(Key::A).is_down());
    }

    #[test]
    fn test_notification_wins_over_command() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        pump.tick(&mut platform);

        pump.window_mut()
            .unwrap()
            .resize(&mut platform, Size::new(640, 480))
            .unwrap();
        assert_eq!(pump.window_state().unwrap().size, Size::new(640, 480));

        platform.os_resize(window, Size::new(800, 600));
        pump.tick(&mut platform);

        assert_eq!(pump.window_state().unwrap().size, Size::new(800, 600));
    }

    #[test]
    fn test_close_request_sets_quit_and_keeps_window() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        pump.tick(&mut platform);

        platform.os_request_close(window);
        let report = pump.tick(&mut platform);

        assert!(report.quit_requested);
        assert!(pump.window_state().unwrap().close_requested);
        assert!(platform.window_exists(window));
    }

    #[test]
    fn test_subscribers_by_priority_in_arrival_order() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let log: Log = Rc::default();
        pump.subscribe(Recorder::boxed("low", 1, &log));
        pump.subscribe(Recorder::boxed("high", 10, &log));

        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        pump.tick(&mut platform);
        log.borrow_mut().clear();

        platform.push_text_editing(window, "k", 0, 1);
        platform.push_text_editing(window, "ka", 0, 2);
        platform.push_quit();
        pump.tick(&mut platform);

        let names: Vec<_> = log
            .borrow()
            .iter()
            .map(|(who, _, what)| (who.clone(), *what))
            .collect();
        assert_eq!(
            names,
            vec![
                ("high".to_string(), "text_editing"),
                ("low".to_string(), "text_editing"),
                ("high".to_string(), "text_editing"),
                ("low".to_string(), "text_editing"),
                ("high".to_string(), "quit"),
                ("low".to_string(), "quit"),
            ]
        );

        assert!(pump.unsubscribe("high").is_some());
        assert!(pump.unsubscribe("high").is_none());
    }

    #[test]
    fn test_events_of_one_tick_never_leak_into_next() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let log: Log = Rc::default();
        pump.subscribe(Recorder::boxed("rec", 0, &log));

        platform.push_quit();
        pump.tick(&mut platform);
        platform.push_render_reset(false);
        pump.tick(&mut platform);

        let ticks: Vec<_> = log
            .borrow()
            .iter()
            .map(|(_, t, what)| (*t, *what))
            .collect();
        assert_eq!(ticks, vec![(1, "quit"), (2, "render_reset")]);
        assert!(matches!(pump.events(), [FramedEvent::RenderReset { .. }]));
    }

    #[test]
    fn test_window_events_reach_tracker() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        pump.tick(&mut platform);

        platform.os_focus(window, true);
        pump.tick(&mut platform);

        let focus_gained = pump.events().iter().any(|e| {
            matches!(
                e,
                FramedEvent::Window {
                    kind: WindowEventKind::FocusGained,
                    ..
                }
            )
        });
        assert!(focus_gained);
        assert!(pump.window_state().unwrap().is_focused());
    }

    #[test]
    fn test_joystick_input_needs_focus() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        let id = platform.plug_gamepad(gamepad_info());
        pump.tick(&mut platform);

        platform.push_gamepad_button(id, GamepadButton::South, true);
        let report = pump.tick(&mut platform);
        assert_eq!(report.dropped, 1);
        assert_eq!(report.events, 0);

        platform.os_focus(window, true);
        platform.push_gamepad_button(id, GamepadButton::South, true);
        let report = pump.tick(&mut platform);
        assert_eq!(report.dropped, 0);
        let pad = pump.input().gamepad(id).unwrap();
        assert!(pad.button(GamepadButton::South).is_just_pressed());
    }

    #[test]
    fn test_background_joystick_input_allowed_by_config() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = EventPump::new(&PumpConfig {
            joystick_background_events: true,
            ..PumpConfig::default()
        });
        pump.open_window(&mut platform, &WindowConfig::default())
            .unwrap();
        let id = platform.plug_joystick(gamepad_info());
        platform.push_joystick_button(id, 3, true);

        let report = pump.tick(&mut platform);

        assert_eq!(report.dropped, 0);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut platform = HeadlessPlatform::new();
        let mut pump = pump();
        let window = pump
            .open_window(&mut platform, &WindowConfig::default())
            .unwrap()
            .id();
        platform.plug_joystick(gamepad_info());
        pump.tick(&mut platform);
        assert_eq!(platform.open_handles(), 1);

        pump.shutdown(&mut platform);

        assert_eq!(platform.open_handles(), 0);
        assert!(!platform.window_exists(window));
        assert!(pump.window().is_none());
    }
}

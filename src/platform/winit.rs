//! `winit` backend
//!
//! winit delivers events through callbacks, while the pump polls. The
//! adapter encodes each [`WindowEvent`] into the same native buffers the
//! headless backend produces and queues them in [`WinitState`]. A
//! [`WinitPlatform`] pairs that state with the active event loop for the
//! duration of one callback and answers the native boundary from it.

use std::collections::HashMap;

use tracing::{debug, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::monitor::MonitorHandle;
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowAttributes};

use super::native::{
    CommonPayload, DevicePayload, DropPayload, EventType, KeyboardPayload, MouseButtonPayload,
    MouseMotionPayload, MouseWheelPayload, TextEditingPayload, TextInputPayload, WindowPayload,
};
use super::{
    DeviceHandle, DeviceInfo, DisplayId, DisplayMode, NativeDeviceApi, NativeEvent,
    NativeEventSource, NativeQueue, NativeText, NativeWindowApi, Size, WindowId,
};
use crate::config::WindowConfig;
use crate::error::NativeError;
use crate::input::{Key, Keymod, MouseButton, MouseButtons};

/// Pixels per wheel line when winit reports pixel deltas
const PIXELS_PER_LINE: f32 = 20.0;

/// Creates window attributes from configuration
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

/// Side tables mapping native ids to winit objects, plus the event queue
#[derive(Debug)]
pub struct WinitState {
    queue: NativeQueue,
    windows: HashMap<WindowId, Window>,
    window_ids: HashMap<winit::window::WindowId, WindowId>,
    next_window: u32,
    monitors: Vec<MonitorHandle>,
    window_displays: HashMap<WindowId, DisplayId>,
    keyboards: HashMap<winit::event::DeviceId, u32>,
    mice: HashMap<winit::event::DeviceId, u32>,
    next_device: u32,
    cursor: Option<[f32; 2]>,
    modifiers: Keymod,
    buttons: MouseButtons,
    text_input: bool,
    composing: bool,
}

impl WinitState {
    pub fn new() -> Self {
        Self {
            queue: NativeQueue::new(),
            windows: HashMap::new(),
            window_ids: HashMap::new(),
            next_window: 1,
            monitors: Vec::new(),
            window_displays: HashMap::new(),
            keyboards: HashMap::new(),
            mice: HashMap::new(),
            next_device: 1,
            cursor: None,
            modifiers: Keymod::empty(),
            buttons: MouseButtons::empty(),
            text_input: false,
            composing: false,
        }
    }

    /// Native id of a winit window created through this backend
    pub fn window_id(&self, id: winit::window::WindowId) -> Option<WindowId> {
        self.window_ids.get(&id).copied()
    }

    pub fn request_redraw(&self, window: WindowId) {
        if let Some(w) = self.windows.get(&window) {
            w.request_redraw();
        }
    }

    /// Encodes a winit window event into the native queue
    pub fn push_window_event(&mut self, id: winit::window::WindowId, event: &WindowEvent) {
        let Some(window) = self.window_id(id) else {
            return;
        };
        let scale = self
            .windows
            .get(&window)
            .map_or(1.0, |w| w.scale_factor());

        match event {
            WindowEvent::Resized(size) => {
                let logical: LogicalSize<u32> = size.to_logical(scale);
                self.push_window(
                    window,
                    EventType::WINDOW_RESIZED,
                    logical.width,
                    logical.height,
                );
                self.push_window(
                    window,
                    EventType::WINDOW_PIXEL_SIZE_CHANGED,
                    size.width,
                    size.height,
                );
            }
            WindowEvent::Moved(position) => {
                self.push_window_raw(window, EventType::WINDOW_MOVED, position.x, position.y);
                self.track_display(window);
            }
            WindowEvent::CloseRequested => {
                self.push_window(window, EventType::WINDOW_CLOSE_REQUESTED, 0, 0);
            }
            WindowEvent::Destroyed => {
                self.push_window(window, EventType::WINDOW_DESTROYED, 0, 0);
            }
            WindowEvent::Focused(focused) => {
                let tag = if *focused {
                    EventType::WINDOW_FOCUS_GAINED
                } else {
                    EventType::WINDOW_FOCUS_LOST
                };
                self.push_window(window, tag, 0, 0);
            }
            WindowEvent::CursorEntered { device_id } => {
                self.mouse_id(*device_id);
                self.push_window(window, EventType::WINDOW_MOUSE_ENTER, 0, 0);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.push_window(window, EventType::WINDOW_MOUSE_LEAVE, 0, 0);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.push_window(window, EventType::WINDOW_DISPLAY_SCALE_CHANGED, 0, 0);
            }
            WindowEvent::Occluded(occluded) => {
                let tag = if *occluded {
                    EventType::WINDOW_OCCLUDED
                } else {
                    EventType::WINDOW_EXPOSED
                };
                self.push_window(window, tag, 0, 0);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = keymod_from(modifiers.state());
            }
            WindowEvent::KeyboardInput {
                device_id, event, ..
            } => {
                let which = self.keyboard_id(*device_id);
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => Key::from(code),
                    PhysicalKey::Unidentified(_) => Key::Unknown(0),
                };
                let keycode = match &event.logical_key {
                    winit::keyboard::Key::Character(text) => text
                        .chars()
                        .next()
                        .and_then(|c| c.to_lowercase().next())
                        .map_or_else(|| key.default_keycode(), u32::from),
                    _ => key.default_keycode(),
                };
                let down = event.state == ElementState::Pressed;
                let payload = KeyboardPayload {
                    common: self.common(if down {
                        EventType::KEY_DOWN
                    } else {
                        EventType::KEY_UP
                    }),
                    window_id: window.0,
                    which,
                    scancode: key.scancode(),
                    key: keycode,
                    modifiers: self.modifiers.bits(),
                    raw: 0,
                    down: u8::from(down),
                    repeat: u8::from(event.repeat),
                    _padding: [0; 2],
                };
                self.queue.push_payload(&payload);

                if down
                    && self.text_input
                    && !self.composing
                    && let Some(text) = &event.text
                    && !text.chars().any(char::is_control)
                {
                    self.push_text_input(window, text.as_str());
                }
            }
            WindowEvent::Ime(ime) => match ime {
                Ime::Preedit(text, cursor) => {
                    self.composing = !text.is_empty();
                    let (start, end) = cursor.unwrap_or((text.len(), text.len()));
                    let handle = self.queue.alloc_text(text.as_str());
                    let payload = TextEditingPayload {
                        common: self.common(EventType::TEXT_EDITING),
                        window_id: window.0,
                        _padding: 0,
                        text: handle,
                        start: i32::try_from(start).unwrap_or(i32::MAX),
                        length: i32::try_from(end.saturating_sub(start)).unwrap_or(0),
                    };
                    self.queue.push_payload(&payload);
                }
                Ime::Commit(text) => {
                    self.composing = false;
                    self.push_text_input(window, text);
                }
                Ime::Disabled => self.composing = false,
                Ime::Enabled => {}
            },
            WindowEvent::CursorMoved {
                device_id,
                position,
            } => {
                let which = self.mouse_id(*device_id);
                let current = [position.x as f32, position.y as f32];
                let previous = self.cursor.replace(current).unwrap_or(current);
                let payload = MouseMotionPayload {
                    common: self.common(EventType::MOUSE_MOTION),
                    window_id: window.0,
                    which,
                    state: self.buttons.bits(),
                    x: current[0],
                    y: current[1],
                    xrel: current[0] - previous[0],
                    yrel: current[1] - previous[1],
                    _padding: 0,
                };
                self.queue.push_payload(&payload);
            }
            WindowEvent::MouseInput {
                device_id,
                state,
                button,
            } => {
                let which = self.mouse_id(*device_id);
                let button = mouse_button_from(*button);
                let down = state.is_pressed();
                self.buttons.set(button.mask(), down);
                let [x, y] = self.cursor.unwrap_or_default();
                let payload = MouseButtonPayload {
                    common: self.common(if down {
                        EventType::MOUSE_BUTTON_DOWN
                    } else {
                        EventType::MOUSE_BUTTON_UP
                    }),
                    window_id: window.0,
                    which,
                    button: button.to_native(),
                    down: u8::from(down),
                    clicks: 1,
                    _padding1: 0,
                    x,
                    y,
                    _padding2: 0,
                };
                self.queue.push_payload(&payload);
            }
            WindowEvent::MouseWheel {
                device_id, delta, ..
            } => {
                let which = self.mouse_id(*device_id);
                let [dx, dy] = match delta {
                    MouseScrollDelta::LineDelta(x, y) => [*x, *y],
                    MouseScrollDelta::PixelDelta(pos) => [
                        pos.x as f32 / PIXELS_PER_LINE,
                        pos.y as f32 / PIXELS_PER_LINE,
                    ],
                };
                let [mouse_x, mouse_y] = self.cursor.unwrap_or_default();
                let payload = MouseWheelPayload {
                    common: self.common(EventType::MOUSE_WHEEL),
                    window_id: window.0,
                    which,
                    x: dx,
                    y: dy,
                    direction: 0,
                    mouse_x,
                    mouse_y,
                    _padding: 0,
                };
                self.queue.push_payload(&payload);
            }
            WindowEvent::HoveredFile(_) => self.push_drop(window, EventType::DROP_BEGIN, None),
            WindowEvent::DroppedFile(path) => {
                let path = path.to_string_lossy().into_owned();
                self.push_drop(window, EventType::DROP_FILE, Some(path));
            }
            WindowEvent::HoveredFileCancelled => {
                self.push_drop(window, EventType::DROP_COMPLETE, None)
            }
            _ => {}
        }
    }

    fn common(&self, tag: EventType) -> CommonPayload {
        CommonPayload::new(tag, self.queue.now_ns())
    }

    fn push_window(&mut self, window: WindowId, tag: EventType, data1: u32, data2: u32) {
        self.push_window_raw(
            window,
            tag,
            i32::try_from(data1).unwrap_or(i32::MAX),
            i32::try_from(data2).unwrap_or(i32::MAX),
        );
    }

    fn push_window_raw(&mut self, window: WindowId, tag: EventType, data1: i32, data2: i32) {
        let payload = WindowPayload {
            common: self.common(tag),
            window_id: window.0,
            data1,
            data2,
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    fn push_text_input(&mut self, window: WindowId, text: &str) {
        let handle = self.queue.alloc_text(text);
        let payload = TextInputPayload {
            common: self.common(EventType::TEXT_INPUT),
            window_id: window.0,
            _padding: 0,
            text: handle,
        };
        self.queue.push_payload(&payload);
    }

    fn push_drop(&mut self, window: WindowId, tag: EventType, data: Option<String>) {
        let data = data.map_or(0, |data| self.queue.alloc_text(data));
        let [x, y] = self.cursor.unwrap_or_default();
        let payload = DropPayload {
            common: self.common(tag),
            window_id: window.0,
            x,
            y,
            _padding: 0,
            source: 0,
            data,
        };
        self.queue.push_payload(&payload);
    }

    /// Native id for a winit keyboard; the first sighting queues an ADD
    fn keyboard_id(&mut self, device: winit::event::DeviceId) -> u32 {
        if let Some(id) = self.keyboards.get(&device) {
            return *id;
        }
        let id = self.next_device;
        self.next_device += 1;
        self.keyboards.insert(device, id);
        self.push_device(EventType::KEYBOARD_ADDED, id);
        id
    }

    /// Native id for a winit pointer; the first sighting queues an ADD
    fn mouse_id(&mut self, device: winit::event::DeviceId) -> u32 {
        if let Some(id) = self.mice.get(&device) {
            return *id;
        }
        let id = self.next_device;
        self.next_device += 1;
        self.mice.insert(device, id);
        self.push_device(EventType::MOUSE_ADDED, id);
        id
    }

    fn push_device(&mut self, tag: EventType, id: u32) {
        let payload = DevicePayload {
            common: self.common(tag),
            which: id,
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    /// Queues a display change if the window now sits on another monitor
    fn track_display(&mut self, window: WindowId) {
        let Some(monitor) = self.windows.get(&window).and_then(|w| w.current_monitor()) else {
            return;
        };
        let display = self.display_id(monitor);
        let previous = self.window_displays.insert(window, display);
        if previous.is_some_and(|previous| previous != display) {
            self.push_window(window, EventType::WINDOW_DISPLAY_CHANGED, display.0, 0);
        }
    }

    fn window(&self, window: WindowId) -> Result<&Window, NativeError> {
        self.windows
            .get(&window)
            .ok_or(NativeError::UnknownWindow(window))
    }

    fn display_id(&mut self, monitor: MonitorHandle) -> DisplayId {
        let index = match self.monitors.iter().position(|m| *m == monitor) {
            Some(index) => index,
            None => {
                self.monitors.push(monitor);
                self.monitors.len() - 1
            }
        };
        DisplayId(u32::try_from(index + 1).unwrap_or(u32::MAX))
    }
}

impl Default for WinitState {
    fn default() -> Self {
        Self::new()
    }
}

fn keymod_from(state: ModifiersState) -> Keymod {
    let mut keymod = Keymod::empty();
    keymod.set(Keymod::LSHIFT, state.shift_key());
    keymod.set(Keymod::LCTRL, state.control_key());
    keymod.set(Keymod::LALT, state.alt_key());
    keymod.set(Keymod::LGUI, state.super_key());
    keymod
}

fn mouse_button_from(button: winit::event::MouseButton) -> MouseButton {
    use winit::event::MouseButton as B;
    match button {
        B::Left => MouseButton::Left,
        B::Right => MouseButton::Right,
        B::Middle => MouseButton::Middle,
        B::Back => MouseButton::X1,
        B::Forward => MouseButton::X2,
        // Native codes 1..=5 are the named buttons
        B::Other(other) => match u8::try_from(other) {
            Ok(code) if code > 5 => MouseButton::Other(code),
            _ => MouseButton::Other(u8::MAX),
        },
    }
}

fn call_error(error: impl std::fmt::Display) -> NativeError {
    NativeError::Call(error.to_string())
}

/// Native boundary over a winit event loop, valid for one callback
pub struct WinitPlatform<'a> {
    event_loop: &'a ActiveEventLoop,
    state: &'a mut WinitState,
}

impl<'a> WinitPlatform<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop, state: &'a mut WinitState) -> Self {
        Self { event_loop, state }
    }

    /// Queues a window notification that carries no data
    fn notify(&mut self, window: WindowId, tag: EventType) {
        self.state.push_window(window, tag, 0, 0);
    }
}

impl NativeEventSource for WinitPlatform<'_> {
    fn poll_next_event(&mut self) -> Option<NativeEvent> {
        self.state.queue.pop()
    }
}

impl NativeText for WinitPlatform<'_> {
    fn resolve_text(&self, handle: u64) -> Option<String> {
        self.state.queue.resolve(handle)
    }
}

impl NativeWindowApi for WinitPlatform<'_> {
    fn create_window(&mut self, config: &WindowConfig) -> Result<WindowId, NativeError> {
        let window = self
            .event_loop
            .create_window(window_attributes_from_config(config))
            .map_err(call_error)?;
        let id = WindowId(self.state.next_window);
        self.state.next_window += 1;
        self.state.window_ids.insert(window.id(), id);
        self.state.windows.insert(id, window);
        self.state.track_display(id);
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) -> Result<(), NativeError> {
        let removed = self
            .state
            .windows
            .remove(&window)
            .ok_or(NativeError::UnknownWindow(window))?;
        self.state.window_ids.remove(&removed.id());
        self.state.window_displays.remove(&window);
        Ok(())
    }

    fn window_size(&self, window: WindowId) -> Result<Size, NativeError> {
        let w = self.state.window(window)?;
        let logical: LogicalSize<u32> = w.inner_size().to_logical(w.scale_factor());
        Ok(Size::new(logical.width, logical.height))
    }

    fn set_window_size(&mut self, window: WindowId, size: Size) -> Result<(), NativeError> {
        let w = self.state.window(window)?;
        // An immediate resize produces no Resized event; report it ourselves
        if let Some(applied) = w.request_inner_size(LogicalSize::new(size.width, size.height)) {
            let logical: LogicalSize<u32> = applied.to_logical(w.scale_factor());
            self.state.push_window(
                window,
                EventType::WINDOW_RESIZED,
                logical.width,
                logical.height,
            );
            self.state.push_window(
                window,
                EventType::WINDOW_PIXEL_SIZE_CHANGED,
                applied.width,
                applied.height,
            );
        }
        Ok(())
    }

    fn window_size_in_pixels(&self, window: WindowId) -> Result<Size, NativeError> {
        let PhysicalSize { width, height } = self.state.window(window)?.inner_size();
        Ok(Size::new(width, height))
    }

    fn display_for_window(&self, window: WindowId) -> Result<DisplayId, NativeError> {
        self.state.window(window)?;
        self.state
            .window_displays
            .get(&window)
            .copied()
            .ok_or_else(|| NativeError::Call("no current monitor".to_string()))
    }

    fn display_scale(&self, window: WindowId) -> Result<f32, NativeError> {
        Ok(self.state.window(window)?.scale_factor() as f32)
    }

    fn set_fullscreen(&mut self, window: WindowId, fullscreen: bool) -> Result<(), NativeError> {
        let w = self.state.window(window)?;
        if fullscreen {
            if w.fullscreen().is_none() {
                w.set_fullscreen(Some(Fullscreen::Borderless(None)));
            }
        } else {
            w.set_fullscreen(None);
        }
        Ok(())
    }

    fn set_fullscreen_mode(
        &mut self,
        window: WindowId,
        mode: Option<DisplayMode>,
    ) -> Result<(), NativeError> {
        let w = self.state.window(window)?;
        let Some(mode) = mode else {
            return Ok(());
        };
        let monitor = w
            .current_monitor()
            .ok_or_else(|| NativeError::Call("no current monitor".to_string()))?;
        let wanted_mhz = (mode.refresh_rate * 1000.0).round() as u32;
        let video_mode = monitor
            .video_modes()
            .filter(|m| m.size() == PhysicalSize::new(mode.width, mode.height))
            .find(|m| {
                wanted_mhz == 0 || m.refresh_rate_millihertz().abs_diff(wanted_mhz) < 1000
            })
            .ok_or_else(|| {
                NativeError::Call(format!(
                    "no {}x{}@{} video mode",
                    mode.width, mode.height, mode.refresh_rate
                ))
            })?;
        w.set_fullscreen(Some(Fullscreen::Exclusive(video_mode)));
        Ok(())
    }

    fn set_resizable(&mut self, window: WindowId, resizable: bool) -> Result<(), NativeError> {
        self.state.window(window)?.set_resizable(resizable);
        Ok(())
    }

    fn set_bordered(&mut self, window: WindowId, bordered: bool) -> Result<(), NativeError> {
        self.state.window(window)?.set_decorations(bordered);
        Ok(())
    }

    fn set_title(&mut self, window: WindowId, title: &str) -> Result<(), NativeError> {
        self.state.window(window)?.set_title(title);
        Ok(())
    }

    fn show(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.state.window(window)?.set_visible(true);
        self.notify(window, EventType::WINDOW_SHOWN);
        Ok(())
    }

    fn hide(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.state.window(window)?.set_visible(false);
        self.notify(window, EventType::WINDOW_HIDDEN);
        Ok(())
    }

    fn maximize(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.state.window(window)?.set_maximized(true);
        self.notify(window, EventType::WINDOW_MAXIMIZED);
        Ok(())
    }

    fn minimize(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.state.window(window)?.set_minimized(true);
        self.notify(window, EventType::WINDOW_MINIMIZED);
        Ok(())
    }

    fn restore(&mut self, window: WindowId) -> Result<(), NativeError> {
        let w = self.state.window(window)?;
        w.set_minimized(false);
        w.set_maximized(false);
        self.notify(window, EventType::WINDOW_RESTORED);
        Ok(())
    }

    fn set_relative_mouse_mode(
        &mut self,
        window: WindowId,
        enabled: bool,
    ) -> Result<(), NativeError> {
        let w = self.state.window(window)?;
        if enabled {
            w.set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| w.set_cursor_grab(CursorGrabMode::Confined))
                .map_err(call_error)?;
        } else {
            w.set_cursor_grab(CursorGrabMode::None).map_err(call_error)?;
        }
        w.set_cursor_visible(!enabled);
        Ok(())
    }

    fn set_text_input(&mut self, window: WindowId, enabled: bool) -> Result<(), NativeError> {
        self.state.window(window)?.set_ime_allowed(enabled);
        self.state.text_input = enabled;
        if !enabled {
            self.state.composing = false;
        }
        debug!(window.id = window.0, enabled, "Text input toggled");
        Ok(())
    }
}

impl NativeDeviceApi for WinitPlatform<'_> {
    fn is_gamepad(&self, _id: u32) -> bool {
        false
    }

    fn open_gamepad(&mut self, _id: u32) -> Result<DeviceHandle, NativeError> {
        Err(NativeError::Unsupported("gamepads"))
    }

    fn open_joystick(&mut self, _id: u32) -> Result<DeviceHandle, NativeError> {
        Err(NativeError::Unsupported("joysticks"))
    }

    fn close(&mut self, handle: DeviceHandle) {
        warn!(?handle, "Close of a device handle this backend never opened");
    }

    fn device_info(&self, handle: DeviceHandle) -> Result<DeviceInfo, NativeError> {
        Err(NativeError::UnknownHandle(handle))
    }

    fn keyboard_name(&self, id: u32) -> Result<String, NativeError> {
        self.state
            .keyboards
            .values()
            .any(|known| *known == id)
            .then(|| format!("Keyboard {id}"))
            .ok_or(NativeError::UnknownDevice(id))
    }

    fn mouse_name(&self, id: u32) -> Result<String, NativeError> {
        self.state
            .mice
            .values()
            .any(|known| *known == id)
            .then(|| format!("Mouse {id}"))
            .ok_or(NativeError::UnknownDevice(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let config = WindowConfig {
            title: "Sandbox".to_string(),
            fullscreen: true,
            decorated: false,
            ..WindowConfig::default()
        };
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Sandbox");
        assert!(!attrs.decorations);
        let borderless = matches!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
        assert!(borderless);
    }

    #[test]
    fn test_keymod_from_state() {
        let keymod = keymod_from(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert!(keymod.contains(Keymod::LSHIFT | Keymod::LCTRL));
        assert!(!keymod.intersects(Keymod::ALT));
    }

    #[test]
    fn test_mouse_button_mapping() {
        use winit::event::MouseButton as B;
        assert_eq!(mouse_button_from(B::Left), MouseButton::Left);
        assert_eq!(mouse_button_from(B::Back), MouseButton::X1);
        let unmapped = mouse_button_from(B::Other(700));
        assert_eq!(unmapped, MouseButton::Other(u8::MAX));
        assert_eq!(mouse_button_from(B::Other(8)), MouseButton::Other(8));
        for code in 1..=5 {
            let button = mouse_button_from(B::Other(code));
            assert_eq!(MouseButton::from_native(button.to_native()), button);
        }
    }

    #[test]
    fn test_events_for_unknown_windows_are_ignored() {
        let mut state = WinitState::new();
        state.push_window_event(
            winit::window::WindowId::dummy(),
            &WindowEvent::CloseRequested,
        );
        assert!(state.queue.is_empty());
    }
}

//! Scripted in-process native layer
//!
//! Holds its own window, display and device tables and answers the native
//! boundary from them. Window commands behave like a cooperative OS: they
//! update the table and queue the notification a real OS would send.
//! `os_*` methods simulate changes the OS makes on its own, and `push_*`
//! methods queue input.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::native::{
    AxisPayload, ButtonPayload, CommonPayload, DevicePayload, DropPayload, EventType,
    KeyboardPayload, MOUSE_WHEEL_FLIPPED, MouseButtonPayload, MouseMotionPayload,
    MouseWheelPayload, TextEditingPayload, TextInputPayload, WindowPayload,
};
use super::{
    DeviceHandle, DeviceInfo, DisplayId, DisplayMode, NativeDeviceApi, NativeEvent,
    NativeEventSource, NativeQueue, NativeText, NativeWindowApi, Size, WindowId,
};
use crate::config::WindowConfig;
use crate::error::{NativeError, NativeInitError};
use crate::input::{
    DeviceKind, GamepadAxis, GamepadButton, Key, Keymod, MouseButton, MouseButtons,
};

/// A simulated display
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessDisplay {
    pub id: DisplayId,
    pub name: String,
    pub bounds: Size,
    pub scale: f32,
}

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub displays: Vec<HeadlessDisplay>,
    /// Smallest size a window may be resized to
    pub min_window_size: Size,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            displays: vec![HeadlessDisplay {
                id: DisplayId(1),
                name: "Headless Display".to_string(),
                bounds: Size::new(1920, 1080),
                scale: 1.0,
            }],
            min_window_size: Size::new(1, 1),
        }
    }
}

#[derive(Debug, Clone)]
struct HeadlessWindow {
    title: String,
    size: Size,
    restore_size: Size,
    scale: f32,
    display: DisplayId,
    position: (i32, i32),
    fullscreen: bool,
    fullscreen_mode: Option<DisplayMode>,
    resizable: bool,
    bordered: bool,
    visible: bool,
    relative_mouse: bool,
    text_input: bool,
}

#[derive(Debug, Clone)]
struct HeadlessDevice {
    kind: DeviceKind,
    info: DeviceInfo,
}

#[derive(Debug)]
pub struct HeadlessPlatform {
    queue: NativeQueue,
    displays: Vec<HeadlessDisplay>,
    min_window_size: Size,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_window: u32,
    devices: BTreeMap<u32, HeadlessDevice>,
    next_device: u32,
    handles: HashMap<DeviceHandle, u32>,
    next_handle: u64,
    mouse_buttons: MouseButtons,
    deny_commands: bool,
    fail_metadata: bool,
}

impl HeadlessPlatform {
    /// Starts a headless platform with one 1920x1080 display
    pub fn new() -> Self {
        Self::with_options(HeadlessOptions::default())
    }

    /// Starts a headless platform; fails if no display is configured
    pub fn init(options: HeadlessOptions) -> Result<Self, NativeInitError> {
        if options.displays.is_empty() {
            return Err(NativeInitError::Platform(
                "headless platform needs at least one display".to_string(),
            ));
        }
        Ok(Self::with_options(options))
    }

    fn with_options(options: HeadlessOptions) -> Self {
        Self {
            queue: NativeQueue::new(),
            displays: options.displays,
            min_window_size: options.min_window_size,
            windows: BTreeMap::new(),
            next_window: 1,
            devices: BTreeMap::new(),
            next_device: 1,
            handles: HashMap::new(),
            next_handle: 1,
            mouse_buttons: MouseButtons::empty(),
            deny_commands: false,
            fail_metadata: false,
        }
    }

    /// Makes every window command fail, as an OS refusing requests would
    pub fn set_deny_commands(&mut self, deny: bool) {
        self.deny_commands = deny;
    }

    /// Makes device metadata queries fail
    pub fn set_fail_metadata(&mut self, fail: bool) {
        self.fail_metadata = fail;
    }

    pub fn window_exists(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    pub fn window_title(&self, window: WindowId) -> Option<&str> {
        self.windows.get(&window).map(|w| w.title.as_str())
    }

    pub fn text_input_active(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.text_input)
    }

    pub fn relative_mouse_active(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.relative_mouse)
    }

    /// Number of events waiting to be polled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of joystick/gamepad handles currently open
    pub fn open_handles(&self) -> usize {
        self.handles.len()
    }

    /// Changes the scale of the window's display without notifying
    pub fn set_display_scale(&mut self, window: WindowId, scale: f32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.scale = scale;
        }
    }

    // OS-initiated window changes

    pub fn os_resize(&mut self, window: WindowId, size: Size) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.size = size;
            self.push_resized(window);
        }
    }

    pub fn os_move(&mut self, window: WindowId, x: i32, y: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.position = (x, y);
            self.push_window(window, EventType::WINDOW_MOVED, x, y);
        }
    }

    pub fn os_focus(&mut self, window: WindowId, focused: bool) {
        let tag = if focused {
            EventType::WINDOW_FOCUS_GAINED
        } else {
            EventType::WINDOW_FOCUS_LOST
        };
        self.push_window(window, tag, 0, 0);
    }

    pub fn os_request_close(&mut self, window: WindowId) {
        self.push_window(window, EventType::WINDOW_CLOSE_REQUESTED, 0, 0);
    }

    /// Moves the window to another display, adopting its scale
    pub fn os_move_to_display(&mut self, window: WindowId, display: DisplayId) {
        let Some(scale) = self.display(display).map(|d| d.scale) else {
            return;
        };
        if let Some(w) = self.windows.get_mut(&window) {
            w.display = display;
            w.scale = scale;
            let display_id = display.0 as i32;
            self.push_window(window, EventType::WINDOW_DISPLAY_CHANGED, display_id, 0);
        }
    }

    /// Queues a raw window notification without touching the window table
    pub fn push_window(&mut self, window: WindowId, tag: EventType, data1: i32, data2: i32) {
        let payload = WindowPayload {
            common: self.common(tag),
            window_id: window.0,
            data1,
            data2,
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    // Devices

    pub fn plug_keyboard(&mut self, name: &str) -> u32 {
        let info = DeviceInfo {
            name: name.to_string(),
            ..DeviceInfo::default()
        };
        self.plug(DeviceKind::Keyboard, info)
    }

    pub fn plug_mouse(&mut self, name: &str) -> u32 {
        let info = DeviceInfo {
            name: name.to_string(),
            ..DeviceInfo::default()
        };
        self.plug(DeviceKind::Mouse, info)
    }

    pub fn plug_joystick(&mut self, info: DeviceInfo) -> u32 {
        self.plug(DeviceKind::Joystick, info)
    }

    /// Plugs a gamepad; like SDL, a joystick ADD precedes the gamepad ADD
    pub fn plug_gamepad(&mut self, info: DeviceInfo) -> u32 {
        self.plug(DeviceKind::Gamepad, info)
    }

    /// Unplugs a device; open handles stay allocated until closed
    pub fn unplug(&mut self, id: u32) {
        if let Some(device) = self.devices.remove(&id) {
            match device.kind {
                DeviceKind::Gamepad => {
                    self.push_device(DeviceKind::Gamepad, id, false);
                    self.push_device(DeviceKind::Joystick, id, false);
                }
                kind => self.push_device(kind, id, false),
            }
        }
    }

    /// Queues a raw ADD or REMOVE without touching the device table
    pub fn push_device(&mut self, kind: DeviceKind, id: u32, added: bool) {
        let tag = match (kind, added) {
            (DeviceKind::Keyboard, true) => EventType::KEYBOARD_ADDED,
            (DeviceKind::Keyboard, false) => EventType::KEYBOARD_REMOVED,
            (DeviceKind::Mouse, true) => EventType::MOUSE_ADDED,
            (DeviceKind::Mouse, false) => EventType::MOUSE_REMOVED,
            (DeviceKind::Joystick, true) => EventType::JOYSTICK_ADDED,
            (DeviceKind::Joystick, false) => EventType::JOYSTICK_REMOVED,
            (DeviceKind::Gamepad, true) => EventType::GAMEPAD_ADDED,
            (DeviceKind::Gamepad, false) => EventType::GAMEPAD_REMOVED,
        };
        let payload = DevicePayload {
            common: self.common(tag),
            which: id,
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    fn plug(&mut self, kind: DeviceKind, info: DeviceInfo) -> u32 {
        let id = self.next_device;
        self.next_device += 1;
        debug!(
            device.kind = %kind,
            device.id = id,
            device.name = %info.name,
            "Headless device plugged"
        );
        self.devices.insert(id, HeadlessDevice { kind, info });
        if kind == DeviceKind::Gamepad {
            self.push_device(DeviceKind::Joystick, id, true);
        }
        self.push_device(kind, id, true);
        id
    }

    // Input

    pub fn push_quit(&mut self) {
        let payload = self.common(EventType::QUIT);
        self.queue.push_payload(&payload);
    }

    pub fn push_raw(&mut self, event: NativeEvent) {
        self.queue.push(event);
    }

    pub fn push_key(
        &mut self,
        window: WindowId,
        device: u32,
        key: Key,
        down: bool,
        modifiers: Keymod,
    ) {
        let tag = if down {
            EventType::KEY_DOWN
        } else {
            EventType::KEY_UP
        };
        let payload = KeyboardPayload {
            common: self.common(tag),
            window_id: window.0,
            which: device,
            scancode: key.scancode(),
            key: key.default_keycode(),
            modifiers: modifiers.bits(),
            raw: 0,
            down: u8::from(down),
            repeat: 0,
            _padding: [0; 2],
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_text_input(&mut self, window: WindowId, text: &str) {
        let handle = self.queue.alloc_text(text);
        let payload = TextInputPayload {
            common: self.common(EventType::TEXT_INPUT),
            window_id: window.0,
            _padding: 0,
            text: handle,
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_text_editing(&mut self, window: WindowId, text: &str, start: i32, length: i32) {
        let handle = self.queue.alloc_text(text);
        let payload = TextEditingPayload {
            common: self.common(EventType::TEXT_EDITING),
            window_id: window.0,
            _padding: 0,
            text: handle,
            start,
            length,
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_mouse_motion(
        &mut self,
        window: WindowId,
        device: u32,
        position: [f32; 2],
        delta: [f32; 2],
    ) {
        let payload = MouseMotionPayload {
            common: self.common(EventType::MOUSE_MOTION),
            window_id: window.0,
            which: device,
            state: self.mouse_buttons.bits(),
            x: position[0],
            y: position[1],
            xrel: delta[0],
            yrel: delta[1],
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_mouse_button(
        &mut self,
        window: WindowId,
        device: u32,
        button: MouseButton,
        down: bool,
        position: [f32; 2],
    ) {
        self.mouse_buttons.set(button.mask(), down);
        let tag = if down {
            EventType::MOUSE_BUTTON_DOWN
        } else {
            EventType::MOUSE_BUTTON_UP
        };
        let payload = MouseButtonPayload {
            common: self.common(tag),
            window_id: window.0,
            which: device,
            button: button.to_native(),
            down: u8::from(down),
            clicks: 1,
            _padding1: 0,
            x: position[0],
            y: position[1],
            _padding2: 0,
        };
        self.queue.push_payload(&payload);
    }

    /// Queues a wheel event; `flipped` reports natural scrolling
    pub fn push_mouse_wheel(
        &mut self,
        window: WindowId,
        device: u32,
        delta: [f32; 2],
        flipped: bool,
    ) {
        let payload = MouseWheelPayload {
            common: self.common(EventType::MOUSE_WHEEL),
            window_id: window.0,
            which: device,
            x: delta[0],
            y: delta[1],
            direction: if flipped { MOUSE_WHEEL_FLIPPED } else { 0 },
            mouse_x: 0.0,
            mouse_y: 0.0,
            _padding: 0,
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_joystick_axis(&mut self, id: u32, axis: u8, value: i16) {
        self.push_axis(EventType::JOYSTICK_AXIS_MOTION, id, axis, value);
    }

    pub fn push_joystick_button(&mut self, id: u32, button: u8, down: bool) {
        let tag = if down {
            EventType::JOYSTICK_BUTTON_DOWN
        } else {
            EventType::JOYSTICK_BUTTON_UP
        };
        self.push_button(tag, id, button, down);
    }

    pub fn push_gamepad_axis(&mut self, id: u32, axis: GamepadAxis, value: i16) {
        self.push_axis(EventType::GAMEPAD_AXIS_MOTION, id, axis.to_native(), value);
    }

    pub fn push_gamepad_button(&mut self, id: u32, button: GamepadButton, down: bool) {
        let tag = if down {
            EventType::GAMEPAD_BUTTON_DOWN
        } else {
            EventType::GAMEPAD_BUTTON_UP
        };
        self.push_button(tag, id, button.to_native(), down);
    }

    pub fn push_drop_file(&mut self, window: WindowId, path: &str) {
        let handle = self.queue.alloc_text(path);
        let payload = DropPayload {
            common: self.common(EventType::DROP_FILE),
            window_id: window.0,
            x: 0.0,
            y: 0.0,
            _padding: 0,
            source: 0,
            data: handle,
        };
        self.queue.push_payload(&payload);
    }

    pub fn push_render_reset(&mut self, device_lost: bool) {
        let tag = if device_lost {
            EventType::RENDER_DEVICE_RESET
        } else {
            EventType::RENDER_TARGETS_RESET
        };
        let payload = self.common(tag);
        self.queue.push_payload(&payload);
    }

    fn push_axis(&mut self, tag: EventType, id: u32, axis: u8, value: i16) {
        let payload = AxisPayload {
            common: self.common(tag),
            which: id,
            axis,
            _padding1: [0; 3],
            value,
            _padding2: 0,
            _padding3: 0,
        };
        self.queue.push_payload(&payload);
    }

    fn push_button(&mut self, tag: EventType, id: u32, button: u8, down: bool) {
        let payload = ButtonPayload {
            common: self.common(tag),
            which: id,
            button,
            down: u8::from(down),
            _padding: [0; 2],
        };
        self.queue.push_payload(&payload);
    }

    fn common(&self, tag: EventType) -> CommonPayload {
        CommonPayload::new(tag, self.queue.now_ns())
    }

    fn check_command(&self) -> Result<(), NativeError> {
        if self.deny_commands {
            return Err(NativeError::Call(
                "command denied by the window system".to_string(),
            ));
        }
        Ok(())
    }

    fn window(&self, window: WindowId) -> Result<&HeadlessWindow, NativeError> {
        self.windows
            .get(&window)
            .ok_or(NativeError::UnknownWindow(window))
    }

    /// Looks up a window for a command
    fn command_window(&mut self, window: WindowId) -> Result<&mut HeadlessWindow, NativeError> {
        self.check_command()?;
        self.windows
            .get_mut(&window)
            .ok_or(NativeError::UnknownWindow(window))
    }

    fn display(&self, id: DisplayId) -> Option<&HeadlessDisplay> {
        self.displays.iter().find(|d| d.id == id)
    }

    fn clamp_size(&self, size: Size) -> Size {
        Size::new(
            size.width.max(self.min_window_size.width),
            size.height.max(self.min_window_size.height),
        )
    }

    fn push_resized(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get(&window) {
            let size = w.size;
            let pixels = pixel_size(w);
            self.push_window(
                window,
                EventType::WINDOW_RESIZED,
                size.width as i32,
                size.height as i32,
            );
            self.push_window(
                window,
                EventType::WINDOW_PIXEL_SIZE_CHANGED,
                pixels.width as i32,
                pixels.height as i32,
            );
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_size(window: &HeadlessWindow) -> Size {
    Size::new(
        (window.size.width as f32 * window.scale).round() as u32,
        (window.size.height as f32 * window.scale).round() as u32,
    )
}

impl NativeEventSource for HeadlessPlatform {
    fn poll_next_event(&mut self) -> Option<NativeEvent> {
        self.queue.pop()
    }
}

impl NativeText for HeadlessPlatform {
    fn resolve_text(&self, handle: u64) -> Option<String> {
        self.queue.resolve(handle)
    }
}

impl NativeWindowApi for HeadlessPlatform {
    fn create_window(&mut self, config: &WindowConfig) -> Result<WindowId, NativeError> {
        self.check_command()?;
        let display = self
            .displays
            .first()
            .cloned()
            .ok_or_else(|| NativeError::Call("no display available".to_string()))?;

        let id = WindowId(self.next_window);
        self.next_window += 1;
        let size = self.clamp_size(Size::new(config.width, config.height));
        let window = HeadlessWindow {
            title: config.title.clone(),
            size: if config.fullscreen { display.bounds } else { size },
            restore_size: size,
            scale: if config.high_dpi { display.scale } else { 1.0 },
            display: display.id,
            position: (0, 0),
            fullscreen: config.fullscreen,
            fullscreen_mode: None,
            resizable: config.resizable,
            bordered: config.decorated,
            visible: true,
            relative_mouse: false,
            text_input: false,
        };
        self.windows.insert(id, window);
        debug!(window.id = id.0, "Headless window created");
        Ok(id)
    }

    fn destroy_window(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.windows
            .remove(&window)
            .map(|_| ())
            .ok_or(NativeError::UnknownWindow(window))
    }

    fn window_size(&self, window: WindowId) -> Result<Size, NativeError> {
        self.window(window).map(|w| w.size)
    }

    fn set_window_size(&mut self, window: WindowId, size: Size) -> Result<(), NativeError> {
        let size = self.clamp_size(size);
        let w = self.command_window(window)?;
        if !w.resizable {
            return Err(NativeError::Call("window is not resizable".to_string()));
        }
        w.size = size;
        w.restore_size = size;
        self.push_resized(window);
        Ok(())
    }

    fn window_size_in_pixels(&self, window: WindowId) -> Result<Size, NativeError> {
        self.window(window).map(pixel_size)
    }

    fn display_for_window(&self, window: WindowId) -> Result<DisplayId, NativeError> {
        self.window(window).map(|w| w.display)
    }

    fn display_scale(&self, window: WindowId) -> Result<f32, NativeError> {
        self.window(window).map(|w| w.scale)
    }

    fn set_fullscreen(&mut self, window: WindowId, fullscreen: bool) -> Result<(), NativeError> {
        let display = self.window(window).map(|w| w.display)?;
        let bounds = self
            .display(display)
            .map(|d| d.bounds)
            .ok_or_else(|| NativeError::Call("display disappeared".to_string()))?;

        let w = self.command_window(window)?;
        if w.fullscreen == fullscreen {
            return Ok(());
        }
        w.fullscreen = fullscreen;
        let tag = if fullscreen {
            w.restore_size = w.size;
            w.size = w
                .fullscreen_mode
                .map(|mode| Size::new(mode.width, mode.height))
                .unwrap_or(bounds);
            EventType::WINDOW_ENTER_FULLSCREEN
        } else {
            w.size = w.restore_size;
            EventType::WINDOW_LEAVE_FULLSCREEN
        };
        self.push_window(window, tag, 0, 0);
        self.push_resized(window);
        Ok(())
    }

    fn set_fullscreen_mode(
        &mut self,
        window: WindowId,
        mode: Option<DisplayMode>,
    ) -> Result<(), NativeError> {
        let display = self.window(window).map(|w| w.display)?;
        if let Some(mode) = mode
            && let Some(d) = self.display(display)
            && (mode.width > d.bounds.width || mode.height > d.bounds.height)
        {
            return Err(NativeError::Call(format!(
                "display mode {}x{} not supported",
                mode.width, mode.height
            )));
        }
        self.command_window(window)?.fullscreen_mode = mode;
        Ok(())
    }

    fn set_resizable(&mut self, window: WindowId, resizable: bool) -> Result<(), NativeError> {
        self.command_window(window)?.resizable = resizable;
        Ok(())
    }

    fn set_bordered(&mut self, window: WindowId, bordered: bool) -> Result<(), NativeError> {
        self.command_window(window)?.bordered = bordered;
        Ok(())
    }

    fn set_title(&mut self, window: WindowId, title: &str) -> Result<(), NativeError> {
        self.command_window(window)?.title = title.to_string();
        Ok(())
    }

    fn show(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.command_window(window)?.visible = true;
        self.push_window(window, EventType::WINDOW_SHOWN, 0, 0);
        Ok(())
    }

    fn hide(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.command_window(window)?.visible = false;
        self.push_window(window, EventType::WINDOW_HIDDEN, 0, 0);
        Ok(())
    }

    fn maximize(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.command_window(window)?;
        self.push_window(window, EventType::WINDOW_MAXIMIZED, 0, 0);
        Ok(())
    }

    fn minimize(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.command_window(window)?;
        self.push_window(window, EventType::WINDOW_MINIMIZED, 0, 0);
        Ok(())
    }

    fn restore(&mut self, window: WindowId) -> Result<(), NativeError> {
        self.command_window(window)?;
        self.push_window(window, EventType::WINDOW_RESTORED, 0, 0);
        Ok(())
    }

    fn set_relative_mouse_mode(
        &mut self,
        window: WindowId,
        enabled: bool,
    ) -> Result<(), NativeError> {
        self.command_window(window)?.relative_mouse = enabled;
        Ok(())
    }

    fn set_text_input(&mut self, window: WindowId, enabled: bool) -> Result<(), NativeError> {
        self.command_window(window)?.text_input = enabled;
        Ok(())
    }
}

impl NativeDeviceApi for HeadlessPlatform {
    fn is_gamepad(&self, id: u32) -> bool {
        self.devices
            .get(&id)
            .is_some_and(|d| d.kind == DeviceKind::Gamepad)
    }

    fn open_gamepad(&mut self, id: u32) -> Result<DeviceHandle, NativeError> {
        match self.devices.get(&id) {
            Some(device) if device.kind == DeviceKind::Gamepad => {}
            _ => return Err(NativeError::UnknownDevice(id)),
        }
        self.open_joystick(id)
    }

    fn open_joystick(&mut self, id: u32) -> Result<DeviceHandle, NativeError> {
        match self.devices.get(&id) {
            Some(device) if matches!(device.kind, DeviceKind::Joystick | DeviceKind::Gamepad) => {}
            _ => return Err(NativeError::UnknownDevice(id)),
        }
        let handle = DeviceHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, id);
        Ok(handle)
    }

    fn close(&mut self, handle: DeviceHandle) {
        self.handles.remove(&handle);
    }

    fn device_info(&self, handle: DeviceHandle) -> Result<DeviceInfo, NativeError> {
        if self.fail_metadata {
            return Err(NativeError::Call("device metadata unavailable".to_string()));
        }
        let id = self
            .handles
            .get(&handle)
            .ok_or(NativeError::UnknownHandle(handle))?;
        self.devices
            .get(id)
            .map(|d| d.info.clone())
            .ok_or(NativeError::UnknownDevice(*id))
    }

    fn keyboard_name(&self, id: u32) -> Result<String, NativeError> {
        self.device_name(DeviceKind::Keyboard, id)
    }

    fn mouse_name(&self, id: u32) -> Result<String, NativeError> {
        self.device_name(DeviceKind::Mouse, id)
    }
}

impl HeadlessPlatform {
    fn device_name(&self, kind: DeviceKind, id: u32) -> Result<String, NativeError> {
        if self.fail_metadata {
            return Err(NativeError::Call("device metadata unavailable".to_string()));
        }
        match self.devices.get(&id) {
            Some(device) if device.kind == kind => Ok(device.info.name.clone()),
            _ => Err(NativeError::UnknownDevice(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(platform: &mut HeadlessPlatform) -> Vec<EventType> {
        std::iter::from_fn(|| platform.poll_next_event())
            .map(|event| event.event_type())
            .collect()
    }

    #[test]
    fn test_init_without_displays_fails() {
        let options = HeadlessOptions {
            displays: Vec::new(),
            ..HeadlessOptions::default()
        };
        assert!(matches!(
            HeadlessPlatform::init(options),
            Err(NativeInitError::Platform(_))
        ));
    }

    #[test]
    fn test_resize_queues_notifications() {
        let mut platform = HeadlessPlatform::new();
        let window = platform.create_window(&WindowConfig::default()).unwrap();
        let size = Size::new(640, 480);
        platform.set_window_size(window, size).unwrap();
        assert_eq!(
            drain(&mut platform),
            vec![EventType::WINDOW_RESIZED, EventType::WINDOW_PIXEL_SIZE_CHANGED]
        );
        assert_eq!(platform.window_size(window), Ok(Size::new(640, 480)));
    }

    #[test]
    fn test_resize_is_clamped_to_min_size() {
        let mut platform = HeadlessPlatform::init(HeadlessOptions {
            min_window_size: Size::new(320, 240),
            ..HeadlessOptions::default()
        })
        .unwrap();
        let window = platform.create_window(&WindowConfig::default()).unwrap();
        platform.set_window_size(window, Size::new(10, 10)).unwrap();
        assert_eq!(platform.window_size(window), Ok(Size::new(320, 240)));
    }

    #[test]
    fn test_fullscreen_uses_display_bounds() {
        let mut platform = HeadlessPlatform::new();
        let window = platform.create_window(&WindowConfig::default()).unwrap();
        platform.set_fullscreen(window, true).unwrap();
        assert_eq!(platform.window_size(window), Ok(Size::new(1920, 1080)));
        assert_eq!(drain(&mut platform)[0], EventType::WINDOW_ENTER_FULLSCREEN);

        platform.set_fullscreen(window, false).unwrap();
        assert_eq!(platform.window_size(window), Ok(Size::new(1280, 720)));
    }

    #[test]
    fn test_gamepad_plug_emits_joystick_then_gamepad() {
        let mut platform = HeadlessPlatform::new();
        let id = platform.plug_gamepad(DeviceInfo::default());
        assert!(platform.is_gamepad(id));
        assert_eq!(
            drain(&mut platform),
            vec![EventType::JOYSTICK_ADDED, EventType::GAMEPAD_ADDED]
        );

        platform.unplug(id);
        assert_eq!(
            drain(&mut platform),
            vec![EventType::GAMEPAD_REMOVED, EventType::JOYSTICK_REMOVED]
        );
    }

    #[test]
    fn test_device_ids_are_not_reused() {
        let mut platform = HeadlessPlatform::new();
        let first = platform.plug_keyboard("kb");
        platform.unplug(first);
        let second = platform.plug_keyboard("kb");
        assert_ne!(first, second);
    }

    #[test]
    fn test_text_handles_resolve_until_next_poll() {
        let mut platform = HeadlessPlatform::new();
        platform.push_text_input(WindowId(1), "hi");
        let event = platform.poll_next_event().unwrap();
        let handle = event.read::<TextInputPayload>().text;
        assert_eq!(platform.resolve_text(handle).as_deref(), Some("hi"));
        assert!(platform.poll_next_event().is_none());
        assert_eq!(platform.resolve_text(handle), None);
    }
}

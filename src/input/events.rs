//! Framework events produced by the decoder

use super::devices::DeviceKind;
use super::keys::{GamepadAxis, GamepadButton, HatPosition, Key, Keymod, MouseButton, MouseButtons};
use crate::platform::{DisplayId, WindowId};

/// A decoded native event
///
/// Every variant carries the native timestamp (nanoseconds, monotonic) and,
/// where the OS reports one, the window it was aimed at.
#[derive(Debug, Clone, PartialEq)]
pub enum FramedEvent {
    Quit {
        timestamp: u64,
    },
    Window {
        timestamp: u64,
        window: WindowId,
        kind: WindowEventKind,
    },
    Key {
        timestamp: u64,
        window: WindowId,
        device: u32,
        key: Key,
        keycode: u32,
        modifiers: Keymod,
        down: bool,
        repeat: bool,
    },
    /// In-progress IME composition
    TextEditing {
        timestamp: u64,
        window: WindowId,
        text: String,
        start: i32,
        length: i32,
    },
    /// Committed text
    TextInput {
        timestamp: u64,
        window: WindowId,
        text: String,
    },
    MouseMotion {
        timestamp: u64,
        window: WindowId,
        device: u32,
        buttons: MouseButtons,
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    MouseButton {
        timestamp: u64,
        window: WindowId,
        device: u32,
        button: MouseButton,
        down: bool,
        clicks: u8,
        x: f32,
        y: f32,
    },
    /// Scroll amounts are already corrected for flipped scrolling
    MouseWheel {
        timestamp: u64,
        window: WindowId,
        device: u32,
        x: f32,
        y: f32,
        mouse_x: f32,
        mouse_y: f32,
    },
    Joystick {
        timestamp: u64,
        id: u32,
        input: JoystickInput,
    },
    Gamepad {
        timestamp: u64,
        id: u32,
        input: GamepadInput,
    },
    DeviceChange {
        timestamp: u64,
        kind: DeviceKind,
        id: u32,
        change: DeviceChange,
    },
    Display {
        timestamp: u64,
        display: DisplayId,
        kind: DisplayEventKind,
    },
    Drop {
        timestamp: u64,
        window: WindowId,
        kind: DropKind,
    },
    /// GPU resources were lost; offscreen targets must be recreated
    RenderReset {
        timestamp: u64,
        device_lost: bool,
    },
}

impl FramedEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Quit { timestamp }
            | Self::Window { timestamp, .. }
            | Self::Key { timestamp, .. }
            | Self::TextEditing { timestamp, .. }
            | Self::TextInput { timestamp, .. }
            | Self::MouseMotion { timestamp, .. }
            | Self::MouseButton { timestamp, .. }
            | Self::MouseWheel { timestamp, .. }
            | Self::Joystick { timestamp, .. }
            | Self::Gamepad { timestamp, .. }
            | Self::DeviceChange { timestamp, .. }
            | Self::Display { timestamp, .. }
            | Self::Drop { timestamp, .. }
            | Self::RenderReset { timestamp, .. } => *timestamp,
        }
    }

    /// Window the event was aimed at, if any
    pub fn window(&self) -> Option<WindowId> {
        match self {
            Self::Window { window, .. }
            | Self::Key { window, .. }
            | Self::TextEditing { window, .. }
            | Self::TextInput { window, .. }
            | Self::MouseMotion { window, .. }
            | Self::MouseButton { window, .. }
            | Self::MouseWheel { window, .. }
            | Self::Drop { window, .. } => Some(*window),
            _ => None,
        }
    }

    /// Short name used in log fields
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quit { .. } => "quit",
            Self::Window { .. } => "window",
            Self::Key { .. } => "key",
            Self::TextEditing { .. } => "text_editing",
            Self::TextInput { .. } => "text_input",
            Self::MouseMotion { .. } => "mouse_motion",
            Self::MouseButton { .. } => "mouse_button",
            Self::MouseWheel { .. } => "mouse_wheel",
            Self::Joystick { .. } => "joystick",
            Self::Gamepad { .. } => "gamepad",
            Self::DeviceChange { .. } => "device_change",
            Self::Display { .. } => "display",
            Self::Drop { .. } => "drop",
            Self::RenderReset { .. } => "render_reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEventKind {
    Shown,
    Hidden,
    Exposed,
    Moved { x: i32, y: i32 },
    /// New size in logical units
    Resized { width: u32, height: u32 },
    PixelSizeChanged { width: u32, height: u32 },
    Minimized,
    Maximized,
    Restored,
    MouseEnter,
    MouseLeave,
    FocusGained,
    FocusLost,
    CloseRequested,
    DisplayChanged { display: DisplayId },
    DisplayScaleChanged,
    Occluded,
    EnterFullscreen,
    LeaveFullscreen,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickInput {
    Axis { axis: u8, value: i16 },
    Ball { ball: u8, dx: i16, dy: i16 },
    Hat { hat: u8, position: HatPosition },
    Button { button: u8, down: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Motion,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamepadInput {
    Axis {
        axis: GamepadAxis,
        value: i16,
    },
    Button {
        button: GamepadButton,
        down: bool,
    },
    Touchpad {
        touchpad: i32,
        finger: i32,
        phase: TouchPhase,
        x: f32,
        y: f32,
        pressure: f32,
    },
    Sensor {
        sensor: i32,
        data: [f32; 3],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceChange {
    Added,
    Removed,
    /// Gamepad mapping changed; metadata is refreshed
    Remapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEventKind {
    Orientation(i32),
    Added,
    Removed,
    Moved,
    DesktopModeChanged,
    CurrentModeChanged,
    ContentScaleChanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropKind {
    Begin,
    File { path: String },
    Text { text: String },
    Position { x: f32, y: f32 },
    Complete,
}

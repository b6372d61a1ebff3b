//! Native platform boundary
//!
//! The OS layer is an external collaborator reached only through the traits
//! in this module. Windows, devices, displays and strings are referred to by
//! opaque ids; the side tables that map those ids to OS objects live in the
//! backend.
//!
//! Two backends ship with the crate: [`headless::HeadlessPlatform`], a
//! scripted in-process native layer, and [`winit::WinitPlatform`], which
//! adapts a `winit` event loop.

pub mod headless;
pub mod native;
mod queue;
pub mod winit;

pub use native::{EventType, NativeEvent};
pub use queue::NativeQueue;

use crate::config::WindowConfig;
use crate::error::NativeError;

/// Native window id; doubles as the id carried by window events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

/// An open joystick or gamepad handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceHandle(pub u64);

/// Integer extent in logical units or pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Exclusive fullscreen display mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    /// Refresh rate in Hz, 0.0 for "don't care"
    pub refresh_rate: f32,
}

/// Metadata reported for an open joystick or gamepad
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub product_version: u16,
    pub buttons: u32,
    pub axes: u32,
}

/// Non-blocking source of native events
pub trait NativeEventSource {
    /// Returns the next pending event, or `None` when the queue is empty
    ///
    /// Never blocks. String handles inside the returned event stay valid
    /// until the next call.
    fn poll_next_event(&mut self) -> Option<NativeEvent>;
}

/// Resolves native string handles found in text and drop payloads
pub trait NativeText {
    fn resolve_text(&self, handle: u64) -> Option<String>;
}

/// Window command and query boundary
pub trait NativeWindowApi {
    fn create_window(&mut self, config: &WindowConfig) -> Result<WindowId, NativeError>;
    fn destroy_window(&mut self, window: WindowId) -> Result<(), NativeError>;

    /// Size in logical units
    fn window_size(&self, window: WindowId) -> Result<Size, NativeError>;
    fn set_window_size(&mut self, window: WindowId, size: Size) -> Result<(), NativeError>;
    fn window_size_in_pixels(&self, window: WindowId) -> Result<Size, NativeError>;
    fn display_for_window(&self, window: WindowId) -> Result<DisplayId, NativeError>;
    fn display_scale(&self, window: WindowId) -> Result<f32, NativeError>;

    fn set_fullscreen(&mut self, window: WindowId, fullscreen: bool) -> Result<(), NativeError>;
    /// `None` selects borderless desktop fullscreen
    fn set_fullscreen_mode(
        &mut self,
        window: WindowId,
        mode: Option<DisplayMode>,
    ) -> Result<(), NativeError>;
    fn set_resizable(&mut self, window: WindowId, resizable: bool) -> Result<(), NativeError>;
    fn set_bordered(&mut self, window: WindowId, bordered: bool) -> Result<(), NativeError>;
    fn set_title(&mut self, window: WindowId, title: &str) -> Result<(), NativeError>;

    fn show(&mut self, window: WindowId) -> Result<(), NativeError>;
    fn hide(&mut self, window: WindowId) -> Result<(), NativeError>;
    fn maximize(&mut self, window: WindowId) -> Result<(), NativeError>;
    fn minimize(&mut self, window: WindowId) -> Result<(), NativeError>;
    fn restore(&mut self, window: WindowId) -> Result<(), NativeError>;

    fn set_relative_mouse_mode(
        &mut self,
        window: WindowId,
        enabled: bool,
    ) -> Result<(), NativeError>;
    /// Starts or stops text input (and IME composition) for the window
    fn set_text_input(&mut self, window: WindowId, enabled: bool) -> Result<(), NativeError>;
}

/// Input device boundary
pub trait NativeDeviceApi {
    /// Whether the joystick with this id is also exposed as a gamepad
    fn is_gamepad(&self, id: u32) -> bool;
    fn open_gamepad(&mut self, id: u32) -> Result<DeviceHandle, NativeError>;
    fn open_joystick(&mut self, id: u32) -> Result<DeviceHandle, NativeError>;
    fn close(&mut self, handle: DeviceHandle);
    fn device_info(&self, handle: DeviceHandle) -> Result<DeviceInfo, NativeError>;
    fn keyboard_name(&self, id: u32) -> Result<String, NativeError>;
    fn mouse_name(&self, id: u32) -> Result<String, NativeError>;
}

/// Everything the event pump needs from a native layer
pub trait NativePlatform: NativeEventSource + NativeText + NativeWindowApi + NativeDeviceApi {}

impl<T> NativePlatform for T where
    T: NativeEventSource + NativeText + NativeWindowApi + NativeDeviceApi
{
}

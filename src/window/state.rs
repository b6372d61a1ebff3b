//! Tracked window state

use bitflags::bitflags;

use crate::platform::{DisplayId, Size, WindowId};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 1 << 0;
        const BORDERED = 1 << 1;
        const RESIZABLE = 1 << 2;
        const MINIMIZED = 1 << 3;
        const MAXIMIZED = 1 << 4;
        const FOCUSED = 1 << 5;
        const VISIBLE = 1 << 6;
        const MOUSE_GRABBED = 1 << 7;
        const RELATIVE_MOUSE = 1 << 8;
        const MOUSE_INSIDE = 1 << 9;
        const OCCLUDED = 1 << 10;
        const TEXT_INPUT = 1 << 11;
    }
}

/// Last known state of the main window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    pub handle: WindowId,
    pub title: String,
    /// Size in logical units
    pub size: Size,
    /// Back buffer size in pixels
    pub pixel_size: Size,
    pub position: Option<(i32, i32)>,
    pub display_id: Option<DisplayId>,
    pub content_scale: f32,
    pub flags: WindowFlags,
    /// Latched by a close request; never cleared by the tracker
    pub close_requested: bool,
}

impl WindowState {
    pub fn new(handle: WindowId, title: impl Into<String>, size: Size) -> Self {
        Self {
            handle,
            title: title.into(),
            size,
            pixel_size: size,
            position: None,
            display_id: None,
            content_scale: 1.0,
            flags: WindowFlags::BORDERED | WindowFlags::VISIBLE,
            close_requested: false,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.flags.contains(WindowFlags::FULLSCREEN)
    }

    pub fn is_focused(&self) -> bool {
        self.flags.contains(WindowFlags::FOCUSED)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(WindowFlags::VISIBLE)
    }

    pub fn is_minimized(&self) -> bool {
        self.flags.contains(WindowFlags::MINIMIZED)
    }

    pub fn is_maximized(&self) -> bool {
        self.flags.contains(WindowFlags::MAXIMIZED)
    }

    /// Pixels per logical unit of the back buffer
    pub fn pixel_density(&self) -> f32 {
        if self.size.width == 0 {
            return 1.0;
        }
        self.pixel_size.width as f32 / self.size.width as f32
    }
}

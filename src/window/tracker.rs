//! Window state tracker
//!
//! Two kinds of input change the tracked state:
//!
//! - Commands (`resize`, `set_fullscreen`, ...) call the OS and, only if the
//!   call succeeds, update the local state optimistically.
//! - Notifications (`apply_*`) replay what the OS reports and overwrite the
//!   local state unconditionally.
//!
//! A notification that arrives after a command always wins. Pixel size and
//! content scale are re-queried from the OS whenever the window is resized
//! or moves to another display.

use tracing::{debug, info, warn};

use super::state::{WindowFlags, WindowState};
use crate::config::WindowConfig;
use crate::error::{NativeError, RouteError, WindowError};
use crate::input::{FramedEvent, WindowEventKind};
use crate::platform::{DisplayId, DisplayMode, NativeWindowApi, Size, WindowId};

/// Outcome of replaying one event against the tracked window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Applied {
    /// Not a notification for this window
    Ignored,
    Updated,
    /// The user asked to close the window; the window still exists
    CloseRequested,
}

#[derive(Debug)]
pub struct WindowTracker {
    state: WindowState,
}

impl WindowTracker {
    /// Creates the native window described by `config`
    pub fn create(
        api: &mut (impl NativeWindowApi + ?Sized),
        config: &WindowConfig,
    ) -> Result<Self, NativeError> {
        let handle = api.create_window(config)?;
        let size = api
            .window_size(handle)
            .unwrap_or(Size::new(config.width, config.height));

        let mut state = WindowState::new(handle, config.title.clone(), size);
        state.flags.set(WindowFlags::FULLSCREEN, config.fullscreen);
        state.flags.set(WindowFlags::RESIZABLE, config.resizable);
        state.flags.set(WindowFlags::BORDERED, config.decorated);

        let mut tracker = Self { state };
        if let Err(error) = tracker.refresh_metrics(api) {
            warn!(error = %error, "Window metrics unavailable at creation");
        }
        match api.display_for_window(handle) {
            Ok(display) => tracker.state.display_id = Some(display),
            Err(error) => warn!(error = %error, "Window display unavailable at creation"),
        }

        info!(
            window.id = handle.0,
            window.width = tracker.state.size.width,
            window.height = tracker.state.size.height,
            window.pixel_width = tracker.state.pixel_size.width,
            window.pixel_height = tracker.state.pixel_size.height,
            window.scale = tracker.state.content_scale,
            "Window created"
        );
        Ok(tracker)
    }

    /// Releases the native window
    pub fn destroy(self, api: &mut (impl NativeWindowApi + ?Sized)) -> Result<(), NativeError> {
        info!(window.id = self.state.handle.0, "Destroying window");
        api.destroy_window(self.state.handle)
    }

    pub fn id(&self) -> WindowId {
        self.state.handle
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    // Commands

    pub fn resize(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        size: Size,
    ) -> Result<(), WindowError> {
        let result = api.set_window_size(self.state.handle, size);
        self.command("resize", result, |state| state.size = size)
    }

    /// Enters or leaves fullscreen; `mode` selects an exclusive display mode
    pub fn set_fullscreen(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        fullscreen: bool,
        mode: Option<DisplayMode>,
    ) -> Result<(), WindowError> {
        let handle = self.state.handle;
        let result = if fullscreen {
            api.set_fullscreen_mode(handle, mode)
                .and_then(|()| api.set_fullscreen(handle, true))
        } else {
            api.set_fullscreen(handle, false)
        };
        self.command("set_fullscreen", result, |state| {
            state.flags.set(WindowFlags::FULLSCREEN, fullscreen)
        })
    }

    pub fn set_bordered(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        bordered: bool,
    ) -> Result<(), WindowError> {
        let result = api.set_bordered(self.state.handle, bordered);
        self.command("set_bordered", result, |state| {
            state.flags.set(WindowFlags::BORDERED, bordered)
        })
    }

    pub fn set_resizable(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        resizable: bool,
    ) -> Result<(), WindowError> {
        let result = api.set_resizable(self.state.handle, resizable);
        self.command("set_resizable", result, |state| {
            state.flags.set(WindowFlags::RESIZABLE, resizable)
        })
    }

    pub fn set_title(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        title: &str,
    ) -> Result<(), WindowError> {
        let result = api.set_title(self.state.handle, title);
        self.command("set_title", result, |state| state.title = title.to_string())
    }

    pub fn show(&mut self, api: &mut (impl NativeWindowApi + ?Sized)) -> Result<(), WindowError> {
        let result = api.show(self.state.handle);
        self.command("show", result, |state| {
            state.flags.insert(WindowFlags::VISIBLE)
        })
    }

    pub fn hide(&mut self, api: &mut (impl NativeWindowApi + ?Sized)) -> Result<(), WindowError> {
        let result = api.hide(self.state.handle);
        self.command("hide", result, |state| {
            state.flags.remove(WindowFlags::VISIBLE)
        })
    }

    pub fn maximize(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
    ) -> Result<(), WindowError> {
        let result = api.maximize(self.state.handle);
        self.command("maximize", result, |state| {
            state.flags.remove(WindowFlags::MINIMIZED);
            state.flags.insert(WindowFlags::MAXIMIZED);
        })
    }

    pub fn minimize(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
    ) -> Result<(), WindowError> {
        let result = api.minimize(self.state.handle);
        self.command("minimize", result, |state| {
            state.flags.insert(WindowFlags::MINIMIZED)
        })
    }

    pub fn restore(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
    ) -> Result<(), WindowError> {
        let result = api.restore(self.state.handle);
        self.command("restore", result, |state| {
            state
                .flags
                .remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED)
        })
    }

    /// Hides the cursor and reports relative motion only
    pub fn set_relative_mouse_mode(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        enabled: bool,
    ) -> Result<(), WindowError> {
        let result = api.set_relative_mouse_mode(self.state.handle, enabled);
        self.command("set_relative_mouse_mode", result, |state| {
            state.flags.set(
                WindowFlags::RELATIVE_MOUSE | WindowFlags::MOUSE_GRABBED,
                enabled,
            )
        })
    }

    pub fn set_text_input(
        &mut self,
        api: &mut (impl NativeWindowApi + ?Sized),
        enabled: bool,
    ) -> Result<(), WindowError> {
        let result = api.set_text_input(self.state.handle, enabled);
        self.command("set_text_input", result, |state| {
            state.flags.set(WindowFlags::TEXT_INPUT, enabled)
        })
    }

    fn command(
        &mut self,
        command: &'static str,
        result: Result<(), NativeError>,
        update: impl FnOnce(&mut WindowState),
    ) -> Result<(), WindowError> {
        match result {
            Ok(()) => {
                update(&mut self.state);
                debug!(
                    window.id = self.state.handle.0,
                    command,
                    "Window command applied"
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    window.id = self.state.handle.0,
                    command,
                    error = %source,
                    "Window command denied"
                );
                Err(WindowError::OsCommandDenied { command, source })
            }
        }
    }

    // Notifications

    /// Applies one decoded event; events for other windows are ignored
    pub fn apply(
        &mut self,
        api: &(impl NativeWindowApi + ?Sized),
        event: &FramedEvent,
    ) -> Result<Applied, RouteError> {
        let FramedEvent::Window { window, kind, .. } = event else {
            return Ok(Applied::Ignored);
        };
        if *window != self.state.handle {
            return Ok(Applied::Ignored);
        }

        match *kind {
            WindowEventKind::Shown => self.apply_shown(true),
            WindowEventKind::Hidden => self.apply_shown(false),
            WindowEventKind::Exposed => self.state.flags.remove(WindowFlags::OCCLUDED),
            WindowEventKind::Moved { x, y } => self.apply_moved(x, y),
            WindowEventKind::Resized { width, height } => self.apply_resized(api, width, height)?,
            WindowEventKind::PixelSizeChanged { width, height } => {
                self.apply_pixel_size_changed(width, height)
            }
            WindowEventKind::Minimized => self.apply_minimized(),
            WindowEventKind::Maximized => self.apply_maximized(),
            WindowEventKind::Restored => self.apply_restored(),
            WindowEventKind::MouseEnter => self.apply_mouse_inside(true),
            WindowEventKind::MouseLeave => self.apply_mouse_inside(false),
            WindowEventKind::FocusGained => self.apply_focus_changed(true),
            WindowEventKind::FocusLost => self.apply_focus_changed(false),
            WindowEventKind::CloseRequested => {
                self.apply_close_requested();
                return Ok(Applied::CloseRequested);
            }
            WindowEventKind::DisplayChanged { display } => {
                self.apply_display_changed(api, display)?
            }
            WindowEventKind::DisplayScaleChanged => self.apply_display_scale_changed(api)?,
            WindowEventKind::Occluded => self.apply_occluded(),
            WindowEventKind::EnterFullscreen => self.apply_fullscreen(true),
            WindowEventKind::LeaveFullscreen => self.apply_fullscreen(false),
            WindowEventKind::Destroyed => {
                info!(
                    window.id = self.state.handle.0,
                    "Window destroyed by the OS"
                );
            }
        }
        Ok(Applied::Updated)
    }

    /// Takes the reported logical size and re-queries pixel size and scale
    pub fn apply_resized(
        &mut self,
        api: &(impl NativeWindowApi + ?Sized),
        width: u32,
        height: u32,
    ) -> Result<(), RouteError> {
        self.state.size = Size::new(width, height);
        debug!(
            window.width = width,
            window.height = height,
            "Window resized"
        );
        self.refresh_metrics(api)
    }

    pub fn apply_pixel_size_changed(&mut self, width: u32, height: u32) {
        self.state.pixel_size = Size::new(width, height);
    }

    pub fn apply_moved(&mut self, x: i32, y: i32) {
        self.state.position = Some((x, y));
    }

    pub fn apply_focus_changed(&mut self, focused: bool) {
        self.state.flags.set(WindowFlags::FOCUSED, focused);
    }

    pub fn apply_display_changed(
        &mut self,
        api: &(impl NativeWindowApi + ?Sized),
        display_id: DisplayId,
    ) -> Result<(), RouteError> {
        self.state.display_id = Some(display_id);
        debug!(
            window.display = display_id.0,
            "Window moved to another display"
        );
        self.refresh_metrics(api)
    }

    pub fn apply_display_scale_changed(
        &mut self,
        api: &(impl NativeWindowApi + ?Sized),
    ) -> Result<(), RouteError> {
        self.refresh_metrics(api)
    }

    pub fn apply_minimized(&mut self) {
        self.state.flags.remove(WindowFlags::MAXIMIZED);
        self.state.flags.insert(WindowFlags::MINIMIZED);
    }

    pub fn apply_maximized(&mut self) {
        self.state.flags.remove(WindowFlags::MINIMIZED);
        self.state.flags.insert(WindowFlags::MAXIMIZED);
    }

    pub fn apply_restored(&mut self) {
        self.state
            .flags
            .remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED);
    }

    /// Latches the close request; the window is not destroyed
    pub fn apply_close_requested(&mut self) {
        info!(window.id = self.state.handle.0, "Close requested");
        self.state.close_requested = true;
    }

    pub fn apply_shown(&mut self, visible: bool) {
        self.state.flags.set(WindowFlags::VISIBLE, visible);
    }

    pub fn apply_mouse_inside(&mut self, inside: bool) {
        self.state.flags.set(WindowFlags::MOUSE_INSIDE, inside);
    }

    pub fn apply_fullscreen(&mut self, fullscreen: bool) {
        self.state.flags.set(WindowFlags::FULLSCREEN, fullscreen);
    }

    pub fn apply_occluded(&mut self) {
        debug!(window.id = self.state.handle.0, "Window occluded");
        self.state.flags.insert(WindowFlags::OCCLUDED);
    }

    fn refresh_metrics(&mut self, api: &(impl NativeWindowApi + ?Sized)) -> Result<(), RouteError> {
        let handle = self.state.handle;
        let pixel_size = api.window_size_in_pixels(handle);
        let scale = api.display_scale(handle);
        if let Ok(size) = &pixel_size {
            self.state.pixel_size = *size;
        }
        if let Ok(scale) = &scale {
            self.state.content_scale = *scale;
        }
        pixel_size
            .and(scale)
            .map(|_| ())
            .map_err(RouteError::WindowQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessDisplay, HeadlessOptions, HeadlessPlatform};

    fn setup() -> (HeadlessPlatform, WindowTracker) {
        let mut platform = HeadlessPlatform::new();
        let config = WindowConfig {
            width: 800,
            height: 600,
            ..WindowConfig::default()
        };
        let tracker = WindowTracker::create(&mut platform, &config).unwrap();
        (platform, tracker)
    }

    #[test]
    fn test_create_reads_initial_state() {
        let (_platform, tracker) = setup();
        let state = tracker.state();
        assert_eq!(state.size, Size::new(800, 600));
        assert_eq!(state.pixel_size, Size::new(800, 600));
        assert_eq!(state.content_scale, 1.0);
        assert!(state.display_id.is_some());
        let decorated = WindowFlags::RESIZABLE | WindowFlags::BORDERED;
        assert!(state.flags.contains(decorated));
    }

    #[test]
    fn test_command_updates_optimistically() {
        let (mut platform, mut tracker) = setup();
        tracker.resize(&mut platform, Size::new(1024, 768)).unwrap();
        tracker.set_title(&mut platform, "renamed").unwrap();
        tracker.maximize(&mut platform).unwrap();

        let state = tracker.state();
        assert_eq!(state.size, Size::new(1024, 768));
        assert_eq!(state.title, "renamed");
        assert!(state.is_maximized());
    }

    #[test]
    fn test_denied_command_leaves_state() {
        let (mut platform, mut tracker) = setup();
        platform.set_deny_commands(true);

        let result = tracker.set_fullscreen(&mut platform, true, None);
        assert!(matches!(
            result,
            Err(WindowError::OsCommandDenied {
                command: "set_fullscreen",
                ..
            })
        ));
        assert!(!tracker.state().is_fullscreen());
    }

    #[test]
    fn test_notification_overwrites_command() {
        let (mut platform, mut tracker) = setup();
        tracker.resize(&mut platform, Size::new(1024, 768)).unwrap();
        tracker.apply_resized(&platform, 640, 480).unwrap();
        assert_eq!(tracker.state().size, Size::new(640, 480));
    }

    #[test]
    fn test_resize_requeries_pixel_size_and_scale() {
        let (mut platform, mut tracker) = setup();
        let window = tracker.id();
        platform.set_display_scale(window, 2.0);

        tracker.apply_resized(&platform, 800, 600).unwrap();
        assert_eq!(tracker.state().content_scale, 2.0);
        assert_eq!(tracker.state().pixel_size, Size::new(1600, 1200));
    }

    #[test]
    fn test_display_change_records_display_and_requeries_scale() {
        let mut options = HeadlessOptions::default();
        options.displays.push(HeadlessDisplay {
            id: DisplayId(2),
            name: "Second".to_string(),
            bounds: Size::new(2560, 1440),
            scale: 2.0,
        });
        let mut platform = HeadlessPlatform::init(options).unwrap();
        let config = WindowConfig {
            width: 800,
            height: 600,
            ..WindowConfig::default()
        };
        let mut tracker = WindowTracker::create(&mut platform, &config).unwrap();
        platform.os_move_to_display(tracker.id(), DisplayId(2));

        let event = FramedEvent::Window {
            timestamp: 0,
            window: tracker.id(),
            kind: WindowEventKind::DisplayChanged {
                display: DisplayId(2),
            },
        };
        assert_eq!(tracker.apply(&platform, &event), Ok(Applied::Updated));
        let state = tracker.state();
        assert_eq!(state.display_id, Some(DisplayId(2)));
        assert_eq!(state.content_scale, 2.0);
        assert_eq!(state.pixel_size, Size::new(1600, 1200));
    }

    #[test]
    fn test_close_requested_keeps_window() {
        let (platform, mut tracker) = setup();
        let event = FramedEvent::Window {
            timestamp: 0,
            window: tracker.id(),
            kind: WindowEventKind::CloseRequested,
        };
        let applied = tracker.apply(&platform, &event);
        assert_eq!(applied, Ok(Applied::CloseRequested));
        assert!(tracker.state().close_requested);
        assert!(platform.window_exists(tracker.id()));
    }

    #[test]
    fn test_other_window_is_ignored() {
        let (platform, mut tracker) = setup();
        let event = FramedEvent::Window {
            timestamp: 0,
            window: WindowId(tracker.id().0 + 1),
            kind: WindowEventKind::Minimized,
        };
        assert_eq!(tracker.apply(&platform, &event), Ok(Applied::Ignored));
        assert!(!tracker.state().is_minimized());
    }

    #[test]
    fn test_minimize_maximize_restore_transitions() {
        let (_platform, mut tracker) = setup();
        tracker.apply_maximized();
        tracker.apply_minimized();
        assert!(tracker.state().is_minimized());
        assert!(!tracker.state().is_maximized());
        tracker.apply_restored();
        assert!(!tracker.state().is_minimized());
    }

    #[test]
    fn test_destroy_releases_native_window() {
        let (mut platform, tracker) = setup();
        let id = tracker.id();
        tracker.destroy(&mut platform).unwrap();
        assert!(!platform.window_exists(id));
    }
}

//! winit application handler driving the event pump

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::pump::EventPump;
use super::subscriber::EventSubscriber;
use crate::config::AppConfig;
use crate::error::NativeInitError;
use crate::graphics::{DrawCommand, GraphicsDevice, MaterialId, MeshInfo, RecordingBackend};
use crate::input::{FramedEvent, WindowEventKind};
use crate::platform::Size;
use crate::platform::winit::{WinitPlatform, WinitState};

/// Application handler: one pump tick per `about_to_wait`
pub struct App {
    config: AppConfig,
    winit: WinitState,
    pump: EventPump,
    graphics: GraphicsDevice<RecordingBackend>,
    quad: MeshInfo,
    init_error: Option<NativeInitError>,
}

impl App {
    /// Creates a new application with the provided configuration
    pub fn new(config: AppConfig) -> Self {
        info!(profile = %config.profile, "Starting platform sandbox");
        info!(?config.window, "Window configuration");

        let mut backend = RecordingBackend::new(Size::default());
        let quad = backend.add_mesh(6, 4);

        Self {
            pump: EventPump::new(&config.pump),
            config,
            winit: WinitState::new(),
            graphics: GraphicsDevice::new(backend),
            quad,
            init_error: None,
        }
    }

    /// Creates a new application with configuration loaded from environment
    pub fn from_env() -> Self {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        Self::new(config)
    }

    /// Registers a subscriber with the pump
    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber>) {
        self.pump.subscribe(subscriber);
    }

    pub fn pump(&self) -> &EventPump {
        &self.pump
    }

    /// Startup failure recorded before the loop exited
    pub fn take_init_error(&mut self) -> Option<NativeInitError> {
        self.init_error.take()
    }

    fn sync_graphics(&mut self) {
        for event in self.pump.events() {
            match event {
                FramedEvent::Window {
                    kind:
                        WindowEventKind::Resized { .. } | WindowEventKind::PixelSizeChanged { .. },
                    ..
                } => {
                    if let Some(state) = self.pump.window_state() {
                        self.graphics.resize_back_buffer(state.pixel_size);
                    }
                }
                FramedEvent::RenderReset { device_lost, .. } => {
                    warn!(device_lost, "Render reset");
                    self.graphics.invalidate_targets();
                }
                _ => {}
            }
        }
    }

    fn draw_frame(&mut self) {
        let frame = [DrawCommand::new(None, &self.quad, MaterialId(0))];
        let stats = self.graphics.submit_all(&frame);
        let draws = self.graphics.backend_mut().take_draws();
        debug!(
            submitted = stats.submitted,
            skipped = stats.skipped,
            recorded = draws.len(),
            "Frame submitted"
        );
    }
}

impl Default for App {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.pump.window().is_some() {
            return;
        }

        let opened = {
            let mut platform = WinitPlatform::new(event_loop, &mut self.winit);
            let opened = self
                .pump
                .open_window(&mut platform, &self.config.window)
                .map(|tracker| tracker.id());
            if opened.is_ok()
                && self.config.input.text_input
                && let Some(tracker) = self.pump.window_mut()
                && let Err(e) = tracker.set_text_input(&mut platform, true)
            {
                warn!(error = %e, "Text input unavailable");
            }
            opened
        };

        match opened {
            Ok(window) => {
                self.winit.request_redraw(window);
                if let Some(state) = self.pump.window_state() {
                    self.graphics.resize_back_buffer(state.pixel_size);
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to open the main window");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        self.winit.push_window_event(window_id, &event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.pump.window().is_none() {
            return;
        }

        let report = {
            let mut platform = WinitPlatform::new(event_loop, &mut self.winit);
            self.pump.tick(&mut platform)
        };
        self.sync_graphics();
        self.draw_frame();

        if report.quit_requested {
            info!(tick = report.tick, "Quit requested, exiting");
            event_loop.exit();
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        let mut platform = WinitPlatform::new(event_loop, &mut self.winit);
        self.pump.shutdown(&mut platform);
    }
}

//! Platform sandbox
//!
//! Opens a window and logs every decoded event, or replays a scripted
//! session against the headless backend.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use oil_platform::app::{App, EventLogger, EventPump};
use oil_platform::config::AppConfig;
use oil_platform::graphics::{DrawCommand, GraphicsDevice, MaterialId, RecordingBackend};
use oil_platform::input::{FramedEvent, GamepadButton, Key, Keymod, MouseButton, WindowEventKind};
use oil_platform::platform::headless::{HeadlessOptions, HeadlessPlatform};
use oil_platform::platform::{DeviceInfo, Size};

#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Platform layer sandbox", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration profile, overrides APP_PROFILE
    #[arg(long)]
    profile: Option<String>,
    /// Replay a scripted session without opening a window
    #[arg(long)]
    headless: bool,
    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 4)]
    frames: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.profile {
        Some(profile) => AppConfig::load(profile),
        None => AppConfig::load_from_env(),
    }
    .context("failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.headless {
        run_headless(&config, cli.frames)
    } else {
        run_windowed(config)
    }
}

fn run_windowed(config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    app.subscribe(Box::new(EventLogger::new()));
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    if let Some(error) = app.take_init_error() {
        return Err(error).context("platform failed to start");
    }
    Ok(())
}

fn run_headless(config: &AppConfig, frames: u64) -> Result<()> {
    let mut platform =
        HeadlessPlatform::init(HeadlessOptions::default()).context("platform failed to start")?;
    let mut pump = EventPump::new(&config.pump);
    pump.subscribe(Box::new(EventLogger::new()));

    let window = pump
        .open_window(&mut platform, &config.window)
        .context("platform failed to start")?
        .id();

    let mut graphics = GraphicsDevice::new(RecordingBackend::new(Size::default()));
    let quad = graphics.backend_mut().add_mesh(6, 4);
    if let Some(state) = pump.window_state() {
        graphics.resize_back_buffer(state.pixel_size);
    }

    let keyboard = platform.plug_keyboard("Headless Keyboard");
    let mouse = platform.plug_mouse("Headless Mouse");
    let gamepad = platform.plug_gamepad(DeviceInfo {
        name: "Headless Gamepad".to_string(),
        buttons: 15,
        axes: 6,
        ..DeviceInfo::default()
    });

    for frame in 1..=frames {
        match frame % 4 {
            1 => {
                platform.os_focus(window, true);
                platform.push_key(window, keyboard, Key::Space, true, Keymod::empty());
            }
            2 => {
                platform.push_key(window, keyboard, Key::Space, false, Keymod::empty());
                platform.push_mouse_motion(window, mouse, [100.0, 80.0], [4.0, -2.0]);
                platform.push_mouse_button(window, mouse, MouseButton::Left, true, [100.0, 80.0]);
            }
            3 => {
                platform.push_gamepad_button(gamepad, GamepadButton::South, true);
                platform.push_text_input(window, "hi");
                platform.os_resize(window, Size::new(1024, 768));
            }
            _ => {
                platform.push_mouse_button(window, mouse, MouseButton::Left, false, [100.0, 80.0]);
                platform.push_gamepad_button(gamepad, GamepadButton::South, false);
            }
        }

        let report = pump.tick(&mut platform);
        let resized = pump.events().iter().any(|event| {
            matches!(
                event,
                FramedEvent::Window {
                    kind: WindowEventKind::PixelSizeChanged { .. },
                    ..
                }
            )
        });
        if resized && let Some(state) = pump.window_state() {
            graphics.resize_back_buffer(state.pixel_size);
        }
        let stats = graphics.submit_all(&[DrawCommand::new(None, &quad, MaterialId(0))]);
        graphics.backend_mut().take_draws();

        info!(
            tick = report.tick,
            events = report.events,
            dropped = report.dropped,
            failures = report.failures,
            draws = stats.submitted,
            back_buffer.width = graphics.back_buffer().size.width,
            back_buffer.height = graphics.back_buffer().size.height,
            "Headless frame"
        );
    }

    info!(
        devices = pump.devices().len(),
        gamepad_south = ?pump
            .input()
            .gamepad(gamepad)
            .map(|pad| pad.button(GamepadButton::South)),
        "Headless session complete"
    );
    pump.shutdown(&mut platform);
    Ok(())
}

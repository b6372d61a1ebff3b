//! Oil Platform
//!
//! Platform layer for games built on winit: native event decoding, input
//! device tracking, window state and a validated draw command path.

/// Event pump, subscribers and the winit application handler
pub mod app;

/// Profile-based configuration
pub mod config;

pub mod error;

/// Draw commands and the graphics device boundary
pub mod graphics;

/// Decoded events, devices and input state
pub mod input;

/// Native boundary traits and backends
pub mod platform;

/// Window state tracking
pub mod window;

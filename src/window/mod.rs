//! Main window state and its reconciliation with the OS

mod state;
mod tracker;

pub use state::{WindowFlags, WindowState};
pub use tracker::{Applied, WindowTracker};

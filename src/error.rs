//! Error taxonomy for the platform layer
//!
//! Only [`NativeInitError`] is fatal. Everything else is reported through
//! `tracing` and handled per event, per command or per draw.

use thiserror::Error;

use crate::graphics::{MeshId, TargetId};
use crate::input::DeviceKind;
use crate::platform::{DeviceHandle, WindowId};

/// A failed call across the native boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    #[error("native call failed: {0}")]
    Call(String),

    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),

    #[error("no device with native id {0}")]
    UnknownDevice(u32),

    #[error("unknown device handle {0:?}")]
    UnknownHandle(DeviceHandle),

    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
}

/// The platform could not start; no event loop may run
#[derive(Debug, Error)]
pub enum NativeInitError {
    #[error("failed to initialize the native platform: {0}")]
    Platform(String),

    #[error("failed to create the main window")]
    Window(#[source] NativeError),
}

/// A window command had no effect
///
/// The tracked state is left as it was; the next OS notification is the
/// source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window command `{command}` denied by the OS")]
    OsCommandDenied {
        command: &'static str,
        #[source]
        source: NativeError,
    },
}

/// Which range of a draw call fell outside its mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeViolation {
    Indices {
        start: u32,
        count: u32,
        available: u32,
    },
    VertexOffset { offset: i32, available: u32 },
}

impl std::fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Indices {
                start,
                count,
                available,
            } => write!(
                f,
                "indices {start}..{} exceed index count {available}",
                u64::from(*start) + u64::from(*count)
            ),
            Self::VertexOffset { offset, available } => {
                write!(f, "vertex offset {offset} outside 0..{available}")
            }
        }
    }
}

/// A draw call that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("draw range out of bounds for mesh {mesh:?}: {violation}")]
    DrawRangeOutOfBounds {
        mesh: MeshId,
        violation: RangeViolation,
    },

    #[error("render target {0:?} was destroyed")]
    TargetInvalidated(TargetId),

    #[error("mesh {0:?} is not known to the graphics device")]
    UnknownMesh(MeshId),
}

/// Device metadata could not be read at attach time
///
/// The device is still registered, with placeholder metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("metadata unavailable for {kind:?} device {id}")]
pub struct DeviceMetadataUnavailable {
    pub kind: DeviceKind,
    pub id: u32,
    #[source]
    pub source: NativeError,
}

/// A failure while routing a single decoded event
///
/// Never aborts the tick; the event is still delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("input from unregistered {kind:?} device {id}")]
    UnknownDevice { kind: DeviceKind, id: u32 },

    #[error("window state query failed")]
    WindowQuery(#[source] NativeError),
}

//! Draw command model and the graphics device boundary
//!
//! The GPU backend is external. [`GraphicsDevice`] wraps a
//! [`GraphicsBackend`] and owns submission-time validation, so a backend only
//! ever sees draws whose ranges fit the mesh and whose target is alive.

mod command;
mod device;
mod recording;

pub use command::{BlendFactor, BlendMask, BlendMode, BlendOp, CullMode, DepthCompare, DrawCommand};
pub use device::{FrameStats, GraphicsBackend, GraphicsDevice, ResolvedDraw};
pub use recording::{RecordedDraw, RecordingBackend};

use crate::platform::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Integer rectangle in target pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RectInt {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RectInt {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole target of `size`
    pub fn from_size(size: Size) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(size.width).unwrap_or(i32::MAX),
            i32::try_from(size.height).unwrap_or(i32::MAX),
        )
    }
}

/// What the device knows about a mesh's buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshInfo {
    pub id: MeshId,
    pub index_count: u32,
    pub vertex_count: u32,
}

/// A render target as resolved at submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
    /// `None` for the back buffer
    pub id: Option<TargetId>,
    pub size: Size,
}

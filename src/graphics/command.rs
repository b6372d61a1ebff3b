//! Draw commands and render state

use bitflags::bitflags;

use super::device::{GraphicsBackend, GraphicsDevice};
use super::{MaterialId, MeshId, MeshInfo, RectInt, TargetId};
use crate::error::DrawError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

bitflags! {
    /// Color channels written by a draw
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BlendMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const RGB = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const RGBA = Self::RGB.bits() | Self::ALPHA.bits();
    }
}

/// Color and alpha blend equations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendMode {
    pub color_op: BlendOp,
    pub color_src: BlendFactor,
    pub color_dst: BlendFactor,
    pub alpha_op: BlendOp,
    pub alpha_src: BlendFactor,
    pub alpha_dst: BlendFactor,
    pub mask: BlendMask,
    /// RGBA constant used by the `ConstantColor` factors
    pub color: [f32; 4],
}

impl BlendMode {
    pub const fn new(op: BlendOp, src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            color_op: op,
            color_src: src,
            color_dst: dst,
            alpha_op: op,
            alpha_src: src,
            alpha_dst: dst,
            mask: BlendMask::RGBA,
            color: [1.0; 4],
        }
    }

    /// Source color already multiplied by its alpha
    pub const PREMULTIPLY: Self = Self::new(
        BlendOp::Add,
        BlendFactor::One,
        BlendFactor::OneMinusSrcAlpha,
    );
    pub const NON_PREMULTIPLY: Self = Self::new(
        BlendOp::Add,
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha,
    );
    pub const ADD: Self = Self::new(BlendOp::Add, BlendFactor::One, BlendFactor::One);
    pub const SUBTRACT: Self =
        Self::new(BlendOp::ReverseSubtract, BlendFactor::One, BlendFactor::One);
    pub const MULTIPLY: Self = Self::new(
        BlendOp::Add,
        BlendFactor::DstColor,
        BlendFactor::OneMinusSrcAlpha,
    );
    pub const SCREEN: Self = Self::new(
        BlendOp::Add,
        BlendFactor::One,
        BlendFactor::OneMinusSrcColor,
    );
}

impl Default for BlendMode {
    fn default() -> Self {
        Self::PREMULTIPLY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

/// Depth comparison, used only when the depth test is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthCompare {
    Always,
    Never,
    #[default]
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
}

/// One unit of rendering work
///
/// Commands are plain values. Submission reads the command and never
/// retains it; range and target checks happen at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// `None` draws to whatever the back buffer is when submitted
    pub target: Option<TargetId>,
    pub material: MaterialId,
    pub mesh: MeshId,
    pub mesh_index_start: u32,
    pub mesh_index_count: u32,
    /// Added to every index; must address a vertex of the mesh
    pub mesh_vertex_offset: i32,
    pub blend_mode: BlendMode,
    pub cull_mode: CullMode,
    pub depth_compare: DepthCompare,
    pub depth_test_enabled: bool,
    pub depth_write_enabled: bool,
    /// `None` covers the whole target
    pub viewport: Option<RectInt>,
    pub scissor: Option<RectInt>,
}

impl DrawCommand {
    /// Draws every index of `mesh` with default render state
    pub fn new(target: Option<TargetId>, mesh: &MeshInfo, material: MaterialId) -> Self {
        Self {
            target,
            material,
            mesh: mesh.id,
            mesh_index_start: 0,
            mesh_index_count: mesh.index_count,
            mesh_vertex_offset: 0,
            blend_mode: BlendMode::PREMULTIPLY,
            cull_mode: CullMode::None,
            depth_compare: DepthCompare::Less,
            depth_test_enabled: false,
            depth_write_enabled: false,
            viewport: None,
            scissor: None,
        }
    }

    /// Shorthand for [`GraphicsDevice::draw`]
    pub fn submit<B: GraphicsBackend>(
        &self,
        device: &mut GraphicsDevice<B>,
    ) -> Result<(), DrawError> {
        device.draw(self)
    }
}

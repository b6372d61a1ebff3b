//! Submission boundary between draw commands and the GPU backend

use tracing::{debug, warn};

use super::{
    BlendMode, CullMode, DepthCompare, DrawCommand, MaterialId, MeshId, MeshInfo, RectInt,
    TargetId, TargetInfo,
};
use crate::error::{DrawError, RangeViolation};
use crate::platform::Size;

/// GPU side of the draw path
///
/// Implementations own buffers, pipelines and targets. They receive only
/// draws that already passed validation.
pub trait GraphicsBackend {
    /// Current back buffer of the window swapchain
    fn back_buffer(&self) -> TargetInfo;

    /// `None` once the target was destroyed or invalidated
    fn target_info(&self, id: TargetId) -> Option<TargetInfo>;

    fn mesh_info(&self, id: MeshId) -> Option<MeshInfo>;

    fn draw(&mut self, draw: &ResolvedDraw);

    fn resize_back_buffer(&mut self, size: Size);

    /// Drops every offscreen target after a render reset
    fn invalidate_targets(&mut self);
}

/// A validated draw with its target and viewport resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDraw {
    pub target: TargetInfo,
    pub material: MaterialId,
    pub mesh: MeshId,
    pub index_start: u32,
    pub index_count: u32,
    pub vertex_offset: u32,
    pub blend_mode: BlendMode,
    pub cull_mode: CullMode,
    /// `None` when the depth test is disabled
    pub depth_compare: Option<DepthCompare>,
    pub depth_write: bool,
    pub viewport: RectInt,
    pub scissor: Option<RectInt>,
}

/// Outcome of one [`GraphicsDevice::submit_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub skipped: usize,
}

/// Validating wrapper around a [`GraphicsBackend`]
pub struct GraphicsDevice<B> {
    backend: B,
}

impl<B: GraphicsBackend> GraphicsDevice<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Validates and forwards one draw
    ///
    /// A rejected draw is logged and skipped; the caller decides whether the
    /// rest of the frame continues. An empty index range is accepted and not
    /// forwarded.
    pub fn draw(&mut self, command: &DrawCommand) -> Result<(), DrawError> {
        let result = self.resolve(command);
        match result {
            Ok(Some(resolved)) => {
                self.backend.draw(&resolved);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                warn!(
                    mesh = command.mesh.0,
                    target = ?command.target,
                    error = %err,
                    "Draw skipped"
                );
                Err(err)
            }
        }
    }

    /// Submits a frame's commands in order, skipping the ones that fail
    pub fn submit_all(&mut self, commands: &[DrawCommand]) -> FrameStats {
        let mut stats = FrameStats::default();
        for command in commands {
            match self.draw(command) {
                Ok(()) => stats.submitted += 1,
                Err(_) => stats.skipped += 1,
            }
        }
        stats
    }

    pub fn resize_back_buffer(&mut self, size: Size) {
        debug!(
            width = size.width,
            height = size.height,
            "Back buffer resized"
        );
        self.backend.resize_back_buffer(size);
    }

    pub fn invalidate_targets(&mut self) {
        debug!("Render targets invalidated");
        self.backend.invalidate_targets();
    }

    pub fn back_buffer(&self) -> TargetInfo {
        self.backend.back_buffer()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn resolve(&self, command: &DrawCommand) -> Result<Option<ResolvedDraw>, DrawError> {
        let mesh = self
            .backend
            .mesh_info(command.mesh)
            .ok_or(DrawError::UnknownMesh(command.mesh))?;

        let end = u64::from(command.mesh_index_start) + u64::from(command.mesh_index_count);
        if end > u64::from(mesh.index_count) {
            return Err(DrawError::DrawRangeOutOfBounds {
                mesh: mesh.id,
                violation: RangeViolation::Indices {
                    start: command.mesh_index_start,
                    count: command.mesh_index_count,
                    available: mesh.index_count,
                },
            });
        }

        // Offset 0 is valid even for a mesh without vertices
        let vertex_offset = u32::try_from(command.mesh_vertex_offset)
            .ok()
            .filter(|&offset| offset == 0 || offset < mesh.vertex_count)
            .ok_or(DrawError::DrawRangeOutOfBounds {
                mesh: mesh.id,
                violation: RangeViolation::VertexOffset {
                    offset: command.mesh_vertex_offset,
                    available: mesh.vertex_count,
                },
            })?;

        let target = match command.target {
            None => self.backend.back_buffer(),
            Some(id) => self
                .backend
                .target_info(id)
                .ok_or(DrawError::TargetInvalidated(id))?,
        };

        if command.mesh_index_count == 0 {
            return Ok(None);
        }

        Ok(Some(ResolvedDraw {
            target,
            material: command.material,
            mesh: mesh.id,
            index_start: command.mesh_index_start,
            index_count: command.mesh_index_count,
            vertex_offset,
            blend_mode: command.blend_mode,
            cull_mode: command.cull_mode,
            depth_compare: command
                .depth_test_enabled
                .then_some(command.depth_compare),
            depth_write: command.depth_write_enabled,
            viewport: command
                .viewport
                .unwrap_or_else(|| RectInt::from_size(target.size)),
            scissor: command.scissor,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingBackend;

    fn device_with_mesh(index_count: u32) -> (GraphicsDevice<RecordingBackend>, MeshInfo) {
        let mut backend = RecordingBackend::new(Size::new(800, 600));
        let mesh = backend.add_mesh(index_count, 300);
        (GraphicsDevice::new(backend), mesh)
    }

    #[test]
    fn test_draw_forwards_valid_command() {
        let (mut device, mesh) = device_with_mesh(600);
        let command = DrawCommand::new(None, &mesh, MaterialId(1));

        assert_eq!(command.submit(&mut device), Ok(()));

        let draws = device.backend().draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].index_count, 600);
        assert_eq!(draws[0].target.id, None);
        assert_eq!(draws[0].viewport, RectInt::new(0, 0, 800, 600));
        assert_eq!(draws[0].depth_compare, None);
    }

    #[test]
    fn test_index_range_out_of_bounds_not_forwarded() {
        let (mut device, mesh) = device_with_mesh(600);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.mesh_index_start = 500;
        command.mesh_index_count = 200;

        let result = device.draw(&command);

        let expected = DrawError::DrawRangeOutOfBounds {
            mesh: mesh.id,
            violation: RangeViolation::Indices {
                start: 500,
                count: 200,
                available: 600,
            },
        };
        assert_eq!(result, Err(expected));
        assert!(device.backend().draws().is_empty());
    }

    #[test]
    fn test_index_range_end_exactly_at_count() {
        let (mut device, mesh) = device_with_mesh(600);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.mesh_index_start = 400;
        command.mesh_index_count = 200;

        assert_eq!(device.draw(&command), Ok(()));
    }

    #[test]
    fn test_index_range_does_not_overflow() {
        let (mut device, mesh) = device_with_mesh(600);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.mesh_index_start = u32::MAX;
        command.mesh_index_count = u32::MAX;

        assert!(device.draw(&command).is_err());
    }

    #[test]
    fn test_vertex_offset_bounds() {
        let (mut device, mesh) = device_with_mesh(600);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));

        command.mesh_vertex_offset = -1;
        assert!(matches!(
            device.draw(&command),
            Err(DrawError::DrawRangeOutOfBounds {
                violation: RangeViolation::VertexOffset { offset: -1, .. },
                ..
            })
        ));

        command.mesh_vertex_offset = 300;
        assert!(device.draw(&command).is_err());

        command.mesh_vertex_offset = 299;
        assert_eq!(device.draw(&command), Ok(()));
        assert_eq!(device.backend().draws()[0].vertex_offset, 299);
    }

    #[test]
    fn test_zero_count_is_noop() {
        let (mut device, mesh) = device_with_mesh(600);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.mesh_index_count = 0;

        assert_eq!(device.draw(&command), Ok(()));
        assert!(device.backend().draws().is_empty());
    }

    #[test]
    fn test_destroyed_target_invalidated() {
        let (mut device, mesh) = device_with_mesh(600);
        let target = device.backend_mut().create_target(Size::new(256, 256));
        let command = DrawCommand::new(Some(target), &mesh, MaterialId(1));

        assert_eq!(device.draw(&command), Ok(()));
        assert_eq!(device.backend().draws()[0].target.size, Size::new(256, 256));

        device.backend_mut().destroy_target(target);
        assert_eq!(
            device.draw(&command),
            Err(DrawError::TargetInvalidated(target))
        );
        assert_eq!(device.backend().draws().len(), 1);
    }

    #[test]
    fn test_invalidate_targets_keeps_back_buffer() {
        let (mut device, mesh) = device_with_mesh(600);
        let target = device.backend_mut().create_target(Size::new(64, 64));
        device.invalidate_targets();

        let offscreen = DrawCommand::new(Some(target), &mesh, MaterialId(1));
        let onscreen = DrawCommand::new(None, &mesh, MaterialId(1));
        let stats = device.submit_all(&[offscreen, onscreen]);

        assert_eq!((stats.submitted, stats.skipped), (1, 1));
    }

    #[test]
    fn test_absent_target_resolves_after_resize() {
        let (mut device, mesh) = device_with_mesh(600);
        let command = DrawCommand::new(None, &mesh, MaterialId(1));

        device.resize_back_buffer(Size::new(1024, 768));
        command.submit(&mut device).unwrap();

        let draw = &device.backend().draws()[0];
        assert_eq!(draw.target.size, Size::new(1024, 768));
        assert_eq!(draw.viewport, RectInt::new(0, 0, 1024, 768));
    }

    #[test]
    fn test_unknown_mesh() {
        let (mut device, mesh) = device_with_mesh(6);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.mesh = MeshId(99);

        assert_eq!(
            device.draw(&command),
            Err(DrawError::UnknownMesh(MeshId(99)))
        );
    }

    #[test]
    fn test_depth_compare_only_when_enabled() {
        let (mut device, mesh) = device_with_mesh(6);
        let mut command = DrawCommand::new(None, &mesh, MaterialId(1));
        command.depth_test_enabled = true;
        command.depth_compare = DepthCompare::GreaterOrEqual;

        device.draw(&command).unwrap();

        assert_eq!(
            device.backend().draws()[0].depth_compare,
            Some(DepthCompare::GreaterOrEqual)
        );
    }
}

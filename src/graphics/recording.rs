//! Backend that records validated draws instead of rendering them
//!
//! Used by the headless sandbox and by tests to observe exactly what would
//! reach a GPU.

use std::collections::BTreeMap;

use super::device::{GraphicsBackend, ResolvedDraw};
use super::{MeshId, MeshInfo, TargetId, TargetInfo};
use crate::platform::Size;

pub type RecordedDraw = ResolvedDraw;

#[derive(Debug)]
pub struct RecordingBackend {
    back_buffer: Size,
    targets: BTreeMap<TargetId, Size>,
    meshes: BTreeMap<MeshId, MeshInfo>,
    next_id: u32,
    draws: Vec<RecordedDraw>,
}

impl RecordingBackend {
    pub fn new(back_buffer: Size) -> Self {
        Self {
            back_buffer,
            targets: BTreeMap::new(),
            meshes: BTreeMap::new(),
            next_id: 1,
            draws: Vec::new(),
        }
    }

    pub fn add_mesh(&mut self, index_count: u32, vertex_count: u32) -> MeshInfo {
        let info = MeshInfo {
            id: MeshId(self.alloc_id()),
            index_count,
            vertex_count,
        };
        self.meshes.insert(info.id, info);
        info
    }

    pub fn create_target(&mut self, size: Size) -> TargetId {
        let id = TargetId(self.alloc_id());
        self.targets.insert(id, size);
        id
    }

    pub fn destroy_target(&mut self, id: TargetId) {
        self.targets.remove(&id);
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Returns and clears the draws recorded so far
    pub fn take_draws(&mut self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.draws)
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GraphicsBackend for RecordingBackend {
    fn back_buffer(&self) -> TargetInfo {
        TargetInfo {
            id: None,
            size: self.back_buffer,
        }
    }

    fn target_info(&self, id: TargetId) -> Option<TargetInfo> {
        self.targets
            .get(&id)
            .map(|&size| TargetInfo { id: Some(id), size })
    }

    fn mesh_info(&self, id: MeshId) -> Option<MeshInfo> {
        self.meshes.get(&id).copied()
    }

    fn draw(&mut self, draw: &ResolvedDraw) {
        self.draws.push(draw.clone());
    }

    fn resize_back_buffer(&mut self, size: Size) {
        self.back_buffer = size;
    }

    fn invalidate_targets(&mut self) {
        self.targets.clear();
    }
}

// Copyright 2025 the Tessera contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mock host collaborators shared across the crate's tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tessera_core::gpu::{
    DrawRequest, EffectDescriptor, IdleDispatcher, IndexBufferDescriptor, IndexBufferId,
    RedrawHost, RenderDevice, RenderPassContext, ResourceError, ServerId, UnitConverter,
    VertexBufferDescriptor, VertexBufferId, VertexFormatId, VertexLayout, ViewServerRegistry,
    WorldTransform,
};
use tessera_core::EffectId;

/// Everything the mock device has observed, for assertions.
#[derive(Debug, Default)]
pub struct MockDeviceState {
    pub live: HashSet<usize>,
    pub invalidated: HashSet<usize>,
    /// `(buffer id, byte length)` per vertex upload.
    pub vertex_writes: Vec<(usize, usize)>,
    /// `(buffer id, byte length)` per index upload.
    pub index_writes: Vec<(usize, usize)>,
    pub draws: Vec<DrawRequest>,
    pub destroyed: Vec<usize>,
    pub effect_descriptors: Vec<EffectDescriptor>,
    pub transforms_set: usize,
}

/// A recording in-memory device.
///
/// Ids come from one shared counter so no two resources ever collide.
/// `invalidate_all` simulates a host-side device reset: existing resources
/// stay destroyable but report themselves invalid. `mutation_active` plus
/// `violations` form a race detector: a draw observed while a geometry
/// mutation is flagged in flight counts as an interleaving violation.
#[derive(Debug, Default)]
pub struct MockDevice {
    next_id: AtomicUsize,
    pub state: Mutex<MockDeviceState>,
    pub mutation_active: AtomicBool,
    pub violations: AtomicUsize,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().live.insert(id);
        id
    }

    fn destroy(&self, id: usize) -> Result<(), ResourceError> {
        let mut state = self.state.lock().unwrap();
        if !state.live.remove(&id) {
            return Err(ResourceError::NotFound);
        }
        state.invalidated.remove(&id);
        state.destroyed.push(id);
        Ok(())
    }

    fn usable(&self, id: usize) -> bool {
        let state = self.state.lock().unwrap();
        state.live.contains(&id) && !state.invalidated.contains(&id)
    }

    /// Marks every live resource invalid, as after a device reset.
    pub fn invalidate_all(&self) {
        let mut state = self.state.lock().unwrap();
        let live: Vec<_> = state.live.iter().copied().collect();
        state.invalidated.extend(live);
    }
}

impl RenderDevice for MockDevice {
    fn create_vertex_buffer(
        &self,
        _descriptor: &VertexBufferDescriptor,
    ) -> Result<VertexBufferId, ResourceError> {
        Ok(VertexBufferId(self.allocate()))
    }

    fn create_index_buffer(
        &self,
        _descriptor: &IndexBufferDescriptor,
    ) -> Result<IndexBufferId, ResourceError> {
        Ok(IndexBufferId(self.allocate()))
    }

    fn create_vertex_format(&self, _layout: VertexLayout) -> Result<VertexFormatId, ResourceError> {
        Ok(VertexFormatId(self.allocate()))
    }

    fn create_effect(&self, descriptor: &EffectDescriptor) -> Result<EffectId, ResourceError> {
        let id = self.allocate();
        self.state
            .lock()
            .unwrap()
            .effect_descriptors
            .push(descriptor.clone());
        Ok(EffectId(id))
    }

    fn write_vertex_buffer(&self, id: VertexBufferId, data: &[u8]) -> Result<(), ResourceError> {
        if !self.usable(id.0) {
            return Err(ResourceError::InvalidHandle);
        }
        self.state.lock().unwrap().vertex_writes.push((id.0, data.len()));
        Ok(())
    }

    fn write_index_buffer(&self, id: IndexBufferId, data: &[u8]) -> Result<(), ResourceError> {
        if !self.usable(id.0) {
            return Err(ResourceError::InvalidHandle);
        }
        self.state.lock().unwrap().index_writes.push((id.0, data.len()));
        Ok(())
    }

    fn vertex_buffer_valid(&self, id: VertexBufferId) -> bool {
        self.usable(id.0)
    }

    fn index_buffer_valid(&self, id: IndexBufferId) -> bool {
        self.usable(id.0)
    }

    fn vertex_format_valid(&self, id: VertexFormatId) -> bool {
        self.usable(id.0)
    }

    fn effect_valid(&self, id: EffectId) -> bool {
        self.usable(id.0)
    }

    fn destroy_vertex_buffer(&self, id: VertexBufferId) -> Result<(), ResourceError> {
        self.destroy(id.0)
    }

    fn destroy_index_buffer(&self, id: IndexBufferId) -> Result<(), ResourceError> {
        self.destroy(id.0)
    }

    fn destroy_vertex_format(&self, id: VertexFormatId) -> Result<(), ResourceError> {
        self.destroy(id.0)
    }

    fn destroy_effect(&self, id: EffectId) -> Result<(), ResourceError> {
        self.destroy(id.0)
    }

    fn set_world_transform(&self, _transform: &WorldTransform) {
        self.state.lock().unwrap().transforms_set += 1;
    }

    fn flush_buffer(&self, request: &DrawRequest) {
        if self.mutation_active.load(Ordering::SeqCst) {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        self.state.lock().unwrap().draws.push(*request);
    }
}

/// A render-pass context with a settable interruption flag.
#[derive(Debug)]
pub struct MockPass {
    transparent: bool,
    pub interrupted: AtomicBool,
}

impl MockPass {
    pub fn transparent() -> Self {
        Self {
            transparent: true,
            interrupted: AtomicBool::new(false),
        }
    }

    pub fn opaque() -> Self {
        Self {
            transparent: false,
            interrupted: AtomicBool::new(false),
        }
    }
}

impl RenderPassContext for MockPass {
    fn in_transparent_pass(&self) -> bool {
        self.transparent
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

/// Runs idle actions immediately on the calling thread, counting them.
#[derive(Debug, Default)]
pub struct InlineIdle {
    pub runs: AtomicUsize,
}

impl IdleDispatcher for InlineIdle {
    fn run_on_idle(&self, action: Box<dyn FnOnce() + Send + 'static>) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        action();
    }
}

/// Counts view refresh requests.
#[derive(Debug, Default)]
pub struct CountingRedraw {
    refreshes: AtomicUsize,
}

impl CountingRedraw {
    pub fn count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl RedrawHost for CountingRedraw {
    fn refresh_active_view(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A recording server registry.
#[derive(Debug, Default)]
pub struct MockServices {
    registered: Mutex<Vec<ServerId>>,
    active: Mutex<Vec<ServerId>>,
}

impl MockServices {
    pub fn registered(&self) -> Vec<ServerId> {
        self.registered.lock().unwrap().clone()
    }

    pub fn active(&self) -> Vec<ServerId> {
        self.active.lock().unwrap().clone()
    }
}

impl ViewServerRegistry for MockServices {
    fn active_servers(&self) -> Vec<ServerId> {
        self.active()
    }

    fn add_server(&self, id: ServerId) -> Result<(), ResourceError> {
        self.registered.lock().unwrap().push(id);
        Ok(())
    }

    fn remove_server(&self, id: ServerId) -> Result<(), ResourceError> {
        self.registered.lock().unwrap().retain(|s| *s != id);
        Ok(())
    }

    fn set_active_servers(&self, ids: &[ServerId]) -> Result<(), ResourceError> {
        *self.active.lock().unwrap() = ids.to_vec();
        Ok(())
    }
}

/// A fixed model-to-render scale factor.
#[derive(Debug, Clone, Copy)]
pub struct FixedScale(pub f64);

impl UnitConverter for FixedScale {
    fn model_to_render_scale(&self) -> f64 {
        self.0
    }
}

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

use crate::gpu::api::*;
use crate::gpu::error::ResourceError;
use std::fmt::Debug;

/// The host-provided GPU resource provider.
///
/// All buffer, format and effect resources are opaque ids owned by the host;
/// Tessera creates them lazily during rendering, re-uploads staging content
/// when it changes, and destroys them when a cache is cleared or disposed.
///
/// Resources may be invalidated behind Tessera's back (e.g. after a device
/// reset); the `*_valid` methods let the render path detect this and
/// recreate transparently. Writes follow map/copy/unmap semantics on the
/// host side and take plain byte slices.
pub trait RenderDevice: Send + Sync + Debug + 'static {
    /// Creates a vertex buffer sized for `descriptor.capacity` `f32` components.
    ///
    /// ## Errors
    /// * `ResourceError` - If the host fails to allocate the buffer.
    fn create_vertex_buffer(
        &self,
        descriptor: &VertexBufferDescriptor,
    ) -> Result<VertexBufferId, ResourceError>;

    /// Creates an index buffer sized for `descriptor.capacity` 16-bit indices.
    ///
    /// ## Errors
    /// * `ResourceError` - If the host fails to allocate the buffer.
    fn create_index_buffer(
        &self,
        descriptor: &IndexBufferDescriptor,
    ) -> Result<IndexBufferId, ResourceError>;

    /// Creates a vertex format resource for the given layout.
    fn create_vertex_format(&self, layout: VertexLayout) -> Result<VertexFormatId, ResourceError>;

    /// Creates an effect resource from the provided descriptor.
    fn create_effect(&self, descriptor: &EffectDescriptor) -> Result<EffectId, ResourceError>;

    /// Writes `data` to the start of a vertex buffer (map, copy, unmap).
    ///
    /// ## Errors
    /// * `ResourceError` - If the id is stale or the data exceeds the buffer capacity.
    fn write_vertex_buffer(&self, id: VertexBufferId, data: &[u8]) -> Result<(), ResourceError>;

    /// Writes `data` to the start of an index buffer (map, copy, unmap).
    ///
    /// ## Errors
    /// * `ResourceError` - If the id is stale or the data exceeds the buffer capacity.
    fn write_index_buffer(&self, id: IndexBufferId, data: &[u8]) -> Result<(), ResourceError>;

    /// Returns `true` while the vertex buffer is usable for drawing.
    fn vertex_buffer_valid(&self, id: VertexBufferId) -> bool;

    /// Returns `true` while the index buffer is usable for drawing.
    fn index_buffer_valid(&self, id: IndexBufferId) -> bool;

    /// Returns `true` while the vertex format is usable for drawing.
    fn vertex_format_valid(&self, id: VertexFormatId) -> bool;

    /// Returns `true` while the effect is usable for drawing.
    fn effect_valid(&self, id: EffectId) -> bool;

    /// Destroys a vertex buffer.
    fn destroy_vertex_buffer(&self, id: VertexBufferId) -> Result<(), ResourceError>;

    /// Destroys an index buffer.
    fn destroy_index_buffer(&self, id: IndexBufferId) -> Result<(), ResourceError>;

    /// Destroys a vertex format.
    fn destroy_vertex_format(&self, id: VertexFormatId) -> Result<(), ResourceError>;

    /// Destroys an effect.
    fn destroy_effect(&self, id: EffectId) -> Result<(), ResourceError>;

    /// Sets the world transform applied to subsequent draw calls.
    fn set_world_transform(&self, transform: &WorldTransform);

    /// Issues one draw call over `[0, request.primitive_count)`.
    fn flush_buffer(&self, request: &DrawRequest);
}

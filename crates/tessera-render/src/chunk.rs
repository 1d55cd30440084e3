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

//! A single GPU-uploadable geometry chunk.

use crate::error::GeometryError;
use std::borrow::Cow;
use tessera_core::gpu::{
    DrawRequest, IndexBufferDescriptor, IndexBufferId, PrimitiveKind, RenderDevice, ResourceError,
    VertexBufferDescriptor, VertexBufferId, VertexFormatId, WorldTransform,
};
use tessera_core::math::{Aabb, Vec3};
use tessera_core::EffectId;

/// The maximum number of vertices a single chunk can address.
///
/// Index buffers use 16-bit indices, so one chunk can reference at most
/// `u16::MAX + 1` vertices.
pub const MAX_CHUNK_VERTICES: usize = (u16::MAX as usize) + 1;

/// Converts a source-space coordinate triple to a render-space vertex.
///
/// The host's render space is Y-up left-handed while model tessellation is
/// Z-up right-handed: `(x, y, z)` maps to `(x * s, -z * s, y * s)`.
#[inline]
fn to_render_space(components: &[f64], scale: f64) -> Vec3 {
    Vec3::new(
        components[0] * scale,
        -components[2] * scale,
        components[1] * scale,
    )
}

/// The GPU resources backing one chunk.
///
/// Buffers are allocated at full chunk capacity up front so a chunk never
/// reallocates as geometry accumulates.
#[derive(Debug)]
struct ChunkResources {
    vertex_buffer: VertexBufferId,
    index_buffer: IndexBufferId,
    vertex_format: VertexFormatId,
}

impl ChunkResources {
    fn create(device: &dyn RenderDevice, kind: PrimitiveKind) -> Result<Self, ResourceError> {
        let layout = kind.vertex_layout();
        let vertex_buffer = device.create_vertex_buffer(&VertexBufferDescriptor {
            label: Some(Cow::Borrowed("tessera chunk vertices")),
            capacity: MAX_CHUNK_VERTICES * layout.stride(),
        })?;
        let index_buffer = match device.create_index_buffer(&IndexBufferDescriptor {
            label: Some(Cow::Borrowed("tessera chunk indices")),
            capacity: MAX_CHUNK_VERTICES * kind.indices_per_primitive(),
        }) {
            Ok(id) => id,
            Err(err) => {
                if let Err(destroy_err) = device.destroy_vertex_buffer(vertex_buffer) {
                    log::warn!("failed to destroy orphaned vertex buffer: {destroy_err}");
                }
                return Err(err);
            }
        };
        let vertex_format = match device.create_vertex_format(layout) {
            Ok(id) => id,
            Err(err) => {
                if let Err(destroy_err) = device.destroy_vertex_buffer(vertex_buffer) {
                    log::warn!("failed to destroy orphaned vertex buffer: {destroy_err}");
                }
                if let Err(destroy_err) = device.destroy_index_buffer(index_buffer) {
                    log::warn!("failed to destroy orphaned index buffer: {destroy_err}");
                }
                return Err(err);
            }
        };
        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_format,
        })
    }

    fn is_valid(&self, device: &dyn RenderDevice) -> bool {
        device.vertex_buffer_valid(self.vertex_buffer)
            && device.index_buffer_valid(self.index_buffer)
            && device.vertex_format_valid(self.vertex_format)
    }

    fn destroy(self, device: &dyn RenderDevice) {
        if let Err(err) = device.destroy_vertex_buffer(self.vertex_buffer) {
            log::warn!("failed to destroy vertex buffer: {err}");
        }
        if let Err(err) = device.destroy_index_buffer(self.index_buffer) {
            log::warn!("failed to destroy index buffer: {err}");
        }
        if let Err(err) = device.destroy_vertex_format(self.vertex_format) {
            log::warn!("failed to destroy vertex format: {err}");
        }
    }
}

/// A staging buffer for one GPU-uploadable chunk of geometry.
///
/// Geometry is accumulated CPU-side as `f32` components plus 16-bit indices;
/// the matching GPU resources are created lazily on first render and content
/// is re-uploaded only when the staging data has changed since the last
/// upload.
#[derive(Debug)]
pub struct ChunkBuffer {
    kind: PrimitiveKind,
    components: Vec<f32>,
    indices: Vec<u16>,
    bounds: Aabb,
    synced: bool,
    resources: Option<ChunkResources>,
}

impl ChunkBuffer {
    /// Creates an empty chunk for the given primitive topology.
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            components: Vec::new(),
            indices: Vec::new(),
            bounds: Aabb::INVALID,
            synced: false,
            resources: None,
        }
    }

    /// The primitive topology this chunk draws.
    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Number of `f32` components one vertex occupies in this chunk.
    #[inline]
    fn stride(&self) -> usize {
        self.kind.vertex_layout().stride()
    }

    /// Number of `f32` components still free in this chunk.
    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        MAX_CHUNK_VERTICES * self.stride() - self.components.len()
    }

    /// Number of index slots this chunk's index buffer holds.
    ///
    /// Sized at one primitive's worth of indices per addressable vertex, so
    /// line chunks (whose segments share vertices) can index the same
    /// vertex more than once without exhausting the buffer.
    #[inline]
    fn index_capacity(&self) -> usize {
        MAX_CHUNK_VERTICES * self.kind.indices_per_primitive()
    }

    /// Number of vertices currently staged.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.components.len() / self.stride()
    }

    /// Number of indices currently staged.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of whole primitives currently staged.
    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.kind.indices_per_primitive()
    }

    /// The bounding volume of the staged geometry, in render space.
    ///
    /// [`Aabb::INVALID`] while the chunk is empty. Bounds are accumulated
    /// from the double-precision source coordinates before the `f32`
    /// truncation of the staged components.
    #[inline]
    pub fn bounding_volume(&self) -> Aabb {
        self.bounds
    }

    fn push_vertex(&mut self, v: Vec3) {
        self.components.push(v.x as f32);
        self.components.push(v.y as f32);
        self.components.push(v.z as f32);
    }

    /// Appends whole triangles with per-vertex normals.
    ///
    /// `positions` and `normals` are interleaved `x, y, z` triples in source
    /// space; positions are scaled and axis-remapped, normals are remapped
    /// unscaled. Sequential indices are generated for the new vertices.
    ///
    /// ## Errors
    /// * `GeometryError` - If the streams are malformed or the triangles do
    ///   not fit; the chunk is left unchanged.
    pub fn append_triangles(
        &mut self,
        positions: &[f64],
        normals: &[f64],
        scale: f64,
    ) -> Result<(), GeometryError> {
        debug_assert_eq!(self.kind, PrimitiveKind::TriangleList);
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        let vertex_count = positions.len() / 3;
        if vertex_count % 3 != 0 {
            return Err(GeometryError::NotTriangleList { vertex_count });
        }
        if normals.len() != positions.len() {
            return Err(GeometryError::NormalCountMismatch {
                position_components: positions.len(),
                normal_components: normals.len(),
            });
        }
        let required = vertex_count * self.stride();
        let remaining = self.remaining_capacity();
        if required > remaining {
            return Err(GeometryError::CapacityExceeded {
                required,
                remaining,
            });
        }

        let base = self.vertex_count();
        let mut bounds = self.bounds;
        for i in 0..vertex_count {
            let position = to_render_space(&positions[i * 3..i * 3 + 3], scale);
            bounds = bounds.merged_with_point(position);
            self.push_vertex(position);
            self.push_vertex(to_render_space(&normals[i * 3..i * 3 + 3], 1.0));
        }
        for offset in 0..vertex_count {
            self.indices.push((base + offset) as u16);
        }
        self.bounds = bounds;
        self.synced = false;
        Ok(())
    }

    /// Appends line segments addressed by an index pair stream.
    ///
    /// `segment_indices` holds two indices per segment into the span of
    /// vertices described by `positions`. Indices are rebased so the span's
    /// minimum index becomes the first new chunk vertex.
    ///
    /// ## Errors
    /// * `GeometryError` - If the streams are malformed, an index falls
    ///   outside the span, or the span does not fit; the chunk is left
    ///   unchanged.
    pub fn append_lines(
        &mut self,
        positions: &[f64],
        segment_indices: &[i32],
        scale: f64,
    ) -> Result<(), GeometryError> {
        debug_assert_eq!(self.kind, PrimitiveKind::LineList);
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        if segment_indices.len() % 2 != 0 {
            return Err(GeometryError::OddSegmentIndexCount {
                index_count: segment_indices.len(),
            });
        }
        let vertex_count = positions.len() / 3;
        let required = vertex_count * self.stride();
        let remaining = self.remaining_capacity();
        if required > remaining {
            return Err(GeometryError::CapacityExceeded {
                required,
                remaining,
            });
        }
        let index_remaining = self.index_capacity() - self.indices.len();
        if segment_indices.len() > index_remaining {
            return Err(GeometryError::CapacityExceeded {
                required: segment_indices.len(),
                remaining: index_remaining,
            });
        }
        let min_index = segment_indices.iter().copied().min().unwrap_or(0);
        for &index in segment_indices {
            let rebased = index as i64 - min_index as i64;
            if rebased as usize >= vertex_count {
                return Err(GeometryError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }

        let base = self.vertex_count();
        let mut bounds = self.bounds;
        for i in 0..vertex_count {
            let position = to_render_space(&positions[i * 3..i * 3 + 3], scale);
            bounds = bounds.merged_with_point(position);
            self.push_vertex(position);
        }
        // base + rebased < MAX_CHUNK_VERTICES by the capacity check above
        for &index in segment_indices {
            let rebased = (index as i64 - min_index as i64) as usize;
            self.indices.push((base + rebased) as u16);
        }
        self.bounds = bounds;
        self.synced = false;
        Ok(())
    }

    /// Appends point vertices, one primitive per vertex.
    ///
    /// ## Errors
    /// * `GeometryError` - If the stream is malformed or the points do not
    ///   fit; the chunk is left unchanged.
    pub fn append_points(&mut self, positions: &[f64], scale: f64) -> Result<(), GeometryError> {
        debug_assert_eq!(self.kind, PrimitiveKind::PointList);
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        let vertex_count = positions.len() / 3;
        let required = vertex_count * self.stride();
        let remaining = self.remaining_capacity();
        if required > remaining {
            return Err(GeometryError::CapacityExceeded {
                required,
                remaining,
            });
        }

        let base = self.vertex_count();
        let mut bounds = self.bounds;
        for i in 0..vertex_count {
            let position = to_render_space(&positions[i * 3..i * 3 + 3], scale);
            bounds = bounds.merged_with_point(position);
            self.push_vertex(position);
        }
        for offset in 0..vertex_count {
            self.indices.push((base + offset) as u16);
        }
        self.bounds = bounds;
        self.synced = false;
        Ok(())
    }

    /// Draws the staged geometry with the given effect.
    ///
    /// Creates GPU resources lazily on first use. Resources the host has
    /// invalidated since the last frame are torn down and recreated, and the
    /// staged content is re-uploaded whenever it is newer than the GPU copy.
    ///
    /// ## Errors
    /// * `ResourceError` - If resource creation or upload fails; the staged
    ///   content survives and the next render retries from scratch.
    pub fn render(
        &mut self,
        device: &dyn RenderDevice,
        transform: &WorldTransform,
        effect: EffectId,
    ) -> Result<(), ResourceError> {
        let needs_recreate = match &self.resources {
            Some(resources) => !resources.is_valid(device),
            None => true,
        };
        if needs_recreate {
            if let Some(stale) = self.resources.take() {
                stale.destroy(device);
            }
            self.resources = Some(ChunkResources::create(device, self.kind)?);
            // fresh buffers hold no content yet
            self.synced = false;
        }
        let Some(resources) = &self.resources else {
            return Err(ResourceError::InvalidHandle);
        };
        let vertex_buffer = resources.vertex_buffer;
        let index_buffer = resources.index_buffer;
        let vertex_format = resources.vertex_format;

        if !self.synced {
            device.write_vertex_buffer(vertex_buffer, bytemuck::cast_slice(&self.components))?;
            device.write_index_buffer(index_buffer, bytemuck::cast_slice(&self.indices))?;
            self.synced = true;
        }

        device.set_world_transform(transform);
        device.flush_buffer(&DrawRequest {
            vertex_buffer,
            vertex_count: self.vertex_count(),
            index_buffer,
            index_count: self.index_count(),
            vertex_format,
            effect,
            primitive: self.kind,
            primitive_count: self.primitive_count(),
        });
        Ok(())
    }

    /// Releases the chunk's GPU resources, keeping the staged content.
    ///
    /// Safe to call repeatedly; subsequent renders recreate and re-upload.
    pub fn dispose(&mut self, device: &dyn RenderDevice) {
        if let Some(resources) = self.resources.take() {
            resources.destroy(device);
        }
        self.synced = false;
    }
}

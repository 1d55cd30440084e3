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

//! Per-object geometry caches.

use crate::chain::BufferChain;
use crate::chunk::MAX_CHUNK_VERTICES;
use crate::effects::RenderEffects;
use crate::error::GeometryError;
use tessera_core::gpu::{PrimitiveKind, RenderDevice, ResourceError, VertexLayout, WorldTransform};
use tessera_core::math::Aabb;

/// Index components a line chunk may consume.
///
/// Two short of the full 16-bit domain; the margin is an empirically
/// required safety constant of the target buffer format (the last segment
/// is dropped when the full domain is used).
const LINE_CHUNK_INDEX_BUDGET: usize = MAX_CHUNK_VERTICES - 2;

/// All cached geometry for one logical object.
///
/// Owns up to three buffer chains (triangle mesh, line edges, points) plus
/// the visibility and selection flags the registry consults when rendering.
/// Chains are created lazily on first use by the matching `add_*` call.
#[derive(Debug, Default)]
pub struct ObjectRenderCache {
    visible: bool,
    selected: bool,
    mesh: Option<BufferChain>,
    edges: Option<BufferChain>,
    points: Option<BufferChain>,
}

impl ObjectRenderCache {
    /// Creates an empty, hidden, unselected cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the registry should draw this cache.
    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Sets the visibility flag.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the object renders with the selection highlight.
    #[inline]
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Sets the selection flag.
    #[inline]
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Whether the cache holds any geometry.
    pub fn is_empty(&self) -> bool {
        fn empty(chain: &Option<BufferChain>) -> bool {
            chain.as_ref().is_none_or(BufferChain::is_empty)
        }
        empty(&self.mesh) && empty(&self.edges) && empty(&self.points)
    }

    /// Appends a triangle mesh, splitting it across chunks as needed.
    ///
    /// `positions` and `normals` are flat coordinate triples; the vertex
    /// count must be a multiple of three. Splits happen on triangle
    /// boundaries so no triangle ever spans two chunks.
    ///
    /// ## Errors
    /// * `GeometryError` - If the streams are malformed; chunks already
    ///   written stay in the chain (see the staged-update path in the
    ///   registry for wholesale replacement).
    pub fn add_mesh(
        &mut self,
        positions: &[f64],
        normals: &[f64],
        scale: f64,
    ) -> Result<(), GeometryError> {
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        let total = positions.len() / 3;
        if total % 3 != 0 {
            return Err(GeometryError::NotTriangleList {
                vertex_count: total,
            });
        }
        if normals.len() != positions.len() {
            return Err(GeometryError::NormalCountMismatch {
                position_components: positions.len(),
                normal_components: normals.len(),
            });
        }

        let chain = self
            .mesh
            .get_or_insert_with(|| BufferChain::new(PrimitiveKind::TriangleList));
        let stride = VertexLayout::PositionNormal.stride();
        let mut cursor = 0usize;
        while cursor < total {
            let take = ((total - cursor).min(MAX_CHUNK_VERTICES) / 3) * 3;
            let span = cursor * 3..(cursor + take) * 3;
            let buffer = chain.buffer_with_capacity(take * stride);
            buffer.append_triangles(&positions[span.clone()], &normals[span], scale)?;
            chain.record_write();
            cursor += take;
        }
        Ok(())
    }

    /// Appends line-strip edges addressed by segment index pairs.
    ///
    /// Walks `segment_indices` two at a time, accumulating segments until
    /// the chunk index budget fills, then writes the covered vertex window
    /// as one chunk span with rebased indices. A trailing unpaired index is
    /// ignored. Index pairs must be non-decreasing within the stream, as
    /// produced by strip tessellation.
    ///
    /// ## Errors
    /// * `GeometryError` - If an index is negative, out of range, or runs
    ///   backward past its window start.
    pub fn add_edges(
        &mut self,
        positions: &[f64],
        segment_indices: &[i32],
        scale: f64,
    ) -> Result<(), GeometryError> {
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        let paired = segment_indices.len() & !1;
        if paired == 0 {
            return Ok(());
        }
        let vertex_total = positions.len() / 3;

        let chain = self
            .edges
            .get_or_insert_with(|| BufferChain::new(PrimitiveKind::LineList));
        let mut rebased: Vec<i32> = Vec::new();
        let mut cursor = 0usize;
        let mut window_start = segment_indices[0];
        while cursor < paired {
            let a = segment_indices[cursor];
            let b = segment_indices[cursor + 1];
            cursor += 2;
            if a < 0 || b < a || (b as usize) >= vertex_total {
                return Err(GeometryError::IndexOutOfRange {
                    index: if a < 0 || b < a { a.min(b) } else { b },
                    vertex_count: vertex_total,
                });
            }
            if a < window_start {
                return Err(GeometryError::IndexOutOfRange {
                    index: a,
                    vertex_count: vertex_total,
                });
            }
            rebased.push(a - window_start);
            rebased.push(b - window_start);

            if rebased.len() >= LINE_CHUNK_INDEX_BUDGET || cursor >= paired {
                // flush the window [window_start, b] as one chunk span
                let window_end = b as usize + 1;
                let span = window_start as usize * 3..window_end * 3;
                let vertex_count = window_end - window_start as usize;
                let buffer = chain.buffer_with_capacity(vertex_count * 3);
                buffer.append_lines(&positions[span], &rebased, scale)?;
                chain.record_write();
                rebased.clear();
                if cursor < paired {
                    window_start = segment_indices[cursor];
                }
            }
        }
        Ok(())
    }

    /// Appends standalone points, splitting across chunks as needed.
    ///
    /// ## Errors
    /// * `GeometryError` - If the coordinate stream is malformed.
    pub fn add_points(&mut self, positions: &[f64], scale: f64) -> Result<(), GeometryError> {
        if positions.len() % 3 != 0 {
            return Err(GeometryError::IncompleteVertex {
                component_count: positions.len(),
            });
        }
        let total = positions.len() / 3;
        let chain = self
            .points
            .get_or_insert_with(|| BufferChain::new(PrimitiveKind::PointList));
        let mut cursor = 0usize;
        while cursor < total {
            let take = (total - cursor).min(MAX_CHUNK_VERTICES);
            let span = cursor * 3..(cursor + take) * 3;
            let buffer = chain.buffer_with_capacity(take * 3);
            buffer.append_points(&positions[span], scale)?;
            chain.record_write();
            cursor += take;
        }
        Ok(())
    }

    /// Drops all geometry and releases its GPU resources.
    ///
    /// Flags are untouched; subsequent `add_*` calls recreate chains.
    pub fn clear(&mut self, device: &dyn RenderDevice) {
        for chain in [&mut self.mesh, &mut self.edges, &mut self.points] {
            if let Some(mut chain) = chain.take() {
                chain.dispose(device);
            }
        }
    }

    /// Replaces this cache's geometry with `other`'s, atomically from the
    /// point of view of any later render.
    ///
    /// The staging pattern: build the replacement in a detached cache, then
    /// swap it in here under the registry lock. The previous chains are
    /// disposed. `other`'s flags are ignored; this cache keeps its own.
    pub fn replace_content(&mut self, device: &dyn RenderDevice, other: ObjectRenderCache) {
        self.clear(device);
        self.mesh = other.mesh;
        self.edges = other.edges;
        self.points = other.points;
    }

    /// The merged bounding volume of all three chains.
    pub fn bounding_volume(&self) -> Aabb {
        let mut bounds = Aabb::INVALID;
        for chain in [&self.mesh, &self.edges, &self.points].into_iter().flatten() {
            bounds = bounds.merge(&chain.bounding_volume());
        }
        bounds
    }

    /// Draws every chain with the given effect pair.
    ///
    /// Edges use the edge effect; mesh and point chains use the mesh
    /// effect. Visibility is not checked here — the registry skips hidden
    /// caches before dispatching.
    ///
    /// ## Errors
    /// * `ResourceError` - On the first chain that fails to render.
    pub fn render(
        &mut self,
        device: &dyn RenderDevice,
        transform: &WorldTransform,
        effects: &RenderEffects,
    ) -> Result<(), ResourceError> {
        if let Some(chain) = &mut self.edges {
            chain.render(device, transform, effects.edge)?;
        }
        if let Some(chain) = &mut self.mesh {
            chain.render(device, transform, effects.mesh)?;
        }
        if let Some(chain) = &mut self.points {
            chain.render(device, transform, effects.mesh)?;
        }
        Ok(())
    }

    /// Releases all GPU resources, keeping staged geometry and flags.
    pub fn dispose(&mut self, device: &dyn RenderDevice) {
        for chain in [&mut self.mesh, &mut self.edges, &mut self.points]
            .into_iter()
            .flatten()
        {
            chain.dispose(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;
    use tessera_core::math::Vec3;
    use tessera_core::EffectId;

    fn effects() -> RenderEffects {
        RenderEffects {
            mesh: EffectId(1),
            edge: EffectId(2),
        }
    }

    #[test]
    fn test_new_cache_is_hidden_and_unselected() {
        let cache = ObjectRenderCache::new();
        assert!(!cache.visible());
        assert!(!cache.selected());
        assert!(cache.is_empty());
        assert!(!cache.bounding_volume().is_valid());
    }

    #[test]
    fn test_single_triangle_round_trip() {
        // degenerate triangle at one point, scale 2
        let mut cache = ObjectRenderCache::new();
        let positions = [1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
        let normals = [0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        cache
            .add_mesh(&positions, &normals, 2.0)
            .expect("add must succeed");

        let chain = cache.mesh.as_ref().expect("mesh chain must exist");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.vertex_count(), 3);
        let bounds = cache.bounding_volume();
        assert_eq!(bounds.min, Vec3::new(2.0, -6.0, 4.0));
        assert_eq!(bounds.max, bounds.min);
    }

    #[test]
    fn test_large_mesh_splits_on_triangle_boundaries() {
        let mut cache = ObjectRenderCache::new();
        let total = 199_998usize;
        cache
            .add_mesh(&vec![0.0; total * 3], &vec![0.0; total * 3], 1.0)
            .expect("add must succeed");
        let chain = cache.mesh.as_ref().expect("mesh chain must exist");
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.vertex_count(), total);
    }

    #[test]
    fn test_add_edges_windows_reuse_one_chunk() {
        let mut cache = ObjectRenderCache::new();
        // one strip: vertices 0..=40000, segments (0,1), (1,2), ...
        let vertex_count = 40_001usize;
        let positions: Vec<f64> = (0..vertex_count)
            .flat_map(|i| [i as f64, 0.0, 0.0])
            .collect();
        let indices: Vec<i32> = (0..vertex_count as i32 - 1)
            .flat_map(|i| [i, i + 1])
            .collect();
        cache
            .add_edges(&positions, &indices, 1.0)
            .expect("add must succeed");

        let chain = cache.edges.as_ref().expect("edge chain must exist");
        // 80000 indices split into two windows at the 65534-index budget,
        // but both windows fit the same chunk's vertex capacity
        assert_eq!(chain.len(), 1);
        // every strip vertex is present, plus the window boundary vertex
        // duplicated into the second window
        assert_eq!(chain.vertex_count(), vertex_count + 1);
        let bounds = cache.bounding_volume();
        assert_eq!(bounds.max.x, (vertex_count - 1) as f64);
    }

    #[test]
    fn test_add_edges_spills_to_second_chunk() {
        let mut cache = ObjectRenderCache::new();
        // 70000 strip vertices exceed one chunk's 65536-vertex capacity
        let vertex_count = 70_000usize;
        let positions: Vec<f64> = (0..vertex_count)
            .flat_map(|i| [i as f64, 0.0, 0.0])
            .collect();
        let indices: Vec<i32> = (0..vertex_count as i32 - 1)
            .flat_map(|i| [i, i + 1])
            .collect();
        cache
            .add_edges(&positions, &indices, 1.0)
            .expect("add must succeed");

        let chain = cache.edges.as_ref().expect("edge chain must exist");
        // windows of 32768 vertices each; the third window reuses chunk two
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.vertex_count(), vertex_count + 2);
    }

    #[test]
    fn test_add_edges_ignores_trailing_unpaired_index() {
        let mut cache = ObjectRenderCache::new();
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        cache
            .add_edges(&positions, &[0, 1, 1], 1.0)
            .expect("add must succeed");
        let chain = cache.edges.as_ref().expect("edge chain must exist");
        assert_eq!(chain.vertex_count(), 2);

        let mut empty = ObjectRenderCache::new();
        empty
            .add_edges(&positions, &[0], 1.0)
            .expect("a single stray index is a no-op");
        assert!(empty.edges.as_ref().is_none_or(BufferChain::is_empty));
    }

    #[test]
    fn test_add_edges_rejects_bad_indices() {
        let mut cache = ObjectRenderCache::new();
        let positions = [0.0; 9];
        assert!(matches!(
            cache.add_edges(&positions, &[0, 3], 1.0),
            Err(GeometryError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            cache.add_edges(&positions, &[-1, 0], 1.0),
            Err(GeometryError::IndexOutOfRange { index: -1, .. })
        ));
    }

    #[test]
    fn test_add_points_chunks_large_sets() {
        let mut cache = ObjectRenderCache::new();
        let total = MAX_CHUNK_VERTICES + 10;
        cache
            .add_points(&vec![0.0; total * 3], 1.0)
            .expect("add must succeed");
        let chain = cache.points.as_ref().expect("point chain must exist");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.vertex_count(), total);
    }

    #[test]
    fn test_render_routes_effects_per_chain() {
        let device = MockDevice::new();
        let mut cache = ObjectRenderCache::new();
        cache
            .add_mesh(&[0.0; 9], &[0.0; 9], 1.0)
            .expect("add must succeed");
        cache
            .add_edges(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0], &[0, 1], 1.0)
            .expect("add must succeed");
        cache
            .add_points(&[0.0, 0.0, 0.0], 1.0)
            .expect("add must succeed");

        cache
            .render(&device, &WorldTransform::IDENTITY, &effects())
            .expect("render must succeed");
        let state = device.state.lock().unwrap();
        assert_eq!(state.draws.len(), 3);
        assert_eq!(state.draws[0].effect, EffectId(2)); // edges first
        assert_eq!(state.draws[1].effect, EffectId(1)); // mesh
        assert_eq!(state.draws[2].effect, EffectId(1)); // points share mesh effect
    }

    #[test]
    fn test_clear_releases_resources_and_geometry() {
        let device = MockDevice::new();
        let mut cache = ObjectRenderCache::new();
        cache.add_points(&[0.0, 0.0, 0.0], 1.0).unwrap();
        cache
            .render(&device, &WorldTransform::IDENTITY, &effects())
            .unwrap();

        cache.clear(&device);
        assert!(cache.is_empty());
        assert_eq!(device.state.lock().unwrap().destroyed.len(), 3);

        // clearing again is a no-op
        cache.clear(&device);
        assert_eq!(device.state.lock().unwrap().destroyed.len(), 3);
    }

    #[test]
    fn test_replace_content_swaps_geometry_keeps_flags() {
        let device = MockDevice::new();
        let mut cache = ObjectRenderCache::new();
        cache.set_visible(true);
        cache.set_selected(true);
        cache.add_points(&[1.0, 1.0, 1.0], 1.0).unwrap();
        cache
            .render(&device, &WorldTransform::IDENTITY, &effects())
            .unwrap();

        let mut staged = ObjectRenderCache::new();
        staged.add_points(&[9.0, 9.0, 9.0], 1.0).unwrap();
        cache.replace_content(&device, staged);

        assert!(cache.visible());
        assert!(cache.selected());
        assert_eq!(cache.bounding_volume().min.x, 9.0);
        // old chain's resources were released on swap
        assert_eq!(device.state.lock().unwrap().destroyed.len(), 3);
    }
}

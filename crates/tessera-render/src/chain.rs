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

//! Ordered chains of geometry chunks.

use crate::chunk::ChunkBuffer;
use tessera_core::gpu::{PrimitiveKind, RenderDevice, ResourceError, WorldTransform};
use tessera_core::math::Aabb;
use tessera_core::EffectId;

/// An ordered collection of [`ChunkBuffer`]s of one primitive topology.
///
/// The chain is kept sorted by fullness: buffers with the least remaining
/// capacity sit at the head and the roomiest buffer is always the tail.
/// New geometry reuses the tail while it has room and opens a fresh chunk
/// otherwise, so full chunks migrate toward the head and at most one
/// partially filled chunk accepts writes at any time. This minimizes the
/// number of sparsely filled buffers kept resident.
#[derive(Debug)]
pub struct BufferChain {
    kind: PrimitiveKind,
    buffers: Vec<ChunkBuffer>,
    bounds: Aabb,
}

impl BufferChain {
    /// Creates an empty chain for the given primitive topology.
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            buffers: Vec::new(),
            bounds: Aabb::INVALID,
        }
    }

    /// The primitive topology of every chunk in this chain.
    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Number of chunks in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the chain holds no chunks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// The accumulated bounding volume of all chunks, in render space.
    #[inline]
    pub fn bounding_volume(&self) -> Aabb {
        self.bounds
    }

    /// Total number of vertices staged across all chunks.
    pub fn vertex_count(&self) -> usize {
        self.buffers.iter().map(ChunkBuffer::vertex_count).sum()
    }

    /// Returns a buffer with strictly more than `required` free components.
    ///
    /// The tail buffer is reused when it qualifies; otherwise a fresh chunk
    /// is appended and returned. Callers must follow every write to the
    /// returned buffer with [`record_write`](Self::record_write).
    pub fn buffer_with_capacity(&mut self, required: usize) -> &mut ChunkBuffer {
        let reuse_tail = self
            .buffers
            .last()
            .is_some_and(|tail| tail.remaining_capacity() > required);
        if !reuse_tail {
            log::debug!(
                "opening geometry chunk {} ({:?})",
                self.buffers.len() + 1,
                self.kind
            );
            self.buffers.push(ChunkBuffer::new(self.kind));
        }
        let tail = self.buffers.len() - 1;
        &mut self.buffers[tail]
    }

    /// Folds the tail buffer's state back into the chain after a write.
    ///
    /// Merges the tail's bounds into the chain bounds, then restores the
    /// sort invariant with one insertion-sort pass: the just-written buffer
    /// swaps leftward past any neighbor with strictly greater remaining
    /// capacity. Only the tail is ever out of place, so this is amortized
    /// O(1) per write.
    pub fn record_write(&mut self) {
        let Some(tail) = self.buffers.last() else {
            return;
        };
        self.bounds = self.bounds.merge(&tail.bounding_volume());

        let mut idx = self.buffers.len() - 1;
        while idx > 0
            && self.buffers[idx - 1].remaining_capacity()
                > self.buffers[idx].remaining_capacity()
        {
            self.buffers.swap(idx - 1, idx);
            idx -= 1;
        }
    }

    /// Draws every chunk in the chain with the given effect.
    ///
    /// ## Errors
    /// * `ResourceError` - On the first chunk whose resources cannot be
    ///   created or written; earlier chunks stay drawn.
    pub fn render(
        &mut self,
        device: &dyn RenderDevice,
        transform: &WorldTransform,
        effect: EffectId,
    ) -> Result<(), ResourceError> {
        for buffer in &mut self.buffers {
            buffer.render(device, transform, effect)?;
        }
        Ok(())
    }

    /// Releases the GPU resources of every chunk.
    pub fn dispose(&mut self, device: &dyn RenderDevice) {
        for buffer in &mut self.buffers {
            buffer.dispose(device);
        }
    }
}

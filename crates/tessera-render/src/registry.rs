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

//! The registry of per-object render caches.

use crate::cache::ObjectRenderCache;
use crate::effects::EffectSet;
use std::collections::HashMap;
use std::sync::Mutex;
use tessera_core::gpu::{RenderDevice, RenderPassContext, WorldTransform};
use tessera_core::math::Aabb;
use uuid::Uuid;

/// A globally unique identifier for one logical preview object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Creates a new, random (version 4) `ObjectId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    /// Creates a new, random (version 4) `ObjectId`.
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    objects: HashMap<ObjectId, ObjectRenderCache>,
    bounds: Aabb,
    bounds_dirty: bool,
}

/// All object caches for one preview server, behind a single mutex.
///
/// One lock guards the map and every cache reachable from it: the update
/// path (structural mutation) and the render path (iteration plus transient
/// GPU resource creation) must each observe a consistent snapshot across
/// all objects, so no finer-grained locking is used. Contention stays low
/// because updates are coalesced upstream before they reach the registry.
#[derive(Debug, Default)]
pub struct RenderRegistry {
    inner: Mutex<RegistryInner>,
}

impl RenderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the cache for `id`.
    ///
    /// The cache is created empty on first reference. The registry-wide
    /// bounding volume is marked dirty afterward, whatever `f` did.
    pub fn with_object<R>(&self, id: ObjectId, f: impl FnOnce(&mut ObjectRenderCache) -> R) -> R {
        let mut inner = self.inner.lock().unwrap();
        let cache = inner.objects.entry(id).or_default();
        let result = f(cache);
        inner.bounds_dirty = true;
        result
    }

    /// Removes and disposes the cache for `id`; returns whether it existed.
    pub fn remove_object(&self, id: ObjectId, device: &dyn RenderDevice) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.objects.remove(&id) {
            Some(mut cache) => {
                cache.dispose(device);
                inner.bounds_dirty = true;
                true
            }
            None => false,
        }
    }

    /// Number of live object caches.
    pub fn object_count(&self) -> usize {
        self.inner.lock().unwrap().objects.len()
    }

    /// Draws every visible cache with the style's effect set.
    ///
    /// Holds the registry lock for the whole iteration so no update can
    /// interleave mid-frame. Checks the pass's interruption flag between
    /// objects and aborts the rest of the iteration when set. A cache that
    /// fails to render is logged and skipped; the remaining objects still
    /// draw.
    pub fn render_all(
        &self,
        device: &dyn RenderDevice,
        pass: &dyn RenderPassContext,
        transform: &WorldTransform,
        effects: &EffectSet,
    ) {
        let mut inner = self.inner.lock().unwrap();
        for (id, cache) in inner.objects.iter_mut() {
            if pass.is_interrupted() {
                log::debug!("render pass interrupted, skipping remaining objects");
                return;
            }
            if !cache.visible() {
                continue;
            }
            let pair = if cache.selected() {
                &effects.selected
            } else {
                &effects.unselected
            };
            if let Err(err) = cache.render(device, transform, pair) {
                log::warn!("render failed for object {id}: {err}");
            }
        }
    }

    /// The merged bounding volume of every live cache.
    ///
    /// Recomputed lazily: queries come once per frame while mutations come
    /// in bursts, so the volume is cached until the next mutation dirties
    /// it. Returns [`Aabb::INVALID`] while the registry holds no geometry.
    pub fn bounding_volume(&self) -> Aabb {
        let mut inner = self.inner.lock().unwrap();
        if inner.bounds_dirty {
            let mut bounds = Aabb::INVALID;
            for cache in inner.objects.values() {
                bounds = bounds.merge(&cache.bounding_volume());
            }
            inner.bounds = bounds;
            inner.bounds_dirty = false;
        }
        inner.bounds
    }

    /// Disposes every cache and empties the registry; idempotent.
    pub fn dispose(&self, device: &dyn RenderDevice) {
        let mut inner = self.inner.lock().unwrap();
        for cache in inner.objects.values_mut() {
            cache.dispose(device);
        }
        inner.objects.clear();
        inner.bounds = Aabb::INVALID;
        inner.bounds_dirty = false;
    }
}

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

//! The preview server registered with the host's view pipeline.

use crate::cache::ObjectRenderCache;
use crate::effects::EffectSet;
use crate::error::GeometryError;
use crate::package::ObjectUpdate;
use crate::registry::{ObjectId, RenderRegistry};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tessera_core::gpu::{
    DisplayStyle, RenderDevice, RenderPassContext, ResourceError, ServerId, UnitConverter,
    ViewKind, ViewServerRegistry, WorldTransform,
};
use tessera_core::math::Aabb;

/// One preview server instance: the bridge between the host's render
/// callbacks and the object cache registry.
///
/// The host invokes [`render`](Self::render) once per frame on its own
/// thread; the update scheduler feeds [`update_object`](Self::update_object)
/// and [`remove_object`](Self::remove_object) from the host's idle context.
/// The registry's lock reconciles the two.
pub struct PreviewServer {
    id: ServerId,
    device: Arc<dyn RenderDevice>,
    services: Arc<dyn ViewServerRegistry>,
    registry: RenderRegistry,
    effects: Mutex<Option<EffectSet>>,
    scale: f64,
    stopped: AtomicBool,
}

impl PreviewServer {
    /// Creates a server bound to the host's device and service registry.
    ///
    /// The model-to-render scale is queried once here and cached for the
    /// server's lifetime.
    pub fn new(
        device: Arc<dyn RenderDevice>,
        services: Arc<dyn ViewServerRegistry>,
        units: &dyn UnitConverter,
    ) -> Self {
        Self {
            id: ServerId::new(),
            device,
            services,
            registry: RenderRegistry::new(),
            effects: Mutex::new(None),
            scale: units.model_to_render_scale(),
            stopped: AtomicBool::new(false),
        }
    }

    /// This server's registration handle.
    #[inline]
    pub fn server_id(&self) -> ServerId {
        self.id
    }

    /// The cached model-to-render scale factor.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The registry of object caches this server renders.
    #[inline]
    pub fn registry(&self) -> &RenderRegistry {
        &self.registry
    }

    /// Registers this server with the host and adds it to the active set.
    ///
    /// ## Errors
    /// * `ResourceError` - If the host rejects the registration.
    pub fn start(&self) -> Result<(), ResourceError> {
        let mut active = self.services.active_servers();
        self.services.add_server(self.id)?;
        active.push(self.id);
        self.services.set_active_servers(&active)?;
        log::info!("preview server {} registered and activated", self.id);
        Ok(())
    }

    /// Deactivates and deregisters the server, releasing all GPU resources.
    ///
    /// Idempotent; later calls are no-ops. Host deregistration failures are
    /// logged, not propagated, so teardown always completes.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(effects) = self.effects.lock().unwrap().take() {
            effects.dispose(self.device.as_ref());
        }
        self.registry.dispose(self.device.as_ref());

        let active: Vec<_> = self
            .services
            .active_servers()
            .into_iter()
            .filter(|id| *id != self.id)
            .collect();
        if let Err(err) = self.services.set_active_servers(&active) {
            log::warn!("failed to deactivate preview server {}: {err}", self.id);
        }
        if let Err(err) = self.services.remove_server(self.id) {
            log::warn!("failed to deregister preview server {}: {err}", self.id);
        }
        log::info!("preview server {} stopped", self.id);
    }

    /// Whether this server draws in the given kind of host view.
    pub fn can_render(&self, view: ViewKind) -> bool {
        matches!(
            view,
            ViewKind::FloorPlan
                | ViewKind::AreaPlan
                | ViewKind::Detail
                | ViewKind::Drafting
                | ViewKind::Elevation
                | ViewKind::Section
                | ViewKind::ThreeD
                | ViewKind::Walkthrough
        )
    }

    /// The bounding box of all cached geometry, or `None` while empty.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let bounds = self.registry.bounding_volume();
        bounds.is_valid().then_some(bounds)
    }

    /// Renders every visible object for one frame.
    ///
    /// No-op outside the host's transparent sub-pass. Effects matching the
    /// requested display style are created (or recreated after host
    /// invalidation) on first need.
    ///
    /// ## Errors
    /// * `ResourceError` - If effect creation fails; per-object render
    ///   failures are logged and skipped instead.
    pub fn render(
        &self,
        pass: &dyn RenderPassContext,
        style: DisplayStyle,
    ) -> Result<(), ResourceError> {
        if !pass.in_transparent_pass() {
            return Ok(());
        }
        let effects = self.ensure_effects(style)?;
        self.registry.render_all(
            self.device.as_ref(),
            pass,
            &WorldTransform::IDENTITY,
            &effects,
        );
        Ok(())
    }

    fn ensure_effects(&self, style: DisplayStyle) -> Result<EffectSet, ResourceError> {
        let mut slot = self.effects.lock().unwrap();
        if let Some(effects) = *slot {
            if effects.style() == style && effects.is_valid(self.device.as_ref()) {
                return Ok(effects);
            }
            effects.dispose(self.device.as_ref());
            *slot = None;
        }
        let effects = EffectSet::create(self.device.as_ref(), style)?;
        *slot = Some(effects);
        Ok(effects)
    }

    /// Applies one coalesced update to an object's cache.
    ///
    /// Flags are applied directly. When the update carries geometry, the
    /// replacement chains are built in a detached staging cache first and
    /// swapped in only on success, so a malformed package leaves the
    /// object's previous geometry rendered untouched.
    ///
    /// ## Errors
    /// * `GeometryError` - If the package is malformed; the cache keeps its
    ///   previous geometry.
    pub fn update_object(&self, id: ObjectId, update: &ObjectUpdate) -> Result<(), GeometryError> {
        let device = Arc::clone(&self.device);
        let scale = self.scale;
        self.registry.with_object(id, |cache| {
            cache.set_visible(update.visible);
            cache.set_selected(update.selected);
            let Some(package) = &update.geometry else {
                return Ok(());
            };

            let mut staged = ObjectRenderCache::new();
            if package.mesh_vertex_count() > 0 {
                staged.add_mesh(&package.mesh_vertices, &package.mesh_normals, scale)?;
            }
            if package.line_vertex_count() > 0 {
                staged.add_edges(&package.line_vertices, &package.line_indices, scale)?;
            }
            if package.point_vertex_count() > 0 {
                staged.add_points(&package.point_vertices, scale)?;
            }
            cache.replace_content(device.as_ref(), staged);
            Ok(())
        })
    }

    /// Removes an object's cache entirely; returns whether it existed.
    pub fn remove_object(&self, id: ObjectId) -> bool {
        self.registry.remove_object(id, self.device.as_ref())
    }
}

impl Drop for PreviewServer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for PreviewServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewServer")
            .field("id", &self.id)
            .field("scale", &self.scale)
            .field("objects", &self.registry.object_count())
            .field("stopped", &self.stopped.load(Ordering::SeqCst))
            .finish()
    }
}

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

//! Host application collaborators.
//!
//! These traits describe the services the host must supply for a preview
//! server to operate: the external server registry that routes render
//! callbacks to the active server, the idle dispatcher on whose context all
//! registry mutations run, the view-refresh hook, and the unit conversion
//! query.

use crate::gpu::error::ResourceError;
use uuid::Uuid;

/// A globally unique identifier for one registered preview server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServerId(Uuid);

impl ServerId {
    /// Creates a new, random (version 4) `ServerId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ServerId {
    /// Creates a new, random (version 4) `ServerId`.
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The host's registry of external render servers.
///
/// Exactly one Tessera server instance registers itself per view session;
/// the host dispatches `render`/`bounding_box` callbacks to every server in
/// the active set.
pub trait ViewServerRegistry: Send + Sync {
    /// Returns the ids of the currently active servers.
    fn active_servers(&self) -> Vec<ServerId>;

    /// Registers a server with the host service.
    fn add_server(&self, id: ServerId) -> Result<(), ResourceError>;

    /// Removes a previously registered server. Removing an unknown id is a no-op.
    fn remove_server(&self, id: ServerId) -> Result<(), ResourceError>;

    /// Replaces the active server set.
    fn set_active_servers(&self, ids: &[ServerId]) -> Result<(), ResourceError>;
}

/// Executes actions on the host's idle/background callback context.
///
/// All registry mutations are funneled through this dispatcher so they run
/// on a context where the host document is safe to touch.
pub trait IdleDispatcher: Send + Sync {
    /// Queues `action` to run on the next idle callback.
    fn run_on_idle(&self, action: Box<dyn FnOnce() + Send + 'static>);
}

/// Requests a repaint of the host's active view.
pub trait RedrawHost: Send + Sync {
    /// Asks the host to refresh the active view, triggering a render pass.
    fn refresh_active_view(&self);
}

/// Supplies the model-space to render-space linear scale factor.
///
/// The factor is queried once per server and cached for the lifetime of its
/// buffers; the host guarantees it does not change mid-session.
pub trait UnitConverter: Send + Sync {
    /// The linear scale from model units to render units.
    fn model_to_render_scale(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_ids_are_unique() {
        let a = ServerId::new();
        let b = ServerId::new();
        assert_ne!(a, b);
    }
}

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

//! Effect (material) resources for preview rendering.

use tessera_core::gpu::{
    Color, DisplayStyle, EffectDescriptor, RenderDevice, ResourceError, VertexLayout,
};
use tessera_core::EffectId;

/// Selection highlight: yellow at 30% transparency.
const SELECTED_COLOR: Color = Color::new(255, 255, 0);
const SELECTED_TRANSPARENCY: f64 = 0.3;

/// Unselected preview: neutral gray at 40% transparency.
const DEFAULT_COLOR: Color = Color::new(150, 150, 150);
const DEFAULT_TRANSPARENCY: f64 = 0.4;

/// The pair of effects one cache renders with: surfaces and edges.
///
/// Point geometry is drawn with the mesh effect.
#[derive(Debug, Clone, Copy)]
pub struct RenderEffects {
    /// Effect for triangle and point chains.
    pub mesh: EffectId,
    /// Effect for edge (line) chains.
    pub edge: EffectId,
}

impl RenderEffects {
    fn create(
        device: &dyn RenderDevice,
        mesh_layout: VertexLayout,
        color: Color,
        transparency: f64,
    ) -> Result<Self, ResourceError> {
        let mesh = device.create_effect(&EffectDescriptor {
            layout: mesh_layout,
            color,
            transparency,
        })?;
        let edge = match device.create_effect(&EffectDescriptor {
            layout: VertexLayout::Position,
            color,
            transparency,
        }) {
            Ok(id) => id,
            Err(err) => {
                if let Err(destroy_err) = device.destroy_effect(mesh) {
                    log::warn!("failed to destroy orphaned effect: {destroy_err}");
                }
                return Err(err);
            }
        };
        Ok(Self { mesh, edge })
    }

    fn is_valid(&self, device: &dyn RenderDevice) -> bool {
        device.effect_valid(self.mesh) && device.effect_valid(self.edge)
    }

    fn dispose(&self, device: &dyn RenderDevice) {
        if let Err(err) = device.destroy_effect(self.mesh) {
            log::warn!("failed to destroy mesh effect: {err}");
        }
        if let Err(err) = device.destroy_effect(self.edge) {
            log::warn!("failed to destroy edge effect: {err}");
        }
    }
}

/// The full set of effects for one display style: selected and unselected
/// variants of the mesh/edge pair.
///
/// Effects depend on the display style (shaded styles consume normals, so
/// their mesh effect takes the position+normal layout) and are rebuilt
/// whenever the style changes or the host invalidates them.
#[derive(Debug, Clone, Copy)]
pub struct EffectSet {
    style: DisplayStyle,
    /// Effects for selected objects.
    pub selected: RenderEffects,
    /// Effects for unselected objects.
    pub unselected: RenderEffects,
}

impl EffectSet {
    /// Creates the four effect resources for the given display style.
    ///
    /// ## Errors
    /// * `ResourceError` - If the host fails to create an effect; already
    ///   created effects are destroyed before returning.
    pub fn create(device: &dyn RenderDevice, style: DisplayStyle) -> Result<Self, ResourceError> {
        let mesh_layout = match style {
            DisplayStyle::Shading | DisplayStyle::ShadingWithEdges => VertexLayout::PositionNormal,
            DisplayStyle::Undefined | DisplayStyle::Wireframe => VertexLayout::Position,
        };
        let selected = RenderEffects::create(
            device,
            mesh_layout,
            SELECTED_COLOR,
            SELECTED_TRANSPARENCY,
        )?;
        let unselected = match RenderEffects::create(
            device,
            mesh_layout,
            DEFAULT_COLOR,
            DEFAULT_TRANSPARENCY,
        ) {
            Ok(effects) => effects,
            Err(err) => {
                selected.dispose(device);
                return Err(err);
            }
        };
        Ok(Self {
            style,
            selected,
            unselected,
        })
    }

    /// The display style this set was created for.
    #[inline]
    pub fn style(&self) -> DisplayStyle {
        self.style
    }

    /// Whether every effect in the set is still usable.
    pub fn is_valid(&self, device: &dyn RenderDevice) -> bool {
        self.selected.is_valid(device) && self.unselected.is_valid(device)
    }

    /// Destroys every effect in the set.
    pub fn dispose(&self, device: &dyn RenderDevice) {
        self.selected.dispose(device);
        self.unselected.dispose(device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDevice;

    #[test]
    fn test_effect_set_creates_four_effects() {
        let device = MockDevice::new();
        let set = EffectSet::create(&device, DisplayStyle::Shading).expect("create must succeed");
        assert_eq!(device.state.lock().unwrap().effect_descriptors.len(), 4);
        assert!(set.is_valid(&device));
        assert_eq!(set.style(), DisplayStyle::Shading);

        set.dispose(&device);
        assert!(!set.is_valid(&device));
    }

    #[test]
    fn test_shaded_styles_take_normal_layout() {
        let device = MockDevice::new();
        let _ = EffectSet::create(&device, DisplayStyle::ShadingWithEdges).unwrap();
        let _ = EffectSet::create(&device, DisplayStyle::Wireframe).unwrap();
        let state = device.state.lock().unwrap();
        // first set: shaded mesh effects use position+normal, edges position
        assert_eq!(
            state.effect_descriptors[0].layout,
            VertexLayout::PositionNormal
        );
        assert_eq!(state.effect_descriptors[1].layout, VertexLayout::Position);
        // second set: wireframe mesh effects are position-only
        assert_eq!(state.effect_descriptors[4].layout, VertexLayout::Position);
    }

    #[test]
    fn test_effect_colors_and_transparency() {
        let device = MockDevice::new();
        let _ = EffectSet::create(&device, DisplayStyle::Shading).unwrap();
        let state = device.state.lock().unwrap();
        let selected_mesh = &state.effect_descriptors[0];
        assert_eq!(selected_mesh.color, Color::new(255, 255, 0));
        assert_eq!(selected_mesh.transparency, 0.3);
        let unselected_mesh = &state.effect_descriptors[2];
        assert_eq!(unselected_mesh.color, Color::new(150, 150, 150));
        assert_eq!(unselected_mesh.transparency, 0.4);
    }
}

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

//! Render-pass state and view classification supplied by the host.

/// The kind of host view a render pass targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// A plan view of one level.
    FloorPlan,
    /// An area plan view.
    AreaPlan,
    /// A detail callout view.
    Detail,
    /// A drafting view with no model geometry of its own.
    Drafting,
    /// An exterior or interior elevation.
    Elevation,
    /// A building section.
    Section,
    /// A perspective or orthographic 3D view.
    ThreeD,
    /// A walkthrough frame view.
    Walkthrough,
    /// A tabular schedule view.
    Schedule,
    /// A legend view.
    Legend,
    /// Any other view kind the host may introduce.
    Other,
}

/// The display style the host is currently rendering with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStyle {
    /// No style has been established yet.
    Undefined,
    /// Edges only.
    Wireframe,
    /// Shaded surfaces.
    Shading,
    /// Shaded surfaces with edge overlay.
    ShadingWithEdges,
}

/// Per-frame render-pass state exposed by the host pipeline.
///
/// Tessera draws only during the transparent sub-pass of a frame, and checks
/// the interruption flag cooperatively between objects so the host can cancel
/// a render pass mid-frame.
pub trait RenderPassContext {
    /// Returns `true` while the frame is inside the transparent sub-pass.
    fn in_transparent_pass(&self) -> bool;

    /// Returns `true` once the host has interrupted the current pass.
    fn is_interrupted(&self) -> bool;
}

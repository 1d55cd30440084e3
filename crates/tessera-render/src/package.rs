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

//! Tessellated geometry payloads handed over by the host.

/// One object's worth of tessellated geometry, as produced by the host's
/// geometry source.
///
/// All coordinate streams are flat `x, y, z` triples in double-precision
/// model space. Line segments address the `line_vertices` span through
/// `line_indices`, two indices per segment.
#[derive(Debug, Clone, Default)]
pub struct GeometryPackage {
    /// Triangle-mesh vertex positions, three vertices per triangle.
    pub mesh_vertices: Vec<f64>,
    /// Per-vertex mesh normals, parallel to `mesh_vertices`.
    pub mesh_normals: Vec<f64>,
    /// Line-strip vertex positions.
    pub line_vertices: Vec<f64>,
    /// Segment index pairs into `line_vertices`.
    pub line_indices: Vec<i32>,
    /// Standalone point positions.
    pub point_vertices: Vec<f64>,
}

impl GeometryPackage {
    /// Number of mesh vertices in the package.
    #[inline]
    pub fn mesh_vertex_count(&self) -> usize {
        self.mesh_vertices.len() / 3
    }

    /// Number of line-strip vertices in the package.
    #[inline]
    pub fn line_vertex_count(&self) -> usize {
        self.line_vertices.len() / 3
    }

    /// Number of standalone points in the package.
    #[inline]
    pub fn point_vertex_count(&self) -> usize {
        self.point_vertices.len() / 3
    }

    /// Whether the package carries no geometry at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mesh_vertices.is_empty()
            && self.line_vertices.is_empty()
            && self.point_vertices.is_empty()
    }
}

/// One coalesced update for a single object.
///
/// A flags-only update (no geometry) adjusts visibility and selection while
/// the object's cached geometry stays as-is; an update carrying a package
/// rebuilds the geometry wholesale.
#[derive(Debug, Clone, Default)]
pub struct ObjectUpdate {
    /// Whether the object should be drawn.
    pub visible: bool,
    /// Whether the object is highlighted as selected.
    pub selected: bool,
    /// Replacement geometry, if the object was re-tessellated.
    pub geometry: Option<GeometryPackage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_counts() {
        let package = GeometryPackage {
            mesh_vertices: vec![0.0; 18],
            mesh_normals: vec![0.0; 18],
            line_vertices: vec![0.0; 6],
            line_indices: vec![0, 1],
            point_vertices: vec![0.0; 3],
        };
        assert_eq!(package.mesh_vertex_count(), 6);
        assert_eq!(package.line_vertex_count(), 2);
        assert_eq!(package.point_vertex_count(), 1);
        assert!(!package.is_empty());
        assert!(GeometryPackage::default().is_empty());
    }
}

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

//! Error types for geometry ingestion.

use std::fmt;

/// An error raised while validating or appending tessellated geometry.
///
/// Every append operation validates its full input before touching any
/// staging state, so a returned error guarantees the target buffer is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A coordinate stream's length is not a multiple of three.
    IncompleteVertex {
        /// Number of scalar components supplied.
        component_count: usize,
    },
    /// A triangle stream's vertex count is not a multiple of three.
    NotTriangleList {
        /// Number of vertices supplied.
        vertex_count: usize,
    },
    /// The normal stream does not pair one normal with every position.
    NormalCountMismatch {
        /// Number of position components supplied.
        position_components: usize,
        /// Number of normal components supplied.
        normal_components: usize,
    },
    /// A segment index stream's length is odd.
    OddSegmentIndexCount {
        /// Number of indices supplied.
        index_count: usize,
    },
    /// A segment index references a vertex outside the supplied span.
    IndexOutOfRange {
        /// The offending index.
        index: i32,
        /// Number of vertices in the addressed span.
        vertex_count: usize,
    },
    /// The geometry does not fit into the remaining buffer capacity.
    CapacityExceeded {
        /// Components required by the append.
        required: usize,
        /// Components still free in the buffer.
        remaining: usize,
    },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::IncompleteVertex { component_count } => {
                write!(
                    f,
                    "Coordinate stream of {component_count} components is not a whole number of vertices."
                )
            }
            GeometryError::NotTriangleList { vertex_count } => {
                write!(
                    f,
                    "Triangle stream of {vertex_count} vertices is not a whole number of triangles."
                )
            }
            GeometryError::NormalCountMismatch {
                position_components,
                normal_components,
            } => {
                write!(
                    f,
                    "Normal stream ({normal_components} components) does not match position stream ({position_components} components)."
                )
            }
            GeometryError::OddSegmentIndexCount { index_count } => {
                write!(
                    f,
                    "Segment index stream of {index_count} indices is not a whole number of segments."
                )
            }
            GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            } => {
                write!(
                    f,
                    "Segment index {index} is outside the addressed span of {vertex_count} vertices."
                )
            }
            GeometryError::CapacityExceeded {
                required,
                remaining,
            } => {
                write!(
                    f,
                    "Append of {required} components exceeds the remaining buffer capacity of {remaining}."
                )
            }
        }
    }
}

impl std::error::Error for GeometryError {}

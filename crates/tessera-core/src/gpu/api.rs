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

//! Opaque resource handles, descriptors and draw-call data.

use std::borrow::Cow;

/// An opaque handle to a host-side vertex buffer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferId(pub usize);

/// An opaque handle to a host-side index buffer resource.
///
/// The index domain is 16-bit: the host buffer format addresses at most
/// `65536` vertices per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferId(pub usize);

/// An opaque handle to a host-side vertex format resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexFormatId(pub usize);

/// An opaque handle to a host-side effect (material) resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub usize);

/// The layout of a single vertex in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLayout {
    /// Three `f32` position components.
    Position,
    /// Three `f32` position components followed by three `f32` normal components.
    PositionNormal,
}

impl VertexLayout {
    /// Number of `f32` components occupied by one vertex of this layout.
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            VertexLayout::Position => 3,
            VertexLayout::PositionNormal => 6,
        }
    }
}

/// The primitive topology of an index stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Three indices per primitive.
    TriangleList,
    /// Two indices per primitive.
    LineList,
    /// One index per primitive.
    PointList,
}

impl PrimitiveKind {
    /// Number of indices consumed by one primitive of this kind.
    #[inline]
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            PrimitiveKind::TriangleList => 3,
            PrimitiveKind::LineList => 2,
            PrimitiveKind::PointList => 1,
        }
    }

    /// The vertex layout used for buffers holding this kind of primitive.
    ///
    /// Triangles carry normals for shading; lines and points are bare
    /// positions.
    #[inline]
    pub const fn vertex_layout(self) -> VertexLayout {
        match self {
            PrimitiveKind::TriangleList => VertexLayout::PositionNormal,
            PrimitiveKind::LineList | PrimitiveKind::PointList => VertexLayout::Position,
        }
    }
}

/// An 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a new color from channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A world transform handed to the host before a draw call.
///
/// Stored as a column-major 4x4 `f32` matrix; Tessera itself only ever uses
/// [`WorldTransform::IDENTITY`] and treats the contents as opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct WorldTransform(pub [f32; 16]);

impl WorldTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
    ]);
}

/// A descriptor used to create a [`VertexBufferId`].
#[derive(Debug, Clone)]
pub struct VertexBufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The capacity of the buffer in `f32` components.
    pub capacity: usize,
}

/// A descriptor used to create an [`IndexBufferId`].
#[derive(Debug, Clone)]
pub struct IndexBufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The capacity of the buffer in 16-bit indices.
    pub capacity: usize,
}

/// A descriptor used to create an [`EffectId`].
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// The vertex layout the effect consumes.
    pub layout: VertexLayout,
    /// Flat color applied by the effect.
    pub color: Color,
    /// Transparency in `[0, 1]`; `0.0` is fully opaque.
    pub transparency: f64,
}

/// The parameters of one flush/draw call.
///
/// Mirrors the host pipeline's buffer-flush entry point: buffer handles,
/// live counts, format, effect, and the primitive range `[0, primitive_count)`.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest {
    /// The vertex buffer to source vertices from.
    pub vertex_buffer: VertexBufferId,
    /// Number of live vertices in the vertex buffer.
    pub vertex_count: usize,
    /// The index buffer to source indices from.
    pub index_buffer: IndexBufferId,
    /// Number of live indices in the index buffer.
    pub index_count: usize,
    /// The format of the vertices.
    pub vertex_format: VertexFormatId,
    /// The effect to render with.
    pub effect: EffectId,
    /// The primitive topology of the index stream.
    pub primitive: PrimitiveKind,
    /// Number of primitives to draw, starting at primitive zero.
    pub primitive_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_and_primitive_sizes() {
        assert_eq!(VertexLayout::Position.stride(), 3);
        assert_eq!(VertexLayout::PositionNormal.stride(), 6);
        assert_eq!(PrimitiveKind::TriangleList.indices_per_primitive(), 3);
        assert_eq!(PrimitiveKind::LineList.indices_per_primitive(), 2);
        assert_eq!(PrimitiveKind::PointList.indices_per_primitive(), 1);
        assert_eq!(
            PrimitiveKind::TriangleList.vertex_layout(),
            VertexLayout::PositionNormal
        );
        assert_eq!(
            PrimitiveKind::LineList.vertex_layout(),
            VertexLayout::Position
        );
    }

    #[test]
    fn test_identity_transform_diagonal() {
        let m = WorldTransform::IDENTITY.0;
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(m[col * 4 + row], expected);
            }
        }
    }
}

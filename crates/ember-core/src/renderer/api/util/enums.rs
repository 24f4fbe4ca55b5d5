// Copyright 2025 eraflo
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

//! Enumerations describing geometry, texture and blend configuration.

/// Primitive topology used when drawing a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonType {
    /// Independent triangles, three vertices each.
    Triangle,
    /// A strip where every vertex after the second forms a triangle.
    TriangleStrip,
    /// Independent line segments, two vertices each.
    Line,
}

/// Width of the indices in a mesh's index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    #[default]
    U16,
    /// 32-bit unsigned indices.
    U32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub const fn size(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Vertex layouts known to the forward renderer.
///
/// Material groups are keyed by vertex format so the same logical material
/// can resolve to different shaders for static, skinned or sprite geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// Position, normal and one texture coordinate set.
    StaticMesh,
    /// Static layout plus joint indices and weights.
    AnimatedMesh,
    /// Position, texture coordinate and vertex colour.
    Sprite,
}

impl VertexFormat {
    /// Size of one vertex in bytes.
    pub const fn stride(self) -> usize {
        match self {
            VertexFormat::StaticMesh => 32,
            VertexFormat::AnimatedMesh => 64,
            VertexFormat::Sprite => 36,
        }
    }
}

/// Pixel layout of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA.
    Rgba8,
    /// 8-bit RGB.
    Rgb8,
    /// 16-bit depth, used for shadow maps.
    Depth16,
    /// 32-bit floating point depth.
    Depth32Float,
}

impl TextureFormat {
    /// Returns `true` for depth formats.
    pub const fn is_depth(self) -> bool {
        matches!(self, TextureFormat::Depth16 | TextureFormat::Depth32Float)
    }
}

/// Sampling filter applied when a texture is magnified or minified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear filtering.
    #[default]
    Linear,
}

/// Addressing mode for texture coordinates outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    /// Clamp to the edge texel.
    #[default]
    Clamp,
    /// Tile the texture.
    Repeat,
}

/// Blend factor used by materials with transparency enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source colour.
    SourceColour,
    /// `1 - source colour`
    OneMinusSourceColour,
    /// Source alpha.
    SourceAlpha,
    /// `1 - source alpha`
    OneMinusSourceAlpha,
    /// Destination alpha.
    DestAlpha,
    /// `1 - destination alpha`
    OneMinusDestAlpha,
}

/// Which faces are discarded when face culling is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullFace {
    /// Discard front faces.
    Front,
    /// Discard back faces.
    #[default]
    Back,
}

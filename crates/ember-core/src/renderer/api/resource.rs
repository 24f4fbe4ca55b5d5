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

//! High-level render resources.
//!
//! These objects describe a resource independently of any backend. The backend
//! representation is created by a `Load*` command and is looked up by the
//! resource's [`ResourceId`]; the resource never stores a backend pointer.

use super::util::{IndexFormat, PolygonType, TextureFilter, TextureFormat, TextureWrap, VertexFormat};
use crate::math::{Sphere, UVec2};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique identity of a render resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    /// Allocates a fresh identifier.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// A shader program. Compilation happens in the backend on load.
#[derive(Debug)]
pub struct RenderShader {
    id: ResourceId,
    name: String,
}

impl RenderShader {
    /// Creates a new shader resource with a debug name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(),
            name: name.into(),
        }
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The debug name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Describes the storage and sampling of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDescriptor {
    /// Width and height in texels.
    pub dimensions: UVec2,
    /// Pixel format.
    pub format: TextureFormat,
    /// Sampling filter.
    pub filter: TextureFilter,
    /// Addressing mode on both axes.
    pub wrap: TextureWrap,
    /// Whether the backend should generate mipmaps.
    pub mipmapped: bool,
}

impl TextureDescriptor {
    /// A filtered, non-mipmapped colour texture.
    pub fn colour(dimensions: UVec2) -> Self {
        Self {
            dimensions,
            format: TextureFormat::Rgba8,
            filter: TextureFilter::Linear,
            wrap: TextureWrap::Clamp,
            mipmapped: false,
        }
    }

    /// A depth texture suitable for a shadow map.
    pub fn depth(dimensions: UVec2) -> Self {
        Self {
            dimensions,
            format: TextureFormat::Depth16,
            filter: TextureFilter::Nearest,
            wrap: TextureWrap::Clamp,
            mipmapped: false,
        }
    }

    /// Number of bytes a full level-0 image occupies.
    pub fn byte_size(&self) -> usize {
        let texel = match self.format {
            TextureFormat::Rgba8 | TextureFormat::Depth32Float => 4,
            TextureFormat::Rgb8 => 3,
            TextureFormat::Depth16 => 2,
        };
        self.dimensions.x as usize * self.dimensions.y as usize * texel
    }
}

/// A texture resource.
#[derive(Debug)]
pub struct RenderTexture {
    id: ResourceId,
    descriptor: TextureDescriptor,
}

impl RenderTexture {
    /// Creates a texture resource with the given descriptor.
    pub fn new(descriptor: TextureDescriptor) -> Self {
        Self {
            id: ResourceId::new(),
            descriptor,
        }
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The storage description.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }
}

/// Topology and buffer sizes of a mesh, shared by static and dynamic meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshLayout {
    /// Primitive topology.
    pub polygon_type: PolygonType,
    /// Vertex layout.
    pub vertex_format: VertexFormat,
    /// Index width. Ignored when `index_count` is zero.
    pub index_format: IndexFormat,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of indices; zero means the mesh is drawn without an index buffer.
    pub index_count: u32,
}

impl MeshLayout {
    /// Returns `true` if the mesh is drawn with an index buffer.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.index_count > 0
    }
}

/// A static mesh whose buffers live on the GPU after loading.
#[derive(Debug)]
pub struct RenderMesh {
    id: ResourceId,
    layout: MeshLayout,
    bounding_sphere: Sphere,
}

impl RenderMesh {
    /// Creates a mesh resource.
    pub fn new(layout: MeshLayout, bounding_sphere: Sphere) -> Self {
        Self {
            id: ResourceId::new(),
            layout,
            bounding_sphere,
        }
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Buffer layout.
    pub fn layout(&self) -> &MeshLayout {
        &self.layout
    }

    /// Local-space bounding sphere.
    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }
}

/// A mesh rebuilt every frame, such as a sprite batch.
///
/// The vertex and index bytes travel with the render command stream and are
/// uploaded to a transient backend buffer that only lives until `End`.
#[derive(Debug)]
pub struct RenderDynamicMesh {
    id: ResourceId,
    layout: MeshLayout,
    bounding_sphere: Sphere,
    vertex_data: Box<[u8]>,
    index_data: Box<[u8]>,
}

impl RenderDynamicMesh {
    /// Creates a dynamic mesh that owns its buffer contents.
    pub fn new(
        layout: MeshLayout,
        bounding_sphere: Sphere,
        vertex_data: Box<[u8]>,
        index_data: Box<[u8]>,
    ) -> Self {
        Self {
            id: ResourceId::new(),
            layout,
            bounding_sphere,
            vertex_data,
            index_data,
        }
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Buffer layout.
    pub fn layout(&self) -> &MeshLayout {
        &self.layout
    }

    /// Local-space bounding sphere.
    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }

    /// Raw vertex bytes.
    pub fn vertex_data(&self) -> &[u8] {
        &self.vertex_data
    }

    /// Raw index bytes, empty for non-indexed meshes.
    pub fn index_data(&self) -> &[u8] {
        &self.index_data
    }
}

/// A set of textures that passes can render into instead of the default
/// framebuffer. Used for shadow maps and offscreen main targets.
#[derive(Debug)]
pub struct RenderTargetGroup {
    id: ResourceId,
    colour_target: Option<Arc<RenderTexture>>,
    depth_target: Option<Arc<RenderTexture>>,
}

impl RenderTargetGroup {
    /// Creates a target group with a colour and/or depth attachment.
    pub fn new(
        colour_target: Option<Arc<RenderTexture>>,
        depth_target: Option<Arc<RenderTexture>>,
    ) -> Self {
        Self {
            id: ResourceId::new(),
            colour_target,
            depth_target,
        }
    }

    /// A depth-only target group, the shape used by shadow maps.
    pub fn depth_only(depth_target: Arc<RenderTexture>) -> Self {
        Self::new(None, Some(depth_target))
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The colour attachment, if any.
    pub fn colour_target(&self) -> Option<&Arc<RenderTexture>> {
        self.colour_target.as_ref()
    }

    /// The depth attachment, if any.
    pub fn depth_target(&self) -> Option<&Arc<RenderTexture>> {
        self.depth_target.as_ref()
    }

    /// Resolution of the group, taken from whichever attachment exists.
    pub fn resolution(&self) -> UVec2 {
        self.colour_target
            .as_ref()
            .or(self.depth_target.as_ref())
            .map(|t| t.descriptor().dimensions)
            .unwrap_or(UVec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ids_are_unique() {
        let a = RenderShader::new("a");
        let b = RenderShader::new("b");
        assert_ne!(a.id(), b.id());
        assert!(b.id().value() > a.id().value());
    }

    #[test]
    fn test_target_group_resolution() {
        let depth = Arc::new(RenderTexture::new(TextureDescriptor::depth(UVec2::new(512, 256))));
        let group = RenderTargetGroup::depth_only(depth);
        assert_eq!(group.resolution(), UVec2::new(512, 256));
        assert!(group.colour_target().is_none());
        assert!(RenderTargetGroup::new(None, None).resolution() == UVec2::ZERO);
    }

    #[test]
    fn test_texture_byte_size() {
        let desc = TextureDescriptor::colour(UVec2::new(4, 2));
        assert_eq!(desc.byte_size(), 32);
        assert_eq!(TextureDescriptor::depth(UVec2::new(4, 2)).byte_size(), 16);
    }
}

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

//! Opaque handles to backend-owned GPU objects.

/// Handle to a compiled shader program in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Handle to a texture in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a vertex/index buffer pair in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Handle to a framebuffer object in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetGroupHandle(pub u64);

/// The backend representation attached to a loaded resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuResource {
    /// A loaded [`RenderShader`](super::RenderShader).
    Shader(ShaderHandle),
    /// A loaded [`RenderTexture`](super::RenderTexture).
    Texture(TextureHandle),
    /// A loaded [`RenderMesh`](super::RenderMesh).
    Mesh(MeshHandle),
    /// A loaded [`RenderTargetGroup`](super::RenderTargetGroup).
    TargetGroup(TargetGroupHandle),
}

impl GpuResource {
    /// Human readable kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            GpuResource::Shader(_) => "shader",
            GpuResource::Texture(_) => "texture",
            GpuResource::Mesh(_) => "mesh",
            GpuResource::TargetGroup(_) => "target group",
        }
    }
}

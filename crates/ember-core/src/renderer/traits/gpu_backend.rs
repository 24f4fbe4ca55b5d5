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

//! The `GpuBackend` capability trait.

use crate::math::{LinearRgba, UVec2};
use crate::renderer::api::{
    IndexFormat, MaterialRenderState, MeshHandle, MeshLayout, PolygonType, ShaderHandle,
    TargetGroupHandle, TextureDescriptor, TextureHandle, UniformValue,
};
use crate::renderer::error::BackendError;

/// What a backend does when a uniform does not exist in the bound shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformFailurePolicy {
    /// Ignore the write.
    Silent,
    /// Return [`BackendError::UniformNotFound`].
    Report,
}

/// The low-level GPU operations a render command processor drives.
///
/// Implementations are single-threaded: the processor that owns a backend
/// is the only caller, on the render thread. The backend owns every GPU
/// object it creates until the matching `destroy_*` call.
pub trait GpuBackend: Send {
    /// Compiles and links a shader program.
    fn create_shader(
        &mut self,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderHandle, BackendError>;

    /// Releases a shader program.
    fn destroy_shader(&mut self, handle: ShaderHandle);

    /// Creates a texture, uploading `data` if present.
    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<TextureHandle, BackendError>;

    /// Releases a texture.
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Creates vertex and index buffers for a mesh.
    fn create_mesh(
        &mut self,
        layout: &MeshLayout,
        vertex_data: &[u8],
        index_data: &[u8],
    ) -> Result<MeshHandle, BackendError>;

    /// Releases a mesh's buffers.
    fn destroy_mesh(&mut self, handle: MeshHandle);

    /// Creates a framebuffer from loaded textures.
    fn create_target_group(
        &mut self,
        colour: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    ) -> Result<TargetGroupHandle, BackendError>;

    /// Releases a framebuffer. The attached textures are not affected.
    fn destroy_target_group(&mut self, handle: TargetGroupHandle);

    /// Binds the target (or the default framebuffer), sets the viewport,
    /// clears colour and depth, and restores the frame's default blend
    /// equation and depth function.
    fn begin(&mut self, target: Option<TargetGroupHandle>, viewport: UVec2, clear_colour: LinearRgba);

    /// Finishes rendering into the current target.
    fn end(&mut self);

    /// Makes `handle` the active shader program.
    fn bind_shader(&mut self, handle: ShaderHandle);

    /// Binds a texture to a sampler slot.
    fn bind_texture(&mut self, slot: u32, handle: TextureHandle);

    /// Binds a mesh's buffers against the active shader's attribute layout.
    fn bind_mesh(&mut self, mesh: MeshHandle, shader: ShaderHandle);

    /// Applies a material's fixed-function state.
    fn set_render_state(&mut self, state: &MaterialRenderState);

    /// Writes a uniform of the active shader.
    fn set_uniform(
        &mut self,
        name: &str,
        value: UniformValue,
        policy: UniformFailurePolicy,
    ) -> Result<(), BackendError>;

    /// Draws `vertex_count` vertices of the bound mesh.
    fn draw(&mut self, polygon_type: PolygonType, vertex_count: u32);

    /// Draws `index_count` indices of the bound mesh.
    fn draw_indexed(&mut self, polygon_type: PolygonType, index_format: IndexFormat, index_count: u32);
}

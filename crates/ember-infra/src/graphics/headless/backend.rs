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

//! The headless backend implementation.

use ahash::{AHashMap, AHashSet};
use ember_core::math::{LinearRgba, UVec2};
use ember_core::renderer::api::{
    IndexFormat, MaterialRenderState, MeshHandle, MeshLayout, PolygonType, ShaderHandle,
    TargetGroupHandle, TextureDescriptor, TextureHandle, UniformValue,
};
use ember_core::renderer::traits::{GpuBackend, UniformFailurePolicy};
use ember_core::renderer::BackendError;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `begin` on a target (or the default framebuffer).
    Begin {
        /// Target handle.
        target: Option<TargetGroupHandle>,
        /// Viewport size.
        viewport: UVec2,
        /// Clear colour.
        clear_colour: LinearRgba,
    },
    /// `end`
    End,
    /// `bind_shader`
    BindShader(ShaderHandle),
    /// `bind_texture`
    BindTexture {
        /// Sampler slot.
        slot: u32,
        /// Texture handle.
        texture: TextureHandle,
    },
    /// `bind_mesh`
    BindMesh {
        /// Mesh handle.
        mesh: MeshHandle,
        /// Shader the attributes were bound against.
        shader: ShaderHandle,
    },
    /// `set_render_state`
    SetRenderState(MaterialRenderState),
    /// `set_uniform`, for uniforms the bound shader accepted.
    SetUniform {
        /// Uniform name.
        name: String,
        /// Value written.
        value: UniformValue,
    },
    /// `draw`
    Draw {
        /// Topology.
        polygon_type: PolygonType,
        /// Vertices drawn.
        vertex_count: u32,
    },
    /// `draw_indexed`
    DrawIndexed {
        /// Topology.
        polygon_type: PolygonType,
        /// Index width.
        index_format: IndexFormat,
        /// Indices drawn.
        index_count: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveKind {
    Shader,
    Texture,
    Mesh,
    TargetGroup,
}

/// Records every call it receives and tracks which objects are alive.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    live: AHashMap<u64, LiveKind>,
    known_uniforms: Option<AHashSet<String>>,
    calls: Vec<BackendCall>,
    created: usize,
    destroyed: usize,
}

impl HeadlessBackend {
    /// Creates a backend that accepts every uniform name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose shaders only declare `names`; writes to any
    /// other uniform follow the caller's failure policy.
    pub fn with_known_uniforms<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known_uniforms: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Every recorded call in order.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Forgets the recorded calls. Live objects are kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Number of shader binds.
    pub fn shader_bind_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::BindShader(_)))
    }

    /// Number of texture binds.
    pub fn texture_bind_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::BindTexture { .. }))
    }

    /// Number of mesh binds.
    pub fn mesh_bind_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::BindMesh { .. }))
    }

    /// Number of draw calls, indexed or not.
    pub fn draw_call_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Draw { .. } | BackendCall::DrawIndexed { .. }))
    }

    /// Number of objects created and not yet destroyed.
    pub fn live_object_count(&self) -> usize {
        self.live.len()
    }

    /// Total objects created.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Total objects destroyed.
    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    fn allocate(&mut self, kind: LiveKind) -> u64 {
        self.next_handle += 1;
        self.live.insert(self.next_handle, kind);
        self.created += 1;
        self.next_handle
    }

    fn release(&mut self, kind: LiveKind, handle: u64) {
        match self.live.remove(&handle) {
            Some(live) if live == kind => self.destroyed += 1,
            Some(live) => {
                log::warn!("HeadlessBackend: handle {handle} is a {live:?}, not a {kind:?}");
                self.live.insert(handle, live);
            }
            None => log::warn!("HeadlessBackend: {kind:?} {handle} destroyed twice or never created"),
        }
    }

    fn check(&self, kind: LiveKind, handle: u64) -> Result<(), BackendError> {
        match self.live.get(&handle) {
            Some(live) if *live == kind => Ok(()),
            _ => Err(BackendError::InvalidHandle {
                kind: match kind {
                    LiveKind::Shader => "shader",
                    LiveKind::Texture => "texture",
                    LiveKind::Mesh => "mesh",
                    LiveKind::TargetGroup => "target group",
                },
                handle,
            }),
        }
    }
}

impl GpuBackend for HeadlessBackend {
    fn create_shader(
        &mut self,
        name: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderHandle, BackendError> {
        if vertex_source.trim().is_empty() || fragment_source.trim().is_empty() {
            return Err(BackendError::ResourceCreation {
                kind: "shader",
                details: format!("'{name}' has an empty stage"),
            });
        }
        Ok(ShaderHandle(self.allocate(LiveKind::Shader)))
    }

    fn destroy_shader(&mut self, handle: ShaderHandle) {
        self.release(LiveKind::Shader, handle.0);
    }

    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Result<TextureHandle, BackendError> {
        if let Some(data) = data {
            if data.len() != descriptor.byte_size() {
                return Err(BackendError::ResourceCreation {
                    kind: "texture",
                    details: format!(
                        "expected {} bytes of image data, got {}",
                        descriptor.byte_size(),
                        data.len()
                    ),
                });
            }
        }
        Ok(TextureHandle(self.allocate(LiveKind::Texture)))
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.release(LiveKind::Texture, handle.0);
    }

    fn create_mesh(
        &mut self,
        layout: &MeshLayout,
        vertex_data: &[u8],
        index_data: &[u8],
    ) -> Result<MeshHandle, BackendError> {
        let expected_vertices = layout.vertex_count as usize * layout.vertex_format.stride();
        let expected_indices = layout.index_count as usize * layout.index_format.size();
        if vertex_data.len() != expected_vertices || index_data.len() != expected_indices {
            return Err(BackendError::ResourceCreation {
                kind: "mesh",
                details: format!(
                    "expected {expected_vertices} vertex and {expected_indices} index bytes, got {} and {}",
                    vertex_data.len(),
                    index_data.len()
                ),
            });
        }
        Ok(MeshHandle(self.allocate(LiveKind::Mesh)))
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) {
        self.release(LiveKind::Mesh, handle.0);
    }

    fn create_target_group(
        &mut self,
        colour: Option<TextureHandle>,
        depth: Option<TextureHandle>,
    ) -> Result<TargetGroupHandle, BackendError> {
        for texture in colour.iter().chain(depth.iter()) {
            self.check(LiveKind::Texture, texture.0)?;
        }
        Ok(TargetGroupHandle(self.allocate(LiveKind::TargetGroup)))
    }

    fn destroy_target_group(&mut self, handle: TargetGroupHandle) {
        self.release(LiveKind::TargetGroup, handle.0);
    }

    fn begin(&mut self, target: Option<TargetGroupHandle>, viewport: UVec2, clear_colour: LinearRgba) {
        self.calls.push(BackendCall::Begin {
            target,
            viewport,
            clear_colour,
        });
    }

    fn end(&mut self) {
        self.calls.push(BackendCall::End);
    }

    fn bind_shader(&mut self, handle: ShaderHandle) {
        self.calls.push(BackendCall::BindShader(handle));
    }

    fn bind_texture(&mut self, slot: u32, handle: TextureHandle) {
        self.calls.push(BackendCall::BindTexture {
            slot,
            texture: handle,
        });
    }

    fn bind_mesh(&mut self, mesh: MeshHandle, shader: ShaderHandle) {
        self.calls.push(BackendCall::BindMesh { mesh, shader });
    }

    fn set_render_state(&mut self, state: &MaterialRenderState) {
        self.calls.push(BackendCall::SetRenderState(*state));
    }

    fn set_uniform(
        &mut self,
        name: &str,
        value: UniformValue,
        policy: UniformFailurePolicy,
    ) -> Result<(), BackendError> {
        let known = self
            .known_uniforms
            .as_ref()
            .map_or(true, |names| names.contains(name));
        if !known {
            return match policy {
                UniformFailurePolicy::Silent => Ok(()),
                UniformFailurePolicy::Report => Err(BackendError::UniformNotFound {
                    name: name.to_owned(),
                }),
            };
        }
        self.calls.push(BackendCall::SetUniform {
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    fn draw(&mut self, polygon_type: PolygonType, vertex_count: u32) {
        self.calls.push(BackendCall::Draw {
            polygon_type,
            vertex_count,
        });
    }

    fn draw_indexed(&mut self, polygon_type: PolygonType, index_format: IndexFormat, index_count: u32) {
        self.calls.push(BackendCall::DrawIndexed {
            polygon_type,
            index_format,
            index_count,
        });
    }
}

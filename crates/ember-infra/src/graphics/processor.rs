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

//! The render command processor.
//!
//! A single-threaded state machine that walks a [`RenderCommandBuffer`] once,
//! in order, keeping a [`ContextState`] of what is bound so that redundant
//! shader, texture, material and mesh binds never reach the backend.

use super::{BoundMesh, BoundShader, CameraState, ContextState, ProcessError, ResourceRegistry};
use ember_core::math::{LinearRgba, Mat4, UVec2, Vec3};
use ember_core::renderer::api::{
    GpuResource, MeshHandle, RenderCommand, RenderCommandBuffer, RenderDynamicMesh, RenderMaterial,
    RenderMesh, RenderShader, RenderTargetGroup, RenderTexture, ResourceId, UniformValue,
};
use ember_core::renderer::traits::{GpuBackend, UniformFailurePolicy};
use ember_core::renderer::RenderLight;

/// Uniform names pushed by the processor.
pub mod uniforms {
    /// World-view-projection matrix, per draw.
    pub const WVP_MATRIX: &str = "u_wvpMat";
    /// Local to world matrix, per draw.
    pub const WORLD_MATRIX: &str = "u_worldMat";
    /// Inverse-transpose of the world matrix, per draw.
    pub const NORMAL_MATRIX: &str = "u_normalMat";
    /// Camera world position.
    pub const CAMERA_POSITION: &str = "u_cameraPos";
    /// Material emissive colour.
    pub const EMISSIVE: &str = "u_emissive";
    /// Material ambient colour.
    pub const AMBIENT: &str = "u_ambient";
    /// Material diffuse colour.
    pub const DIFFUSE: &str = "u_diffuse";
    /// Material specular colour.
    pub const SPECULAR: &str = "u_specular";
    /// Colour of the bound light.
    pub const LIGHT_COLOUR: &str = "u_lightCol";
    /// Direction of the bound directional light.
    pub const LIGHT_DIRECTION: &str = "u_lightDir";
    /// Position of the bound point light.
    pub const LIGHT_POSITION: &str = "u_lightPos";
    /// Attenuation terms of the bound point light.
    pub const LIGHT_ATTENUATION: &str = "u_attenuation";
    /// Range of the bound point light.
    pub const LIGHT_RANGE: &str = "u_lightRange";
    /// World to light clip space of the bound shadowed light.
    pub const LIGHT_MATRIX: &str = "u_lightMatrix";
    /// Depth bias of the bound shadowed light.
    pub const SHADOW_TOLERANCE: &str = "u_shadowTolerance";
    /// Sampler slot of the shadow map.
    pub const SHADOW_MAP: &str = "u_shadowMap";
}

/// Texture slot the first material texture is bound to.
pub const DIFFUSE_TEXTURE_SLOT: u32 = 0;
/// Texture slot the shadow map of a shadowed directional light is bound to.
pub const SHADOW_MAP_TEXTURE_SLOT: u32 = 1;

/// Counters describing the work a processor submitted to its backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Target groups begun.
    pub targets_begun: u64,
    /// Shader program binds.
    pub shader_binds: u64,
    /// Texture binds on any slot.
    pub texture_binds: u64,
    /// Mesh binds, static and dynamic.
    pub mesh_binds: u64,
    /// Materials applied, not counting elided repeats.
    pub material_applications: u64,
    /// Draw calls.
    pub draw_calls: u64,
}

/// Replays render command buffers against a [`GpuBackend`].
pub struct RenderCommandProcessor<B: GpuBackend> {
    backend: B,
    registry: ResourceRegistry,
    state: ContextState,
    transient_meshes: Vec<MeshHandle>,
    target_open: bool,
    stats: ProcessorStats,
}

impl<B: GpuBackend> RenderCommandProcessor<B> {
    /// Creates a processor driving `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: ResourceRegistry::new(),
            state: ContextState::default(),
            transient_meshes: Vec::new(),
            target_open: false,
            stats: ProcessorStats::default(),
        }
    }

    /// The backend being driven.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The current binding state.
    pub fn state(&self) -> &ContextState {
        &self.state
    }

    /// The loaded resource registry.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Counters accumulated since creation or the last [`reset_stats`](Self::reset_stats).
    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    /// Zeroes the counters.
    pub fn reset_stats(&mut self) {
        self.stats = ProcessorStats::default();
    }

    /// Consumes and executes `buffer`.
    ///
    /// Commands run strictly in submission order. The first error aborts
    /// rendering: the open target is ended, the binding state is cleared and
    /// transient meshes are released. Every later render command in the
    /// buffer is skipped, but resource loads and unloads still run, so
    /// nothing drained into this buffer is lost. The first error is returned.
    pub fn process(&mut self, buffer: RenderCommandBuffer) -> Result<(), ProcessError> {
        let mut failure = None;
        for command in buffer {
            if failure.is_some() && !command.is_resource_command() {
                log::trace!(
                    "RenderCommandProcessor: skipping {} after an aborted frame",
                    command.name()
                );
                continue;
            }
            log::trace!("RenderCommandProcessor: {}", command.name());
            if let Err(error) = self.process_command(command) {
                if failure.is_none() {
                    self.abort_target();
                    failure = Some(error);
                } else {
                    log::error!("RenderCommandProcessor: resource command failed: {error}");
                }
            }
        }
        failure.map_or(Ok(()), Err)
    }

    /// Releases every resource still loaded and returns the backend.
    pub fn into_backend(mut self) -> B {
        self.release_transient_meshes();
        let leaked: Vec<_> = self.registry.drain().collect();
        if !leaked.is_empty() {
            log::warn!(
                "RenderCommandProcessor: releasing {} resources that were never unloaded",
                leaked.len()
            );
        }
        for (_, resource) in leaked {
            self.destroy(resource);
        }
        self.backend
    }

    fn process_command(&mut self, command: RenderCommand) -> Result<(), ProcessError> {
        match command {
            RenderCommand::LoadShader {
                shader,
                vertex_source,
                fragment_source,
            } => self.load_shader(&shader, &vertex_source, &fragment_source),
            RenderCommand::LoadTexture { texture, data } => self.load_texture(&texture, data),
            RenderCommand::LoadMaterialGroup { .. } | RenderCommand::UnloadMaterialGroup { .. } => {
                Ok(())
            }
            RenderCommand::LoadMesh {
                mesh,
                vertex_data,
                index_data,
            } => self.load_mesh(&mesh, vertex_data, index_data),
            RenderCommand::LoadTargetGroup { target } => self.load_target_group(&target),
            RenderCommand::Begin {
                target,
                resolution,
                clear_colour,
            } => self.begin(target.as_deref(), resolution, clear_colour),
            RenderCommand::ApplyCamera {
                position,
                view_projection,
            } => {
                self.apply_camera(position, view_projection);
                Ok(())
            }
            RenderCommand::ApplyLight { light } => {
                self.state.light = Some(light);
                self.state.material = None;
                Ok(())
            }
            RenderCommand::ApplyMaterial { material } => self.apply_material(&material),
            RenderCommand::ApplyMesh { mesh } => self.apply_mesh(&mesh),
            RenderCommand::ApplyDynamicMesh { mesh } => self.apply_dynamic_mesh(&mesh),
            RenderCommand::RenderInstance { world_matrix } => self.render_instance(world_matrix),
            RenderCommand::End => {
                self.backend.end();
                self.target_open = false;
                self.state.reset();
                self.release_transient_meshes();
                Ok(())
            }
            RenderCommand::UnloadShader { shader } => self.unload_shader(&shader),
            RenderCommand::UnloadTexture { texture } => self.unload_texture(&texture),
            RenderCommand::UnloadMesh { mesh } => self.unload_mesh(&mesh),
            RenderCommand::UnloadTargetGroup { target } => {
                let handle = self.registry.target_group(target.id())?;
                self.registry.remove(target.id());
                self.backend.destroy_target_group(handle);
                Ok(())
            }
        }
    }

    fn load_shader(
        &mut self,
        shader: &RenderShader,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), ProcessError> {
        let handle = self
            .backend
            .create_shader(shader.name(), vertex_source, fragment_source)?;
        self.replace(shader.id(), GpuResource::Shader(handle));
        self.state.shader = None;
        self.state.material = None;
        Ok(())
    }

    fn load_texture(
        &mut self,
        texture: &RenderTexture,
        data: Option<Box<[u8]>>,
    ) -> Result<(), ProcessError> {
        let handle = self
            .backend
            .create_texture(texture.descriptor(), data.as_deref())?;
        self.replace(texture.id(), GpuResource::Texture(handle));
        self.state.texture = None;
        self.state.material = None;
        Ok(())
    }

    fn load_mesh(
        &mut self,
        mesh: &RenderMesh,
        vertex_data: Box<[u8]>,
        index_data: Box<[u8]>,
    ) -> Result<(), ProcessError> {
        let handle = self
            .backend
            .create_mesh(mesh.layout(), &vertex_data, &index_data)?;
        self.replace(mesh.id(), GpuResource::Mesh(handle));
        self.state.mesh = None;
        Ok(())
    }

    fn load_target_group(&mut self, target: &RenderTargetGroup) -> Result<(), ProcessError> {
        let colour = target
            .colour_target()
            .map(|t| self.registry.texture(t.id()))
            .transpose()?;
        let depth = target
            .depth_target()
            .map(|t| self.registry.texture(t.id()))
            .transpose()?;
        let handle = self.backend.create_target_group(colour, depth)?;
        self.replace(target.id(), GpuResource::TargetGroup(handle));
        Ok(())
    }

    fn begin(
        &mut self,
        target: Option<&RenderTargetGroup>,
        resolution: UVec2,
        clear_colour: LinearRgba,
    ) -> Result<(), ProcessError> {
        let target = target
            .map(|t| self.registry.target_group(t.id()))
            .transpose()?;
        self.state.reset();
        self.backend.begin(target, resolution, clear_colour);
        self.target_open = true;
        self.stats.targets_begun += 1;
        Ok(())
    }

    fn apply_camera(&mut self, position: Vec3, view_projection: Mat4) {
        let camera = CameraState {
            position,
            view_projection,
        };
        if self.state.camera == Some(camera) {
            return;
        }
        self.state.camera = Some(camera);
        // Camera uniforms are pushed with the material.
        self.state.material = None;
    }

    fn apply_material(&mut self, material: &RenderMaterial) -> Result<(), ProcessError> {
        if self.state.material == Some(material.id()) {
            return Ok(());
        }

        self.state.mesh = None;

        let shader_id = material.shader().id();
        let shader = match self.state.shader {
            Some(bound) if bound.id == shader_id => bound,
            _ => {
                let bound = BoundShader {
                    id: shader_id,
                    handle: self.registry.shader(shader_id)?,
                };
                self.backend.bind_shader(bound.handle);
                self.stats.shader_binds += 1;
                self.state.shader = Some(bound);
                bound
            }
        };

        if let Some(texture) = material.textures().first() {
            if self.state.texture != Some(texture.id()) {
                let handle = self.registry.texture(texture.id())?;
                self.backend.bind_texture(DIFFUSE_TEXTURE_SLOT, handle);
                self.stats.texture_binds += 1;
                self.state.texture = Some(texture.id());
            }
        }

        self.backend.set_render_state(material.render_state());
        self.push_material_uniforms(material)?;
        self.push_light_uniforms()?;

        log::trace!(
            "RenderCommandProcessor: applied material {:?} with shader {:?}",
            material.id(),
            shader.id
        );
        self.state.material = Some(material.id());
        self.stats.material_applications += 1;
        Ok(())
    }

    fn push_material_uniforms(&mut self, material: &RenderMaterial) -> Result<(), ProcessError> {
        let silent = UniformFailurePolicy::Silent;
        if let Some(camera) = self.state.camera {
            self.backend.set_uniform(
                uniforms::CAMERA_POSITION,
                UniformValue::Vec3(camera.position),
                silent,
            )?;
        }
        self.backend
            .set_uniform(uniforms::EMISSIVE, UniformValue::Colour(material.emissive()), silent)?;
        self.backend
            .set_uniform(uniforms::AMBIENT, UniformValue::Colour(material.ambient()), silent)?;
        self.backend
            .set_uniform(uniforms::DIFFUSE, UniformValue::Colour(material.diffuse()), silent)?;
        self.backend
            .set_uniform(uniforms::SPECULAR, UniformValue::Colour(material.specular()), silent)?;

        for (name, value) in material.uniforms() {
            self.backend
                .set_uniform(name, *value, UniformFailurePolicy::Report)?;
        }
        Ok(())
    }

    fn push_light_uniforms(&mut self) -> Result<(), ProcessError> {
        let silent = UniformFailurePolicy::Silent;
        match &self.state.light {
            None => {}
            Some(RenderLight::Ambient(light)) => {
                self.backend
                    .set_uniform(uniforms::LIGHT_COLOUR, UniformValue::Colour(light.colour), silent)?;
            }
            Some(RenderLight::Directional(light)) => {
                self.backend
                    .set_uniform(uniforms::LIGHT_COLOUR, UniformValue::Colour(light.colour), silent)?;
                self.backend
                    .set_uniform(uniforms::LIGHT_DIRECTION, UniformValue::Vec3(light.direction), silent)?;
                if let Some(shadow) = &light.shadow {
                    self.backend.set_uniform(
                        uniforms::LIGHT_MATRIX,
                        UniformValue::Mat4(shadow.light_view_projection()),
                        silent,
                    )?;
                    self.backend.set_uniform(
                        uniforms::SHADOW_TOLERANCE,
                        UniformValue::Float(shadow.tolerance),
                        silent,
                    )?;
                    if let Some(depth) = shadow.target.depth_target() {
                        let handle = self.registry.texture(depth.id())?;
                        self.backend.bind_texture(SHADOW_MAP_TEXTURE_SLOT, handle);
                        self.stats.texture_binds += 1;
                        self.backend.set_uniform(
                            uniforms::SHADOW_MAP,
                            UniformValue::Int(SHADOW_MAP_TEXTURE_SLOT as i32),
                            silent,
                        )?;
                    }
                }
            }
            Some(RenderLight::Point(light)) => {
                self.backend
                    .set_uniform(uniforms::LIGHT_COLOUR, UniformValue::Colour(light.colour), silent)?;
                self.backend
                    .set_uniform(uniforms::LIGHT_POSITION, UniformValue::Vec3(light.position), silent)?;
                self.backend.set_uniform(
                    uniforms::LIGHT_ATTENUATION,
                    UniformValue::Vec3(light.attenuation),
                    silent,
                )?;
                self.backend
                    .set_uniform(uniforms::LIGHT_RANGE, UniformValue::Float(light.range), silent)?;
            }
        }
        Ok(())
    }

    fn apply_mesh(&mut self, mesh: &RenderMesh) -> Result<(), ProcessError> {
        if self.state.mesh.map(|m| m.id) == Some(mesh.id()) {
            return Ok(());
        }
        let shader = self.state.shader.ok_or(ProcessError::NoShaderBound(mesh.id()))?;
        let handle = self.registry.mesh(mesh.id())?;
        let bound = BoundMesh {
            id: mesh.id(),
            handle,
            layout: *mesh.layout(),
        };
        self.bind_mesh(bound, shader);
        Ok(())
    }

    fn apply_dynamic_mesh(&mut self, mesh: &RenderDynamicMesh) -> Result<(), ProcessError> {
        if self.state.mesh.map(|m| m.id) == Some(mesh.id()) {
            return Ok(());
        }
        let shader = self.state.shader.ok_or(ProcessError::NoShaderBound(mesh.id()))?;
        let handle = self
            .backend
            .create_mesh(mesh.layout(), mesh.vertex_data(), mesh.index_data())?;
        self.transient_meshes.push(handle);
        let bound = BoundMesh {
            id: mesh.id(),
            handle,
            layout: *mesh.layout(),
        };
        self.bind_mesh(bound, shader);
        Ok(())
    }

    fn bind_mesh(&mut self, mesh: BoundMesh, shader: BoundShader) {
        self.backend.bind_mesh(mesh.handle, shader.handle);
        self.stats.mesh_binds += 1;
        self.state.mesh = Some(mesh);
    }

    fn render_instance(&mut self, world_matrix: Mat4) -> Result<(), ProcessError> {
        let mesh = self.state.mesh.ok_or(ProcessError::NoMeshBound)?;
        let camera = self.state.camera.ok_or(ProcessError::NoCameraApplied)?;

        let silent = UniformFailurePolicy::Silent;
        let wvp = camera.view_projection * world_matrix;
        let normal = world_matrix.inverse().transpose();
        self.backend
            .set_uniform(uniforms::WVP_MATRIX, UniformValue::Mat4(wvp), silent)?;
        self.backend
            .set_uniform(uniforms::WORLD_MATRIX, UniformValue::Mat4(world_matrix), silent)?;
        self.backend
            .set_uniform(uniforms::NORMAL_MATRIX, UniformValue::Mat4(normal), silent)?;

        let layout = mesh.layout;
        if layout.is_indexed() {
            self.backend
                .draw_indexed(layout.polygon_type, layout.index_format, layout.index_count);
        } else {
            self.backend.draw(layout.polygon_type, layout.vertex_count);
        }
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn unload_shader(&mut self, shader: &RenderShader) -> Result<(), ProcessError> {
        let handle = self.registry.shader(shader.id())?;
        self.registry.remove(shader.id());
        self.backend.destroy_shader(handle);
        self.state.shader = None;
        self.state.material = None;
        Ok(())
    }

    fn unload_texture(&mut self, texture: &RenderTexture) -> Result<(), ProcessError> {
        let handle = self.registry.texture(texture.id())?;
        self.registry.remove(texture.id());
        self.backend.destroy_texture(handle);
        self.state.texture = None;
        self.state.material = None;
        Ok(())
    }

    fn unload_mesh(&mut self, mesh: &RenderMesh) -> Result<(), ProcessError> {
        let handle = self.registry.mesh(mesh.id())?;
        self.registry.remove(mesh.id());
        self.backend.destroy_mesh(handle);
        self.state.mesh = None;
        Ok(())
    }

    fn replace(&mut self, id: ResourceId, resource: GpuResource) {
        if let Some(previous) = self.registry.insert(id, resource) {
            log::warn!(
                "RenderCommandProcessor: {} {:?} loaded twice, releasing the previous upload",
                previous.kind(),
                id
            );
            self.destroy(previous);
        }
    }

    fn destroy(&mut self, resource: GpuResource) {
        match resource {
            GpuResource::Shader(handle) => self.backend.destroy_shader(handle),
            GpuResource::Texture(handle) => self.backend.destroy_texture(handle),
            GpuResource::Mesh(handle) => self.backend.destroy_mesh(handle),
            GpuResource::TargetGroup(handle) => self.backend.destroy_target_group(handle),
        }
    }

    fn abort_target(&mut self) {
        if self.target_open {
            self.backend.end();
            self.target_open = false;
        }
        self.state.reset();
        self.release_transient_meshes();
    }

    fn release_transient_meshes(&mut self) {
        for handle in std::mem::take(&mut self.transient_meshes) {
            self.backend.destroy_mesh(handle);
        }
    }
}

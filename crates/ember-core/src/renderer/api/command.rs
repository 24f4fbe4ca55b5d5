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

//! The backend-agnostic render command stream.
//!
//! A [`RenderCommandBuffer`] is an ordered sequence of [`RenderCommandList`]s.
//! Lists are replayed in submission order by a single-threaded processor, so
//! independent producers can build their lists concurrently and the buffer
//! simply concatenates them.

use crate::math::{LinearRgba, Mat4, UVec2, Vec3};
use crate::renderer::api::{
    RenderDynamicMesh, RenderMaterial, RenderMaterialGroup, RenderMesh, RenderShader,
    RenderTargetGroup, RenderTexture,
};
use crate::renderer::light::RenderLight;
use std::sync::Arc;

/// A single instruction for the render command processor.
///
/// Load commands own the raw bytes they upload; ownership of that data moves
/// to the backend resource when the command is processed.
#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Compiles a shader program.
    LoadShader {
        /// The shader resource.
        shader: Arc<RenderShader>,
        /// Vertex stage source.
        vertex_source: String,
        /// Fragment stage source.
        fragment_source: String,
    },
    /// Creates a texture, optionally with initial contents.
    LoadTexture {
        /// The texture resource.
        texture: Arc<RenderTexture>,
        /// Level-0 image bytes, or `None` for a render target attachment.
        data: Option<Box<[u8]>>,
    },
    /// Announces a material group. Nothing is allocated for the forward backend.
    LoadMaterialGroup {
        /// The material group resource.
        material_group: Arc<RenderMaterialGroup>,
    },
    /// Uploads a static mesh.
    LoadMesh {
        /// The mesh resource.
        mesh: Arc<RenderMesh>,
        /// Vertex buffer bytes.
        vertex_data: Box<[u8]>,
        /// Index buffer bytes, empty for non-indexed meshes.
        index_data: Box<[u8]>,
    },
    /// Creates a framebuffer from already loaded textures.
    LoadTargetGroup {
        /// The target group resource.
        target: Arc<RenderTargetGroup>,
    },
    /// Starts rendering into a target.
    Begin {
        /// The target, or `None` for the default framebuffer.
        target: Option<Arc<RenderTargetGroup>>,
        /// Viewport size in pixels.
        resolution: UVec2,
        /// Colour the target is cleared to.
        clear_colour: LinearRgba,
    },
    /// Binds the camera used by subsequent draws.
    ApplyCamera {
        /// World-space camera position.
        position: Vec3,
        /// World to clip transform.
        view_projection: Mat4,
    },
    /// Binds the light used by subsequent material applications.
    ApplyLight {
        /// The light.
        light: RenderLight,
    },
    /// Binds a material's shader, textures, state and uniforms.
    ApplyMaterial {
        /// The material.
        material: Arc<RenderMaterial>,
    },
    /// Binds a loaded static mesh.
    ApplyMesh {
        /// The mesh.
        mesh: Arc<RenderMesh>,
    },
    /// Uploads and binds a per-frame mesh.
    ApplyDynamicMesh {
        /// The mesh, carrying its own buffer bytes.
        mesh: Arc<RenderDynamicMesh>,
    },
    /// Draws the bound mesh once with the bound material.
    RenderInstance {
        /// Local to world transform of the instance.
        world_matrix: Mat4,
    },
    /// Finishes rendering into the current target.
    End,
    /// Releases a shader program.
    UnloadShader {
        /// The shader resource.
        shader: Arc<RenderShader>,
    },
    /// Releases a texture.
    UnloadTexture {
        /// The texture resource.
        texture: Arc<RenderTexture>,
    },
    /// Retires a material group.
    UnloadMaterialGroup {
        /// The material group resource.
        material_group: Arc<RenderMaterialGroup>,
    },
    /// Releases a static mesh.
    UnloadMesh {
        /// The mesh resource.
        mesh: Arc<RenderMesh>,
    },
    /// Releases a framebuffer.
    UnloadTargetGroup {
        /// The target group resource.
        target: Arc<RenderTargetGroup>,
    },
}

impl RenderCommand {
    /// Short name of the command variant, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            RenderCommand::LoadShader { .. } => "LoadShader",
            RenderCommand::LoadTexture { .. } => "LoadTexture",
            RenderCommand::LoadMaterialGroup { .. } => "LoadMaterialGroup",
            RenderCommand::LoadMesh { .. } => "LoadMesh",
            RenderCommand::LoadTargetGroup { .. } => "LoadTargetGroup",
            RenderCommand::Begin { .. } => "Begin",
            RenderCommand::ApplyCamera { .. } => "ApplyCamera",
            RenderCommand::ApplyLight { .. } => "ApplyLight",
            RenderCommand::ApplyMaterial { .. } => "ApplyMaterial",
            RenderCommand::ApplyMesh { .. } => "ApplyMesh",
            RenderCommand::ApplyDynamicMesh { .. } => "ApplyDynamicMesh",
            RenderCommand::RenderInstance { .. } => "RenderInstance",
            RenderCommand::End => "End",
            RenderCommand::UnloadShader { .. } => "UnloadShader",
            RenderCommand::UnloadTexture { .. } => "UnloadTexture",
            RenderCommand::UnloadMaterialGroup { .. } => "UnloadMaterialGroup",
            RenderCommand::UnloadMesh { .. } => "UnloadMesh",
            RenderCommand::UnloadTargetGroup { .. } => "UnloadTargetGroup",
        }
    }

    /// Returns `true` for commands that load or unload resources rather
    /// than render into a target.
    pub fn is_resource_command(&self) -> bool {
        matches!(
            self,
            RenderCommand::LoadShader { .. }
                | RenderCommand::LoadTexture { .. }
                | RenderCommand::LoadMaterialGroup { .. }
                | RenderCommand::LoadMesh { .. }
                | RenderCommand::LoadTargetGroup { .. }
                | RenderCommand::UnloadShader { .. }
                | RenderCommand::UnloadTexture { .. }
                | RenderCommand::UnloadMaterialGroup { .. }
                | RenderCommand::UnloadMesh { .. }
                | RenderCommand::UnloadTargetGroup { .. }
        )
    }
}

/// An ordered list of render commands.
#[derive(Debug, Clone, Default)]
pub struct RenderCommandList {
    commands: Vec<RenderCommand>,
}

impl RenderCommandList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an arbitrary command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Appends a `LoadShader` command.
    pub fn add_load_shader(
        &mut self,
        shader: Arc<RenderShader>,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) {
        self.push(RenderCommand::LoadShader {
            shader,
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        });
    }

    /// Appends a `LoadTexture` command.
    pub fn add_load_texture(&mut self, texture: Arc<RenderTexture>, data: Option<Box<[u8]>>) {
        self.push(RenderCommand::LoadTexture { texture, data });
    }

    /// Appends a `LoadMaterialGroup` command.
    pub fn add_load_material_group(&mut self, material_group: Arc<RenderMaterialGroup>) {
        self.push(RenderCommand::LoadMaterialGroup { material_group });
    }

    /// Appends a `LoadMesh` command.
    pub fn add_load_mesh(
        &mut self,
        mesh: Arc<RenderMesh>,
        vertex_data: Box<[u8]>,
        index_data: Box<[u8]>,
    ) {
        self.push(RenderCommand::LoadMesh {
            mesh,
            vertex_data,
            index_data,
        });
    }

    /// Appends a `LoadTargetGroup` command.
    pub fn add_load_target_group(&mut self, target: Arc<RenderTargetGroup>) {
        self.push(RenderCommand::LoadTargetGroup { target });
    }

    /// Appends a `Begin` command.
    pub fn add_begin(
        &mut self,
        target: Option<Arc<RenderTargetGroup>>,
        resolution: UVec2,
        clear_colour: LinearRgba,
    ) {
        self.push(RenderCommand::Begin {
            target,
            resolution,
            clear_colour,
        });
    }

    /// Appends an `ApplyCamera` command.
    pub fn add_apply_camera(&mut self, position: Vec3, view_projection: Mat4) {
        self.push(RenderCommand::ApplyCamera {
            position,
            view_projection,
        });
    }

    /// Appends an `ApplyLight` command.
    pub fn add_apply_light(&mut self, light: RenderLight) {
        self.push(RenderCommand::ApplyLight { light });
    }

    /// Appends an `ApplyMaterial` command.
    pub fn add_apply_material(&mut self, material: Arc<RenderMaterial>) {
        self.push(RenderCommand::ApplyMaterial { material });
    }

    /// Appends an `ApplyMesh` command.
    pub fn add_apply_mesh(&mut self, mesh: Arc<RenderMesh>) {
        self.push(RenderCommand::ApplyMesh { mesh });
    }

    /// Appends an `ApplyDynamicMesh` command.
    pub fn add_apply_dynamic_mesh(&mut self, mesh: Arc<RenderDynamicMesh>) {
        self.push(RenderCommand::ApplyDynamicMesh { mesh });
    }

    /// Appends a `RenderInstance` command.
    pub fn add_render_instance(&mut self, world_matrix: Mat4) {
        self.push(RenderCommand::RenderInstance { world_matrix });
    }

    /// Appends an `End` command.
    pub fn add_end(&mut self) {
        self.push(RenderCommand::End);
    }

    /// Appends an `UnloadShader` command.
    pub fn add_unload_shader(&mut self, shader: Arc<RenderShader>) {
        self.push(RenderCommand::UnloadShader { shader });
    }

    /// Appends an `UnloadTexture` command.
    pub fn add_unload_texture(&mut self, texture: Arc<RenderTexture>) {
        self.push(RenderCommand::UnloadTexture { texture });
    }

    /// Appends an `UnloadMaterialGroup` command.
    pub fn add_unload_material_group(&mut self, material_group: Arc<RenderMaterialGroup>) {
        self.push(RenderCommand::UnloadMaterialGroup { material_group });
    }

    /// Appends an `UnloadMesh` command.
    pub fn add_unload_mesh(&mut self, mesh: Arc<RenderMesh>) {
        self.push(RenderCommand::UnloadMesh { mesh });
    }

    /// Appends an `UnloadTargetGroup` command.
    pub fn add_unload_target_group(&mut self, target: Arc<RenderTargetGroup>) {
        self.push(RenderCommand::UnloadTargetGroup { target });
    }

    /// Commands in order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if the list holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl IntoIterator for RenderCommandList {
    type Item = RenderCommand;
    type IntoIter = std::vec::IntoIter<RenderCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl FromIterator<RenderCommand> for RenderCommandList {
    fn from_iter<I: IntoIterator<Item = RenderCommand>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// The full command stream for one frame, consumed once by the processor.
#[derive(Debug, Clone, Default)]
pub struct RenderCommandBuffer {
    lists: Vec<RenderCommandList>,
}

impl RenderCommandBuffer {
    /// Creates a buffer from lists in submission order.
    pub fn new(lists: Vec<RenderCommandList>) -> Self {
        Self { lists }
    }

    /// Appends a list after all existing ones.
    pub fn push_list(&mut self, list: RenderCommandList) {
        self.lists.push(list);
    }

    /// Lists in submission order.
    pub fn lists(&self) -> &[RenderCommandList] {
        &self.lists
    }

    /// Total number of commands across all lists.
    pub fn command_count(&self) -> usize {
        self.lists.iter().map(RenderCommandList::len).sum()
    }

    /// Iterates every command in replay order.
    pub fn iter(&self) -> impl Iterator<Item = &RenderCommand> {
        self.lists.iter().flat_map(|l| l.commands().iter())
    }
}

impl IntoIterator for RenderCommandBuffer {
    type Item = RenderCommand;
    type IntoIter = std::iter::Flatten<std::vec::IntoIter<RenderCommandList>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.into_iter().flatten()
    }
}

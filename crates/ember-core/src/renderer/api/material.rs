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

//! Materials and the material groups render objects resolve them through.

use super::resource::{RenderShader, RenderTexture, ResourceId};
use super::util::{BlendMode, CullFace, VertexFormat};
use crate::math::{LinearRgba, Mat4, Vec2, Vec3, Vec4};
use std::collections::HashMap;
use std::sync::Arc;

/// The passes a forward-rendered material can participate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardRenderPass {
    /// Depth-only rendering into a directional light's shadow map.
    ShadowMap,
    /// Opaque geometry lit by the ambient light.
    Base,
    /// Additive pass for a directional light without a shadow map.
    DirectionalLight,
    /// Additive pass for a directional light that samples its shadow map.
    DirectionalLightShadows,
    /// Additive pass for a point light.
    PointLight,
    /// Blended geometry, also used for the UI layer.
    Transparent,
}

/// A value that can be pushed to a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `int`
    Int(i32),
    /// `vec2`
    Vec2(Vec2),
    /// `vec3`
    Vec3(Vec3),
    /// `vec4`
    Vec4(Vec4),
    /// `vec4` holding a linear colour.
    Colour(LinearRgba),
    /// `mat4`
    Mat4(Mat4),
}

/// Fixed-function state a material configures when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRenderState {
    /// Enables blending with `source_blend`/`destination_blend`.
    pub transparency_enabled: bool,
    /// Writes to the colour buffer.
    pub colour_write_enabled: bool,
    /// Writes to the depth buffer.
    pub depth_write_enabled: bool,
    /// Tests against the depth buffer.
    pub depth_test_enabled: bool,
    /// Discards faces matching `cull_face`.
    pub face_culling_enabled: bool,
    /// Source blend factor.
    pub source_blend: BlendMode,
    /// Destination blend factor.
    pub destination_blend: BlendMode,
    /// Which faces get culled.
    pub cull_face: CullFace,
}

impl MaterialRenderState {
    /// Opaque geometry: depth test and write, back-face culling, no blending.
    pub const fn opaque() -> Self {
        Self {
            transparency_enabled: false,
            colour_write_enabled: true,
            depth_write_enabled: true,
            depth_test_enabled: true,
            face_culling_enabled: true,
            source_blend: BlendMode::One,
            destination_blend: BlendMode::Zero,
            cull_face: CullFace::Back,
        }
    }

    /// Alpha blended geometry: depth test without depth write.
    pub const fn transparent() -> Self {
        Self {
            transparency_enabled: true,
            colour_write_enabled: true,
            depth_write_enabled: false,
            depth_test_enabled: true,
            face_culling_enabled: true,
            source_blend: BlendMode::SourceAlpha,
            destination_blend: BlendMode::OneMinusSourceAlpha,
            cull_face: CullFace::Back,
        }
    }

    /// Depth-only rendering for shadow maps.
    pub const fn shadow_map() -> Self {
        Self {
            colour_write_enabled: false,
            cull_face: CullFace::Front,
            ..Self::opaque()
        }
    }

    /// Additive blending used by the per-light passes.
    pub const fn additive() -> Self {
        Self {
            transparency_enabled: true,
            depth_write_enabled: false,
            source_blend: BlendMode::One,
            destination_blend: BlendMode::One,
            ..Self::opaque()
        }
    }
}

impl Default for MaterialRenderState {
    fn default() -> Self {
        Self::opaque()
    }
}

/// A concrete shader configuration: one shader, its textures, fixed-function
/// state and uniform values.
#[derive(Debug)]
pub struct RenderMaterial {
    id: ResourceId,
    shader: Arc<RenderShader>,
    textures: Vec<Arc<RenderTexture>>,
    render_state: MaterialRenderState,
    emissive: LinearRgba,
    ambient: LinearRgba,
    diffuse: LinearRgba,
    specular: LinearRgba,
    uniforms: Vec<(String, UniformValue)>,
}

impl RenderMaterial {
    /// Creates an opaque material using `shader` with white lighting colours.
    pub fn new(shader: Arc<RenderShader>) -> Self {
        Self {
            id: ResourceId::new(),
            shader,
            textures: Vec::new(),
            render_state: MaterialRenderState::opaque(),
            emissive: LinearRgba::BLACK,
            ambient: LinearRgba::WHITE,
            diffuse: LinearRgba::WHITE,
            specular: LinearRgba::WHITE,
            uniforms: Vec::new(),
        }
    }

    /// Appends a texture. Only the first texture is bound by the forward backend.
    pub fn with_texture(mut self, texture: Arc<RenderTexture>) -> Self {
        self.textures.push(texture);
        self
    }

    /// Replaces the fixed-function state.
    pub fn with_render_state(mut self, render_state: MaterialRenderState) -> Self {
        self.render_state = render_state;
        self
    }

    /// Sets the emissive, ambient, diffuse and specular colours.
    pub fn with_colours(
        mut self,
        emissive: LinearRgba,
        ambient: LinearRgba,
        diffuse: LinearRgba,
        specular: LinearRgba,
    ) -> Self {
        self.emissive = emissive;
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Adds a named custom uniform.
    pub fn with_uniform(mut self, name: impl Into<String>, value: UniformValue) -> Self {
        self.uniforms.push((name.into(), value));
        self
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The shader this material renders with.
    pub fn shader(&self) -> &Arc<RenderShader> {
        &self.shader
    }

    /// Bound textures in slot order.
    pub fn textures(&self) -> &[Arc<RenderTexture>] {
        &self.textures
    }

    /// Fixed-function state.
    pub fn render_state(&self) -> &MaterialRenderState {
        &self.render_state
    }

    /// Emissive colour.
    pub fn emissive(&self) -> LinearRgba {
        self.emissive
    }

    /// Ambient colour.
    pub fn ambient(&self) -> LinearRgba {
        self.ambient
    }

    /// Diffuse colour.
    pub fn diffuse(&self) -> LinearRgba {
        self.diffuse
    }

    /// Specular colour.
    pub fn specular(&self) -> LinearRgba {
        self.specular
    }

    /// Custom uniforms in insertion order.
    pub fn uniforms(&self) -> &[(String, UniformValue)] {
        &self.uniforms
    }

    /// Key used by the opaque sort to group draws that share GPU state.
    pub fn sort_key(&self) -> (ResourceId, ResourceId) {
        (self.shader.id(), self.id)
    }
}

/// Maps `(vertex format, pass)` pairs to the material used for that pass.
///
/// An object whose group has no entry for a pass simply does not take part
/// in that pass.
#[derive(Debug)]
pub struct RenderMaterialGroup {
    id: ResourceId,
    materials: HashMap<(VertexFormat, ForwardRenderPass), Arc<RenderMaterial>>,
}

impl RenderMaterialGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self {
            id: ResourceId::new(),
            materials: HashMap::new(),
        }
    }

    /// Registers `material` for the given vertex format and pass.
    pub fn with_material(
        mut self,
        vertex_format: VertexFormat,
        pass: ForwardRenderPass,
        material: Arc<RenderMaterial>,
    ) -> Self {
        self.materials.insert((vertex_format, pass), material);
        self
    }

    /// The resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Looks up the material for a pass.
    pub fn get(
        &self,
        vertex_format: VertexFormat,
        pass: ForwardRenderPass,
    ) -> Option<&Arc<RenderMaterial>> {
        self.materials.get(&(vertex_format, pass))
    }

    /// Returns `true` if `material` belongs to this group.
    pub fn contains(&self, material: &RenderMaterial) -> bool {
        self.materials.values().any(|m| m.id() == material.id())
    }

    /// Returns `true` if objects of this vertex format render in the
    /// transparent pass and therefore never cast shadows.
    pub fn is_transparent(&self, vertex_format: VertexFormat) -> bool {
        self.materials
            .contains_key(&(vertex_format, ForwardRenderPass::Transparent))
    }

    /// Iterates over every registered material.
    pub fn materials(&self) -> impl Iterator<Item = &Arc<RenderMaterial>> {
        self.materials.values()
    }
}

impl Default for RenderMaterialGroup {
    fn default() -> Self {
        Self::new()
    }
}

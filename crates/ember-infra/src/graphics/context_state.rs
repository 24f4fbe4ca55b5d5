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

//! The processor's view of what is currently bound on the GPU.

use ember_core::math::{Mat4, Vec3};
use ember_core::renderer::api::{MeshHandle, MeshLayout, ResourceId, ShaderHandle};
use ember_core::renderer::RenderLight;

/// The camera most recently applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World-space position.
    pub position: Vec3,
    /// World to clip transform.
    pub view_projection: Mat4,
}

/// The shader program currently bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundShader {
    /// Resource identity.
    pub id: ResourceId,
    /// Backend handle.
    pub handle: ShaderHandle,
}

/// The mesh currently bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundMesh {
    /// Resource identity.
    pub id: ResourceId,
    /// Backend handle.
    pub handle: MeshHandle,
    /// Layout, needed to pick the draw call.
    pub layout: MeshLayout,
}

/// Binding slots used to elide redundant GPU state changes.
///
/// Every slot is independently nullable. The whole state is reset at `Begin`
/// and `End`, so nothing carries over between target groups.
#[derive(Debug, Clone, Default)]
pub struct ContextState {
    /// Bound shader program.
    pub shader: Option<BoundShader>,
    /// Last applied material.
    pub material: Option<ResourceId>,
    /// Texture bound to slot 0.
    pub texture: Option<ResourceId>,
    /// Bound mesh.
    pub mesh: Option<BoundMesh>,
    /// Applied camera.
    pub camera: Option<CameraState>,
    /// Applied light.
    pub light: Option<RenderLight>,
}

impl ContextState {
    /// Clears every slot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

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

//! The per-frame drawable instance.

use crate::math::{Mat4, Sphere};
use crate::renderer::api::{
    ForwardRenderPass, MeshLayout, RenderDynamicMesh, RenderMaterial, RenderMaterialGroup,
    RenderMesh, ResourceId, VertexFormat,
};
use std::sync::Arc;

/// The layer a render object is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    /// World geometry, rendered by the scene camera.
    Standard,
    /// Screen-space UI, rendered by the orthographic UI camera.
    Ui,
}

/// The mesh a render object draws.
#[derive(Debug, Clone)]
pub enum RenderObjectMesh {
    /// A mesh loaded once and referenced by many frames.
    Static(Arc<RenderMesh>),
    /// A mesh whose data is streamed with the frame.
    Dynamic(Arc<RenderDynamicMesh>),
}

impl RenderObjectMesh {
    /// Identity of the underlying mesh.
    pub fn id(&self) -> ResourceId {
        match self {
            RenderObjectMesh::Static(mesh) => mesh.id(),
            RenderObjectMesh::Dynamic(mesh) => mesh.id(),
        }
    }

    /// Buffer layout of the underlying mesh.
    pub fn layout(&self) -> &MeshLayout {
        match self {
            RenderObjectMesh::Static(mesh) => mesh.layout(),
            RenderObjectMesh::Dynamic(mesh) => mesh.layout(),
        }
    }

    /// Local-space bounding sphere of the underlying mesh.
    pub fn bounding_sphere(&self) -> Sphere {
        match self {
            RenderObjectMesh::Static(mesh) => mesh.bounding_sphere(),
            RenderObjectMesh::Dynamic(mesh) => mesh.bounding_sphere(),
        }
    }
}

/// One drawable instance in a frame snapshot.
///
/// Render objects are built once per frame, never mutated afterwards and
/// borrowed, not owned, by the passes compiled from them.
#[derive(Debug, Clone)]
pub struct RenderObject {
    material_group: Arc<RenderMaterialGroup>,
    mesh: RenderObjectMesh,
    world_matrix: Mat4,
    bounding_sphere: Sphere,
    layer: RenderLayer,
    priority: i32,
    casts_shadows: bool,
}

impl RenderObject {
    /// Creates a render object. The world-space bounding sphere is derived
    /// from the mesh's local sphere and `world_matrix`.
    ///
    /// Standard-layer objects cast shadows by default, UI objects never do.
    pub fn new(
        material_group: Arc<RenderMaterialGroup>,
        mesh: RenderObjectMesh,
        world_matrix: Mat4,
        layer: RenderLayer,
    ) -> Self {
        let bounding_sphere = mesh.bounding_sphere().transformed(&world_matrix);
        Self {
            material_group,
            mesh,
            world_matrix,
            bounding_sphere,
            layer,
            priority: 0,
            casts_shadows: layer == RenderLayer::Standard,
        }
    }

    /// Overrides the world-space bounding sphere.
    pub fn with_bounding_sphere(mut self, bounding_sphere: Sphere) -> Self {
        self.bounding_sphere = bounding_sphere;
        self
    }

    /// Sets the explicit draw priority used by the UI layer.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets whether the object is rendered into shadow maps.
    pub fn with_shadows(mut self, casts_shadows: bool) -> Self {
        self.casts_shadows = casts_shadows;
        self
    }

    /// The material group the object resolves pass materials through.
    pub fn material_group(&self) -> &Arc<RenderMaterialGroup> {
        &self.material_group
    }

    /// The mesh to draw.
    pub fn mesh(&self) -> &RenderObjectMesh {
        &self.mesh
    }

    /// Vertex format of the mesh, half of the material lookup key.
    pub fn vertex_format(&self) -> VertexFormat {
        self.mesh.layout().vertex_format
    }

    /// Local to world transform.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// World-space bounding sphere.
    pub fn bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
    }

    /// Layer the object is drawn in.
    pub fn layer(&self) -> RenderLayer {
        self.layer
    }

    /// Explicit draw priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the object is rendered into shadow maps.
    pub fn casts_shadows(&self) -> bool {
        self.casts_shadows
    }

    /// Resolves the material used in `pass`, if the object takes part in it.
    pub fn material(&self, pass: ForwardRenderPass) -> Option<&Arc<RenderMaterial>> {
        self.material_group.get(self.vertex_format(), pass)
    }

    /// Returns `true` if the object is drawn in the transparent pass.
    pub fn is_transparent(&self) -> bool {
        self.material_group.is_transparent(self.vertex_format())
    }
}

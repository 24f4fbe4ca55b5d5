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

//! Compiled pass groups.
//!
//! Everything here borrows from the [`RenderFrame`](super::RenderFrame) it was
//! compiled from, so a pass can never outlive its frame.

use crate::math::{Mat4, Sphere};
use crate::renderer::api::{RenderCamera, RenderMaterial, RenderObject, RenderObjectMesh, RenderTargetGroup};
use crate::renderer::light::RenderLight;
use std::sync::Arc;

/// A render object resolved against the material of one specific pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassObject<'a> {
    /// The material for this pass.
    pub material: &'a Arc<RenderMaterial>,
    /// The mesh to draw.
    pub mesh: &'a RenderObjectMesh,
    /// Local to world transform.
    pub world_matrix: Mat4,
    /// World-space bounding sphere.
    pub bounding_sphere: Sphere,
    /// Explicit draw priority.
    pub priority: i32,
}

impl<'a> RenderPassObject<'a> {
    /// Resolves `object` against `material`.
    pub fn new(object: &'a RenderObject, material: &'a Arc<RenderMaterial>) -> Self {
        Self {
            material,
            mesh: object.mesh(),
            world_matrix: object.world_matrix(),
            bounding_sphere: object.bounding_sphere(),
            priority: object.priority(),
        }
    }
}

/// One light binding plus the ordered objects drawn with it.
#[derive(Debug, Clone)]
pub struct RenderPass<'a> {
    light: Option<RenderLight>,
    objects: Vec<RenderPassObject<'a>>,
}

impl<'a> RenderPass<'a> {
    /// Creates a pass.
    pub fn new(light: Option<RenderLight>, objects: Vec<RenderPassObject<'a>>) -> Self {
        Self { light, objects }
    }

    /// The light bound while the pass is drawn.
    pub fn light(&self) -> Option<&RenderLight> {
        self.light.as_ref()
    }

    /// Objects in draw order.
    pub fn objects(&self) -> &[RenderPassObject<'a>] {
        &self.objects
    }
}

/// Passes sharing one camera.
#[derive(Debug, Clone)]
pub struct CameraRenderPassGroup<'a> {
    camera: RenderCamera,
    passes: Vec<RenderPass<'a>>,
}

impl<'a> CameraRenderPassGroup<'a> {
    /// Creates a camera group.
    pub fn new(camera: RenderCamera, passes: Vec<RenderPass<'a>>) -> Self {
        Self { camera, passes }
    }

    /// The camera the passes render from.
    pub fn camera(&self) -> &RenderCamera {
        &self.camera
    }

    /// Passes in draw order.
    pub fn passes(&self) -> &[RenderPass<'a>] {
        &self.passes
    }
}

/// Camera groups sharing one render target.
#[derive(Debug, Clone)]
pub struct TargetRenderPassGroup<'a> {
    target: Option<Arc<RenderTargetGroup>>,
    camera_groups: Vec<CameraRenderPassGroup<'a>>,
}

impl<'a> TargetRenderPassGroup<'a> {
    /// Creates a target group. `None` targets the default framebuffer.
    pub fn new(
        target: Option<Arc<RenderTargetGroup>>,
        camera_groups: Vec<CameraRenderPassGroup<'a>>,
    ) -> Self {
        Self {
            target,
            camera_groups,
        }
    }

    /// The render target, or `None` for the default framebuffer.
    pub fn target(&self) -> Option<&Arc<RenderTargetGroup>> {
        self.target.as_ref()
    }

    /// Camera groups in draw order.
    pub fn camera_groups(&self) -> &[CameraRenderPassGroup<'a>] {
        &self.camera_groups
    }

    /// Total number of passes across all camera groups.
    pub fn pass_count(&self) -> usize {
        self.camera_groups.iter().map(|g| g.passes().len()).sum()
    }

    /// Total number of pass objects across all passes.
    pub fn pass_object_count(&self) -> usize {
        self.camera_groups
            .iter()
            .flat_map(|g| g.passes())
            .map(|p| p.objects().len())
            .sum()
    }
}

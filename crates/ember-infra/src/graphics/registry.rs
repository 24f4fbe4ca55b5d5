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

//! Lookup from resource identity to backend representation.

use super::ProcessError;
use ahash::AHashMap;
use ember_core::renderer::api::{
    GpuResource, MeshHandle, ResourceId, ShaderHandle, TargetGroupHandle, TextureHandle,
};

/// Maps loaded resources to the backend objects created for them.
///
/// This replaces the opaque per-resource extension pointer: the processor
/// owns the mapping and the resource objects stay backend-agnostic.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: AHashMap<ResourceId, GpuResource>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the backend object for `id`, returning the previous one.
    pub fn insert(&mut self, id: ResourceId, resource: GpuResource) -> Option<GpuResource> {
        self.resources.insert(id, resource)
    }

    /// Forgets `id`, returning its backend object.
    pub fn remove(&mut self, id: ResourceId) -> Option<GpuResource> {
        self.resources.remove(&id)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Drains every live resource.
    pub fn drain(&mut self) -> impl Iterator<Item = (ResourceId, GpuResource)> + '_ {
        self.resources.drain()
    }

    /// Returns the shader handle for `id`.
    pub fn shader(&self, id: ResourceId) -> Result<ShaderHandle, ProcessError> {
        match self.resources.get(&id) {
            Some(GpuResource::Shader(handle)) => Ok(*handle),
            _ => Err(not_loaded("shader", id)),
        }
    }

    /// Returns the texture handle for `id`.
    pub fn texture(&self, id: ResourceId) -> Result<TextureHandle, ProcessError> {
        match self.resources.get(&id) {
            Some(GpuResource::Texture(handle)) => Ok(*handle),
            _ => Err(not_loaded("texture", id)),
        }
    }

    /// Returns the mesh handle for `id`.
    pub fn mesh(&self, id: ResourceId) -> Result<MeshHandle, ProcessError> {
        match self.resources.get(&id) {
            Some(GpuResource::Mesh(handle)) => Ok(*handle),
            _ => Err(not_loaded("mesh", id)),
        }
    }

    /// Returns the target group handle for `id`.
    pub fn target_group(&self, id: ResourceId) -> Result<TargetGroupHandle, ProcessError> {
        match self.resources.get(&id) {
            Some(GpuResource::TargetGroup(handle)) => Ok(*handle),
            _ => Err(not_loaded("target group", id)),
        }
    }
}

fn not_loaded(kind: &'static str, id: ResourceId) -> ProcessError {
    ProcessError::ResourceNotLoaded { kind, id }
}

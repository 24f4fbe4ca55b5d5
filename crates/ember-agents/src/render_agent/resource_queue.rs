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

//! Load and unload commands queued from anywhere in the engine.

use crossbeam_channel::{Receiver, Sender};
use ember_core::renderer::api::{
    RenderCommand, RenderCommandList, RenderMaterialGroup, RenderMesh, RenderShader,
    RenderTargetGroup, RenderTexture,
};
use std::sync::Arc;

/// A cloneable handle for queueing resource commands.
///
/// Loads are spliced in front of the next frame's commands and unloads
/// behind them, each in the order they were queued. A target group must
/// therefore be queued after the textures it attaches.
#[derive(Debug, Clone)]
pub struct ResourceSender {
    loads: Sender<RenderCommand>,
    unloads: Sender<RenderCommand>,
}

impl ResourceSender {
    /// Queues a shader for compilation.
    pub fn load_shader(
        &self,
        shader: Arc<RenderShader>,
        vertex_source: impl Into<String>,
        fragment_source: impl Into<String>,
    ) {
        self.load(RenderCommand::LoadShader {
            shader,
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        });
    }

    /// Queues a texture upload. `None` allocates storage only.
    pub fn load_texture(&self, texture: Arc<RenderTexture>, data: Option<Box<[u8]>>) {
        self.load(RenderCommand::LoadTexture { texture, data });
    }

    /// Queues a material group.
    pub fn load_material_group(&self, material_group: Arc<RenderMaterialGroup>) {
        self.load(RenderCommand::LoadMaterialGroup { material_group });
    }

    /// Queues a static mesh upload.
    pub fn load_mesh(&self, mesh: Arc<RenderMesh>, vertex_data: Box<[u8]>, index_data: Box<[u8]>) {
        self.load(RenderCommand::LoadMesh {
            mesh,
            vertex_data,
            index_data,
        });
    }

    /// Queues a target group. Its textures must already be queued.
    pub fn load_target_group(&self, target: Arc<RenderTargetGroup>) {
        self.load(RenderCommand::LoadTargetGroup { target });
    }

    /// Queues the release of a shader.
    pub fn unload_shader(&self, shader: Arc<RenderShader>) {
        self.unload(RenderCommand::UnloadShader { shader });
    }

    /// Queues the release of a texture.
    pub fn unload_texture(&self, texture: Arc<RenderTexture>) {
        self.unload(RenderCommand::UnloadTexture { texture });
    }

    /// Queues the release of a material group.
    pub fn unload_material_group(&self, material_group: Arc<RenderMaterialGroup>) {
        self.unload(RenderCommand::UnloadMaterialGroup { material_group });
    }

    /// Queues the release of a static mesh.
    pub fn unload_mesh(&self, mesh: Arc<RenderMesh>) {
        self.unload(RenderCommand::UnloadMesh { mesh });
    }

    /// Queues the release of a target group.
    pub fn unload_target_group(&self, target: Arc<RenderTargetGroup>) {
        self.unload(RenderCommand::UnloadTargetGroup { target });
    }

    // The queue owns the receivers, so a failed send means it was dropped
    // together with its agent and there is nothing left to load into.
    fn load(&self, command: RenderCommand) {
        if self.loads.send(command).is_err() {
            log::warn!("ResourceSender: render agent dropped, load discarded");
        }
    }

    fn unload(&self, command: RenderCommand) {
        if self.unloads.send(command).is_err() {
            log::warn!("ResourceSender: render agent dropped, unload discarded");
        }
    }
}

/// The receiving end of the resource command queue.
#[derive(Debug)]
pub struct ResourceCommandQueue {
    sender: ResourceSender,
    loads: Receiver<RenderCommand>,
    unloads: Receiver<RenderCommand>,
}

impl ResourceCommandQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (loads_tx, loads_rx) = crossbeam_channel::unbounded();
        let (unloads_tx, unloads_rx) = crossbeam_channel::unbounded();
        Self {
            sender: ResourceSender {
                loads: loads_tx,
                unloads: unloads_tx,
            },
            loads: loads_rx,
            unloads: unloads_rx,
        }
    }

    /// Returns a new handle for queueing commands.
    pub fn sender(&self) -> ResourceSender {
        self.sender.clone()
    }

    /// Number of commands waiting.
    pub fn pending(&self) -> usize {
        self.loads.len() + self.unloads.len()
    }

    /// Takes every queued command: loads first, unloads second.
    pub fn drain(&self) -> (RenderCommandList, RenderCommandList) {
        let loads = self.loads.try_iter().collect();
        let unloads = self.unloads.try_iter().collect();
        (loads, unloads)
    }
}

impl Default for ResourceCommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

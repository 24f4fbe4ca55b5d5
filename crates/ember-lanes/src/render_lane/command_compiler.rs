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

//! Flattens compiled pass groups into render command lists.

use ember_core::renderer::api::{
    RenderCommandList, RenderFrame, RenderObjectMesh, ResourceId, TargetRenderPassGroup,
};
use ember_core::{Task, TaskContext};

/// Converts target pass groups into one command list per target.
///
/// Each list is bracketed by `Begin`/`End`. Materials and meshes are only
/// re-applied when they change between consecutive objects of a pass, which
/// the sorters arrange to be rare for opaque passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderCommandCompiler;

impl RenderCommandCompiler {
    /// Creates a command compiler.
    pub fn new() -> Self {
        Self
    }

    /// Compiles every target group concurrently. The returned lists are in
    /// the same order as `groups`, which is the order they must execute in.
    pub fn compile(
        &self,
        task_context: &dyn TaskContext,
        frame: &RenderFrame,
        groups: &[TargetRenderPassGroup<'_>],
    ) -> Vec<RenderCommandList> {
        let mut lists = vec![RenderCommandList::new(); groups.len()];
        {
            let tasks: Vec<Task<'_>> = groups
                .iter()
                .zip(lists.iter_mut())
                .map(|(group, slot)| {
                    Box::new(move |_: &dyn TaskContext| {
                        *slot = Self::compile_target_group(frame, group);
                    }) as Task<'_>
                })
                .collect();
            task_context.process_child_tasks(tasks);
        }
        lists
    }

    fn compile_target_group(frame: &RenderFrame, group: &TargetRenderPassGroup<'_>) -> RenderCommandList {
        let mut list = RenderCommandList::new();
        let resolution = group
            .target()
            .map(|target| target.resolution())
            .unwrap_or(frame.resolution);
        list.add_begin(group.target().cloned(), resolution, frame.clear_colour);

        for camera_group in group.camera_groups() {
            let camera = camera_group.camera();
            list.add_apply_camera(camera.position(), camera.view_projection());

            for pass in camera_group.passes().iter().filter(|p| !p.objects().is_empty()) {
                if let Some(light) = pass.light() {
                    list.add_apply_light(light.clone());
                }

                let mut current_material: Option<ResourceId> = None;
                let mut current_mesh: Option<ResourceId> = None;
                for object in pass.objects() {
                    if current_material != Some(object.material.id()) {
                        list.add_apply_material(object.material.clone());
                        current_material = Some(object.material.id());
                        current_mesh = None;
                    }
                    if current_mesh != Some(object.mesh.id()) {
                        match object.mesh {
                            RenderObjectMesh::Static(mesh) => list.add_apply_mesh(mesh.clone()),
                            RenderObjectMesh::Dynamic(mesh) => {
                                list.add_apply_dynamic_mesh(mesh.clone())
                            }
                        }
                        current_mesh = Some(object.mesh.id());
                    }
                    list.add_render_instance(object.world_matrix);
                }
            }
        }

        list.add_end();
        list
    }
}

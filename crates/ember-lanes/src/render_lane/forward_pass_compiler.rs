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

//! The forward renderer's pass planner.
//!
//! A frame is decomposed into one target group per shadow-casting directional
//! light followed by the main target group. The main target holds the scene
//! camera group (base, per-light and transparent passes) and the UI camera
//! group. Every independent unit of work is forked through the task context
//! and writes into its own pre-sized slot, so no locking is needed.

use super::{RenderPassCompiler, RenderPassObjectSorter, RenderPassVisibilityChecker, ShadowPassLane};
use crate::error::CompileError;
use ember_core::math::UVec2;
use ember_core::renderer::api::{
    CameraRenderPassGroup, ForwardRenderPass, RenderCamera, RenderFrame, RenderLayer,
    RenderObject, RenderPass, RenderPassObject, TargetRenderPassGroup,
};
use ember_core::renderer::{
    DirectionalRenderLight, DirectionalShadow, PointRenderLight, RenderLight, RenderSettings,
};
use ember_core::{Task, TaskContext};

/// Plans forward-rendered frames.
#[derive(Debug, Clone, Copy)]
pub struct ForwardRenderPassCompiler {
    visibility: RenderPassVisibilityChecker,
    shadow_lane: ShadowPassLane,
    shadows_enabled: bool,
}

enum TargetJob<'f> {
    Shadow(&'f DirectionalShadow),
    Main,
}

enum ScenePassJob<'f> {
    Base,
    Directional(&'f DirectionalRenderLight),
    Point(&'f PointRenderLight),
    Transparent,
}

impl ForwardRenderPassCompiler {
    /// Creates a compiler configured from `settings`.
    pub fn new(settings: &RenderSettings) -> Self {
        let visibility = RenderPassVisibilityChecker::new(settings.visibility_batch_size);
        Self {
            visibility,
            shadow_lane: ShadowPassLane::new(visibility, settings.shadow_culling),
            shadows_enabled: settings.shadows_enabled,
        }
    }

    /// Number of target groups `frame` compiles to: one per shadow-casting
    /// directional light plus the main target.
    pub fn target_count(&self, frame: &RenderFrame) -> usize {
        self.shadow_casters(frame).count() + 1
    }

    /// Number of passes in the scene camera group: base, transparent and
    /// one per light.
    pub fn scene_pass_count(frame: &RenderFrame) -> usize {
        2 + frame.directional_lights.len() + frame.point_lights.len()
    }

    fn shadow_casters<'f>(
        &self,
        frame: &'f RenderFrame,
    ) -> impl Iterator<Item = &'f DirectionalShadow> + 'f {
        let enabled = self.shadows_enabled;
        frame
            .directional_lights
            .iter()
            .filter_map(move |light| light.shadow.as_ref().filter(|_| enabled))
    }

    fn compile_main_target<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
        standard_objects: &[&'f RenderObject],
        ui_objects: &[&'f RenderObject],
    ) -> Result<TargetRenderPassGroup<'f>, CompileError> {
        let mut scene_slot: Option<CameraRenderPassGroup<'f>> = None;
        let mut ui_slot: Option<Result<CameraRenderPassGroup<'f>, CompileError>> = None;
        {
            let scene_slot = &mut scene_slot;
            let ui_slot = &mut ui_slot;
            let tasks: Vec<Task<'_>> = vec![
                Box::new(move |ctx: &dyn TaskContext| {
                    *scene_slot = Some(self.compile_scene_camera_group(ctx, frame, standard_objects));
                }) as Task<'_>,
                Box::new(move |ctx: &dyn TaskContext| {
                    *ui_slot = Some(self.compile_ui_camera_group(ctx, frame, ui_objects));
                }) as Task<'_>,
            ];
            task_context.process_child_tasks(tasks);
        }

        let camera_groups = [scene_slot.map(Ok), ui_slot]
            .into_iter()
            .flatten()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TargetRenderPassGroup::new(frame.target.clone(), camera_groups))
    }

    fn compile_scene_camera_group<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
        standard_objects: &[&'f RenderObject],
    ) -> CameraRenderPassGroup<'f> {
        let visible =
            self.visibility
                .calculate_visible_objects(task_context, &frame.camera, standard_objects);

        let mut jobs = Vec::with_capacity(Self::scene_pass_count(frame));
        jobs.push(ScenePassJob::Base);
        jobs.extend(frame.directional_lights.iter().map(ScenePassJob::Directional));
        jobs.extend(frame.point_lights.iter().map(ScenePassJob::Point));
        jobs.push(ScenePassJob::Transparent);

        let mut slots: Vec<Option<RenderPass<'f>>> =
            std::iter::repeat_with(|| None).take(jobs.len()).collect();
        {
            let visible = visible.as_slice();
            let tasks: Vec<Task<'_>> = jobs
                .into_iter()
                .zip(slots.iter_mut())
                .map(|(job, slot)| {
                    Box::new(move |_: &dyn TaskContext| {
                        *slot = Some(self.compile_scene_pass(frame, visible, job));
                    }) as Task<'_>
                })
                .collect();
            task_context.process_child_tasks(tasks);
        }

        CameraRenderPassGroup::new(frame.camera, slots.into_iter().flatten().collect())
    }

    fn compile_scene_pass<'f>(
        &self,
        frame: &'f RenderFrame,
        visible: &[&'f RenderObject],
        job: ScenePassJob<'f>,
    ) -> RenderPass<'f> {
        let ambient = RenderLight::Ambient(frame.ambient_light);
        match job {
            ScenePassJob::Base => {
                let mut objects = resolve_pass_objects(visible.iter().copied(), ForwardRenderPass::Base);
                RenderPassObjectSorter::opaque_sort(&frame.camera, &mut objects);
                RenderPass::new(Some(ambient), objects)
            }
            ScenePassJob::Directional(light) => {
                let mut light = light.clone();
                if !self.shadows_enabled {
                    light.shadow = None;
                }
                let pass = if light.shadow.is_some() {
                    ForwardRenderPass::DirectionalLightShadows
                } else {
                    ForwardRenderPass::DirectionalLight
                };
                let mut objects = resolve_pass_objects(visible.iter().copied(), pass);
                RenderPassObjectSorter::opaque_sort(&frame.camera, &mut objects);
                RenderPass::new(Some(RenderLight::Directional(light)), objects)
            }
            ScenePassJob::Point(light) => {
                let influence = light.bounding_sphere();
                let in_range = visible
                    .iter()
                    .copied()
                    .filter(|object| object.bounding_sphere().intersects(&influence));
                let mut objects = resolve_pass_objects(in_range, ForwardRenderPass::PointLight);
                RenderPassObjectSorter::opaque_sort(&frame.camera, &mut objects);
                RenderPass::new(Some(RenderLight::Point(*light)), objects)
            }
            ScenePassJob::Transparent => {
                let mut objects =
                    resolve_pass_objects(visible.iter().copied(), ForwardRenderPass::Transparent);
                RenderPassObjectSorter::transparent_sort(&frame.camera, &mut objects);
                RenderPass::new(Some(ambient), objects)
            }
        }
    }

    fn compile_ui_camera_group<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
        ui_objects: &[&'f RenderObject],
    ) -> Result<CameraRenderPassGroup<'f>, CompileError> {
        let camera = RenderCamera::ui(frame.resolution.max(UVec2::ONE));
        let visible = self
            .visibility
            .calculate_visible_objects(task_context, &camera, ui_objects);

        let mut objects = Vec::with_capacity(visible.len());
        for object in visible {
            let material = object.material(ForwardRenderPass::Transparent).ok_or(
                CompileError::MissingUiMaterial {
                    mesh: object.mesh().id(),
                    vertex_format: object.vertex_format(),
                },
            )?;
            objects.push(RenderPassObject::new(object, material));
        }
        RenderPassObjectSorter::priority_sort(&mut objects);

        let passes = if objects.is_empty() {
            Vec::new()
        } else {
            vec![RenderPass::new(
                Some(RenderLight::Ambient(frame.ambient_light)),
                objects,
            )]
        };
        Ok(CameraRenderPassGroup::new(camera, passes))
    }
}

impl Default for ForwardRenderPassCompiler {
    fn default() -> Self {
        Self::new(&RenderSettings::default())
    }
}

impl RenderPassCompiler for ForwardRenderPassCompiler {
    fn strategy_name(&self) -> &'static str {
        "Forward"
    }

    fn compile_target_render_pass_groups<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
    ) -> Result<Vec<TargetRenderPassGroup<'f>>, CompileError> {
        let standard_objects = layer_objects(frame, RenderLayer::Standard);
        let ui_objects = layer_objects(frame, RenderLayer::Ui);

        let mut jobs: Vec<TargetJob<'f>> = self.shadow_casters(frame).map(TargetJob::Shadow).collect();
        jobs.push(TargetJob::Main);

        let mut slots: Vec<Option<Result<TargetRenderPassGroup<'f>, CompileError>>> =
            std::iter::repeat_with(|| None).take(jobs.len()).collect();
        {
            let standard_objects = standard_objects.as_slice();
            let ui_objects = ui_objects.as_slice();
            let tasks: Vec<Task<'_>> = jobs
                .into_iter()
                .zip(slots.iter_mut())
                .map(|(job, slot)| {
                    Box::new(move |ctx: &dyn TaskContext| {
                        *slot = Some(match job {
                            TargetJob::Shadow(shadow) => {
                                Ok(self.shadow_lane.compile(ctx, frame, shadow, standard_objects))
                            }
                            TargetJob::Main => {
                                self.compile_main_target(ctx, frame, standard_objects, ui_objects)
                            }
                        });
                    }) as Task<'_>
                })
                .collect();
            task_context.process_child_tasks(tasks);
        }

        let groups = slots
            .into_iter()
            .flatten()
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "ForwardRenderPassCompiler: compiled {} target groups for {} render objects",
            groups.len(),
            frame.render_objects.len()
        );
        Ok(groups)
    }
}

fn layer_objects(frame: &RenderFrame, layer: RenderLayer) -> Vec<&RenderObject> {
    frame
        .render_objects
        .iter()
        .filter(|object| object.layer() == layer)
        .collect()
}

// Objects without a material for `pass` silently take no part in it.
fn resolve_pass_objects<'f>(
    objects: impl Iterator<Item = &'f RenderObject>,
    pass: ForwardRenderPass,
) -> Vec<RenderPassObject<'f>> {
    objects
        .filter_map(|object| {
            object
                .material(pass)
                .map(|material| RenderPassObject::new(object, material))
        })
        .collect()
}

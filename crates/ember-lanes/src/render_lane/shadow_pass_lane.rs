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

//! Compiles the depth-only pass that fills a directional light's shadow map.

use super::{RenderPassObjectSorter, RenderPassVisibilityChecker};
use ember_core::renderer::api::{
    CameraRenderPassGroup, ForwardRenderPass, RenderCamera, RenderFrame, RenderObject, RenderPass,
    RenderPassObject, TargetRenderPassGroup,
};
use ember_core::renderer::{DirectionalShadow, ShadowCulling};
use ember_core::TaskContext;

/// Builds one shadow map target group per shadow-casting directional light.
#[derive(Debug, Clone, Copy)]
pub struct ShadowPassLane {
    visibility: RenderPassVisibilityChecker,
    culling: ShadowCulling,
}

impl ShadowPassLane {
    /// Creates a shadow lane with the given culling policy.
    pub fn new(visibility: RenderPassVisibilityChecker, culling: ShadowCulling) -> Self {
        Self {
            visibility,
            culling,
        }
    }

    /// The culling policy in use.
    pub fn culling(&self) -> ShadowCulling {
        self.culling
    }

    /// Compiles the target group rendering `standard_objects` into the
    /// shadow map of `shadow`.
    ///
    /// Only visible, shadow-casting, non-transparent objects with a
    /// shadow map material take part. The result is always exactly one
    /// camera group holding exactly one pass.
    pub fn compile<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
        shadow: &DirectionalShadow,
        standard_objects: &[&'f RenderObject],
    ) -> TargetRenderPassGroup<'f> {
        let (cull_camera, group_camera) = match self.culling {
            ShadowCulling::LightVolume => {
                let light_camera = shadow.camera();
                (light_camera, light_camera)
            }
            ShadowCulling::MainCamera => (frame.camera, RenderCamera::default()),
        };

        let visible =
            self.visibility
                .calculate_visible_objects(task_context, &cull_camera, standard_objects);

        let mut objects: Vec<RenderPassObject<'f>> = visible
            .into_iter()
            .filter(|object| object.casts_shadows() && !object.is_transparent())
            .filter_map(|object| {
                object
                    .material(ForwardRenderPass::ShadowMap)
                    .map(|material| RenderPassObject::new(object, material))
            })
            .collect();
        RenderPassObjectSorter::opaque_sort(&cull_camera, &mut objects);

        log::trace!(
            "ShadowPassLane: {} shadow casters for target {:?}",
            objects.len(),
            shadow.target.id()
        );

        TargetRenderPassGroup::new(
            Some(shadow.target.clone()),
            vec![CameraRenderPassGroup::new(
                group_camera,
                vec![RenderPass::new(None, objects)],
            )],
        )
    }
}

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

//! Camera visibility checks for render objects.

use ember_core::math::{Frustum, Mat4, Sphere};
use ember_core::renderer::api::{RenderCamera, RenderObject};
use ember_core::{Task, TaskContext};

/// Culls render objects against a camera.
///
/// Perspective cameras cull against their six frustum planes, orthographic
/// cameras against the viewport box between their near and far planes. The filter is stable: retained
/// objects keep their relative input order, which the sorters rely on for
/// deterministic tie-breaking.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassVisibilityChecker {
    batch_size: usize,
}

impl RenderPassVisibilityChecker {
    /// Creates a checker that splits inputs larger than `batch_size` into
    /// one task per batch.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the subset of `objects` whose bounding spheres may be seen
    /// by `camera`, in input order.
    pub fn calculate_visible_objects<'o>(
        &self,
        task_context: &dyn TaskContext,
        camera: &RenderCamera,
        objects: &[&'o RenderObject],
    ) -> Vec<&'o RenderObject> {
        let predicate = CullPredicate::for_camera(camera);

        if objects.len() <= self.batch_size {
            return predicate.filter(objects);
        }

        let chunks: Vec<&[&'o RenderObject]> = objects.chunks(self.batch_size).collect();
        let mut results: Vec<Vec<&'o RenderObject>> = vec![Vec::new(); chunks.len()];
        {
            let predicate = &predicate;
            let tasks: Vec<Task<'_>> = chunks
                .into_iter()
                .zip(results.iter_mut())
                .map(|(chunk, slot)| {
                    Box::new(move |_: &dyn TaskContext| *slot = predicate.filter(chunk))
                        as Task<'_>
                })
                .collect();
            task_context.process_child_tasks(tasks);
        }

        results.into_iter().flatten().collect()
    }
}

impl Default for RenderPassVisibilityChecker {
    fn default() -> Self {
        Self::new(256)
    }
}

enum CullPredicate {
    Frustum(Frustum),
    Viewport(Mat4),
}

impl CullPredicate {
    fn for_camera(camera: &RenderCamera) -> Self {
        if camera.is_orthographic() {
            CullPredicate::Viewport(camera.view_projection())
        } else {
            CullPredicate::Frustum(camera.frustum())
        }
    }

    fn is_visible(&self, sphere: &Sphere) -> bool {
        match self {
            CullPredicate::Frustum(frustum) => frustum.intersects_sphere(sphere),
            CullPredicate::Viewport(view_projection) => {
                // Affine projection: NDC extents scale linearly with the radius.
                // Depth is zero-to-one.
                let ndc = view_projection.project_point3(sphere.center);
                let reach_x = sphere.radius * view_projection.row(0).truncate().length();
                let reach_y = sphere.radius * view_projection.row(1).truncate().length();
                let reach_z = sphere.radius * view_projection.row(2).truncate().length();
                ndc.x.abs() <= 1.0 + reach_x
                    && ndc.y.abs() <= 1.0 + reach_y
                    && ndc.z + reach_z >= 0.0
                    && ndc.z - reach_z <= 1.0
            }
        }
    }

    fn filter<'o>(&self, objects: &[&'o RenderObject]) -> Vec<&'o RenderObject> {
        objects
            .iter()
            .copied()
            .filter(|object| self.is_visible(&object.bounding_sphere()))
            .collect()
    }
}

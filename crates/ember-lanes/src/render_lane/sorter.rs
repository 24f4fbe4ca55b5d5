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

//! Ordering policies for the objects of a render pass.
//!
//! All policies use a stable sort, so objects with equal keys keep their
//! input order and identical frames always produce identical draw orders.

use ember_core::math::Vec3;
use ember_core::renderer::api::{RenderCamera, RenderPassObject};

/// Sorts pass objects according to the pass kind.
pub struct RenderPassObjectSorter;

impl RenderPassObjectSorter {
    /// Groups objects by shader then material to minimise state changes,
    /// and orders each group front to back.
    pub fn opaque_sort(camera: &RenderCamera, objects: &mut [RenderPassObject<'_>]) {
        let eye = camera.position();
        objects.sort_by(|a, b| {
            a.material
                .sort_key()
                .cmp(&b.material.sort_key())
                .then_with(|| depth(eye, a).total_cmp(&depth(eye, b)))
        });
    }

    /// Orders objects back to front. Materials are never reordered, since
    /// changing the order of alpha blends changes the image.
    pub fn transparent_sort(camera: &RenderCamera, objects: &mut [RenderPassObject<'_>]) {
        let eye = camera.position();
        objects.sort_by(|a, b| depth(eye, b).total_cmp(&depth(eye, a)));
    }

    /// Orders objects by their explicit priority, lowest first.
    pub fn priority_sort(objects: &mut [RenderPassObject<'_>]) {
        objects.sort_by_key(|object| object.priority);
    }
}

// Squared distance preserves the ordering of true distance.
#[inline]
fn depth(eye: Vec3, object: &RenderPassObject<'_>) -> f32 {
    eye.distance_squared(object.bounding_sphere.center)
}

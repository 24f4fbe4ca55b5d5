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

//! Lights as seen by the forward renderer.
//!
//! A frame carries one ambient light, any number of directional lights and
//! any number of point lights. Each non-ambient light produces one additive
//! render pass; directional lights may additionally own a shadow map.

use crate::math::{LinearRgba, Mat4, Sphere, Vec3};
use crate::renderer::api::{RenderCamera, RenderTargetGroup};
use std::sync::Arc;

/// Uniform, direction-less light applied in the base pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientRenderLight {
    /// Light colour, intensity premultiplied.
    pub colour: LinearRgba,
}

impl Default for AmbientRenderLight {
    fn default() -> Self {
        Self {
            colour: LinearRgba::rgb(0.3, 0.3, 0.3),
        }
    }
}

/// The orthographic volume a directional light's shadow map covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowVolume {
    /// Width of the volume in world units.
    pub width: f32,
    /// Height of the volume in world units.
    pub height: f32,
    /// Near plane distance along the light direction.
    pub near: f32,
    /// Far plane distance along the light direction.
    pub far: f32,
}

impl Default for ShadowVolume {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 30.0,
            near: 1.0,
            far: 30.0,
        }
    }
}

/// Shadow configuration owned by a directional light.
#[derive(Debug, Clone)]
pub struct DirectionalShadow {
    /// Depth target the shadow pass renders into.
    pub target: Arc<RenderTargetGroup>,
    /// World transform of the light-space camera.
    pub light_world_matrix: Mat4,
    /// Extent of the shadow map's orthographic projection.
    pub volume: ShadowVolume,
    /// Depth bias applied when sampling the shadow map.
    pub tolerance: f32,
}

impl DirectionalShadow {
    /// The orthographic camera the shadow map is rendered from.
    pub fn camera(&self) -> RenderCamera {
        let half_w = self.volume.width * 0.5;
        let half_h = self.volume.height * 0.5;
        RenderCamera::new(
            self.light_world_matrix,
            Mat4::orthographic_rh(
                -half_w,
                half_w,
                -half_h,
                half_h,
                self.volume.near,
                self.volume.far,
            ),
        )
    }

    /// World to light clip space, used by the main pass to sample the map.
    pub fn light_view_projection(&self) -> Mat4 {
        self.camera().view_projection()
    }
}

/// An infinitely distant light shining along `direction`.
#[derive(Debug, Clone)]
pub struct DirectionalRenderLight {
    /// Light colour, intensity premultiplied.
    pub colour: LinearRgba,
    /// Normalized world-space direction the light travels in.
    pub direction: Vec3,
    /// Shadow map configuration. `None` renders the light without shadows.
    pub shadow: Option<DirectionalShadow>,
}

impl DirectionalRenderLight {
    /// Creates a light without shadows.
    pub fn new(colour: LinearRgba, direction: Vec3) -> Self {
        Self {
            colour,
            direction: direction.normalize_or_zero(),
            shadow: None,
        }
    }

    /// Attaches a shadow map to the light.
    pub fn with_shadow(mut self, shadow: DirectionalShadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Returns the shadow map target, if the light owns one.
    pub fn shadow_target(&self) -> Option<&Arc<RenderTargetGroup>> {
        self.shadow.as_ref().map(|s| &s.target)
    }
}

/// A light radiating from a point with a finite range of influence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRenderLight {
    /// Light colour, intensity premultiplied.
    pub colour: LinearRgba,
    /// World-space position.
    pub position: Vec3,
    /// Constant, linear and quadratic attenuation terms.
    pub attenuation: Vec3,
    /// Distance beyond which the light contributes nothing.
    pub range: f32,
}

impl PointRenderLight {
    /// Creates a point light with the given range and a default falloff.
    pub fn new(colour: LinearRgba, position: Vec3, range: f32) -> Self {
        Self {
            colour,
            position,
            attenuation: Vec3::new(1.0, 0.0, 1.0 / (range * range).max(f32::EPSILON)),
            range,
        }
    }

    /// The sphere of influence used to filter the light's pass.
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.position, self.range)
    }
}

/// The light bound to a render pass.
#[derive(Debug, Clone)]
pub enum RenderLight {
    /// Ambient light, bound by the base pass.
    Ambient(AmbientRenderLight),
    /// A directional light, with or without shadows.
    Directional(DirectionalRenderLight),
    /// A point light.
    Point(PointRenderLight),
}

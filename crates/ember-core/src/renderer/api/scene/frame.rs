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

//! The immutable per-frame snapshot handed to the pass compiler.

use crate::math::{LinearRgba, UVec2};
use crate::renderer::api::{RenderCamera, RenderObject, RenderTargetGroup};
use crate::renderer::light::{AmbientRenderLight, DirectionalRenderLight, PointRenderLight};
use std::sync::Arc;

/// Everything needed to plan one rendered frame.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Offscreen main target. `None` renders to the default framebuffer.
    pub target: Option<Arc<RenderTargetGroup>>,
    /// Resolution of the main target in pixels.
    pub resolution: UVec2,
    /// Colour the main target is cleared to.
    pub clear_colour: LinearRgba,
    /// The scene camera.
    pub camera: RenderCamera,
    /// The single ambient light.
    pub ambient_light: AmbientRenderLight,
    /// Directional lights in authoring order.
    pub directional_lights: Vec<DirectionalRenderLight>,
    /// Point lights in authoring order.
    pub point_lights: Vec<PointRenderLight>,
    /// Every drawable instance in the frame.
    pub render_objects: Vec<RenderObject>,
}

impl RenderFrame {
    /// Creates a frame with no lights besides the default ambient and no objects.
    pub fn new(resolution: UVec2, camera: RenderCamera) -> Self {
        Self {
            target: None,
            resolution,
            clear_colour: LinearRgba::CLEAR_GREY,
            camera,
            ambient_light: AmbientRenderLight::default(),
            directional_lights: Vec::new(),
            point_lights: Vec::new(),
            render_objects: Vec::new(),
        }
    }

    /// Number of directional lights that own a shadow map target.
    pub fn shadow_casting_light_count(&self) -> usize {
        self.directional_lights
            .iter()
            .filter(|light| light.shadow.is_some())
            .count()
    }
}

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

//! Runtime settings for the forward renderer.

use crate::math::LinearRgba;
use serde::Deserialize;

/// Which volume shadow map passes are culled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ShadowCulling {
    /// Cull against the light's orthographic shadow volume, and render the
    /// shadow map from the light's camera.
    #[default]
    LightVolume,
    /// Cull against the main camera with an unset shadow camera.
    MainCamera,
}

/// Configuration for the pass compiler, task pool and render thread.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Worker threads for pass compilation. `0` uses the available parallelism.
    pub worker_threads: usize,
    /// Objects visibility-checked per task before the work is split.
    pub visibility_batch_size: usize,
    /// Default clear colour for frames that do not set one.
    pub clear_colour: LinearRgba,
    /// Whether directional lights with a shadow target produce shadow passes.
    pub shadows_enabled: bool,
    /// Culling volume for shadow passes.
    pub shadow_culling: ShadowCulling,
    /// Frames that may wait for the render thread before submission blocks.
    pub submission_queue_depth: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            visibility_batch_size: 256,
            clear_colour: LinearRgba::CLEAR_GREY,
            shadows_enabled: true,
            shadow_culling: ShadowCulling::LightVolume,
            submission_queue_depth: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "worker_threads": 3, "shadow_culling": "MainCamera" }"#)
                .expect("valid settings");
        assert_eq!(settings.worker_threads, 3);
        assert_eq!(settings.shadow_culling, ShadowCulling::MainCamera);
        assert_eq!(settings.visibility_batch_size, 256);
        assert!(settings.shadows_enabled);
    }
}

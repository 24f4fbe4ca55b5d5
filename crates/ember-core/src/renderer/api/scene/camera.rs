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

//! The camera a frame or pass group is rendered from.

use crate::math::{Frustum, Mat4, UVec2, Vec3};

/// A camera described by its world transform and projection.
///
/// Projections follow the `glam` zero-to-one depth convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCamera {
    world_matrix: Mat4,
    projection: Mat4,
}

impl RenderCamera {
    /// Creates a camera from a world transform and a projection matrix.
    pub fn new(world_matrix: Mat4, projection: Mat4) -> Self {
        Self {
            world_matrix,
            projection,
        }
    }

    /// A right-handed perspective camera.
    pub fn perspective(world_matrix: Mat4, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(world_matrix, Mat4::perspective_rh(fov_y, aspect, near, far))
    }

    /// The screen-space camera used for the UI layer: origin at the bottom
    /// left, one unit per pixel, depth range `[0, 1]`.
    pub fn ui(resolution: UVec2) -> Self {
        Self::new(
            Mat4::IDENTITY,
            Mat4::orthographic_lh(0.0, resolution.x as f32, 0.0, resolution.y as f32, 0.0, 1.0),
        )
    }

    /// World transform of the camera.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    /// Projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World to view transform.
    pub fn view(&self) -> Mat4 {
        self.world_matrix.inverse()
    }

    /// World to clip transform.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    /// Returns `true` if the projection is affine (no perspective divide).
    pub fn is_orthographic(&self) -> bool {
        let p = &self.projection;
        p.x_axis.w == 0.0 && p.y_axis.w == 0.0 && p.z_axis.w == 0.0 && p.w_axis.w == 1.0
    }

    /// The six clipping planes of the camera's view volume.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection())
    }
}

impl Default for RenderCamera {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perspective_is_not_orthographic() {
        let camera = RenderCamera::perspective(Mat4::IDENTITY, 1.0, 1.0, 0.1, 10.0);
        assert!(!camera.is_orthographic());
        assert!(RenderCamera::ui(UVec2::new(800, 600)).is_orthographic());
        assert!(RenderCamera::default().is_orthographic());
    }

    #[test]
    fn test_position_and_view() {
        let world = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let camera = RenderCamera::perspective(world, 1.0, 1.0, 0.1, 10.0);
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        let origin_in_view = camera.view().transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(origin_in_view.length(), 0.0);
    }

    #[test]
    fn test_ui_camera_maps_screen_corners() {
        let camera = RenderCamera::ui(UVec2::new(800, 600));
        let vp = camera.view_projection();
        let bottom_left = vp.project_point3(Vec3::ZERO);
        let top_right = vp.project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(bottom_left.x, -1.0);
        assert_relative_eq!(bottom_left.y, -1.0);
        assert_relative_eq!(top_right.x, 1.0);
        assert_relative_eq!(top_right.y, 1.0);
    }
}

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

//! Bounding volumes and the culling primitives built on top of them.

use glam::{Mat4, Vec3, Vec4};

/// A bounding sphere described by a center point and a radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    /// The center of the sphere.
    pub center: Vec3,
    /// The radius of the sphere. Expected to be non-negative.
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere.
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns `true` if the two spheres overlap or touch.
    #[inline]
    pub fn intersects(&self, other: &Sphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Returns `true` if `other` lies entirely inside this sphere.
    #[inline]
    pub fn contains(&self, other: &Sphere) -> bool {
        if other.radius > self.radius {
            return false;
        }
        self.center.distance(other.center) + other.radius <= self.radius
    }

    /// Returns `true` if the point lies inside or on the sphere.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Transforms the sphere by an affine matrix.
    ///
    /// The radius is scaled by the largest axis scale of the matrix, so the
    /// result is conservative for non-uniform scales.
    pub fn transformed(&self, matrix: &Mat4) -> Sphere {
        let scale = matrix
            .x_axis
            .truncate()
            .length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());
        Sphere::new(matrix.transform_point3(self.center), self.radius * scale)
    }
}

/// A plane in Hessian normal form: `dot(normal, p) + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal, pointing towards the inside of the volume it bounds.
    pub normal: Vec3,
    /// Signed distance term.
    pub d: f32,
}

impl Plane {
    /// Builds a normalized plane from raw `(a, b, c, d)` coefficients.
    pub fn from_coefficients(v: Vec4) -> Self {
        let normal = v.truncate();
        let length = normal.length();
        if length <= f32::EPSILON {
            return Self { normal: Vec3::ZERO, d: v.w };
        }
        Self {
            normal: normal / length,
            d: v.w / length,
        }
    }

    /// Signed distance from the plane to `point`. Positive is inside.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// The six clipping planes of a view volume, normals facing inwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Planes in the order left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the frustum planes from a view-projection matrix that maps
    /// depth to `[0, 1]` (the `glam` `*_rh`/`*_lh` convention).
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    /// Returns `true` if any part of the sphere may be inside the frustum.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(sphere.center) >= -sphere.radius)
    }
}

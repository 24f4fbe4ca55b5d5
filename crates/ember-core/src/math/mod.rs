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

//! Math primitives used by the renderer.
//!
//! Vector, matrix and quaternion types are re-exported from `glam`. The
//! bounding volumes used for visibility culling live in [`geometry`].

pub mod color;
pub mod geometry;

pub use self::color::*;
pub use self::geometry::*;
pub use glam::{Mat3, Mat4, Quat, UVec2, Vec2, Vec3, Vec4};

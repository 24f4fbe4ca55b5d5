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

//! Errors raised while compiling a frame's pass groups.

use ember_core::renderer::api::{ResourceId, VertexFormat};
use thiserror::Error;

/// A frame snapshot violated a compiler precondition.
///
/// These indicate authoring bugs upstream; the frame cannot be planned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Every UI object must be renderable in the transparent pass.
    #[error("UI render object with mesh {mesh:?} has no transparent material for {vertex_format:?}")]
    MissingUiMaterial {
        /// The offending object's mesh.
        mesh: ResourceId,
        /// The vertex format used for the lookup.
        vertex_format: VertexFormat,
    },
}

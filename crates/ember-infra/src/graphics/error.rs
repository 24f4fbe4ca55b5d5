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

//! Errors raised while replaying a command buffer.

use ember_core::renderer::api::ResourceId;
use ember_core::renderer::BackendError;
use thiserror::Error;

/// A command stream violated a processor precondition, or the backend failed.
///
/// The command buffer is produced in-process, so any of these indicates a
/// bug in resource load ordering or in command generation. The frame being
/// replayed is abandoned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// A resource was used or unloaded without a prior load.
    #[error("{kind} {id:?} used before it was loaded")]
    ResourceNotLoaded {
        /// The kind of resource.
        kind: &'static str,
        /// The resource identity.
        id: ResourceId,
    },
    /// `ApplyMesh` arrived with no shader bound.
    #[error("mesh {0:?} applied with no shader bound")]
    NoShaderBound(ResourceId),
    /// `RenderInstance` arrived with no mesh bound.
    #[error("RenderInstance issued with no mesh bound")]
    NoMeshBound,
    /// `RenderInstance` arrived before any `ApplyCamera` since `Begin`.
    #[error("RenderInstance issued before a camera was applied")]
    NoCameraApplied,
    /// The backend reported a failure.
    #[error("backend failure: {0}")]
    Backend(#[from] BackendError),
}

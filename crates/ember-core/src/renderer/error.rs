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

//! Error types for the rendering subsystem's backend contracts.

use std::fmt;

/// An error reported by a [`GpuBackend`](super::traits::GpuBackend).
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// A GPU object could not be created.
    ResourceCreation {
        /// The kind of object, e.g. `"shader"`.
        kind: &'static str,
        /// Backend-provided details.
        details: String,
    },
    /// A uniform written with [`UniformFailurePolicy::Report`](super::traits::UniformFailurePolicy::Report)
    /// does not exist in the bound shader.
    UniformNotFound {
        /// The uniform name.
        name: String,
    },
    /// A handle did not refer to a live object of the expected kind.
    InvalidHandle {
        /// The kind of object.
        kind: &'static str,
        /// The raw handle value.
        handle: u64,
    },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ResourceCreation { kind, details } => {
                write!(f, "Failed to create {kind}: {details}")
            }
            BackendError::UniformNotFound { name } => {
                write!(f, "Uniform '{name}' not found in the bound shader")
            }
            BackendError::InvalidHandle { kind, handle } => {
                write!(f, "Invalid {kind} handle: {handle}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

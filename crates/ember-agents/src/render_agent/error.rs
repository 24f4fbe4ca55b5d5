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

//! Errors surfaced by the render agent.

use ember_infra::graphics::ProcessError;
use ember_lanes::CompileError;
use std::fmt;

/// Why a frame could not be rendered.
///
/// Only the offending frame is lost; the agent stays usable.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The frame snapshot could not be planned.
    Compile(CompileError),
    /// The command buffer violated a processor precondition.
    Process(ProcessError),
    /// The render thread is gone and cannot accept buffers.
    RenderThreadStopped,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Compile(e) => write!(f, "Frame compilation failed: {e}"),
            RenderError::Process(e) => write!(f, "Command processing failed: {e}"),
            RenderError::RenderThreadStopped => write!(f, "The render thread has stopped"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Compile(e) => Some(e),
            RenderError::Process(e) => Some(e),
            RenderError::RenderThreadStopped => None,
        }
    }
}

impl From<CompileError> for RenderError {
    fn from(e: CompileError) -> Self {
        RenderError::Compile(e)
    }
}

impl From<ProcessError> for RenderError {
    fn from(e: ProcessError) -> Self {
        RenderError::Process(e)
    }
}

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

//! Rendering lanes: the frame planning hot path.
//!
//! Data flows one way through this module: render objects are culled by the
//! [`RenderPassVisibilityChecker`], resolved against pass materials and
//! ordered by the [`RenderPassObjectSorter`], assembled into pass groups by a
//! [`RenderPassCompiler`], and finally flattened into command lists by the
//! [`RenderCommandCompiler`].

mod command_compiler;
mod forward_pass_compiler;
mod shadow_pass_lane;
mod sorter;
mod visibility;

pub use command_compiler::*;
pub use forward_pass_compiler::*;
pub use shadow_pass_lane::*;
pub use sorter::*;
pub use visibility::*;

use crate::error::CompileError;
use ember_core::renderer::api::{RenderFrame, TargetRenderPassGroup};
use ember_core::TaskContext;

/// A strategy for turning a frame snapshot into ordered target pass groups.
///
/// This lets the `RenderAgent` drive any pass layout without being coupled
/// to the forward renderer's specific pass decomposition.
pub trait RenderPassCompiler: Send + Sync {
    /// Returns a human-readable identifier for this strategy, used in logs.
    fn strategy_name(&self) -> &'static str;

    /// Plans every pass needed to render `frame`.
    ///
    /// Groups are returned in execution order: targets sampled by later
    /// groups come first. The call is free of side effects, so compiling
    /// the same frame twice yields structurally identical groups.
    fn compile_target_render_pass_groups<'f>(
        &self,
        task_context: &dyn TaskContext,
        frame: &'f RenderFrame,
    ) -> Result<Vec<TargetRenderPassGroup<'f>>, CompileError>;
}

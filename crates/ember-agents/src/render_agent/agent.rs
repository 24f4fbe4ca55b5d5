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

//! Defines the RenderAgent, the orchestrator of the frame pipeline.

use super::{RenderError, ResourceCommandQueue, ResourceSender};
use ember_core::math::UVec2;
use ember_core::renderer::api::{RenderCamera, RenderCommandBuffer, RenderFrame};
use ember_core::renderer::traits::GpuBackend;
use ember_core::renderer::RenderSettings;
use ember_core::TaskContext;
use ember_infra::graphics::{ProcessorStats, RenderCommandProcessor};
use ember_lanes::render_lane::{ForwardRenderPassCompiler, RenderCommandCompiler, RenderPassCompiler};
use std::time::{Duration, Instant};

/// What the last compiled frame contained and cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Target groups, including shadow maps.
    pub target_groups: usize,
    /// Passes across all targets and cameras.
    pub passes: usize,
    /// Object entries across all passes.
    pub pass_objects: usize,
    /// Commands in the buffer, including resource commands.
    pub commands: usize,
    /// Wall time spent compiling passes and commands.
    pub compile_time: Duration,
}

/// The agent responsible for turning frame snapshots into command buffers.
pub struct RenderAgent {
    settings: RenderSettings,
    // The pass planning strategy.
    compiler: Box<dyn RenderPassCompiler>,
    command_compiler: RenderCommandCompiler,
    resources: ResourceCommandQueue,
    last_frame: FrameStats,
    frame_count: u64,
}

impl RenderAgent {
    /// Creates an agent using the forward pass compiler.
    pub fn new(settings: RenderSettings) -> Self {
        let compiler = Box::new(ForwardRenderPassCompiler::new(&settings));
        Self::with_compiler(settings, compiler)
    }

    /// Creates an agent driving a custom pass compiler.
    pub fn with_compiler(settings: RenderSettings, compiler: Box<dyn RenderPassCompiler>) -> Self {
        log::info!(
            "RenderAgent: using the {} pass compiler",
            compiler.strategy_name()
        );
        Self {
            settings,
            compiler,
            command_compiler: RenderCommandCompiler::new(),
            resources: ResourceCommandQueue::new(),
            last_frame: FrameStats::default(),
            frame_count: 0,
        }
    }

    /// The settings the agent was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Name of the active pass compiler.
    pub fn strategy_name(&self) -> &'static str {
        self.compiler.strategy_name()
    }

    /// A handle for queueing resource loads and unloads.
    pub fn resource_sender(&self) -> ResourceSender {
        self.resources.sender()
    }

    /// Statistics of the last successfully compiled frame.
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame
    }

    /// Number of frames compiled successfully.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// An empty frame cleared to the configured colour.
    pub fn create_frame(&self, resolution: UVec2, camera: RenderCamera) -> RenderFrame {
        let mut frame = RenderFrame::new(resolution, camera);
        frame.clear_colour = self.settings.clear_colour;
        frame
    }

    /// Compiles `frame` into a command buffer.
    ///
    /// The buffer is `[pending loads] + [one list per target] + [pending
    /// unloads]`. If compilation fails the pending resource commands stay
    /// queued for the next frame.
    pub fn render_frame(
        &mut self,
        task_context: &dyn TaskContext,
        frame: &RenderFrame,
    ) -> Result<RenderCommandBuffer, RenderError> {
        let start = Instant::now();

        let groups = self
            .compiler
            .compile_target_render_pass_groups(task_context, frame)
            .map_err(|e| {
                log::error!("RenderAgent: frame {} dropped: {}", self.frame_count, e);
                RenderError::from(e)
            })?;
        let lists = self.command_compiler.compile(task_context, frame, &groups);

        let (loads, unloads) = self.resources.drain();
        let mut buffer = RenderCommandBuffer::default();
        if !loads.is_empty() {
            buffer.push_list(loads);
        }
        for list in lists {
            buffer.push_list(list);
        }
        if !unloads.is_empty() {
            buffer.push_list(unloads);
        }

        self.last_frame = FrameStats {
            target_groups: groups.len(),
            passes: groups.iter().map(|g| g.pass_count()).sum(),
            pass_objects: groups.iter().map(|g| g.pass_object_count()).sum(),
            commands: buffer.command_count(),
            compile_time: start.elapsed(),
        };
        self.frame_count += 1;

        log::debug!(
            "RenderAgent: frame {} compiled into {} targets, {} passes, {} commands in {:?}",
            self.frame_count,
            self.last_frame.target_groups,
            self.last_frame.passes,
            self.last_frame.commands,
            self.last_frame.compile_time
        );
        Ok(buffer)
    }

    /// Compiles `frame` and executes it on `processor` on the calling thread.
    ///
    /// Returns the work the processor did for this frame alone.
    pub fn render_frame_into<B: GpuBackend>(
        &mut self,
        task_context: &dyn TaskContext,
        frame: &RenderFrame,
        processor: &mut RenderCommandProcessor<B>,
    ) -> Result<ProcessorStats, RenderError> {
        let buffer = self.render_frame(task_context, frame)?;
        processor.reset_stats();
        processor.process(buffer).map_err(|e| {
            log::error!("RenderAgent: frame {} aborted: {}", self.frame_count, e);
            RenderError::from(e)
        })?;
        Ok(processor.stats())
    }

    /// Packs every pending resource command into a buffer with no frame.
    ///
    /// Used to upload resources before the first frame, or to release the
    /// last ones on shutdown.
    pub fn flush_resources(&mut self) -> RenderCommandBuffer {
        let (loads, unloads) = self.resources.drain();
        RenderCommandBuffer::new(
            [loads, unloads]
                .into_iter()
                .filter(|list| !list.is_empty())
                .collect(),
        )
    }
}

impl Default for RenderAgent {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

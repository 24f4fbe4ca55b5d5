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

//! Hands command buffers to a dedicated render thread.

use super::RenderError;
use crossbeam_channel::Sender;
use ember_core::renderer::api::RenderCommandBuffer;
use ember_core::renderer::traits::GpuBackend;
use ember_infra::graphics::RenderCommandProcessor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

/// Owns the render thread and the processor running on it.
///
/// The channel to the thread is bounded: once `queue_depth` buffers are
/// waiting, [`submit`](Self::submit) blocks until the render thread accepts
/// one. A depth of zero makes every submission wait for the hand-off.
pub struct RenderSubmitter<B: GpuBackend + 'static> {
    sender: Option<Sender<RenderCommandBuffer>>,
    handle: Option<thread::JoinHandle<RenderCommandProcessor<B>>>,
    processed: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl<B: GpuBackend + 'static> RenderSubmitter<B> {
    /// Moves `processor` onto a new render thread.
    pub fn spawn(processor: RenderCommandProcessor<B>, queue_depth: usize) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<RenderCommandBuffer>(queue_depth);
        let processed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let handle = {
            let processed = Arc::clone(&processed);
            let failed = Arc::clone(&failed);
            let mut processor = processor;
            thread::Builder::new()
                .name("ember-render".to_owned())
                .spawn(move || {
                    log::info!("RenderSubmitter: render thread started");
                    for buffer in rx {
                        if let Err(e) = processor.process(buffer) {
                            log::error!("RenderSubmitter: command buffer aborted: {e}");
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                        processed.fetch_add(1, Ordering::Release);
                    }
                    log::info!("RenderSubmitter: render thread stopped");
                    processor
                })?
        };

        Ok(Self {
            sender: Some(tx),
            handle: Some(handle),
            processed,
            failed,
        })
    }

    /// Queues a buffer for execution, blocking while the queue is full.
    pub fn submit(&self, buffer: RenderCommandBuffer) -> Result<(), RenderError> {
        let sender = self.sender.as_ref().ok_or(RenderError::RenderThreadStopped)?;
        sender
            .send(buffer)
            .map_err(|_| RenderError::RenderThreadStopped)
    }

    /// Buffers the render thread has finished with, successfully or not.
    pub fn buffers_processed(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }

    /// Buffers that were aborted by a processing error.
    pub fn buffers_failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Lets the render thread drain its queue, then returns the processor.
    pub fn shutdown(mut self) -> Result<RenderCommandProcessor<B>, RenderError> {
        self.stop().ok_or(RenderError::RenderThreadStopped)
    }

    fn stop(&mut self) -> Option<RenderCommandProcessor<B>> {
        // Closing the channel ends the thread's receive loop.
        self.sender.take();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(processor) => Some(processor),
            Err(_) => {
                log::error!("RenderSubmitter: render thread panicked");
                None
            }
        }
    }
}

impl<B: GpuBackend + 'static> Drop for RenderSubmitter<B> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

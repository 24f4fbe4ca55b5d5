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

//! A fork-join [`TaskContext`] backed by a persistent worker pool.

use crossbeam_channel::{Receiver, Sender};
use ember_core::renderer::RenderSettings;
use ember_core::{Task, TaskContext};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, Thread};
use std::time::Duration;

/// Runs child tasks on a pool of `worker_count` threads.
///
/// `worker_count - 1` threads are spawned once, in [`new`](Self::new); the
/// thread calling [`process_child_tasks`](TaskContext::process_child_tasks)
/// is the last worker. A forking thread does not sleep while its children
/// run: it keeps taking tasks from the shared queue until its own children
/// are done. Nested forks therefore reuse the same threads, and at most
/// `worker_count` tasks run at once for a single outside caller.
///
/// Tasks may borrow from the caller and may fork again through the context
/// they receive. Clones share the pool; the threads stop when the last
/// clone is dropped.
#[derive(Clone)]
pub struct WorkerTaskContext {
    shared: Arc<PoolShared>,
    _workers: Arc<PoolWorkers>,
    worker_count: usize,
}

impl WorkerTaskContext {
    /// Creates a pool of `worker_count` threads, counting the caller. `0`
    /// uses the available parallelism of the machine.
    pub fn new(worker_count: usize) -> Self {
        let requested = if worker_count == 0 {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            worker_count
        };

        let (sender, receiver) = crossbeam_channel::unbounded();
        let shared = Arc::new(PoolShared {
            sender: sender.clone(),
            receiver,
            worker_count: requested,
        });

        let mut handles = Vec::with_capacity(requested - 1);
        for index in 1..requested {
            let pool = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("ember-worker-{index}"))
                .spawn(move || pool.run_worker());
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    log::warn!("WorkerTaskContext: could not spawn worker {index}: {e}");
                    break;
                }
            }
        }

        let worker_count = handles.len() + 1;
        log::debug!("WorkerTaskContext: using {worker_count} worker threads");
        Self {
            shared,
            _workers: Arc::new(PoolWorkers { sender, handles }),
            worker_count,
        }
    }

    /// Creates a pool sized by `settings.worker_threads`.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.worker_threads)
    }
}

impl Default for WorkerTaskContext {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Debug for WorkerTaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerTaskContext")
            .field("worker_count", &self.worker_count)
            .finish()
    }
}

impl TaskContext for WorkerTaskContext {
    fn process_child_tasks<'a>(&self, tasks: Vec<Task<'a>>) {
        self.shared.process_child_tasks(tasks);
    }

    fn worker_count(&self) -> usize {
        self.worker_count
    }
}

enum Message {
    Run(Job),
    Stop,
}

/// A child task with its lifetime erased, plus the fork it reports to.
struct Job {
    task: Task<'static>,
    fork: Arc<ForkLatch>,
}

impl Job {
    fn run(self, context: &dyn TaskContext) {
        let task = self.task;
        if panic::catch_unwind(AssertUnwindSafe(|| task(context))).is_err() {
            self.fork.panicked.store(true, Ordering::Release);
        }
        self.fork.complete_one();
    }
}

/// Counts the unfinished children of one `process_child_tasks` call.
struct ForkLatch {
    remaining: AtomicUsize,
    panicked: AtomicBool,
    owner: Thread,
}

impl ForkLatch {
    fn new(count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(count),
            panicked: AtomicBool::new(false),
            owner: thread::current(),
        }
    }

    fn complete_one(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.owner.unpark();
        }
    }

    fn is_done(&self) -> bool {
        self.remaining.load(Ordering::Acquire) == 0
    }
}

/// The queue every pool thread and forking caller takes tasks from.
struct PoolShared {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    worker_count: usize,
}

impl PoolShared {
    fn run_worker(&self) {
        while let Ok(message) = self.receiver.recv() {
            match message {
                Message::Run(job) => job.run(self),
                Message::Stop => break,
            }
        }
    }

    /// Runs queued tasks, ours or anyone's, until `fork` has finished.
    fn help_until_done(&self, fork: &ForkLatch) {
        while !fork.is_done() {
            match self.receiver.try_recv() {
                Ok(Message::Run(job)) => job.run(self),
                Ok(Message::Stop) => {
                    // Meant for an idle worker.
                    let _ = self.sender.send(Message::Stop);
                    thread::yield_now();
                }
                // Children are running elsewhere; their completion unparks us.
                Err(_) => thread::park_timeout(Duration::from_millis(1)),
            }
        }
    }
}

impl TaskContext for PoolShared {
    fn process_child_tasks<'a>(&self, tasks: Vec<Task<'a>>) {
        if tasks.len() <= 1 || self.worker_count <= 1 {
            for task in tasks {
                task(self);
            }
            return;
        }

        let fork = Arc::new(ForkLatch::new(tasks.len()));
        for task in tasks {
            // SAFETY: `help_until_done` below does not return before every
            // task of this fork has run to completion or unwound, so the
            // borrows captured for `'a` outlive every use of the task.
            let task = unsafe { std::mem::transmute::<Task<'a>, Task<'static>>(task) };
            // Both channel ends live in `self`, so sending cannot fail.
            let _ = self.sender.send(Message::Run(Job {
                task,
                fork: Arc::clone(&fork),
            }));
        }

        self.help_until_done(&fork);

        if fork.panicked.load(Ordering::Acquire) {
            panic!("WorkerTaskContext: a child task panicked");
        }
    }

    fn worker_count(&self) -> usize {
        self.worker_count
    }
}

/// Owns the pool threads and stops them on drop.
struct PoolWorkers {
    sender: Sender<Message>,
    handles: Vec<JoinHandle<()>>,
}

impl Drop for PoolWorkers {
    fn drop(&mut self) {
        for _ in &self.handles {
            let _ = self.sender.send(Message::Stop);
        }
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                log::error!("WorkerTaskContext: worker thread panicked");
            }
        }
    }
}

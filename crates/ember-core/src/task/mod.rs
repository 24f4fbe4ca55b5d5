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

//! Fork-join task contract used by the pass compiler.
//!
//! A [`TaskContext`] runs a batch of child tasks and returns only once every
//! child has finished. Children may borrow from the caller's stack, since
//! nothing outlives the call, and each child receives a context of its own
//! through which it can fork further.

/// A unit of work handed to [`TaskContext::process_child_tasks`].
pub type Task<'a> = Box<dyn FnOnce(&dyn TaskContext) + Send + 'a>;

/// A structured-concurrency scheduler.
pub trait TaskContext: Sync {
    /// Runs `tasks`, potentially in parallel, and blocks until all complete.
    ///
    /// Tasks must not depend on each other's side effects; each should write
    /// only to state it exclusively borrows.
    fn process_child_tasks<'a>(&self, tasks: Vec<Task<'a>>);

    /// Number of threads that may run tasks concurrently.
    fn worker_count(&self) -> usize {
        1
    }
}

/// Runs every task in order on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineTaskContext;

impl TaskContext for InlineTaskContext {
    fn process_child_tasks<'a>(&self, tasks: Vec<Task<'a>>) {
        for task in tasks {
            task(self);
        }
    }
}

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

//! Acts as the agent for the rendering subsystem.
//!
//! The agent decides nothing about individual draws. It owns the pass
//! compilation strategy, collects resource commands from the rest of the
//! engine, and reports what each frame cost.

mod agent;
mod error;
mod resource_queue;
mod submitter;

pub use self::agent::*;
pub use self::error::*;
pub use self::resource_queue::*;
pub use self::submitter::*;

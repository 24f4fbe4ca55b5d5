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

//! # Ember Infra
//!
//! Concrete implementations of the contracts defined in `ember-core`: the
//! worker-thread [`TaskContext`](ember_core::TaskContext), the render command
//! processor that replays command buffers against a
//! [`GpuBackend`](ember_core::renderer::traits::GpuBackend), a headless
//! backend, and logging setup.

#![warn(missing_docs)]

pub mod graphics;
pub mod task;
pub mod telemetry;

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

//! # Ember Lanes
//!
//! Hot-path execution pipelines of the forward renderer. Lanes are pure
//! planning functions over a frame snapshot: they never touch a GPU backend
//! and only use the [`TaskContext`](ember_core::TaskContext) they are given
//! to fan work out.

#![warn(missing_docs)]

pub mod error;
pub mod render_lane;

pub use error::CompileError;

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

//! Render command execution.
//!
//! - [`RenderCommandProcessor`]: replays a command buffer against a backend.
//! - [`headless`]: a backend that records calls instead of drawing.

mod context_state;
mod error;
pub mod headless;
mod processor;
mod registry;

pub use self::context_state::*;
pub use self::error::*;
pub use self::processor::*;
pub use self::registry::*;

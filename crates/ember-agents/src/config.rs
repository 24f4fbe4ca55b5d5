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

//! Loading [`RenderSettings`] from RON files.

use anyhow::Context;
use ember_core::renderer::RenderSettings;
use std::fs;
use std::path::Path;

/// Reads render settings from `path`.
///
/// A missing file is not an error: the defaults are used and a warning is
/// logged. Fields absent from the file keep their default values.
pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<RenderSettings> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!(
            "RenderSettings: {} not found, using defaults",
            path.display()
        );
        return Ok(RenderSettings::default());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read render settings from {}", path.display()))?;
    let settings = parse_settings(&source)
        .with_context(|| format!("Invalid render settings in {}", path.display()))?;
    log::info!("RenderSettings: loaded from {}", path.display());
    Ok(settings)
}

/// Parses render settings from RON source.
pub fn parse_settings(source: &str) -> anyhow::Result<RenderSettings> {
    let settings: RenderSettings = ron::from_str(source)?;
    if settings.visibility_batch_size == 0 {
        anyhow::bail!("visibility_batch_size must be at least 1");
    }
    Ok(settings)
}

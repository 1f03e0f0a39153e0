use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ToolboxError, ToolboxResult};

/// Tunable bounds and defaults shared by all operations.
///
/// Every field has a default, so a config file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Smallest accepted generated width/height in pixels.
    pub min_size: u32,
    /// Largest accepted generated width/height in pixels.
    pub max_size: u32,
    /// Width used by generators when none is given.
    pub default_width: u32,
    /// Height used by generators when none is given.
    pub default_height: u32,
    /// Frame durations below this (in ms) trigger the FPS warning unless forced.
    pub min_frame_duration_ms: u32,
    /// Largest width/height of an assembled canvas (joins, GIF joins) in pixels.
    pub max_output_size: u32,
    /// Default gaussian blur sigma.
    pub default_blur_sigma: f32,
    /// Largest accepted gaussian blur sigma.
    pub max_blur_sigma: f32,
    /// Default pixelation block size.
    pub default_pixel_size: u32,
    /// Default gap between images in horizontal/vertical joins.
    pub default_join_spacing: u32,
    /// Default per-frame duration for GIF joins.
    pub default_join_duration_ms: u32,
    /// Dedicated worker thread count for per-frame parallelism. `None` uses the global pool.
    pub threads: Option<usize>,
    /// Number of outputs per delivery batch.
    pub batch_size: usize,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: 1920,
            default_width: 500,
            default_height: 500,
            min_frame_duration_ms: 20,
            max_output_size: 8192,
            default_blur_sigma: 5.0,
            max_blur_sigma: 100.0,
            default_pixel_size: 8,
            default_join_spacing: 10,
            default_join_duration_ms: 100,
            threads: None,
            batch_size: 10,
        }
    }
}

impl ToolboxConfig {
    /// Parse a JSON config and validate it.
    pub fn from_json_str(s: &str) -> ToolboxResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ToolboxError::validation(format!("config JSON parse failed: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: &Path) -> ToolboxResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> ToolboxResult<()> {
        if self.min_size == 0 {
            return Err(ToolboxError::validation("min_size must be >= 1"));
        }
        if self.min_size > self.max_size {
            return Err(ToolboxError::validation("min_size must be <= max_size"));
        }
        for (name, v) in [
            ("default_width", self.default_width),
            ("default_height", self.default_height),
        ] {
            if v < self.min_size || v > self.max_size {
                return Err(ToolboxError::validation(format!(
                    "{name} must be within [min_size, max_size]"
                )));
            }
        }
        if self.max_output_size < self.max_size {
            return Err(ToolboxError::validation("max_output_size must be >= max_size"));
        }
        if !self.max_blur_sigma.is_finite() || self.max_blur_sigma <= 0.0 {
            return Err(ToolboxError::validation(
                "max_blur_sigma must be finite and > 0",
            ));
        }
        if !self.default_blur_sigma.is_finite()
            || self.default_blur_sigma < 0.0
            || self.default_blur_sigma > self.max_blur_sigma
        {
            return Err(ToolboxError::validation(
                "default_blur_sigma must be within [0, max_blur_sigma]",
            ));
        }
        if self.threads == Some(0) {
            return Err(ToolboxError::validation("threads must be >= 1 when set"));
        }
        if self.batch_size == 0 {
            return Err(ToolboxError::validation("batch_size must be >= 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::SmoothingQuality;
use crate::error::ConfigError;

/// Smallest accepted render scale.
pub const MIN_SCALE: f32 = 0.1;

/// Largest accepted render scale.
pub const MAX_SCALE: f32 = 8.0;

/// Static worker location used when the bundled asset URL cannot be resolved.
pub const DEFAULT_FALLBACK_WORKER_SRC: &str = "/pdf.worker.min.mjs";

/// Main configuration for pdf2png.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pdf2PngConfig {
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Engine loading configuration.
    pub engine: EngineConfig,
}

/// Page rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Upscale factor applied to the page's natural size.
    pub scale: f32,

    /// Page to render (1-indexed).
    pub page_number: u32,

    /// PNG encoder quality hint (0.0 - 1.0).
    pub png_quality: f32,

    /// Smoothing applied when the surface resamples.
    pub smoothing: SmoothingQuality,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 3.0,
            page_number: 1,
            png_quality: 1.0,
            smoothing: SmoothingQuality::High,
        }
    }
}

impl RenderConfig {
    /// Check that every value is within its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(ConfigError::Invalid {
                field: "render.scale",
                reason: format!("{} is outside {MIN_SCALE}..={MAX_SCALE}", self.scale),
            });
        }
        if self.page_number == 0 {
            return Err(ConfigError::Invalid {
                field: "render.page_number",
                reason: "pages are numbered from 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.png_quality) {
            return Err(ConfigError::Invalid {
                field: "render.png_quality",
                reason: format!("{} is outside 0.0..=1.0", self.png_quality),
            });
        }
        Ok(())
    }
}

/// Engine loading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Explicit worker script (browser) or shared library (native) location.
    pub worker_src: Option<String>,

    /// Location used when resolution fails.
    pub fallback_worker_src: String,

    /// Largest surface the native raster host will allocate, in pixels.
    pub max_surface_pixels: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_src: None,
            fallback_worker_src: DEFAULT_FALLBACK_WORKER_SRC.to_string(),
            // Same ceiling as the largest canvas area browsers allow.
            max_surface_pixels: 16_384 * 16_384,
        }
    }
}

impl Pdf2PngConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.render.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

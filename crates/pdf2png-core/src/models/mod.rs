//! Data models shared by the engine and host boundaries.

pub mod config;

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type of every produced image.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Pixel-space rectangle a page is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels (page width times scale).
    pub width: f32,
    /// Height in pixels (page height times scale).
    pub height: f32,
    /// Scale the viewport was computed with.
    pub scale: f32,
}

impl Viewport {
    /// Viewport for a page of the given natural size in points.
    pub fn from_page_size(page_width: f32, page_height: f32, scale: f32) -> Self {
        Self {
            width: page_width * scale,
            height: page_height * scale,
            scale,
        }
    }

    /// Surface width; fractional pixels are truncated like a canvas does.
    pub fn pixel_width(&self) -> u32 {
        self.width as u32
    }

    /// Surface height; fractional pixels are truncated like a canvas does.
    pub fn pixel_height(&self) -> u32 {
        self.height as u32
    }
}

/// Image smoothing quality of a drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingQuality {
    /// Smoothing disabled.
    None,
    Low,
    Medium,
    #[default]
    High,
}

impl SmoothingQuality {
    /// Value of the canvas `imageSmoothingQuality` property, if smoothing is on.
    pub fn as_canvas_value(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Low => Some("low"),
            Self::Medium => Some("medium"),
            Self::High => Some("high"),
        }
    }
}

/// Per-call conversion stage, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    EngineReady,
    Parsing,
    Rendering,
    Encoding,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::EngineReady => "engine-ready",
            Self::Parsing => "parsing",
            Self::Rendering => "rendering",
            Self::Encoding => "encoding",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

//! In-memory raster host for native builds.
//!
//! Surfaces are RGBA buffers, blobs are PNG bytes, and object URLs are
//! `blob:pdf2png/<uuid>` keys into a per-host registry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::Arc;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tracing::{debug, trace};

use super::{DrawingSurface, Host, Result};
use crate::error::HostError;
use crate::models::SmoothingQuality;

const URL_PREFIX: &str = "blob:pdf2png/";

/// Encoded image bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBlob {
    data: Arc<[u8]>,
    mime_type: String,
}

impl RasterBlob {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A blob with a file name.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImageFile {
    pub name: String,
    pub blob: RasterBlob,
}

impl RasterImageFile {
    pub fn mime_type(&self) -> &str {
        self.blob.mime_type()
    }

    /// Write the file's bytes to `path`.
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, self.blob.bytes())
    }
}

/// RGBA drawing surface.
#[derive(Debug)]
pub struct RasterSurface {
    image: RgbaImage,
    smoothing: SmoothingQuality,
}

impl RasterSurface {
    /// A transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            smoothing: SmoothingQuality::default(),
        }
    }

    pub fn smoothing(&self) -> SmoothingQuality {
        self.smoothing
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Draw `image` over the whole surface, resampling if sizes differ.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        let (width, height) = self.image.dimensions();
        if image.dimensions() == (width, height) {
            imageops::overlay(&mut self.image, image, 0, 0);
            return;
        }

        trace!(
            "Resampling {}x{} into {}x{} ({:?})",
            image.width(),
            image.height(),
            width,
            height,
            self.smoothing
        );
        let resized = imageops::resize(image, width, height, resample_filter(self.smoothing));
        imageops::overlay(&mut self.image, &resized, 0, 0);
    }
}

fn resample_filter(smoothing: SmoothingQuality) -> FilterType {
    match smoothing {
        SmoothingQuality::None => FilterType::Nearest,
        SmoothingQuality::Low => FilterType::Triangle,
        SmoothingQuality::Medium => FilterType::CatmullRom,
        SmoothingQuality::High => FilterType::Lanczos3,
    }
}

fn compression_for(quality: f32) -> CompressionType {
    if quality >= 0.9 {
        CompressionType::Best
    } else if quality >= 0.5 {
        CompressionType::Default
    } else {
        CompressionType::Fast
    }
}

impl DrawingSurface for RasterSurface {
    type Blob = RasterBlob;

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_image_smoothing(&mut self, quality: SmoothingQuality) {
        self.smoothing = quality;
    }

    async fn encode_png(&self, quality: f32) -> Result<Option<RasterBlob>> {
        // A zero-area canvas has nothing to encode.
        if self.image.width() == 0 || self.image.height() == 0 {
            return Ok(None);
        }

        let mut data = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            Cursor::new(&mut data),
            compression_for(quality),
            PngFilter::Adaptive,
        );
        encoder
            .write_image(
                self.image.as_raw(),
                self.image.width(),
                self.image.height(),
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| HostError::Encode(e.to_string()))?;

        Ok(Some(RasterBlob::new(data, crate::models::PNG_MIME_TYPE)))
    }
}

/// Native host backed by memory.
#[derive(Debug, Clone)]
pub struct RasterHost {
    max_surface_pixels: u64,
    urls: Rc<RefCell<HashMap<String, RasterBlob>>>,
}

impl RasterHost {
    pub fn new() -> Self {
        Self::with_max_surface_pixels(crate::models::config::EngineConfig::default().max_surface_pixels)
    }

    /// Refuse surfaces with more than `max_surface_pixels` pixels.
    pub fn with_max_surface_pixels(max_surface_pixels: u64) -> Self {
        Self {
            max_surface_pixels,
            urls: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Look up the blob behind a live object URL.
    pub fn resolve_object_url(&self, url: &str) -> Option<RasterBlob> {
        self.urls.borrow().get(url).cloned()
    }

    /// Number of object URLs not yet revoked.
    pub fn live_object_urls(&self) -> usize {
        self.urls.borrow().len()
    }
}

impl Default for RasterHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RasterHost {
    type Surface = RasterSurface;
    type Blob = RasterBlob;
    type File = RasterImageFile;

    fn has_document_context(&self) -> bool {
        true
    }

    fn create_surface(&self, width: u32, height: u32) -> Result<Option<RasterSurface>> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.max_surface_pixels {
            debug!(
                "Surface {}x{} exceeds limit of {} pixels",
                width, height, self.max_surface_pixels
            );
            return Ok(None);
        }
        Ok(Some(RasterSurface::new(width, height)))
    }

    fn create_file(&self, blob: &RasterBlob, name: &str, mime_type: &str) -> Result<RasterImageFile> {
        if name.is_empty() {
            return Err(HostError::File("empty file name".to_string()));
        }
        Ok(RasterImageFile {
            name: name.to_string(),
            blob: RasterBlob {
                data: Arc::clone(&blob.data),
                mime_type: mime_type.to_string(),
            },
        })
    }

    fn create_object_url(&self, blob: &RasterBlob) -> Result<String> {
        let url = format!("{}{}", URL_PREFIX, uuid::Uuid::new_v4());
        self.urls.borrow_mut().insert(url.clone(), blob.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        if self.urls.borrow_mut().remove(url).is_none() {
            trace!("Object URL {} was not live", url);
        }
    }
}

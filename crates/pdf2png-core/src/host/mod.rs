//! Host environment boundary: source files, drawing surfaces, blobs, files
//! and object URLs.

#![allow(async_fn_in_trait)]

mod object_url;
#[cfg(feature = "native")]
mod raster;
mod source;

pub use object_url::ObjectUrl;
#[cfg(feature = "native")]
pub use raster::{RasterBlob, RasterHost, RasterImageFile, RasterSurface};
#[cfg(feature = "native")]
pub use source::LocalFile;
pub use source::{InMemoryFile, SourceFile};

use crate::error::HostError;
use crate::models::SmoothingQuality;

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

/// The environment conversions run in.
///
/// Implementations are cheap handles; the converter clones one into every
/// [`ObjectUrl`] it hands out so the URL can be revoked later.
pub trait Host: Clone {
    /// Drawing surface type.
    type Surface: DrawingSurface<Blob = Self::Blob>;
    /// Encoded image blob.
    type Blob;
    /// Named file-like wrapper around a blob.
    type File;

    /// Whether a document context exists to create surfaces in.
    fn has_document_context(&self) -> bool;

    /// Create a surface of the given pixel size.
    ///
    /// `Ok(None)` means the host has no 2D context to offer.
    fn create_surface(&self, width: u32, height: u32) -> Result<Option<Self::Surface>>;

    /// Wrap a blob as a named file.
    fn create_file(&self, blob: &Self::Blob, name: &str, mime_type: &str) -> Result<Self::File>;

    /// Create a URL resolving to the blob's bytes.
    fn create_object_url(&self, blob: &Self::Blob) -> Result<String>;

    /// Release a URL created by [`Host::create_object_url`].
    fn revoke_object_url(&self, url: &str);
}

/// A 2D raster surface.
pub trait DrawingSurface {
    type Blob;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Configure resampling quality.
    fn set_image_smoothing(&mut self, quality: SmoothingQuality);

    /// Encode the surface as PNG. `Ok(None)` means no blob was produced.
    async fn encode_png(&self, quality: f32) -> Result<Option<Self::Blob>>;
}

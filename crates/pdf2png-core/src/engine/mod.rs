//! PDF engine boundary.
//!
//! The engine does the actual parsing and rasterization. This module only
//! describes what the converter needs from it:
//!
//! - [`EngineProvider`] resolves the worker location and loads the engine
//! - [`PdfEngine`] parses bytes into a [`PdfDocument`]
//! - [`PdfDocument`] hands out pages by 1-based number
//! - [`PdfPage`] computes viewports and renders into a host surface
//!
//! The loaded engine is shared through an [`EngineLoader`].

#![allow(async_fn_in_trait)]

mod loader;
#[cfg(feature = "native")]
pub mod pdfium;

pub use loader::EngineLoader;

use crate::error::PdfError;
use crate::models::Viewport;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Loads a PDF engine.
///
/// Implementations are called at most once per successful load by the
/// [`EngineLoader`].
pub trait EngineProvider {
    /// The loaded engine.
    type Engine: PdfEngine;

    /// Resolve the location of the engine's background worker.
    ///
    /// Errors are not surfaced; the loader falls back to a static location.
    fn resolve_worker_src(&self) -> Result<String>;

    /// Load the engine and configure it with the given worker location.
    async fn load(&self, worker_src: &str) -> Result<Self::Engine>;
}

/// A loaded PDF engine.
pub trait PdfEngine {
    type Document: PdfDocument;

    /// Parse a complete PDF file.
    async fn load_document(&self, data: Vec<u8>) -> Result<Self::Document>;
}

/// A parsed PDF document.
pub trait PdfDocument {
    type Page: PdfPage;

    /// Number of pages in the document.
    fn num_pages(&self) -> u32;

    /// Get a page by its 1-based number.
    async fn get_page(&self, page_number: u32) -> Result<Self::Page>;
}

/// A single page of a document.
pub trait PdfPage {
    /// Surface type this page renders into.
    type Surface;

    /// Viewport of this page at the given scale.
    fn get_viewport(&self, scale: f32) -> Viewport;

    /// Render the page into `surface`, which is sized to `viewport`.
    async fn render(&self, surface: &mut Self::Surface, viewport: &Viewport) -> Result<()>;
}

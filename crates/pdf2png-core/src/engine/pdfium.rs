//! Native engine backed by the PDFium library.
//!
//! The shared library is located the same way a browser locates the pdf.js
//! worker: an explicit location, then the first existing search path, then
//! the system library.

use std::path::PathBuf;

use pdfium_render::prelude::*;
use tracing::{debug, info};

use super::{EngineProvider, PdfDocument, PdfEngine, PdfPage, Result};
use crate::error::PdfError;
use crate::host::RasterSurface;
use crate::models::Viewport;

/// Marker location meaning "bind to the system library".
pub const SYSTEM_LIBRARY: &str = "system";

/// Loads PDFium.
#[derive(Debug, Clone, Default)]
pub struct PdfiumProvider {
    search_dirs: Vec<PathBuf>,
}

impl PdfiumProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also search `dir` before the default locations.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Candidate library paths, most specific first.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut dirs = self.search_dirs.clone();

        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd.join("lib"));
            dirs.push(cwd);
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(parent) = exe.parent() {
                dirs.push(parent.join("lib"));
                dirs.push(parent.to_path_buf());
            }
        }

        dirs.into_iter()
            .map(|dir| PathBuf::from(Pdfium::pdfium_platform_library_name_at_path(&dir)))
            .collect()
    }
}

impl EngineProvider for PdfiumProvider {
    type Engine = PdfiumEngine;

    fn resolve_worker_src(&self) -> Result<String> {
        let found = self
            .search_paths()
            .into_iter()
            .find(|path| path.exists())
            .map(|path| path.to_string_lossy().into_owned());
        Ok(found.unwrap_or_else(|| SYSTEM_LIBRARY.to_string()))
    }

    async fn load(&self, worker_src: &str) -> Result<PdfiumEngine> {
        let bindings = if worker_src == SYSTEM_LIBRARY || worker_src.is_empty() {
            Pdfium::bind_to_system_library()
        } else {
            debug!("Binding to PDFium at {}", worker_src);
            Pdfium::bind_to_library(worker_src).or_else(|e| {
                debug!("Binding to {} failed ({:?}), trying system library", worker_src, e);
                Pdfium::bind_to_system_library()
            })
        };
        let bindings = bindings.map_err(|e| PdfError::EngineLoad(format!("{:?}", e)))?;

        info!("PDFium loaded");

        // The engine lives for the rest of the process.
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(PdfiumEngine { pdfium })
    }
}

/// A loaded PDFium instance.
pub struct PdfiumEngine {
    pdfium: &'static Pdfium,
}

impl PdfEngine for PdfiumEngine {
    type Document = PdfiumDocument;

    async fn load_document(&self, data: Vec<u8>) -> Result<PdfiumDocument> {
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(data, None)
            .map_err(|e| PdfError::Parse(format!("{:?}", e)))?;
        Ok(PdfiumDocument { document })
    }
}

/// A document opened by PDFium.
pub struct PdfiumDocument {
    document: pdfium_render::prelude::PdfDocument<'static>,
}

impl PdfDocument for PdfiumDocument {
    type Page = PdfiumPage;

    fn num_pages(&self) -> u32 {
        u32::from(self.document.pages().len())
    }

    async fn get_page(&self, page_number: u32) -> Result<PdfiumPage> {
        let page_count = self.num_pages();
        if page_number == 0 || page_number > page_count {
            return Err(PdfError::InvalidPage { page: page_number, page_count });
        }

        let page = self
            .document
            .pages()
            .get((page_number - 1) as u16)
            .map_err(|e| PdfError::Parse(format!("{:?}", e)))?;
        Ok(PdfiumPage { page })
    }
}

/// A page opened by PDFium.
pub struct PdfiumPage {
    page: pdfium_render::prelude::PdfPage<'static>,
}

impl PdfPage for PdfiumPage {
    type Surface = RasterSurface;

    fn get_viewport(&self, scale: f32) -> Viewport {
        Viewport::from_page_size(self.page.width().value, self.page.height().value, scale)
    }

    async fn render(&self, surface: &mut RasterSurface, viewport: &Viewport) -> Result<()> {
        let config = PdfRenderConfig::new()
            .set_target_width(viewport.pixel_width() as i32)
            .set_target_height(viewport.pixel_height() as i32)
            .render_form_data(true);

        let bitmap = self
            .page
            .render_with_config(&config)
            .map_err(|e| PdfError::Render(format!("{:?}", e)))?;

        surface.draw_image(&bitmap.as_image().to_rgba8());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_paths_prefer_configured_dir() {
        let provider = PdfiumProvider::new().with_search_dir("/opt/pdfium");
        let paths = provider.search_paths();

        assert!(paths[0].starts_with("/opt/pdfium"));
        assert!(paths.len() > 1);
    }

    #[test]
    fn test_resolve_never_fails() {
        let provider = PdfiumProvider::new().with_search_dir("/nonexistent");
        let src = provider.resolve_worker_src().unwrap();
        assert!(!src.starts_with("/nonexistent"));
    }

    #[tokio::test]
    async fn test_load_missing_library_reports_engine_error() {
        let provider = PdfiumProvider::new();
        // Succeeds on machines with a system PDFium; otherwise must fail cleanly.
        if let Err(e) = provider.load("/nonexistent/libpdfium.so").await {
            assert!(matches!(e, PdfError::EngineLoad(_)));
        }
    }
}

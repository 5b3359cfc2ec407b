//! Core library for converting a PDF page into a PNG image.
//!
//! This crate provides:
//! - The conversion pipeline (`PdfConverter`) and its error taxonomy
//! - A lazily loaded, shared PDF engine handle (`EngineLoader`)
//! - Engine and host boundaries as traits, so the same pipeline runs in the
//!   browser (pdf.js + canvas) and natively
//! - With the `native` feature: a PDFium engine and an in-memory raster host

pub mod convert;
pub mod engine;
pub mod error;
pub mod host;
pub mod models;

#[cfg(test)]
mod testing;

pub use convert::{ConversionOutput, PdfConverter, is_pdf_file_name, png_file_name};
pub use engine::{EngineLoader, EngineProvider, PdfDocument, PdfEngine, PdfPage};
pub use error::{ConfigError, ConvertError, ErrorKind, HostError, PdfError, Result};
pub use host::{DrawingSurface, Host, InMemoryFile, ObjectUrl, SourceFile};
pub use models::config::{EngineConfig, Pdf2PngConfig, RenderConfig};
pub use models::{PNG_MIME_TYPE, SmoothingQuality, Stage, Viewport};

#[cfg(feature = "native")]
pub use engine::pdfium::{PdfiumEngine, PdfiumProvider};
#[cfg(feature = "native")]
pub use host::{LocalFile, RasterBlob, RasterHost, RasterImageFile, RasterSurface};

/// Converter over PDFium and the in-memory raster host.
#[cfg(feature = "native")]
pub type NativeConverter = PdfConverter<PdfiumProvider, RasterHost>;

//! Error types for the pdf2png-core library.

use serde::Serialize;
use thiserror::Error;

/// Error returned by [`PdfConverter::convert`](crate::PdfConverter::convert).
///
/// Every failure of a conversion is reported through this type. The
/// `Display` text is the user-facing message.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Not running in an environment with a document context.
    #[error("PDF conversion is only available in the browser")]
    Environment,

    /// The file is missing or does not carry a `.pdf` extension.
    #[error("Please provide a valid .pdf file")]
    InvalidInput,

    /// The host could not provide a 2D drawing surface.
    #[error("Unable to get 2D canvas context")]
    CanvasUnavailable,

    /// The surface produced no PNG blob.
    #[error("Failed to create image blob from canvas")]
    Encoding,

    /// Engine failure (load, read, parse, render).
    #[error("Failed to convert PDF: {0}")]
    Pdf(#[from] PdfError),

    /// Host failure while creating surfaces, files or URLs.
    #[error("Failed to convert PDF: {0}")]
    Host(#[from] HostError),
}

impl ConvertError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Environment => ErrorKind::Environment,
            Self::InvalidInput => ErrorKind::InputValidation,
            Self::CanvasUnavailable => ErrorKind::ResourceUnavailable,
            Self::Encoding => ErrorKind::Encoding,
            Self::Pdf(_) | Self::Host(_) => ErrorKind::Engine,
        }
    }
}

/// Coarse classification of conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Environment,
    InputValidation,
    ResourceUnavailable,
    Encoding,
    Engine,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::InputValidation => "inputValidation",
            Self::ResourceUnavailable => "resourceUnavailable",
            Self::Encoding => "encoding",
            Self::Engine => "engine",
        }
    }
}

/// Errors surfaced by the PDF engine or while reading the source file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdfError {
    /// The engine could not be loaded.
    #[error("failed to load PDF engine: {0}")]
    EngineLoad(String),

    /// The source file could not be read.
    #[error("failed to read file: {0}")]
    Read(String),

    /// The bytes could not be parsed as a PDF document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The document has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Requested page is outside the document.
    #[error("invalid page number: {page} (document has {page_count} pages)")]
    InvalidPage { page: u32, page_count: u32 },

    /// Rendering the page failed.
    #[error("failed to render page: {0}")]
    Render(String),
}

/// Errors raised by the host environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// Creating the drawing surface raised an error.
    #[error("failed to create drawing surface: {0}")]
    Surface(String),

    /// Encoding the surface raised an error.
    #[error("failed to encode image: {0}")]
    Encode(String),

    /// Wrapping the blob as a file failed.
    #[error("failed to create image file: {0}")]
    File(String),

    /// Creating an object URL failed.
    #[error("failed to create object URL: {0}")]
    ObjectUrl(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is outside its accepted range.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// I/O error reading or writing a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON.
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;

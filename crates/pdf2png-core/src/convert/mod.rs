//! PDF page to PNG conversion.

mod naming;

pub use naming::{is_pdf_file_name, png_file_name};

use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::engine::{EngineLoader, EngineProvider, PdfDocument, PdfEngine, PdfPage};
use crate::error::{ConfigError, ConvertError, PdfError, Result};
use crate::host::{DrawingSurface, Host, ObjectUrl, SourceFile};
use crate::models::config::RenderConfig;
use crate::models::{PNG_MIME_TYPE, Stage};

type PageOf<P> = <<<P as EngineProvider>::Engine as PdfEngine>::Document as PdfDocument>::Page;

/// Result of a successful conversion.
pub struct ConversionOutput<H: Host> {
    /// URL resolving to the PNG bytes. Revoked when dropped.
    pub image_url: ObjectUrl<H>,
    /// The PNG wrapped as a named file.
    pub file: H::File,
    /// Name of `file`.
    pub file_name: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl<H: Host> fmt::Debug for ConversionOutput<H>
where
    H::File: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOutput")
            .field("image_url", &self.image_url)
            .field("file", &self.file)
            .field("file_name", &self.file_name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Converts one page of a PDF file into a PNG image.
///
/// The engine loader is shared: several converters (for example with
/// different render settings) can reuse one loaded engine.
pub struct PdfConverter<P: EngineProvider, H: Host> {
    loader: Rc<EngineLoader<P>>,
    host: H,
    config: RenderConfig,
}

impl<P, H> PdfConverter<P, H>
where
    P: EngineProvider,
    H: Host,
    PageOf<P>: PdfPage<Surface = H::Surface>,
{
    /// Create a converter with the default render configuration.
    pub fn new(loader: Rc<EngineLoader<P>>, host: H) -> Self {
        Self {
            loader,
            host,
            config: RenderConfig::default(),
        }
    }

    /// Create a converter with a validated render configuration.
    pub fn with_config(
        loader: Rc<EngineLoader<P>>,
        host: H,
        config: RenderConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { loader, host, config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn loader(&self) -> &Rc<EngineLoader<P>> {
        &self.loader
    }

    /// Convert the configured page of `file` into a PNG.
    ///
    /// Checks run in order: document context, then file presence and
    /// extension. The engine is not touched unless both pass.
    pub async fn convert<F: SourceFile>(&self, file: Option<&F>) -> Result<ConversionOutput<H>> {
        debug!(stage = %Stage::Validating, "Starting conversion");

        let result = self.run(file).await;
        match &result {
            Ok(output) => info!(
                stage = %Stage::Done,
                "Converted to {} ({}x{})",
                output.file_name,
                output.width,
                output.height
            ),
            Err(e) => warn!(stage = %Stage::Done, kind = e.kind().as_str(), "Conversion failed: {}", e),
        }
        result
    }

    async fn run<F: SourceFile>(&self, file: Option<&F>) -> Result<ConversionOutput<H>> {
        if !self.host.has_document_context() {
            return Err(ConvertError::Environment);
        }
        let file = match file {
            Some(file) if is_pdf_file_name(file.name()) => file,
            _ => return Err(ConvertError::InvalidInput),
        };

        let engine = self.loader.get().await?;
        debug!(stage = %Stage::EngineReady, "Reading {}", file.name());

        let data = file.read_bytes().await?;
        debug!(stage = %Stage::Parsing, "Parsing {} bytes", data.len());

        let document = engine.load_document(data).await?;
        let page_count = document.num_pages();
        if page_count == 0 {
            return Err(PdfError::NoPages.into());
        }
        let page = document.get_page(self.config.page_number).await?;

        let viewport = page.get_viewport(self.config.scale);
        let (width, height) = (viewport.pixel_width(), viewport.pixel_height());
        debug!(
            stage = %Stage::Rendering,
            "Rendering page {}/{} at {}x ({}x{})",
            self.config.page_number,
            page_count,
            viewport.scale,
            width,
            height
        );

        let mut surface = self
            .host
            .create_surface(width, height)?
            .ok_or(ConvertError::CanvasUnavailable)?;
        surface.set_image_smoothing(self.config.smoothing);
        page.render(&mut surface, &viewport).await?;

        debug!(stage = %Stage::Encoding, "Encoding PNG");
        let blob = surface
            .encode_png(self.config.png_quality)
            .await?
            .ok_or(ConvertError::Encoding)?;

        let file_name = png_file_name(file.name());
        let image_file = self.host.create_file(&blob, &file_name, PNG_MIME_TYPE)?;
        let url = self.host.create_object_url(&blob)?;

        Ok(ConversionOutput {
            image_url: ObjectUrl::new(url, self.host.clone()),
            file: image_file,
            file_name,
            width: surface.width(),
            height: surface.height(),
        })
    }
}

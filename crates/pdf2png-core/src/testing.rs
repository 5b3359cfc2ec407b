//! Test doubles for the engine and host boundaries.
//!
//! Mock "PDFs" are `%PDF-mock;<tag>;<w>x<h>;<w>x<h>...`, one size per page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::engine::{EngineProvider, PdfDocument, PdfEngine, PdfPage};
use crate::error::PdfError;
use crate::host::{DrawingSurface, Host};
use crate::models::{SmoothingQuality, Viewport};

const HEADER: &str = "%PDF-mock;";

/// Build a mock PDF with the given page sizes.
pub fn mock_pdf(pages: &[(f32, f32)], tag: &str) -> Vec<u8> {
    let mut out = format!("{HEADER}{tag}");
    for (w, h) in pages {
        out.push_str(&format!(";{w}x{h}"));
    }
    out.into_bytes()
}

pub struct MockProvider {
    loads: Cell<usize>,
    failures_left: Cell<usize>,
    resolvable: bool,
}

impl MockProvider {
    pub const WORKER_SRC: &'static str = "/assets/pdf.worker.0f3c.mjs";

    pub fn new() -> Self {
        Self {
            loads: Cell::new(0),
            failures_left: Cell::new(0),
            resolvable: true,
        }
    }

    pub fn with_unresolvable_worker(mut self) -> Self {
        self.resolvable = false;
        self
    }

    pub fn failing_loads(self, count: usize) -> Self {
        self.failures_left.set(count);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl EngineProvider for MockProvider {
    type Engine = MockEngine;

    fn resolve_worker_src(&self) -> Result<String, PdfError> {
        if self.resolvable {
            Ok(Self::WORKER_SRC.to_string())
        } else {
            Err(PdfError::EngineLoad("asset URL unavailable".to_string()))
        }
    }

    async fn load(&self, worker_src: &str) -> Result<MockEngine, PdfError> {
        self.loads.set(self.loads.get() + 1);
        tokio::task::yield_now().await;

        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(PdfError::EngineLoad("import failed".to_string()));
        }
        Ok(MockEngine {
            worker_src: worker_src.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct MockEngine {
    pub worker_src: String,
}

impl PdfEngine for MockEngine {
    type Document = MockDocument;

    async fn load_document(&self, data: Vec<u8>) -> Result<MockDocument, PdfError> {
        tokio::task::yield_now().await;

        let text = String::from_utf8(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        let body = text
            .strip_prefix(HEADER)
            .ok_or_else(|| PdfError::Parse("missing header".to_string()))?;

        let mut parts = body.split(';');
        let tag = parts.next().unwrap_or_default().to_string();
        let pages = parts
            .map(|size| {
                let (w, h) = size
                    .split_once('x')
                    .ok_or_else(|| PdfError::Parse(format!("bad page size {size}")))?;
                let w = w.parse().map_err(|_| PdfError::Parse(w.to_string()))?;
                let h = h.parse().map_err(|_| PdfError::Parse(h.to_string()))?;
                Ok((w, h))
            })
            .collect::<Result<Vec<(f32, f32)>, PdfError>>()?;

        Ok(MockDocument { tag, pages })
    }
}

pub struct MockDocument {
    tag: String,
    pages: Vec<(f32, f32)>,
}

impl PdfDocument for MockDocument {
    type Page = MockPage;

    fn num_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    async fn get_page(&self, page_number: u32) -> Result<MockPage, PdfError> {
        tokio::task::yield_now().await;

        let page_count = self.num_pages();
        if page_number == 0 || page_number > page_count {
            return Err(PdfError::InvalidPage { page: page_number, page_count });
        }
        let (width, height) = self.pages[(page_number - 1) as usize];
        Ok(MockPage {
            tag: self.tag.clone(),
            number: page_number,
            width,
            height,
        })
    }
}

pub struct MockPage {
    tag: String,
    number: u32,
    width: f32,
    height: f32,
}

impl PdfPage for MockPage {
    type Surface = MockSurface;

    fn get_viewport(&self, scale: f32) -> Viewport {
        Viewport::from_page_size(self.width, self.height, scale)
    }

    async fn render(&self, surface: &mut MockSurface, viewport: &Viewport) -> Result<(), PdfError> {
        tokio::task::yield_now().await;

        if self.width < 0.0 || self.height < 0.0 {
            return Err(PdfError::Render("negative page size".to_string()));
        }
        assert_eq!(surface.width, viewport.pixel_width());
        surface.painted = Some((self.tag.clone(), self.number));

        tokio::task::yield_now().await;
        Ok(())
    }
}

pub struct MockSurface {
    width: u32,
    height: u32,
    smoothing: SmoothingQuality,
    painted: Option<(String, u32)>,
    yields_blob: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockBlob {
    pub tag: String,
    pub page: u32,
    pub width: u32,
    pub height: u32,
    pub smoothing: SmoothingQuality,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockFile {
    pub name: String,
    pub mime_type: String,
    pub blob: MockBlob,
}

impl DrawingSurface for MockSurface {
    type Blob = MockBlob;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_image_smoothing(&mut self, quality: SmoothingQuality) {
        self.smoothing = quality;
    }

    async fn encode_png(&self, _quality: f32) -> crate::host::Result<Option<MockBlob>> {
        tokio::task::yield_now().await;

        if !self.yields_blob {
            return Ok(None);
        }
        Ok(self.painted.as_ref().map(|(tag, page)| MockBlob {
            tag: tag.clone(),
            page: *page,
            width: self.width,
            height: self.height,
            smoothing: self.smoothing,
        }))
    }
}

#[derive(Default)]
struct MockHostState {
    next_id: usize,
    live: Vec<String>,
    revoked: Vec<String>,
}

#[derive(Clone)]
pub struct MockHost {
    document_context: bool,
    surfaces: bool,
    blobs: bool,
    state: Rc<RefCell<MockHostState>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            document_context: true,
            surfaces: true,
            blobs: true,
            state: Rc::default(),
        }
    }

    /// A host without a document context.
    pub fn headless() -> Self {
        Self {
            document_context: false,
            ..Self::new()
        }
    }

    pub fn without_surfaces(mut self) -> Self {
        self.surfaces = false;
        self
    }

    pub fn without_blobs(mut self) -> Self {
        self.blobs = false;
        self
    }

    pub fn live_urls(&self) -> Vec<String> {
        self.state.borrow().live.clone()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.state.borrow().revoked.clone()
    }
}

impl Host for MockHost {
    type Surface = MockSurface;
    type Blob = MockBlob;
    type File = MockFile;

    fn has_document_context(&self) -> bool {
        self.document_context
    }

    fn create_surface(&self, width: u32, height: u32) -> crate::host::Result<Option<MockSurface>> {
        if !self.surfaces {
            return Ok(None);
        }
        Ok(Some(MockSurface {
            width,
            height,
            smoothing: SmoothingQuality::None,
            painted: None,
            yields_blob: self.blobs,
        }))
    }

    fn create_file(&self, blob: &MockBlob, name: &str, mime_type: &str) -> crate::host::Result<MockFile> {
        Ok(MockFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            blob: blob.clone(),
        })
    }

    fn create_object_url(&self, blob: &MockBlob) -> crate::host::Result<String> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let url = format!("blob:mock/{}/{}", blob.tag, state.next_id);
        state.live.push(url.clone());
        Ok(url)
    }

    fn revoke_object_url(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        state.live.retain(|live| live != url);
        state.revoked.push(url.to_string());
    }
}

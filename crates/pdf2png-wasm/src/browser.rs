//! Canvas-backed host for rendering inside a browser document.

use js_sys::{Array, Promise, Reflect, Uint8Array};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, CanvasRenderingContext2d, Document, File, FilePropertyBag, HtmlCanvasElement, Url,
};

use pdf2png_core::error::HostError;
use pdf2png_core::host::{DrawingSurface, Host, Result};
use pdf2png_core::{PNG_MIME_TYPE, PdfError, SmoothingQuality, SourceFile};

use crate::js_error_message;

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Host backed by the page's DOM: canvases, `File`s and blob URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl Host for BrowserHost {
    type Surface = CanvasSurface;
    type Blob = Blob;
    type File = File;

    fn has_document_context(&self) -> bool {
        document().is_some()
    }

    fn create_surface(&self, width: u32, height: u32) -> Result<Option<CanvasSurface>> {
        let surface_error = |e: JsValue| HostError::Surface(js_error_message(&e));

        let document =
            document().ok_or_else(|| HostError::Surface("no document available".to_string()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(surface_error)?
            .dyn_into()
            .map_err(|_| HostError::Surface("element is not a canvas".to_string()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context = match canvas.get_context("2d").map_err(surface_error)? {
            Some(context) => context
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| HostError::Surface("unexpected context type".to_string()))?,
            None => return Ok(None),
        };

        Ok(Some(CanvasSurface { canvas, context }))
    }

    fn create_file(&self, blob: &Blob, name: &str, mime_type: &str) -> Result<File> {
        let options = FilePropertyBag::new();
        options.set_type(mime_type);

        File::new_with_blob_sequence_and_options(&Array::of1(blob), name, &options)
            .map_err(|e| HostError::File(js_error_message(&e)))
    }

    fn create_object_url(&self, blob: &Blob) -> Result<String> {
        Url::create_object_url_with_blob(blob).map_err(|e| HostError::ObjectUrl(js_error_message(&e)))
    }

    fn revoke_object_url(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            debug!("Failed to revoke {}: {}", url, js_error_message(&e));
        }
    }
}

/// A detached `<canvas>` with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.context
    }
}

impl DrawingSurface for CanvasSurface {
    type Blob = Blob;

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_image_smoothing(&mut self, quality: SmoothingQuality) {
        let value = quality.as_canvas_value();
        self.context.set_image_smoothing_enabled(value.is_some());
        if let Some(value) = value {
            // Not exposed by web-sys; older engines simply ignore it.
            let _ = Reflect::set(
                &self.context,
                &JsValue::from_str("imageSmoothingQuality"),
                &JsValue::from_str(value),
            );
        }
    }

    async fn encode_png(&self, quality: f32) -> Result<Option<Blob>> {
        let canvas = &self.canvas;
        let promise = Promise::new(&mut |resolve, reject| {
            let callback = Closure::once_into_js(move |blob: JsValue| {
                let _ = resolve.call1(&JsValue::NULL, &blob);
            });
            if let Err(e) = canvas.to_blob_with_type_and_encoder_options(
                callback.unchecked_ref(),
                PNG_MIME_TYPE,
                &JsValue::from_f64(f64::from(quality)),
            ) {
                let _ = reject.call1(&JsValue::NULL, &e);
            }
        });

        let value = JsFuture::from(promise)
            .await
            .map_err(|e| HostError::Encode(js_error_message(&e)))?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }

        value
            .dyn_into::<Blob>()
            .map(Some)
            .map_err(|_| HostError::Encode("toBlob produced a non-Blob value".to_string()))
    }
}

/// A user-selected `File` as conversion input.
pub struct BrowserFile {
    name: String,
    file: File,
}

impl BrowserFile {
    pub fn new(file: File) -> Self {
        Self {
            name: file.name(),
            file,
        }
    }
}

impl SourceFile for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_bytes(&self) -> std::result::Result<Vec<u8>, PdfError> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| PdfError::Read(js_error_message(&e)))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

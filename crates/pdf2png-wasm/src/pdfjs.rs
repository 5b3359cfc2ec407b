//! pdf.js bindings and the engine implementation built on them.
//!
//! pdf.js is imported lazily through a small JS bridge, since dynamic
//! `import()` and `import.meta.url` cannot be expressed from Rust.

use js_sys::{Object, Promise, Reflect, Uint8Array};
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use pdf2png_core::engine::{EngineProvider, PdfDocument, PdfEngine, PdfPage, Result as PdfResult};
use pdf2png_core::{PdfError, Viewport};

use crate::browser::CanvasSurface;
use crate::js_error_message;

#[wasm_bindgen(module = "/js/pdfjs_bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = loadPdfJs)]
    async fn load_pdfjs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = resolveWorkerUrl)]
    fn resolve_worker_url() -> Result<String, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    /// The pdf.js module namespace.
    type PdfJsLib;

    #[wasm_bindgen(method, getter, js_name = GlobalWorkerOptions)]
    fn global_worker_options(this: &PdfJsLib) -> GlobalWorkerOptions;

    #[wasm_bindgen(method, catch, js_name = getDocument)]
    fn get_document(this: &PdfJsLib, params: &JsValue) -> Result<PdfLoadingTask, JsValue>;

    type GlobalWorkerOptions;

    #[wasm_bindgen(method, setter, js_name = workerSrc)]
    fn set_worker_src(this: &GlobalWorkerOptions, src: &str);

    type PdfLoadingTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &PdfLoadingTask) -> Promise;

    type PdfDocumentProxy;

    #[wasm_bindgen(method, getter, js_name = numPages)]
    fn num_pages(this: &PdfDocumentProxy) -> u32;

    #[wasm_bindgen(method, js_name = getPage)]
    fn get_page(this: &PdfDocumentProxy, page_number: u32) -> Promise;

    #[wasm_bindgen(method)]
    fn destroy(this: &PdfDocumentProxy) -> Promise;

    type PdfPageProxy;

    #[wasm_bindgen(method, js_name = getViewport)]
    fn get_viewport(this: &PdfPageProxy, params: &JsValue) -> PageViewport;

    #[wasm_bindgen(method, catch)]
    fn render(this: &PdfPageProxy, params: &JsValue) -> Result<RenderTask, JsValue>;

    type PageViewport;

    #[wasm_bindgen(method, getter)]
    fn width(this: &PageViewport) -> f64;

    #[wasm_bindgen(method, getter)]
    fn height(this: &PageViewport) -> f64;

    type RenderTask;

    #[wasm_bindgen(method, getter)]
    fn promise(this: &RenderTask) -> Promise;
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn viewport_params(scale: f32) -> JsValue {
    let params = Object::new();
    // Setting a property on a fresh object cannot fail.
    let _ = set(&params, "scale", &JsValue::from_f64(f64::from(scale)));
    params.into()
}

/// Loads pdf.js and points it at its worker script.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfJsProvider;

impl EngineProvider for PdfJsProvider {
    type Engine = PdfJsEngine;

    fn resolve_worker_src(&self) -> PdfResult<String> {
        resolve_worker_url().map_err(|e| PdfError::EngineLoad(js_error_message(&e)))
    }

    async fn load(&self, worker_src: &str) -> PdfResult<PdfJsEngine> {
        let module = load_pdfjs()
            .await
            .map_err(|e| PdfError::EngineLoad(js_error_message(&e)))?;
        let lib: PdfJsLib = module.unchecked_into();

        lib.global_worker_options().set_worker_src(worker_src);
        debug!("pdf.js loaded, worker at {}", worker_src);

        Ok(PdfJsEngine { lib })
    }
}

/// The loaded pdf.js module.
pub struct PdfJsEngine {
    lib: PdfJsLib,
}

impl PdfEngine for PdfJsEngine {
    type Document = PdfJsDocument;

    async fn load_document(&self, data: Vec<u8>) -> PdfResult<PdfJsDocument> {
        let parse_error = |e: JsValue| PdfError::Parse(js_error_message(&e));

        let params = Object::new();
        set(&params, "data", &Uint8Array::from(data.as_slice())).map_err(parse_error)?;

        let task = self.lib.get_document(&params).map_err(parse_error)?;
        let proxy = JsFuture::from(task.promise()).await.map_err(parse_error)?;

        Ok(PdfJsDocument {
            proxy: proxy.unchecked_into(),
        })
    }
}

/// A document loaded by pdf.js. Destroyed when dropped.
pub struct PdfJsDocument {
    proxy: PdfDocumentProxy,
}

impl PdfDocument for PdfJsDocument {
    type Page = PdfJsPage;

    fn num_pages(&self) -> u32 {
        self.proxy.num_pages()
    }

    async fn get_page(&self, page_number: u32) -> PdfResult<PdfJsPage> {
        let page_count = self.num_pages();
        if page_number == 0 || page_number > page_count {
            return Err(PdfError::InvalidPage { page: page_number, page_count });
        }

        let proxy = JsFuture::from(self.proxy.get_page(page_number))
            .await
            .map_err(|e| PdfError::Parse(js_error_message(&e)))?;

        Ok(PdfJsPage {
            proxy: proxy.unchecked_into(),
        })
    }
}

impl Drop for PdfJsDocument {
    fn drop(&mut self) {
        // Frees the worker-side copy; the returned promise is not awaited.
        let _ = self.proxy.destroy();
    }
}

/// A page loaded by pdf.js.
pub struct PdfJsPage {
    proxy: PdfPageProxy,
}

impl PdfPage for PdfJsPage {
    type Surface = CanvasSurface;

    fn get_viewport(&self, scale: f32) -> Viewport {
        let viewport = self.proxy.get_viewport(&viewport_params(scale));
        Viewport {
            width: viewport.width() as f32,
            height: viewport.height() as f32,
            scale,
        }
    }

    async fn render(&self, surface: &mut CanvasSurface, viewport: &Viewport) -> PdfResult<()> {
        let render_error = |e: JsValue| PdfError::Render(js_error_message(&e));

        let js_viewport = self.proxy.get_viewport(&viewport_params(viewport.scale));

        let params = Object::new();
        set(&params, "canvasContext", surface.context()).map_err(render_error)?;
        set(&params, "canvas", surface.canvas()).map_err(render_error)?;
        set(&params, "viewport", &js_viewport).map_err(render_error)?;

        let task = self.proxy.render(&params).map_err(render_error)?;
        JsFuture::from(task.promise()).await.map_err(render_error)?;

        Ok(())
    }
}

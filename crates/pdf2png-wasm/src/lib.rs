//! WASM bindings for rendering the first page of a PDF to a PNG.
//!
//! This crate provides WebAssembly bindings for use in browsers. pdf.js does
//! the rendering into an off-screen canvas; the PNG comes back as a `File`
//! plus a blob URL.

pub mod browser;
pub mod pdfjs;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Object;
use wasm_bindgen::prelude::*;

use pdf2png_core::{ConvertError, EngineLoader, ErrorKind, Pdf2PngConfig, PdfConverter};

use browser::{BrowserFile, BrowserHost};
use pdfjs::PdfJsProvider;

thread_local! {
    static LOADER: RefCell<Option<Rc<EngineLoader<PdfJsProvider>>>> = const { RefCell::new(None) };
}

/// The page-wide pdf.js loader. Engine options apply from the first call on.
fn shared_loader(config: &Pdf2PngConfig) -> Rc<EngineLoader<PdfJsProvider>> {
    LOADER.with(|slot| {
        slot.borrow_mut()
            .get_or_insert_with(|| Rc::new(EngineLoader::with_config(PdfJsProvider, &config.engine)))
            .clone()
    })
}

pub(crate) fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Whether a file name carries a `.pdf` extension (case-insensitive).
#[wasm_bindgen(js_name = isPdfFileName)]
pub fn is_pdf_file_name(name: &str) -> bool {
    pdf2png_core::is_pdf_file_name(name)
}

/// Release a URL returned by `convertPdfToImage`.
#[wasm_bindgen(js_name = revokeImageUrl)]
pub fn revoke_image_url(url: &str) {
    if url.is_empty() {
        return;
    }
    let _ = web_sys::Url::revoke_object_url(url);
}

/// Render the first page of a PDF file to a PNG.
///
/// Never throws. Resolves to `{ imageUrl, file, width, height }` on success,
/// or `{ imageUrl: "", file: null, error, errorKind }` on failure. The caller
/// owns `imageUrl` and releases it with `revokeImageUrl`.
///
/// `options` is optional and mirrors the configuration file:
/// `{ render: { scale, pageNumber, pngQuality, smoothing }, engine: { workerSrc } }`.
#[wasm_bindgen(js_name = convertPdfToImage)]
pub async fn convert_pdf_to_image(file: Option<web_sys::File>, options: JsValue) -> JsValue {
    let config = match parse_options(options) {
        Ok(config) => config,
        Err(message) => return failure(&message, ErrorKind::InputValidation),
    };

    let converter =
        match PdfConverter::with_config(shared_loader(&config), BrowserHost, config.render) {
            Ok(converter) => converter,
            Err(e) => return failure(&e.to_string(), ErrorKind::InputValidation),
        };

    let file = file.map(BrowserFile::new);
    match converter.convert(file.as_ref()).await {
        Ok(output) => {
            let result = Object::new();
            set(&result, "imageUrl", &output.image_url.into_string().into());
            set(&result, "file", &output.file);
            set(&result, "width", &output.width.into());
            set(&result, "height", &output.height.into());
            result.into()
        }
        Err(e) => convert_failure(&e),
    }
}

fn parse_options(options: JsValue) -> Result<Pdf2PngConfig, String> {
    if options.is_undefined() || options.is_null() {
        return Ok(Pdf2PngConfig::default());
    }
    serde_wasm_bindgen::from_value(options).map_err(|e| format!("Invalid options: {}", e))
}

fn set(target: &Object, key: &str, value: &JsValue) {
    // Plain objects created here are never frozen.
    let _ = js_sys::Reflect::set(target, &JsValue::from_str(key), value);
}

fn convert_failure(error: &ConvertError) -> JsValue {
    failure(&error.to_string(), error.kind())
}

fn failure(message: &str, kind: ErrorKind) -> JsValue {
    let result = Object::new();
    set(&result, "imageUrl", &JsValue::from_str(""));
    set(&result, "file", &JsValue::NULL);
    set(&result, "error", &JsValue::from_str(message));
    set(&result, "errorKind", &JsValue::from_str(kind.as_str()));
    result.into()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use js_sys::{Array, Reflect};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn field(value: &JsValue, key: &str) -> JsValue {
        Reflect::get(value, &JsValue::from_str(key)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_is_pdf_file_name() {
        assert!(is_pdf_file_name("report.PDF"));
        assert!(!is_pdf_file_name("report.pdf.txt"));
    }

    #[wasm_bindgen_test]
    fn test_version_matches_package() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }

    #[wasm_bindgen_test]
    async fn test_missing_file_is_reported_as_value() {
        let result = convert_pdf_to_image(None, JsValue::UNDEFINED).await;

        assert_eq!(field(&result, "imageUrl").as_string().as_deref(), Some(""));
        assert!(field(&result, "file").is_null());
        assert_eq!(
            field(&result, "error").as_string().as_deref(),
            Some("Please provide a valid .pdf file")
        );
        assert_eq!(
            field(&result, "errorKind").as_string().as_deref(),
            Some("inputValidation")
        );
    }

    #[wasm_bindgen_test]
    async fn test_non_pdf_file_is_rejected_before_loading() {
        let parts = Array::of1(&JsValue::from_str("hello"));
        let file = web_sys::File::new_with_str_sequence(&parts, "notes.txt").unwrap();

        let result = convert_pdf_to_image(Some(file), JsValue::UNDEFINED).await;

        assert_eq!(
            field(&result, "error").as_string().as_deref(),
            Some("Please provide a valid .pdf file")
        );
        assert!(LOADER.with(|slot| slot.borrow().as_ref().map_or(true, |l| !l.is_loaded())));
    }

    #[wasm_bindgen_test]
    async fn test_invalid_options_are_reported() {
        let options = js_sys::JSON::parse(r#"{"render": {"scale": 0}}"#).unwrap();

        let result = convert_pdf_to_image(None, options).await;

        assert_eq!(
            field(&result, "errorKind").as_string().as_deref(),
            Some("inputValidation")
        );
        assert!(field(&result, "error").as_string().unwrap().contains("render.scale"));
    }

    #[wasm_bindgen_test]
    fn test_parse_options_defaults() {
        assert_eq!(parse_options(JsValue::UNDEFINED).unwrap(), Pdf2PngConfig::default());
        assert_eq!(parse_options(JsValue::NULL).unwrap(), Pdf2PngConfig::default());
    }
}

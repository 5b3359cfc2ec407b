pub mod batch;
pub mod config;
pub mod convert;

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use pdf2png_core::{
    EngineLoader, NativeConverter, Pdf2PngConfig, PdfConverter, PdfiumProvider, RasterHost,
};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pdf2png")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<Pdf2PngConfig> {
    if let Some(path) = config_path {
        return Ok(Pdf2PngConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(Pdf2PngConfig::from_file(&default_path)?)
    } else {
        Ok(Pdf2PngConfig::default())
    }
}

/// Build a converter over PDFium.
///
/// `library` may name the PDFium library itself or a directory holding it.
pub fn native_converter(
    config: &Pdf2PngConfig,
    library: Option<&Path>,
) -> anyhow::Result<NativeConverter> {
    let mut engine = config.engine.clone();
    let mut provider = PdfiumProvider::new();

    match library {
        Some(dir) if dir.is_dir() => provider = provider.with_search_dir(dir),
        Some(path) => engine.worker_src = Some(path.display().to_string()),
        None => {}
    }

    let loader = Rc::new(EngineLoader::with_config(provider, &engine));
    let host = RasterHost::with_max_surface_pixels(engine.max_surface_pixels);

    Ok(PdfConverter::with_config(loader, host, config.render.clone())?)
}

/// Where to write the PNG for `input`.
///
/// `output` may be a file path or an existing directory; without it the PNG
/// lands next to the input.
pub fn output_path(input: &Path, output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => input
            .parent()
            .map(|dir| dir.join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name)),
    }
}

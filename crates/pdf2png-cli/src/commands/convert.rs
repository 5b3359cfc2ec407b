//! Convert command - render one PDF page to a PNG file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use pdf2png_core::LocalFile;

use super::{load_config, native_converter, output_path};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output PNG file or directory (default: next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render scale (default from config: 3.0)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Page to render, starting at 1
    #[arg(short, long)]
    page: Option<u32>,

    /// PDFium library file or directory containing it
    #[arg(long)]
    library_path: Option<PathBuf>,

    /// Print a JSON summary instead of a message
    #[arg(long)]
    json: bool,
}

/// Summary of a finished conversion.
#[derive(Debug, Serialize)]
struct ConversionSummary {
    input: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    bytes: usize,
    processing_time_ms: u64,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(scale) = args.scale {
        config.render.scale = scale;
    }
    if let Some(page) = args.page {
        config.render.page_number = page;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let converter = native_converter(&config, args.library_path.as_deref())?;
    info!("Converting {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Rendering {}...", args.input.display()));

    let file = LocalFile::new(&args.input);
    let result = converter.convert(Some(&file)).await;
    pb.finish_and_clear();
    let output = result?;

    let path = output_path(&args.input, args.output.as_deref(), &output.file_name);
    output.file.save(&path)?;
    debug!("Wrote {} bytes to {}", output.file.blob.len(), path.display());

    if args.json {
        let summary = ConversionSummary {
            input: args.input.clone(),
            output: path,
            width: output.width,
            height: output.height,
            bytes: output.file.blob.len(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {} -> {} ({}x{})",
            style("✓").green(),
            args.input.display(),
            path.display(),
            output.width,
            output.height
        );
    }

    Ok(())
}

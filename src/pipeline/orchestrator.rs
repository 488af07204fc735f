// 変換1回分: ラスタライズ -> 色反転 -> 出力PDF組立

use std::path::PathBuf;

use tracing::info;

use crate::invert::invert_pages;
use crate::pdf::writer::DarkPageWriter;
use crate::progress::ProgressCallback;
use crate::render::pdfium::rasterize_document;

/// Configuration for a single conversion.
pub struct ConversionConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dpi: u32,
}

/// Result of a completed conversion.
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pages_converted: usize,
}

/// Run a single conversion through the 3-stage pipeline.
///
/// Stage A: Rasterization (sequential, document handle scoped to the stage)
/// Stage B: Color inversion (rayon parallel, order preserved)
/// Stage C: PDF assembly + atomic write (sequential)
///
/// The first failing stage aborts the conversion: no output file is
/// produced, the input file is never modified, and the stage's error is
/// propagated as-is. Concurrent invocations on the same output path are
/// the caller's responsibility to prevent.
pub fn run_conversion(
    config: &ConversionConfig,
    progress: &dyn ProgressCallback,
) -> crate::error::Result<ConversionResult> {
    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        dpi = config.dpi,
        "starting conversion"
    );

    // --- Stage A: Rasterization ---
    let bitmaps = rasterize_document(&config.input_path, config.dpi, progress)?;

    // --- Stage B: Color inversion ---
    let inverted = invert_pages(bitmaps, progress);

    // --- Stage C: PDF assembly ---
    let mut writer = DarkPageWriter::new();
    for bitmap in &inverted {
        writer.add_page(bitmap, config.dpi)?;
    }
    writer.write_to_file(&config.output_path)?;

    let pages_converted = writer.page_len();
    progress.on_conversion_complete(pages_converted);

    Ok(ConversionResult {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        pages_converted,
    })
}

// pdfium-render wrapper: document -> ordered page bitmaps (in-memory only)

use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::progress::ProgressCallback;

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    // 1. Check environment variable
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::PdfDarkError::document_open(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    // 2. Fallback: vendor/pdfium/lib/ relative to project root
    //    In development, CARGO_MANIFEST_DIR points to the project root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::PdfDarkError::document_open(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::PdfDarkError::document_open(
            "pdfium library path contains non-UTF-8 characters",
        )
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| crate::error::PdfDarkError::document_open(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Returns the number of pages in the document without rendering any of them.
pub fn page_count(pdf_path: &Path) -> crate::error::Result<usize> {
    let pdfium = create_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| crate::error::PdfDarkError::document_open(e.to_string()))?;
    Ok(document.pages().len() as usize)
}

/// Renders every page of a PDF at the specified DPI, in page order.
///
/// The document is opened once, each page is rendered to an in-memory
/// opaque RGB bitmap, and the document handle is released before this
/// function returns on every path (success and failure). No intermediate
/// files are created.
///
/// # Arguments
/// * `pdf_path` - Path to the PDF file
/// * `dpi` - Resolution in dots per inch (72 DPI = 1 point per pixel)
/// * `progress` - Receives `on_conversion_start` once the page count is
///   known, then `on_page_rasterized` after each page
///
/// # Errors
/// * `ConfigError` if `dpi` is 0
/// * `DocumentOpenError` if the pdfium library cannot be initialized or the
///   file cannot be opened as a PDF
/// * `PageRenderError` if any single page fails to rasterize; the whole
///   conversion aborts, no partial output
pub fn rasterize_document(
    pdf_path: &Path,
    dpi: u32,
    progress: &dyn ProgressCallback,
) -> crate::error::Result<Vec<RgbImage>> {
    if dpi == 0 {
        return Err(crate::error::PdfDarkError::config(
            "dpi must be greater than 0",
        ));
    }

    let pdfium = create_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| crate::error::PdfDarkError::document_open(e.to_string()))?;

    let total = document.pages().len();
    info!(pages = total, dpi, "document opened for rasterization");
    progress.on_conversion_start(total as usize);

    let mut bitmaps: Vec<RgbImage> = Vec::with_capacity(total as usize);

    for index in 0..total {
        let page_num = index as usize + 1;
        let page = document.pages().get(index).map_err(|e| {
            crate::error::PdfDarkError::page_render(format!("page {page_num}/{total}: {e}"))
        })?;

        // PDF default user unit: 1 point = 1/72 inch
        // At the given DPI, each point maps to (dpi / 72) pixels
        let width_pts = page.width().value;
        let height_pts = page.height().value;
        let width_px = (width_pts * dpi as f32 / 72.0).round() as i32;
        let height_px = (height_pts * dpi as f32 / 72.0).round() as i32;

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page.render_with_config(&config).map_err(|e| {
            crate::error::PdfDarkError::page_render(format!("page {page_num}/{total}: {e}"))
        })?;

        // Alpha is discarded: output bitmaps are opaque RGB.
        let rgb = bitmap.as_image().to_rgb8();
        debug!(
            page = page_num,
            width = rgb.width(),
            height = rgb.height(),
            "page rasterized"
        );
        bitmaps.push(rgb);
        progress.on_page_rasterized(page_num, total as usize);
    }

    Ok(bitmaps)
}

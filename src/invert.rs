// Color inversion: the core "dark mode" transform.

use image::RgbImage;
use rayon::prelude::*;

use crate::progress::ProgressCallback;

/// Inverts every channel of every pixel: `v -> 255 - v`.
///
/// Takes ownership of the input and returns a bitmap of identical
/// dimensions. Pure and deterministic; applying it twice restores the
/// original bitmap exactly.
pub fn invert_bitmap(mut bitmap: RgbImage) -> RgbImage {
    for value in bitmap.iter_mut() {
        *value = 255 - *value;
    }
    bitmap
}

/// Inverts an ordered page sequence, preserving order and dimensions.
///
/// Pages are independent, so the per-page work runs on the rayon pool;
/// `on_page_inverted` may therefore be called out of page order and from
/// multiple worker threads. The returned sequence is always in the
/// original page order.
pub fn invert_pages(pages: Vec<RgbImage>, progress: &dyn ProgressCallback) -> Vec<RgbImage> {
    let total = pages.len();
    pages
        .into_par_iter()
        .enumerate()
        .map(|(index, bitmap)| {
            let inverted = invert_bitmap(bitmap);
            progress.on_page_inverted(index + 1, total);
            inverted
        })
        .collect()
}

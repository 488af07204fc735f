//! Progress-callback trait for per-page conversion events.
//!
//! The two per-page hooks are the only externally observable intermediate
//! state of a conversion. Implementations must be `Send + Sync`: the
//! inversion stage runs on the rayon pool, so `on_page_inverted` may be
//! called concurrently from worker threads. All methods default to no-ops
//! so callers only override what they care about.

/// Called by the conversion pipeline as it processes each page.
pub trait ProgressCallback: Send + Sync {
    /// Called once per conversion, after the document is opened and the
    /// page count is known, before any page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page is rasterized, in page order.
    fn on_page_rasterized(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after each page is inverted. May arrive out of page order.
    fn on_page_inverted(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called exactly once, only when the output file has been written.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}

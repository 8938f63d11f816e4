//! PDF redaction round trip.
//!
//! Each page of a PDF is rasterized, sent to the image redaction service on
//! its own, and the redacted images are bound back into one PDF. Pages the
//! service rejects are dropped from the output. Rasterizing goes through the
//! `PageRasterizer` trait; with the `pdfium` feature enabled and libpdfium
//! present, `PdfiumRasterizer` does the work.

pub mod assemble;
pub mod client;
pub mod rasterize;
pub mod round_trip;

pub use assemble::write_image_pdf;
pub use client::{HttpImageRedactor, ImageRedactor};
pub use rasterize::{PageImage, PageRasterizer};
pub use round_trip::{JobState, PageFailure, RedactionJob, RedactionOutcome};

#[cfg(feature = "pdfium")]
pub use rasterize::PdfiumRasterizer;

use std::sync::Arc;

/// Create the rasterizer for this build.
///
/// Without the `pdfium` feature every conversion fails with a conversion error.
pub fn create_rasterizer() -> Arc<dyn PageRasterizer> {
    #[cfg(feature = "pdfium")]
    {
        tracing::info!("Using pdfium rasterizer");
        Arc::new(PdfiumRasterizer::default())
    }

    #[cfg(not(feature = "pdfium"))]
    {
        tracing::warn!("pdfium feature disabled. PDF conversion unavailable.");
        Arc::new(rasterize::UnavailableRasterizer)
    }
}

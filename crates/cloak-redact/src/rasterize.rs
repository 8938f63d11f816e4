//! PDF page rasterization.

use std::path::Path;

use cloak_core::{Error, Result};

/// Default render resolution for page images.
pub const RENDER_DPI: f32 = 200.0;

/// Pixel length of `points` (1/72 in) rendered at `dpi`.
pub fn pixels_for(points: f32, dpi: f32) -> i32 {
    (points * dpi / 72.0).round() as i32
}

/// One rasterized page, PNG-encoded. `number` is 1-based.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub number: usize,
    pub png: Vec<u8>,
}

/// Trait for PDF rasterizers. Blocking.
pub trait PageRasterizer: Send + Sync {
    /// Render every page of the PDF at `pdf`, in page order.
    fn rasterize(&self, pdf: &Path) -> Result<Vec<PageImage>>;
}

/// Placeholder used when no rasterizer is compiled in.
pub struct UnavailableRasterizer;

impl PageRasterizer for UnavailableRasterizer {
    fn rasterize(&self, pdf: &Path) -> Result<Vec<PageImage>> {
        Err(Error::Conversion(format!(
            "cannot rasterize {}: built without the pdfium feature",
            pdf.display()
        )))
    }
}

#[cfg(feature = "pdfium")]
pub use pdfium_backend::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium_backend {
    use std::io::Cursor;
    use std::path::Path;

    use image::{DynamicImage, ImageFormat, RgbaImage};
    use pdfium_render::prelude::*;
    use tracing::debug;

    use super::{pixels_for, PageImage, PageRasterizer, RENDER_DPI};
    use cloak_core::{Error, Result};

    /// Rasterizer backed by the system libpdfium.
    pub struct PdfiumRasterizer {
        pub dpi: f32,
    }

    impl Default for PdfiumRasterizer {
        fn default() -> Self {
            Self { dpi: RENDER_DPI }
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn rasterize(&self, pdf: &Path) -> Result<Vec<PageImage>> {
            let pdfium = Pdfium::new(
                Pdfium::bind_to_system_library()
                    .map_err(|e| Error::Conversion(format!("pdfium bind failed: {e}")))?,
            );

            let doc = pdfium
                .load_pdf_from_file(pdf, None)
                .map_err(|e| Error::Conversion(format!("pdfium open failed: {e}")))?;

            let mut pages = Vec::new();
            for (index, page) in doc.pages().iter().enumerate() {
                let width = pixels_for(page.width().value, self.dpi);
                let height = pixels_for(page.height().value, self.dpi);

                let bitmap = page
                    .render_with_config(
                        &PdfRenderConfig::new()
                            .set_target_width(width)
                            .set_target_height(height),
                    )
                    .map_err(|e| Error::Conversion(format!("render page {} failed: {e}", index + 1)))?;

                let rgba = RgbaImage::from_raw(
                    bitmap.width() as u32,
                    bitmap.height() as u32,
                    bitmap.as_rgba_bytes(),
                )
                .ok_or_else(|| {
                    Error::Conversion(format!("page {} bitmap has unexpected size", index + 1))
                })?;

                let mut png = Vec::new();
                DynamicImage::ImageRgba8(rgba)
                    .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                    .map_err(|e| {
                        Error::Conversion(format!("PNG encode page {} failed: {e}", index + 1))
                    })?;

                debug!("Rasterized page {} ({} bytes)", index + 1, png.len());
                pages.push(PageImage {
                    number: index + 1,
                    png,
                });
            }

            Ok(pages)
        }
    }
}

//! Binding page images into a PDF.
//!
//! Each image becomes one page whose MediaBox is the image size in pixels,
//! taken as points. Images are re-encoded as baseline JPEG (`DCTDecode`) so
//! any input format the `image` crate decodes is accepted.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::info;

use cloak_core::{Error, Result};

/// Write `images` as a multi-page PDF at `output`, one image per page, in order.
pub fn write_image_pdf(images: &[Vec<u8>], output: &Path) -> Result<()> {
    if images.is_empty() {
        return Err(Error::Conversion("no pages to assemble".into()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(images.len());

    for (index, bytes) in images.iter().enumerate() {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::Conversion(format!("page image {} unreadable: {}", index + 1, e)))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(|e| Error::Conversion(format!("JPEG encode page {} failed: {}", index + 1, e)))?;

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(width as i64),
                "Height" => Object::Integer(height as i64),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width as i64),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height as i64),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::Conversion(format!("content stream for page {}: {}", index + 1, e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width as i64),
                Object::Integer(height as i64),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(output)?;
    info!("Wrote {} page(s) to {}", count, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 10, 10]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_pages_follow_image_order_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        write_image_pdf(&[png(10, 20), png(30, 40)], &path).unwrap();

        let doc = Document::load(&path).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 2);

        let widths: Vec<i64> = pages
            .values()
            .map(|id| {
                let media_box = doc
                    .get_dictionary(*id)
                    .unwrap()
                    .get(b"MediaBox")
                    .unwrap()
                    .as_array()
                    .unwrap();
                media_box[2].as_i64().unwrap()
            })
            .collect();
        assert_eq!(widths, vec![10, 30]);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        assert!(write_image_pdf(&[], &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_undecodable_image_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let err = write_image_pdf(&[b"not an image".to_vec()], &path).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }
}

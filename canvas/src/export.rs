//! PNG and single-page PDF encoding of a rasterized frame.
//!
//! Both encoders take the pixmap produced by [`crate::raster::Rasterizer`],
//! so an export is exactly what the canvas shows. The PDF page is sized to
//! the sheet's physical dimensions in points and carries the raster as one
//! full-page image, with transparency kept in a soft mask.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tiny_skia::Pixmap;

use crate::error::ExportError;
use crate::units::SheetSize;

/// Undo premultiplication into straight RGBA bytes.
fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Encode a pixmap as a lossless RGBA PNG.
///
/// # Errors
///
/// Returns [`ExportError::Png`] if the encoder fails.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let rgba = straight_rgba(pixmap);
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(&rgba, pixmap.width(), pixmap.height(), ExtendedColorType::Rgba8)?;
    tracing::debug!(width = pixmap.width(), height = pixmap.height(), bytes = out.len(), "encoded PNG");
    Ok(out)
}

/// Encode a pixmap as a single-page PDF whose page matches `sheet` in points.
///
/// # Errors
///
/// Returns [`ExportError::Pdf`] if the content stream or document cannot be serialized.
pub fn encode_pdf(pixmap: &Pixmap, sheet: &SheetSize) -> Result<Vec<u8>, ExportError> {
    let (page_w, page_h) = sheet.points();
    let (color, alpha) = split_channels(pixmap);
    let width = i64::from(pixmap.width());
    let height = i64::from(pixmap.height());

    let mut doc = Document::with_version("1.5");
    let id_pages = doc.new_object_id();

    let id_mask = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        alpha,
    ));

    let id_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "SMask" => id_mask,
        },
        color,
    ));

    // Scale the unit image square to the full page.
    #[allow(clippy::cast_possible_truncation)]
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (page_w as f32).into(),
                    0.into(),
                    0.into(),
                    (page_h as f32).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content.encode().map_err(|e| ExportError::Pdf(e.to_string()))?;
    let id_content = doc.add_object(Stream::new(dictionary! {}, encoded));

    let id_resources = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im1" => id_image,
        },
    });

    #[allow(clippy::cast_possible_truncation)]
    let media_box: Vec<Object> = vec![0.into(), 0.into(), (page_w as f32).into(), (page_h as f32).into()];
    let id_page = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => id_pages,
        "MediaBox" => media_box,
        "Contents" => id_content,
        "Resources" => id_resources,
    });

    let kids: Vec<Object> = vec![id_page.into()];
    doc.set_object(
        id_pages,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 1,
        },
    );

    let id_catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => id_pages,
    });
    doc.trailer.set("Root", id_catalog);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| ExportError::Pdf(e.to_string()))?;
    tracing::debug!(page_w, page_h, bytes = out.len(), "encoded PDF");
    Ok(out)
}

/// Split a pixmap into straight RGB bytes and a separate alpha plane.
fn split_channels(pixmap: &Pixmap) -> (Vec<u8>, Vec<u8>) {
    let count = pixmap.pixels().len();
    let mut color = Vec::with_capacity(count * 3);
    let mut alpha = Vec::with_capacity(count);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        color.extend_from_slice(&[c.red(), c.green(), c.blue()]);
        alpha.push(c.alpha());
    }
    (color, alpha)
}

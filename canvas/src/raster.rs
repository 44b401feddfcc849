//! Software rasterizer: paints a [`Frame`] into an RGBA pixmap.
//!
//! Used for PNG/PDF export and by headless hosts. Shapes and images go
//! through tiny-skia; text glyphs are outlined with ab_glyph and blended
//! directly into the pixmap. Text uses DejaVu Sans unless the host supplies
//! another font.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{
    ColorU8, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8, Rect, Stroke, Transform,
};

use crate::doc::Bitmap;
use crate::error::ExportError;
use crate::render::{Color, DrawCmd, Frame, is_unrotated};

const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Paints frames into pixmaps with a font for text.
#[derive(Clone)]
pub struct Rasterizer {
    font: Option<FontArc>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        let font = match FontArc::try_from_slice(BUNDLED_FONT) {
            Ok(font) => Some(font),
            Err(err) => {
                tracing::warn!(%err, "bundled font unreadable; text will be left out of exports");
                None
            }
        };
        Self { font }
    }
}

impl Rasterizer {
    /// A rasterizer using the bundled DejaVu Sans font.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A rasterizer that draws text with the given TrueType/OpenType font.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Font`] if the bytes are not a usable font.
    pub fn with_font(bytes: Vec<u8>) -> Result<Self, ExportError> {
        let font = FontArc::try_from_vec(bytes)?;
        Ok(Self { font: Some(font) })
    }

    /// Whether text will be drawn.
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Paint every command of `frame` into a fresh pixmap of the frame's size.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Allocation`] if the pixmap cannot be allocated.
    pub fn rasterize(&self, frame: &Frame) -> Result<Pixmap, ExportError> {
        let mut pixmap = Pixmap::new(frame.width, frame.height)
            .ok_or(ExportError::Allocation { width: frame.width, height: frame.height })?;

        let mut skipped_text = 0usize;
        for cmd in &frame.commands {
            match cmd {
                DrawCmd::Clear { .. } => pixmap.fill(tiny_skia::Color::TRANSPARENT),
                DrawCmd::Line { x0, y0, x1, y1, color, width } => {
                    stroke_line(&mut pixmap, (*x0, *y0), (*x1, *y1), *color, *width);
                }
                DrawCmd::Image { bitmap, x, y, width, height, rotation, .. } => {
                    draw_bitmap(&mut pixmap, bitmap, *x, *y, *width, *height, *rotation);
                }
                DrawCmd::StrokeRect { x, y, width, height, color, line_width } => {
                    stroke_rect(&mut pixmap, *x, *y, *width, *height, *color, *line_width);
                }
                DrawCmd::Text { content, x, y, size, color } => match &self.font {
                    Some(font) => draw_text(&mut pixmap, font, content, *x, *y, *size, *color),
                    None => skipped_text += 1,
                },
            }
        }

        if skipped_text > 0 {
            tracing::warn!(skipped_text, "no font loaded; text commands skipped");
        }
        Ok(pixmap)
    }
}

// =============================================================
// Shapes
// =============================================================

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn stroke_line(pixmap: &mut Pixmap, from: (f64, f64), to: (f64, f64), color: Color, width: f64) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0 as f32, from.1 as f32);
    pb.line_to(to.0 as f32, to.1 as f32);
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke { width: width as f32, ..Stroke::default() };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
}

#[allow(clippy::cast_possible_truncation)]
fn stroke_rect(pixmap: &mut Pixmap, x: f64, y: f64, w: f64, h: f64, color: Color, line_width: f64) {
    let Some(rect) = Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let stroke = Stroke { width: line_width as f32, ..Stroke::default() };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
}

// =============================================================
// Images
// =============================================================

/// Convert straight-alpha RGBA bytes into a premultiplied tiny-skia pixmap.
///
/// Returns `None` for a zero-sized raster or when `rgba` is not
/// `width * height * 4` bytes long.
#[must_use]
pub fn pixmap_from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Pixmap> {
    let size = IntSize::from_wh(width, height)?;
    let mut data = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let pm = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        data.extend_from_slice(&[pm.red(), pm.green(), pm.blue(), pm.alpha()]);
    }
    Pixmap::from_vec(data, size)
}

fn bitmap_to_pixmap(bitmap: &Bitmap) -> Option<Pixmap> {
    pixmap_from_rgba(bitmap.width(), bitmap.height(), bitmap.pixels().as_raw())
}

#[allow(clippy::cast_possible_truncation)]
fn draw_bitmap(pixmap: &mut Pixmap, bitmap: &Bitmap, x: f64, y: f64, w: f64, h: f64, rotation: f64) {
    let Some(src) = bitmap_to_pixmap(bitmap) else {
        tracing::debug!(?bitmap, "empty bitmap skipped");
        return;
    };
    let sx = w / f64::from(bitmap.width());
    let sy = h / f64::from(bitmap.height());

    let mut transform = Transform::from_scale(sx as f32, sy as f32).post_translate(x as f32, y as f32);
    if !is_unrotated(rotation) {
        let cx = x + w / 2.0;
        let cy = y + h / 2.0;
        let spin = Transform::from_rotate_at(rotation.to_degrees() as f32, cx as f32, cy as f32);
        transform = transform.post_concat(spin);
    }

    let paint = PixmapPaint { quality: tiny_skia::FilterQuality::Bilinear, ..PixmapPaint::default() };
    pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
}

// =============================================================
// Text
// =============================================================

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn draw_text(pixmap: &mut Pixmap, font: &FontArc, content: &str, x: f64, baseline: f64, size: f64, color: Color) {
    let scale = PxScale::from(size as f32);
    let scaled = font.as_scaled(scale);
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let pixels = pixmap.pixels_mut();

    let mut caret = point(x as f32, baseline as f32);
    let mut prev: Option<GlyphId> = None;
    for ch in content.chars() {
        let gid = font.glyph_id(ch);
        if let Some(p) = prev {
            caret.x += scaled.kern(p, gid);
        }
        let glyph = gid.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(gid);
        prev = Some(gid);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                return;
            }
            let idx = (py * width + px) as usize;
            pixels[idx] = blend_over(pixels[idx], color, coverage);
        });
    }
}

/// Source-over blend of a straight color at `coverage` onto a premultiplied pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_over(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let a = (f32::from(color.a) / 255.0) * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    let mix = |src: u8, dst: u8| (f32::from(src) * a + f32::from(dst) * inv).round().clamp(0.0, 255.0) as u8;

    let out_a = (255.0 * a + f32::from(dst.alpha()) * inv).round().clamp(0.0, 255.0) as u8;
    let r = mix(color.r, dst.red()).min(out_a);
    let g = mix(color.g, dst.green()).min(out_a);
    let b = mix(color.b, dst.blue()).min(out_a);
    PremultipliedColorU8::from_rgba(r, g, b, out_a).unwrap_or(dst)
}

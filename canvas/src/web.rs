//! Browser backend: replays a [`Frame`] onto a `CanvasRenderingContext2d`.
//!
//! This module is the only place that touches the 2D context. Each image
//! element's pixels are uploaded once into an offscreen canvas kept in an
//! [`ImageCache`]; entries whose element is gone from the frame are dropped
//! after every draw.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.
//!
//! Browser exports read the drawn canvas back with [`snapshot`], so the file
//! carries the browser's own text rendering.

use std::collections::HashMap;

use tiny_skia::Pixmap;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::doc::{Bitmap, ElementId};
use crate::error::ExportError;
use crate::raster;
use crate::render::{DrawCmd, Frame, is_unrotated};

/// Get the 2D context of a canvas element.
///
/// # Errors
///
/// Returns `Err` if the element has no 2D context.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Offscreen canvases holding each image element's pixels.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<ElementId, HtmlCanvasElement>,
}

impl ImageCache {
    fn get_or_upload(&mut self, id: ElementId, bitmap: &Bitmap) -> Result<&HtmlCanvasElement, JsValue> {
        if !self.entries.contains_key(&id) {
            let canvas = upload(bitmap)?;
            self.entries.insert(id, canvas);
        }
        self.entries.get(&id).ok_or_else(|| JsValue::from_str("image cache miss"))
    }

    /// Drop entries for elements not drawn in `frame`.
    fn prune(&mut self, frame: &Frame) {
        let live = frame.image_ids();
        self.entries.retain(|id, _| live.contains(id));
    }

    /// Number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn upload(bitmap: &Bitmap) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from)?;
    canvas.set_width(bitmap.width());
    canvas.set_height(bitmap.height());

    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(bitmap.pixels().as_raw().as_slice()),
        bitmap.width(),
        bitmap.height(),
    )?;
    context_2d(&canvas)?.put_image_data(&data, 0.0, 0.0)?;
    tracing::debug!(?bitmap, "uploaded image to offscreen canvas");
    Ok(canvas)
}

/// Replay every command of `frame`.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, frame: &Frame, images: &mut ImageCache) -> Result<(), JsValue> {
    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;

    for cmd in &frame.commands {
        match cmd {
            DrawCmd::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
            DrawCmd::Line { x0, y0, x1, y1, color, width } => {
                ctx.begin_path();
                ctx.move_to(*x0, *y0);
                ctx.line_to(*x1, *y1);
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width);
                ctx.stroke();
            }
            DrawCmd::Image { id, bitmap, x, y, width, height, rotation } => {
                let source = images.get_or_upload(*id, bitmap)?;
                if is_unrotated(*rotation) {
                    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(source, *x, *y, *width, *height)?;
                } else {
                    ctx.save();
                    ctx.translate(x + width / 2.0, y + height / 2.0)?;
                    ctx.rotate(*rotation)?;
                    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                        source,
                        -width / 2.0,
                        -height / 2.0,
                        *width,
                        *height,
                    )?;
                    ctx.restore();
                }
            }
            DrawCmd::StrokeRect { x, y, width, height, color, line_width } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*line_width);
                ctx.stroke_rect(*x, *y, *width, *height);
            }
            DrawCmd::Text { content, x, y, size, color } => {
                ctx.set_font(&format!("{size}px sans-serif"));
                ctx.set_text_baseline("alphabetic");
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(content, *x, *y)?;
            }
        }
    }

    images.prune(frame);
    Ok(())
}

/// Read the whole canvas back as a premultiplied pixmap.
///
/// # Errors
///
/// Returns [`ExportError::Snapshot`] if the pixels cannot be read (a tainted
/// canvas, for one) and [`ExportError::Allocation`] if the readback is empty.
pub fn snapshot(ctx: &CanvasRenderingContext2d, width: u32, height: u32) -> Result<Pixmap, ExportError> {
    let data = ctx
        .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
        .map_err(|e| ExportError::Snapshot(format!("{e:?}")))?;
    let rgba = data.data();
    raster::pixmap_from_rgba(data.width(), data.height(), &rgba.0).ok_or(ExportError::Allocation { width, height })
}

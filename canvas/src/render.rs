//! Rendering: turns editor state into a display list.
//!
//! [`render`] is a pure function of the document, view state and sheet size.
//! It produces a [`Frame`], an ordered list of draw commands in canvas pixel
//! space, and touches no drawing surface. Backends replay frames:
//! [`crate::web`] onto the browser's 2D context, [`crate::raster`] into a
//! pixmap for export.
//!
//! Layer order is fixed: clear, grid, ruler labels, images, selection
//! outline, text labels.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{
    GRID_LINE_WIDTH_PX, GRID_STEP_PX, RULER_FONT_PX, RULER_INSET_PX, SELECTION_STROKE_PX, TEXT_FONT_PX,
};
use crate::doc::{Bitmap, DocStore, ElementId};
use crate::input::UiState;
use crate::units::{self, SheetSize, Unit};

/// Straight RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS color string for the browser backend.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
    }
}

/// Grid lattice color (`#ddd`).
pub const GRID_COLOR: Color = Color::rgb(0xDD, 0xDD, 0xDD);
/// Ruler label color.
pub const RULER_COLOR: Color = Color::rgb(0x55, 0x55, 0x55);
/// Selection outline color.
pub const SELECTION_COLOR: Color = Color::rgb(0xFF, 0x00, 0x00);
/// Text label color.
pub const TEXT_COLOR: Color = Color::rgb(0x00, 0x00, 0x00);

/// One draw command in canvas pixel space.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    /// Reset every pixel to transparent.
    Clear { width: f64, height: f64 },
    /// Stroke a straight segment.
    Line { x0: f64, y0: f64, x1: f64, y1: f64, color: Color, width: f64 },
    /// Draw a bitmap into the box `(x, y, width, height)`, rotated by
    /// `rotation` radians about the box center.
    Image { id: ElementId, bitmap: Bitmap, x: f64, y: f64, width: f64, height: f64, rotation: f64 },
    /// Stroke an axis-aligned rectangle.
    StrokeRect { x: f64, y: f64, width: f64, height: f64, color: Color, line_width: f64 },
    /// Fill left-aligned text with its baseline at `y`.
    Text { content: String, x: f64, y: f64, size: f64, color: Color },
}

/// A complete display list for one redraw.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    /// Ids of every image drawn in this frame, bottom first.
    #[must_use]
    pub fn image_ids(&self) -> Vec<ElementId> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Image { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}

/// Build the full display list for the current state.
#[must_use]
pub fn render(doc: &DocStore, ui: &UiState, sheet: &SheetSize) -> Frame {
    let (width, height) = sheet.pixel_dims();
    let w = f64::from(width);
    let h = f64::from(height);

    let mut commands = vec![DrawCmd::Clear { width: w, height: h }];

    if ui.grid {
        push_grid(&mut commands, w, h);
    }
    push_rulers(&mut commands, ui.unit, w, h);

    for img in doc.images() {
        commands.push(DrawCmd::Image {
            id: img.id,
            bitmap: img.bitmap.clone(),
            x: img.x,
            y: img.y,
            width: img.width,
            height: img.height,
            rotation: img.rotation,
        });
    }

    if let Some(el) = doc.selected_element() {
        let b = el.bounds();
        commands.push(DrawCmd::StrokeRect {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            color: SELECTION_COLOR,
            line_width: SELECTION_STROKE_PX,
        });
    }

    for label in doc.texts() {
        commands.push(DrawCmd::Text {
            content: label.content.clone(),
            x: label.x,
            y: label.baseline(),
            size: TEXT_FONT_PX,
            color: TEXT_COLOR,
        });
    }

    Frame { width, height, commands }
}

// =============================================================
// Layers
// =============================================================

fn push_grid(commands: &mut Vec<DrawCmd>, w: f64, h: f64) {
    let mut x = 0.0;
    while x < w {
        commands.push(DrawCmd::Line { x0: x, y0: 0.0, x1: x, y1: h, color: GRID_COLOR, width: GRID_LINE_WIDTH_PX });
        x += GRID_STEP_PX;
    }
    let mut y = 0.0;
    while y < h {
        commands.push(DrawCmd::Line { x0: 0.0, y0: y, x1: w, y1: y, color: GRID_COLOR, width: GRID_LINE_WIDTH_PX });
        y += GRID_STEP_PX;
    }
}

fn push_rulers(commands: &mut Vec<DrawCmd>, unit: Unit, w: f64, h: f64) {
    let step = units::ruler_step_px(unit);

    // Top edge.
    let mut x = 0.0;
    while x <= w {
        commands.push(ruler_label(unit, x, x + RULER_INSET_PX, RULER_FONT_PX));
        x += step;
    }

    // Left edge; the origin label is already drawn by the top ruler.
    let mut y = step;
    while y <= h {
        commands.push(ruler_label(unit, y, RULER_INSET_PX, y + RULER_FONT_PX));
        y += step;
    }
}

fn ruler_label(unit: Unit, at_px: f64, x: f64, y: f64) -> DrawCmd {
    DrawCmd::Text {
        content: format!("{:.0}", units::to_unit(at_px, unit)),
        x,
        y,
        size: RULER_FONT_PX,
        color: RULER_COLOR,
    }
}

// =============================================================
// Helpers
// =============================================================

/// Whether a rotation is effectively zero and can be drawn axis-aligned.
#[must_use]
pub fn is_unrotated(rotation: f64) -> bool {
    rotation.abs() < f64::EPSILON
}

#![allow(clippy::float_cmp)]

use image::RgbaImage;

use super::*;
use crate::doc::{Element, ImageElement, TextLabel};

fn one_inch_sheet() -> SheetSize {
    SheetSize::new(1.0, 1.0)
}

fn add_image(doc: &mut DocStore, w: u32, h: u32) -> ElementId {
    doc.add(Element::Image(ImageElement::new(Bitmap::new(RgbaImage::new(w, h)))))
}

fn layer(cmd: &DrawCmd) -> &'static str {
    match cmd {
        DrawCmd::Clear { .. } => "clear",
        DrawCmd::Line { .. } => "grid",
        DrawCmd::Image { .. } => "image",
        DrawCmd::StrokeRect { .. } => "selection",
        DrawCmd::Text { color, .. } if *color == RULER_COLOR => "ruler",
        DrawCmd::Text { .. } => "text",
    }
}

/// Collapse consecutive duplicate layer names.
fn layers(frame: &Frame) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for cmd in &frame.commands {
        let name = layer(cmd);
        if out.last() != Some(&name) {
            out.push(name);
        }
    }
    out
}

// =============================================================
// Frame basics
// =============================================================

#[test]
fn frame_size_matches_sheet_pixels() {
    let frame = render(&DocStore::new(), &UiState::default(), &SheetSize::default());
    assert_eq!((frame.width, frame.height), (6600, 11700));
}

#[test]
fn frame_starts_with_clear() {
    let frame = render(&DocStore::new(), &UiState::default(), &one_inch_sheet());
    assert!(matches!(frame.commands[0], DrawCmd::Clear { width, height } if width == 300.0 && height == 300.0));
}

#[test]
fn render_is_pure() {
    let mut doc = DocStore::new();
    add_image(&mut doc, 10, 10);
    let ui = UiState { grid: true, ..Default::default() };
    let a = render(&doc, &ui, &one_inch_sheet());
    let b = render(&doc, &ui, &one_inch_sheet());
    assert_eq!(format!("{:?}", a.commands), format!("{:?}", b.commands));
}

// =============================================================
// Layer order
// =============================================================

#[test]
fn layers_are_in_fixed_order() {
    let mut doc = DocStore::new();
    doc.add(Element::Text(TextLabel::new("label")));
    let img = add_image(&mut doc, 20, 20);
    add_image(&mut doc, 20, 20);
    doc.set_selected(Some(img));
    let ui = UiState { grid: true, ..Default::default() };

    let frame = render(&doc, &ui, &one_inch_sheet());
    assert_eq!(layers(&frame), vec!["clear", "grid", "ruler", "image", "selection", "text"]);
}

#[test]
fn no_grid_when_disabled() {
    let frame = render(&DocStore::new(), &UiState::default(), &one_inch_sheet());
    assert!(!frame.commands.iter().any(|c| matches!(c, DrawCmd::Line { .. })));
}

#[test]
fn grid_lines_every_150px() {
    let ui = UiState { grid: true, ..Default::default() };
    let frame = render(&DocStore::new(), &ui, &one_inch_sheet());
    let lines: Vec<_> = frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCmd::Line { x0, y0, x1, y1, .. } => Some((*x0, *y0, *x1, *y1)),
            _ => None,
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            (0.0, 0.0, 0.0, 300.0),
            (150.0, 0.0, 150.0, 300.0),
            (0.0, 0.0, 300.0, 0.0),
            (0.0, 150.0, 300.0, 150.0),
        ]
    );
}

// =============================================================
// Rulers
// =============================================================

fn ruler_labels(frame: &Frame) -> Vec<String> {
    frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCmd::Text { content, color, .. } if *color == RULER_COLOR => Some(content.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn inch_rulers_label_every_inch() {
    let frame = render(&DocStore::new(), &UiState::default(), &SheetSize::new(2.0, 1.0));
    // Top: 0, 1, 2. Left: 1.
    assert_eq!(ruler_labels(&frame), vec!["0", "1", "2", "1"]);
}

#[test]
fn centimeter_rulers_label_every_centimeter() {
    let ui = UiState { unit: Unit::Centimeters, ..Default::default() };
    let frame = render(&DocStore::new(), &ui, &SheetSize::new(1.0, 0.5));
    // 300px wide: 0, 118, 236 -> 0, 1, 2. 150px tall: 118 -> 1.
    assert_eq!(ruler_labels(&frame), vec!["0", "1", "2", "1"]);
}

// =============================================================
// Elements
// =============================================================

#[test]
fn images_drawn_in_store_order_with_rotation() {
    let mut doc = DocStore::new();
    let a = add_image(&mut doc, 10, 10);
    let b = add_image(&mut doc, 10, 10);
    if let Some(Element::Image(img)) = doc.get_mut(&b) {
        img.rotation = 1.5;
    }
    let frame = render(&doc, &UiState::default(), &one_inch_sheet());
    assert_eq!(frame.image_ids(), vec![a, b]);
    let rotations: Vec<f64> = frame
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCmd::Image { rotation, .. } => Some(*rotation),
            _ => None,
        })
        .collect();
    assert_eq!(rotations, vec![0.0, 1.5]);
}

#[test]
fn selection_outline_matches_bounds() {
    let mut doc = DocStore::new();
    let id = add_image(&mut doc, 200, 300);
    doc.set_selected(Some(id));
    let frame = render(&doc, &UiState::default(), &SheetSize::default());
    let outline = frame.commands.iter().find_map(|c| match c {
        DrawCmd::StrokeRect { x, y, width, height, color, line_width } => {
            Some((*x, *y, *width, *height, *color, *line_width))
        }
        _ => None,
    });
    assert_eq!(outline, Some((100.0, 100.0, 200.0, 300.0, SELECTION_COLOR, 4.0)));
}

#[test]
fn no_outline_without_selection() {
    let mut doc = DocStore::new();
    add_image(&mut doc, 10, 10);
    let frame = render(&doc, &UiState::default(), &one_inch_sheet());
    assert!(!frame.commands.iter().any(|c| matches!(c, DrawCmd::StrokeRect { .. })));
}

#[test]
fn text_drawn_at_baseline() {
    let mut doc = DocStore::new();
    doc.add(Element::Text(TextLabel::new("Hello")));
    let frame = render(&doc, &UiState::default(), &one_inch_sheet());
    let text = frame.commands.iter().find_map(|c| match c {
        DrawCmd::Text { content, x, y, size, color } if *color == TEXT_COLOR => {
            Some((content.clone(), *x, *y, *size))
        }
        _ => None,
    });
    assert_eq!(text, Some(("Hello".to_owned(), 100.0, 130.0, 30.0)));
}

// =============================================================
// Color / helpers
// =============================================================

#[test]
fn color_css_string() {
    assert_eq!(SELECTION_COLOR.to_css(), "rgba(255, 0, 0, 1.000)");
    assert_eq!(Color { r: 1, g: 2, b: 3, a: 0 }.to_css(), "rgba(1, 2, 3, 0.000)");
}

#[test]
fn is_unrotated_tolerates_zero_only() {
    assert!(is_unrotated(0.0));
    assert!(is_unrotated(-0.0));
    assert!(!is_unrotated(0.01));
}

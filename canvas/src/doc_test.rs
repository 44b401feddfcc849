#![allow(clippy::float_cmp)]

use image::{Rgba, RgbaImage};

use super::*;

fn make_image(w: u32, h: u32) -> Element {
    Element::Image(ImageElement::new(Bitmap::new(RgbaImage::new(w, h))))
}

fn make_text(content: &str) -> Element {
    Element::Text(TextLabel::new(content))
}

fn encoded(w: u32, h: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    encoded(w, h, image::ImageFormat::Png)
}

// =============================================================
// Bitmap
// =============================================================

#[test]
fn bitmap_decodes_png() {
    let bmp = Bitmap::decode(&png_bytes(3, 2)).unwrap();
    assert_eq!(bmp.width(), 3);
    assert_eq!(bmp.height(), 2);
    assert_eq!(bmp.pixels().get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
}

#[test]
fn bitmap_decodes_other_browser_formats() {
    for format in [image::ImageFormat::Gif, image::ImageFormat::WebP, image::ImageFormat::Bmp] {
        let bmp = Bitmap::decode(&encoded(4, 3, format)).unwrap_or_else(|e| panic!("{format:?}: {e}"));
        assert_eq!((bmp.width(), bmp.height()), (4, 3), "{format:?}");
    }
}

#[test]
fn bitmap_decode_rejects_garbage() {
    let err = Bitmap::decode(b"definitely not an image").unwrap_err();
    assert!(matches!(err, EditorError::Decode(_)));
}

#[test]
fn bitmap_debug_shows_dimensions_only() {
    let bmp = Bitmap::new(RgbaImage::new(640, 480));
    assert_eq!(format!("{bmp:?}"), "Bitmap(640x480)");
}

// =============================================================
// Element construction
// =============================================================

#[test]
fn new_image_lands_at_drop_position_with_natural_size() {
    let el = make_image(200, 300);
    let img = el.as_image().unwrap();
    assert_eq!((img.x, img.y), (100.0, 100.0));
    assert_eq!((img.width, img.height), (200.0, 300.0));
    assert_eq!(img.rotation, 0.0);
}

#[test]
fn new_text_lands_at_drop_position() {
    let el = make_text("DTF");
    let label = el.as_text().unwrap();
    assert_eq!((label.x, label.y), (100.0, 100.0));
    assert_eq!(label.baseline(), 130.0);
}

#[test]
fn element_ids_are_unique() {
    let a = make_image(1, 1);
    let b = make_image(1, 1);
    assert_ne!(a.id(), b.id());
}

#[test]
fn set_origin_moves_both_kinds() {
    let mut img = make_image(10, 10);
    img.set_origin(Point::new(5.0, 6.0));
    assert_eq!(img.origin(), Point::new(5.0, 6.0));

    let mut txt = make_text("x");
    txt.set_origin(Point::new(7.0, 8.0));
    assert_eq!(txt.origin(), Point::new(7.0, 8.0));
}

#[test]
fn image_bounds_follow_size_not_bitmap() {
    let mut el = make_image(10, 10);
    if let Element::Image(img) = &mut el {
        img.width = 600.0;
        img.height = 450.0;
    }
    let b = el.bounds();
    assert_eq!((b.width, b.height), (600.0, 450.0));
}

// =============================================================
// DocStore: add / remove / clear
// =============================================================

#[test]
fn store_starts_empty() {
    let doc = DocStore::new();
    assert!(doc.is_empty());
    assert_eq!(doc.len(), 0);
    assert!(doc.selected().is_none());
}

#[test]
fn add_appends_in_order() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(1, 1));
    let b = doc.add(make_text("b"));
    let c = doc.add(make_image(1, 1));
    let ids: Vec<_> = doc.iter().map(Element::id).collect();
    assert_eq!(ids, vec![a, b, c]);
}

#[test]
fn remove_returns_element_and_drops_it() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(1, 1));
    let b = doc.add(make_image(1, 1));
    let removed = doc.remove(&a).unwrap();
    assert_eq!(removed.id(), a);
    assert!(doc.get(&a).is_none());
    assert!(doc.get(&b).is_some());
    assert_eq!(doc.len(), 1);
}

#[test]
fn remove_unknown_id_is_none() {
    let mut doc = DocStore::new();
    doc.add(make_image(1, 1));
    assert!(doc.remove(&Uuid::new_v4()).is_none());
    assert_eq!(doc.len(), 1);
}

#[test]
fn remove_selected_clears_selection() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(100, 100));
    assert_eq!(doc.select(Point::new(150.0, 150.0)), Some(a));
    doc.remove(&a);
    assert!(doc.selected().is_none());
}

#[test]
fn remove_other_keeps_selection() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(100, 100));
    let mut far = ImageElement::new(Bitmap::new(RgbaImage::new(10, 10)));
    far.x = 1000.0;
    let b = doc.add(Element::Image(far));
    doc.set_selected(Some(a));
    doc.remove(&b);
    assert_eq!(doc.selected(), Some(a));
}

#[test]
fn clear_empties_store_and_selection() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(100, 100));
    doc.add(make_text("t"));
    doc.set_selected(Some(a));
    doc.clear();
    assert!(doc.is_empty());
    assert!(doc.selected().is_none());
}

#[test]
fn add_remove_sequences_never_leave_removed_elements() {
    let mut doc = DocStore::new();
    let mut live = Vec::new();
    let mut dead = Vec::new();
    for round in 0..20 {
        let id = doc.add(make_image(50, 50));
        live.push(id);
        doc.set_selected(Some(id));
        if round % 3 == 0 {
            let victim = live.remove(0);
            doc.remove(&victim);
            dead.push(victim);
        }
        for id in &dead {
            assert!(doc.get(id).is_none());
            assert_ne!(doc.selected(), Some(*id));
        }
        assert_eq!(doc.len(), live.len());
    }
}

// =============================================================
// DocStore: selection
// =============================================================

#[test]
fn select_miss_clears_selection() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(100, 100));
    doc.set_selected(Some(a));
    assert!(doc.select(Point::new(5000.0, 5000.0)).is_none());
    assert!(doc.selected().is_none());
}

#[test]
fn set_selected_ignores_unknown_ids() {
    let mut doc = DocStore::new();
    doc.set_selected(Some(Uuid::new_v4()));
    assert!(doc.selected().is_none());
}

#[test]
fn selected_element_mut_edits_in_place() {
    let mut doc = DocStore::new();
    let a = doc.add(make_image(10, 10));
    doc.set_selected(Some(a));
    if let Some(el) = doc.selected_element_mut() {
        el.set_origin(Point::new(1.0, 2.0));
    }
    assert_eq!(doc.get(&a).unwrap().origin(), Point::new(1.0, 2.0));
}

// =============================================================
// DocStore: ordering
// =============================================================

#[test]
fn paint_order_puts_text_above_images() {
    let mut doc = DocStore::new();
    let t1 = doc.add(make_text("one"));
    let i1 = doc.add(make_image(1, 1));
    let t2 = doc.add(make_text("two"));
    let i2 = doc.add(make_image(1, 1));
    let ids: Vec<_> = doc.paint_order().into_iter().map(Element::id).collect();
    assert_eq!(ids, vec![i1, i2, t1, t2]);
}

#[test]
fn images_mut_skips_text() {
    let mut doc = DocStore::new();
    doc.add(make_text("t"));
    doc.add(make_image(1, 1));
    doc.add(make_image(1, 1));
    for img in doc.images_mut() {
        img.x = 0.0;
    }
    assert_eq!(doc.images().count(), 2);
    assert!(doc.images().all(|img| img.x == 0.0));
    assert_eq!(doc.texts().next().unwrap().x, 100.0);
}

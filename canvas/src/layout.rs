//! Auto-arrange: single-pass row flow of image elements.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::ARRANGE_MARGIN_PX;
use crate::doc::DocStore;

/// Reflow every image left-to-right, top-to-bottom in store order.
///
/// Rows wrap when the next image would cross `canvas_width`; the first image
/// of a row is always placed, even when it alone is wider than the sheet.
/// Text labels are left where they are. Returns the number of images placed.
pub fn auto_arrange(doc: &mut DocStore, canvas_width: f64) -> usize {
    let mut x = ARRANGE_MARGIN_PX;
    let mut y = ARRANGE_MARGIN_PX;
    let mut row_height: f64 = 0.0;
    let mut placed = 0;

    for img in doc.images_mut() {
        if x + img.width > canvas_width && x > ARRANGE_MARGIN_PX {
            x = ARRANGE_MARGIN_PX;
            y += row_height + ARRANGE_MARGIN_PX;
            row_height = 0.0;
        }
        img.x = x;
        img.y = y;
        x += img.width + ARRANGE_MARGIN_PX;
        row_height = row_height.max(img.height);
        placed += 1;
    }

    tracing::debug!(placed, canvas_width, "auto-arranged images");
    placed
}

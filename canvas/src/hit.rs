#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{DocStore, ElementId};
use crate::viewport::Point;

/// Return the topmost element whose bounding box contains `pt`.
///
/// Walks paint order from the top down. Boxes are axis-aligned and ignore
/// image rotation, so a rotated image is hit where it would sit unrotated.
#[must_use]
pub fn hit_test(pt: Point, doc: &DocStore) -> Option<ElementId> {
    doc.paint_order()
        .into_iter()
        .rev()
        .find(|el| el.bounds().contains(pt))
        .map(crate::doc::Element::id)
}

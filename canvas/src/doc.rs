//! Document model: placed elements and the in-memory store that owns them.
//!
//! This module defines what is on the sheet (`Element`, `ImageElement`,
//! `TextLabel`), the decoded pixel data images draw from (`Bitmap`), and the
//! runtime store that owns every live element plus the current selection
//! (`DocStore`).
//!
//! Elements enter this layer from the engine (uploads, text prompts) and are
//! mutated in place by dragging, resizing and rotating. The renderer reads
//! from `DocStore` via `paint_order` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use uuid::Uuid;

use crate::consts::{PLACEMENT_ORIGIN_PX, TEXT_ADVANCE_RATIO, TEXT_BOX_HEIGHT_PX, TEXT_FONT_PX};
use crate::error::EditorError;
use crate::hit;
use crate::viewport::Point;

/// Unique identifier for a placed element.
pub type ElementId = Uuid;

/// Decoded RGBA pixels shared between the store and draw commands.
#[derive(Clone)]
pub struct Bitmap(Arc<RgbaImage>);

impl Bitmap {
    /// Wrap already-decoded pixels.
    #[must_use]
    pub fn new(pixels: RgbaImage) -> Self {
        Self(Arc::new(pixels))
    }

    /// Decode an encoded image file (PNG, JPEG) into RGBA pixels.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Decode`] if the bytes are not a supported image.
    pub fn decode(bytes: &[u8]) -> Result<Self, EditorError> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Borrow the underlying pixels.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({}x{})", self.width(), self.height())
    }
}

/// Axis-aligned bounding box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Inclusive containment test on all four edges.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.width && pt.y >= self.y && pt.y <= self.y + self.height
    }
}

/// A raster image placed on the sheet.
#[derive(Debug, Clone)]
pub struct ImageElement {
    pub id: ElementId,
    pub bitmap: Bitmap,
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Drawn width in canvas pixels.
    pub width: f64,
    /// Drawn height in canvas pixels.
    pub height: f64,
    /// Clockwise rotation in radians around the bounding-box center.
    pub rotation: f64,
}

impl ImageElement {
    /// Place a bitmap at the default drop position at its natural pixel size.
    #[must_use]
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: PLACEMENT_ORIGIN_PX,
            y: PLACEMENT_ORIGIN_PX,
            width: f64::from(bitmap.width()),
            height: f64::from(bitmap.height()),
            rotation: 0.0,
            bitmap,
        }
    }
}

/// A single-line text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub id: ElementId,
    pub content: String,
    /// Left edge of the label box in canvas pixels.
    pub x: f64,
    /// Top edge of the label box in canvas pixels.
    pub y: f64,
}

impl TextLabel {
    /// Create a label at the default drop position.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), content: content.into(), x: PLACEMENT_ORIGIN_PX, y: PLACEMENT_ORIGIN_PX }
    }

    /// Estimated rendered width, used for hit-testing and the selection outline.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.content.chars().count() as f64 * TEXT_FONT_PX * TEXT_ADVANCE_RATIO
    }

    /// Y coordinate of the glyph baseline.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.y + TEXT_FONT_PX
    }
}

/// A placed element.
#[derive(Debug, Clone)]
pub enum Element {
    Image(ImageElement),
    Text(TextLabel),
}

impl Element {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Image(img) => img.id,
            Self::Text(label) => label.id,
        }
    }

    /// Top-left corner in canvas pixels.
    #[must_use]
    pub fn origin(&self) -> Point {
        match self {
            Self::Image(img) => Point::new(img.x, img.y),
            Self::Text(label) => Point::new(label.x, label.y),
        }
    }

    /// Move the top-left corner.
    pub fn set_origin(&mut self, origin: Point) {
        match self {
            Self::Image(img) => {
                img.x = origin.x;
                img.y = origin.y;
            }
            Self::Text(label) => {
                label.x = origin.x;
                label.y = origin.y;
            }
        }
    }

    /// Axis-aligned bounding box. Image rotation is not reflected.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Image(img) => Bounds { x: img.x, y: img.y, width: img.width, height: img.height },
            Self::Text(label) => {
                Bounds { x: label.x, y: label.y, width: label.width(), height: TEXT_BOX_HEIGHT_PX }
            }
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            Self::Image(img) => Some(img),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            Self::Text(label) => Some(label),
            Self::Image(_) => None,
        }
    }
}

/// In-memory store of placed elements plus the current selection.
///
/// Insertion order is stacking order within each kind. Text labels always
/// paint (and therefore hit-test) above images.
#[derive(Debug, Default)]
pub struct DocStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element on top of its kind and return its id.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.elements.push(element);
        id
    }

    /// Remove an element by id, returning it if it was present. Clears the
    /// selection when it pointed at the removed element.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|el| el.id() == *id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.elements.remove(idx))
    }

    /// Remove every element and the selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.selected = None;
    }

    /// Select whatever is under `pt`, or clear the selection on a miss.
    pub fn select(&mut self, pt: Point) -> Option<ElementId> {
        self.selected = hit::hit_test(pt, self);
        self.selected
    }

    /// Select an element by id. Unknown ids clear the selection.
    pub fn set_selected(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| self.get(id).is_some());
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(&id))
    }

    /// Mutable access to the currently selected element.
    pub fn selected_element_mut(&mut self) -> Option<&mut Element> {
        let id = self.selected?;
        self.get_mut(&id)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == *id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id() == *id)
    }

    /// All elements in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter()
    }

    /// Image elements in insertion order, mutably.
    pub fn images_mut(&mut self) -> impl Iterator<Item = &mut ImageElement> {
        self.elements.iter_mut().filter_map(|el| match el {
            Element::Image(img) => Some(img),
            Element::Text(_) => None,
        })
    }

    /// Images in insertion order.
    pub fn images(&self) -> impl DoubleEndedIterator<Item = &ImageElement> {
        self.elements.iter().filter_map(Element::as_image)
    }

    /// Text labels in insertion order.
    pub fn texts(&self) -> impl DoubleEndedIterator<Item = &TextLabel> {
        self.elements.iter().filter_map(Element::as_text)
    }

    /// Elements bottom-first: images, then text labels.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let images = self.elements.iter().filter(|el| matches!(el, Element::Image(_)));
        let texts = self.elements.iter().filter(|el| matches!(el, Element::Text(_)));
        images.chain(texts).collect()
    }

    /// Number of elements currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the store contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

//! Editor engine: the event dispatcher and the browser-bound wrapper.
//!
//! [`EngineCore`] owns every piece of editor state (document, selection,
//! drag gesture, view toggles, sheet size, displayed viewport) and exposes
//! one entry point, [`EngineCore::handle`], that applies an [`Event`] and
//! returns the [`Action`]s the host must carry out. It has no browser
//! dependencies and is what the tests and the headless host drive.
//!
//! [`Engine`] wraps a core together with an `HtmlCanvasElement` and repaints
//! the canvas exactly once per dispatch when the core asks for a redraw.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::f64::consts::TAU;

use tiny_skia::Pixmap;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::ROTATE_STEP_RAD;
use crate::doc::{Bitmap, DocStore, Element, ElementId, ImageElement, TextLabel};
use crate::error::{EditorError, ExportError};
use crate::export;
use crate::input::{InputState, Phase, PointerEvent, UiState};
use crate::layout;
use crate::raster::Rasterizer;
use crate::render::{self, Frame};
use crate::units::{self, SheetSize, Unit};
use crate::viewport::{Point, Viewport};
use crate::web::{self, ImageCache};

/// Something the host has to do after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// State changed; repaint once.
    RenderNeeded,
    /// Show a message to the user.
    Alert(String),
    ElementAdded(ElementId),
    ElementRemoved(ElementId),
    SelectionChanged(Option<ElementId>),
    /// The sheet's pixel dimensions changed; the backing canvas must be resized.
    SheetResized { width: u32, height: u32 },
}

/// Input to [`EngineCore::handle`].
///
/// Prompt answers arrive as `Option<String>`: `None` when the user cancelled.
/// Confirmation of destructive commands (clear-all) is the host's job; by the
/// time `ClearAll` is dispatched the user has agreed.
#[derive(Debug, Clone)]
pub enum Event {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// Raw bytes of one uploaded file.
    ImageLoaded(Vec<u8>),
    AddText(Option<String>),
    /// Answer to the resize prompt, `"width,height"` in the current unit.
    ResizeSelected(Option<String>),
    RotateSelected,
    DeleteSelected,
    ClearAll,
    AutoArrange,
    SetUnit(Unit),
    SetGrid(bool),
    /// Raw contents of the sheet width/height fields, in inches.
    SetSheetSize { width: String, height: String },
}

/// Core engine state: all logic that doesn't depend on the canvas element.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: DocStore,
    pub ui: UiState,
    pub input: InputState,
    pub sheet: SheetSize,
    pub viewport: Viewport,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A core for a sheet of the given size.
    #[must_use]
    pub fn with_sheet(sheet: SheetSize) -> Self {
        Self { sheet, ..Self::default() }
    }

    // --- Dispatch ---

    /// Apply one event and report what the host must do.
    ///
    /// Errors never escape: rejected commands become [`Action::Alert`], and
    /// cancelled prompts produce no actions at all.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        let result = match event {
            Event::PointerDown(ev) => Ok(self.on_pointer_down(ev)),
            Event::PointerMove(ev) => Ok(self.on_pointer_move(ev)),
            Event::PointerUp(ev) => Ok(self.on_pointer_up(ev)),
            Event::ImageLoaded(bytes) => {
                self.add_image_bytes(&bytes).map(|id| vec![Action::ElementAdded(id), Action::RenderNeeded])
            }
            Event::AddText(answer) => {
                self.add_text(answer.as_deref()).map(|id| vec![Action::ElementAdded(id), Action::RenderNeeded])
            }
            Event::ResizeSelected(answer) => self.resize_selected(answer.as_deref()).map(|_| vec![Action::RenderNeeded]),
            Event::RotateSelected => self.rotate_selected().map(|_| vec![Action::RenderNeeded]),
            Event::DeleteSelected => self.delete_selected().map(|id| {
                vec![Action::ElementRemoved(id), Action::SelectionChanged(None), Action::RenderNeeded]
            }),
            Event::ClearAll => {
                let had_selection = self.doc.selected().is_some();
                self.clear();
                let mut actions = Vec::new();
                if had_selection {
                    actions.push(Action::SelectionChanged(None));
                }
                actions.push(Action::RenderNeeded);
                Ok(actions)
            }
            Event::AutoArrange => {
                self.auto_arrange();
                Ok(vec![Action::RenderNeeded])
            }
            Event::SetUnit(unit) => {
                self.ui.unit = unit;
                Ok(vec![Action::RenderNeeded])
            }
            Event::SetGrid(grid) => {
                self.ui.grid = grid;
                Ok(vec![Action::RenderNeeded])
            }
            Event::SetSheetSize { width, height } => self.set_sheet_size(&width, &height).map(|sheet| {
                let (width, height) = sheet.pixel_dims();
                vec![Action::SheetResized { width, height }, Action::RenderNeeded]
            }),
        };

        match result {
            Ok(actions) => actions,
            Err(e) if e.is_silent() => Vec::new(),
            Err(e @ EditorError::Decode(_)) => {
                tracing::warn!(error = %e, "upload rejected");
                vec![Action::Alert(e.to_string())]
            }
            Err(e) => {
                tracing::info!(error = %e, "command rejected");
                vec![Action::Alert(e.to_string())]
            }
        }
    }

    // --- Pointer input ---

    /// Convert a client-space point to canvas pixels through the viewport.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        self.viewport.client_to_canvas(client, self.sheet.width_px(), self.sheet.height_px())
    }

    fn on_pointer_down(&mut self, ev: PointerEvent) -> Vec<Action> {
        let pt = self.client_to_canvas(ev.client);
        let before = self.doc.selected();
        let hit = self.doc.select(pt);

        self.input = match hit.and_then(|id| self.doc.get(&id)) {
            Some(el) => {
                let origin = el.origin();
                InputState::Dragging { id: el.id(), offset: Point::new(pt.x - origin.x, pt.y - origin.y) }
            }
            None => InputState::Idle,
        };

        let mut actions = Vec::new();
        if before != hit {
            actions.push(Action::SelectionChanged(hit));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn on_pointer_move(&mut self, ev: PointerEvent) -> Vec<Action> {
        let InputState::Dragging { id, offset } = self.input else {
            return Vec::new();
        };
        let pt = self.client_to_canvas(ev.client);
        let Some(el) = self.doc.get_mut(&id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        el.set_origin(Point::new(pt.x - offset.x, pt.y - offset.y));
        vec![Action::RenderNeeded]
    }

    fn on_pointer_up(&mut self, _ev: PointerEvent) -> Vec<Action> {
        self.input = InputState::Idle;
        Vec::new()
    }

    // --- Commands ---

    /// Decode an uploaded file and place it at the drop position at natural size.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Decode`] if the bytes are not a supported image.
    pub fn add_image_bytes(&mut self, bytes: &[u8]) -> Result<ElementId, EditorError> {
        let bitmap = Bitmap::decode(bytes)?;
        let (width, height) = (bitmap.width(), bitmap.height());
        let id = self.doc.add(Element::Image(ImageElement::new(bitmap)));
        tracing::info!(%id, width, height, "image added");
        Ok(id)
    }

    /// Add a text label from a prompt answer.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EmptyPrompt`] when the prompt was cancelled or blank.
    pub fn add_text(&mut self, answer: Option<&str>) -> Result<ElementId, EditorError> {
        let content = answer.filter(|s| !s.trim().is_empty()).ok_or(EditorError::EmptyPrompt)?;
        let id = self.doc.add(Element::Text(TextLabel::new(content)));
        tracing::info!(%id, chars = content.chars().count(), "text label added");
        Ok(id)
    }

    /// Message shown by the resize prompt for the current unit.
    #[must_use]
    pub fn resize_prompt(&self) -> String {
        format!("Enter new size in {} (width,height):", self.ui.unit)
    }

    fn selected_image_mut(&mut self) -> Result<&mut ImageElement, EditorError> {
        match self.doc.selected_element_mut() {
            None => Err(EditorError::NoSelection),
            Some(Element::Text(_)) => Err(EditorError::NotAnImage),
            Some(Element::Image(img)) => Ok(img),
        }
    }

    /// Resize the selected image to `"width,height"` given in the current unit.
    ///
    /// Nothing changes unless both values parse.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoSelection`] or [`EditorError::NotAnImage`] when
    /// the selection cannot be resized, [`EditorError::EmptyPrompt`] for a
    /// cancelled prompt, and [`EditorError::InvalidInput`] for bad numbers.
    pub fn resize_selected(&mut self, answer: Option<&str>) -> Result<ElementId, EditorError> {
        let unit = self.ui.unit;
        // A bad selection is reported before the answer is looked at.
        self.selected_image_mut()?;
        let (w, h) = units::parse_dimensions(answer.ok_or(EditorError::EmptyPrompt)?)?;

        let img = self.selected_image_mut()?;
        img.width = units::to_pixels(w, unit);
        img.height = units::to_pixels(h, unit);
        tracing::info!(id = %img.id, width = img.width, height = img.height, "image resized");
        Ok(img.id)
    }

    /// Turn the selected image a quarter turn clockwise. Returns the new rotation.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoSelection`] or [`EditorError::NotAnImage`].
    pub fn rotate_selected(&mut self) -> Result<f64, EditorError> {
        let img = self.selected_image_mut()?;
        img.rotation = (img.rotation + ROTATE_STEP_RAD).rem_euclid(TAU);
        tracing::debug!(id = %img.id, rotation = img.rotation, "image rotated");
        Ok(img.rotation)
    }

    /// Remove the selected element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoSelection`] when nothing is selected.
    pub fn delete_selected(&mut self) -> Result<ElementId, EditorError> {
        let id = self.doc.selected().ok_or(EditorError::NoSelection)?;
        self.doc.remove(&id);
        if matches!(self.input, InputState::Dragging { id: dragged, .. } if dragged == id) {
            self.input = InputState::Idle;
        }
        tracing::info!(%id, "element deleted");
        Ok(id)
    }

    /// Remove every element. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.doc.len();
        self.doc.clear();
        self.input = InputState::Idle;
        tracing::info!(removed, "sheet cleared");
        removed
    }

    /// Reflow all images into rows across the sheet width.
    pub fn auto_arrange(&mut self) -> usize {
        layout::auto_arrange(&mut self.doc, self.sheet.width_px())
    }

    /// Change the sheet size from the raw width/height fields (inches).
    ///
    /// Elements keep their pixel positions.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidInput`] unless both fields are positive numbers.
    pub fn set_sheet_size(&mut self, width: &str, height: &str) -> Result<SheetSize, EditorError> {
        let sheet = SheetSize::new(units::parse_length(width)?, units::parse_length(height)?);
        self.sheet = sheet;
        let (width_px, height_px) = sheet.pixel_dims();
        tracing::info!(width_in = sheet.width_in, height_in = sheet.height_in, width_px, height_px, "sheet resized");
        Ok(sheet)
    }

    // --- Queries ---

    /// The current display list.
    #[must_use]
    pub fn frame(&self) -> Frame {
        render::render(&self.doc, &self.ui, &self.sheet)
    }

    /// Status caption for the sheet size.
    #[must_use]
    pub fn caption(&self) -> String {
        self.sheet.caption()
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.doc.selected()
    }

    /// Idle / selected / dragging.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.input.phase(self.doc.selected())
    }

    // --- Export ---

    /// Encode the current frame as PNG.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rasterizing or encoding fails.
    pub fn export_png(&self, rasterizer: &Rasterizer) -> Result<Vec<u8>, ExportError> {
        let pixmap = rasterizer.rasterize(&self.frame())?;
        export::encode_png(&pixmap)
    }

    /// Encode the current frame as a single-page PDF sized to the sheet.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if rasterizing or encoding fails.
    pub fn export_pdf(&self, rasterizer: &Rasterizer) -> Result<Vec<u8>, ExportError> {
        let pixmap = rasterizer.rasterize(&self.frame())?;
        export::encode_pdf(&pixmap, &self.sheet)
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    images: ImageCache,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to a canvas element and size the canvas to the default sheet.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = web::context_2d(&canvas)?;
        let engine = Self { canvas, ctx, images: ImageCache::default(), core: EngineCore::new() };
        engine.sync_canvas_size();
        Ok(engine)
    }

    /// Record where the canvas is displayed (its bounding client rect).
    pub fn set_viewport(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.core.viewport = Viewport::new(left, top, width, height);
    }

    /// Apply an event, then repaint once if anything visible changed.
    ///
    /// Returned actions are for the host: alerts to show, selection to mirror.
    pub fn dispatch(&mut self, event: Event) -> Vec<Action> {
        let actions = self.core.handle(event);
        if actions.iter().any(|a| matches!(a, Action::SheetResized { .. })) {
            self.sync_canvas_size();
        }
        if actions.contains(&Action::RenderNeeded) {
            if let Err(e) = self.render() {
                tracing::warn!(error = ?e, "canvas render failed");
            }
        }
        actions
    }

    fn sync_canvas_size(&self) {
        let (width, height) = self.core.sheet.pixel_dims();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let frame = self.core.frame();
        web::draw(&self.ctx, &frame, &mut self.images)
    }

    /// Status caption for the sheet size.
    #[must_use]
    pub fn caption(&self) -> String {
        self.core.caption()
    }

    /// Encode the canvas as shown as PNG for download.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if reading the canvas or encoding fails.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        export::encode_png(&self.snapshot()?)
    }

    /// Encode the canvas as shown as PDF for download.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if reading the canvas or encoding fails.
    pub fn export_pdf(&self) -> Result<Vec<u8>, ExportError> {
        export::encode_pdf(&self.snapshot()?, &self.core.sheet)
    }

    fn snapshot(&self) -> Result<Pixmap, ExportError> {
        let (width, height) = self.core.sheet.pixel_dims();
        web::snapshot(&self.ctx, width, height)
    }
}

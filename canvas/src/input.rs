//! Input model: pointer events, view toggles, and the drag state machine.
//!
//! `UiState` is the persistent view state the renderer reads (grid toggle,
//! display unit). `InputState` is the gesture tracked between pointer-down
//! and pointer-up. Selection itself lives on [`crate::doc::DocStore`] so it
//! can never outlive the element it points at.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ElementId;
use crate::units::Unit;
use crate::viewport::Point;

/// Which device produced a pointer event.
///
/// All kinds go through the same coordinate transform; for touch the host
/// reports the first touch point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// A pointer event in client (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client: Point,
    pub kind: PointerKind,
}

impl PointerEvent {
    /// A mouse event at the given client coordinates.
    #[must_use]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y), kind: PointerKind::Mouse }
    }

    /// A touch event at the first touch point.
    #[must_use]
    pub fn touch(x: f64, y: f64) -> Self {
        Self { client: Point::new(x, y), kind: PointerKind::Touch }
    }
}

/// Persistent view state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// Whether the grid lattice is drawn.
    pub grid: bool,
    /// Unit used for rulers and the resize prompt.
    pub unit: Unit,
}

/// Internal state for the drag state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an element across the canvas.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Pointer position minus element origin at pointer-down, in canvas pixels.
        offset: Point,
    },
}

/// Externally visible interaction phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected, nothing moving.
    Idle,
    /// An element is selected and the pointer is up.
    Selected,
    /// An element is selected and following the pointer.
    Dragging,
}

impl InputState {
    /// Combine gesture state with the current selection into a [`Phase`].
    #[must_use]
    pub fn phase(&self, selected: Option<ElementId>) -> Phase {
        match (self, selected) {
            (Self::Dragging { .. }, _) => Phase::Dragging,
            (Self::Idle, Some(_)) => Phase::Selected,
            (Self::Idle, None) => Phase::Idle,
        }
    }
}

use uuid::Uuid;

use super::*;

// =============================================================
// PointerEvent
// =============================================================

#[test]
fn mouse_constructor_sets_kind() {
    let ev = PointerEvent::mouse(1.0, 2.0);
    assert_eq!(ev.kind, PointerKind::Mouse);
    assert_eq!(ev.client, Point::new(1.0, 2.0));
}

#[test]
fn touch_constructor_sets_kind() {
    let ev = PointerEvent::touch(3.0, 4.0);
    assert_eq!(ev.kind, PointerKind::Touch);
    assert_eq!(ev.client, Point::new(3.0, 4.0));
}

#[test]
fn pointer_kind_default_is_mouse() {
    assert_eq!(PointerKind::default(), PointerKind::Mouse);
}

// =============================================================
// UiState
// =============================================================

#[test]
fn ui_state_defaults() {
    let ui = UiState::default();
    assert!(!ui.grid);
    assert_eq!(ui.unit, Unit::Inches);
}

// =============================================================
// InputState / Phase
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
}

#[test]
fn idle_without_selection_is_idle_phase() {
    assert_eq!(InputState::Idle.phase(None), Phase::Idle);
}

#[test]
fn idle_with_selection_is_selected_phase() {
    assert_eq!(InputState::Idle.phase(Some(Uuid::new_v4())), Phase::Selected);
}

#[test]
fn dragging_is_dragging_phase() {
    let id = Uuid::new_v4();
    let state = InputState::Dragging { id, offset: Point::new(1.0, 1.0) };
    assert_eq!(state.phase(Some(id)), Phase::Dragging);
}

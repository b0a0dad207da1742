//! Translation of crossterm mouse reports into [`PointerEvent`]s.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::pointer::{PointerButton, PointerEvent, PointerKind};
use crate::ui::CellScale;

pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

/// Pointer event at the centre of the reported cell. Scroll reports have no
/// pointer meaning and yield `None`.
pub fn pointer_event(mouse: &MouseEvent, scale: &CellScale) -> Option<PointerEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(button) => PointerKind::Down(pointer_button(button)),
        MouseEventKind::Up(button) => PointerKind::Up(pointer_button(button)),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => PointerKind::Move,
        _ => return None,
    };
    Some(PointerEvent {
        kind,
        position: scale.to_logical(mouse.column, mouse.row),
    })
}
